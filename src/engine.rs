//! Main-loop side of the link: services pending requests.
//!
//! The [`ProtocolEngine`] owns the encoder and switch collaborators and is
//! polled from the firmware's main loop. Each [`poll()`](ProtocolEngine::poll)
//! takes one snapshot of the [`LinkState`]; if a request is pending it samples
//! the collaborators, formats the response straight into the link's output
//! buffer, and arms the transmitter. Every other state is a no-op, so the
//! engine can be polled as often as convenient.
//!
//! ## Example
//!
//! ```rust,ignore
//! static LINK: Link = Link::new();
//!
//! let mut engine = ProtocolEngine::new(&LINK, encoder, switches);
//! engine.init(&mut usart);
//! loop {
//!     engine.poll(&mut usart);
//!     // ... other main-loop work
//! }
//! ```

use crate::command::Command;
use crate::frame::{Frame, StatusReport, SwitchBits};
use crate::hal::{Encoder, SerialPort, SwitchBank};
use crate::link::{Link, LinkState};

/// Formats responses for requests posted by the receive handler.
///
/// ## Type Parameters
///
/// - `E`: the rotary encoder delta counter, see [`Encoder`]
/// - `W`: the selector switch bank, see [`SwitchBank`]
#[derive(Debug)]
pub struct ProtocolEngine<'a, E, W>
where
    E: Encoder,
    W: SwitchBank,
{
    link: &'a Link,
    encoder: E,
    switches: W,
}

impl<'a, E, W> ProtocolEngine<'a, E, W>
where
    E: Encoder,
    W: SwitchBank,
{
    /// Creates an engine bound to `link`.
    pub fn new(link: &'a Link, encoder: E, switches: W) -> Self {
        Self {
            link,
            encoder,
            switches,
        }
    }

    /// Configures the receptive baseline: link `Receptive`, transmitter
    /// disarmed, receiver enabled. Call once at startup.
    pub fn init<P: SerialPort>(&mut self, port: &mut P) {
        self.link.reset(port);
    }

    /// Services a pending request, if there is one.
    ///
    /// # Behavior
    /// - `PendingReset`: resets the encoder and sends `[R]\r\n`
    /// - `PendingStatus`: reads and clears the encoder delta, samples the
    ///   switches and sends `[S` dddd ss `]\r\n`
    /// - any other state: does nothing
    ///
    /// Arming `port` makes the hardware raise the transmit-ready event, which
    /// sends the first byte; the rest follow from
    /// [`Link::on_transmit_ready`].
    ///
    /// # Returns
    /// The command that was answered, or `None` if nothing was pending.
    pub fn poll<P: SerialPort>(&mut self, port: &mut P) -> Option<Command> {
        let snapshot = self.link.state();
        let command = snapshot.pending_command()?;

        let frame = match command {
            Command::Reset => {
                self.encoder.reset();
                Frame::ResetAck
            }
            Command::Status => Frame::Status(self.sample()),
        };

        if self.link.respond(snapshot, &frame, port) {
            trace!("answering command {}", command.as_byte());
            Some(command)
        } else {
            None
        }
    }

    /// Whether the link is receptive, i.e. nothing is pending or in flight.
    pub fn is_idle(&self) -> bool {
        self.link.state() == LinkState::Receptive
    }

    /// The link this engine services.
    pub fn link(&self) -> &'a Link {
        self.link
    }

    /// Releases the collaborators.
    pub fn release(self) -> (E, W) {
        (self.encoder, self.switches)
    }

    fn sample(&mut self) -> StatusReport {
        let delta = self.encoder.read_and_clear_delta();
        let switches = SwitchBits::pack(
            self.switches.axis(),
            self.switches.step(),
            self.switches.e_stop(),
        );
        StatusReport {
            // Bit pattern, not value: -1 is reported as FFFF.
            delta: u16::from_ne_bytes(delta.to_ne_bytes()),
            switches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::RxEvent;
    use crate::mock::{MockEncoder, MockPort, MockSwitches, drain};

    fn engine(
        link: &Link,
        delta: i16,
        switches: MockSwitches,
    ) -> ProtocolEngine<'_, MockEncoder, MockSwitches> {
        ProtocolEngine::new(link, MockEncoder::with_delta(delta), switches)
    }

    #[test]
    fn test_poll_without_request_is_noop() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, 5, MockSwitches::default());

        assert_eq!(engine.poll(&mut port), None);
        assert!(engine.is_idle());
        assert!(!port.tx_armed);

        let (encoder, _) = engine.release();
        assert_eq!(encoder.resets, 0);
        assert_eq!(encoder.reads, 0);
    }

    #[test]
    fn test_init_configures_receptive_baseline() {
        let link = Link::new();
        let mut port = MockPort::new();
        port.tx_armed = true;
        let mut engine = engine(&link, 0, MockSwitches::default());

        engine.init(&mut port);
        assert!(engine.is_idle());
        assert!(port.rx_enabled);
        assert!(!port.tx_armed);
    }

    #[test]
    fn test_reset_request_round_trip() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, 42, MockSwitches::default());
        engine.init(&mut port);

        link.on_receive(RxEvent::new(b'R'));
        assert_eq!(engine.poll(&mut port), Some(Command::Reset));
        assert_eq!(link.state(), LinkState::Responding);
        assert!(port.tx_armed);

        // Further polls while responding do nothing
        assert_eq!(engine.poll(&mut port), None);

        drain(&link, &mut port);
        assert_eq!(port.sent.as_slice(), b"[R]\r\n");
        assert!(engine.is_idle());

        let (encoder, _) = engine.release();
        assert_eq!(encoder.resets, 1);
        assert_eq!(encoder.delta, 0);
    }

    #[test]
    fn test_status_reports_negative_delta_as_bit_pattern() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, -1, MockSwitches::new(2, 1, false));
        engine.init(&mut port);

        link.on_receive(RxEvent::new(b'S'));
        assert_eq!(engine.poll(&mut port), Some(Command::Status));
        drain(&link, &mut port);

        assert_eq!(port.sent.as_slice(), b"[SFFFF0A]\r\n");
        assert!(engine.is_idle());
    }

    #[test]
    fn test_status_reports_e_stop() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, 0, MockSwitches::new(0, 0, true));
        engine.init(&mut port);

        link.on_receive(RxEvent::new(b'S'));
        let _ = engine.poll(&mut port);
        drain(&link, &mut port);

        assert_eq!(port.sent.as_slice(), b"[S000040]\r\n");
    }

    #[test]
    fn test_delta_is_cleared_on_read() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, 0, MockSwitches::new(1, 0, false));
        engine.init(&mut port);

        for _ in 0..2 {
            link.on_receive(RxEvent::new(b'S'));
            assert_eq!(engine.poll(&mut port), Some(Command::Status));
            drain(&link, &mut port);
        }
        assert_eq!(port.sent.as_slice(), b"[S000001]\r\n[S000001]\r\n");

        let (encoder, _) = engine.release();
        assert_eq!(encoder.reads, 2);
    }

    #[test]
    fn test_movement_between_requests_is_reported_once() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, 300, MockSwitches::default());
        engine.init(&mut port);

        link.on_receive(RxEvent::new(b'S'));
        let _ = engine.poll(&mut port);
        drain(&link, &mut port);

        link.on_receive(RxEvent::new(b'S'));
        let _ = engine.poll(&mut port);
        drain(&link, &mut port);

        assert_eq!(port.sent.as_slice(), b"[S012C00]\r\n[S000000]\r\n");
    }

    #[test]
    fn test_command_during_response_is_dropped() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, 7, MockSwitches::default());
        engine.init(&mut port);

        link.on_receive(RxEvent::new(b'R'));
        let _ = engine.poll(&mut port);
        link.on_transmit_ready(&mut port);
        link.on_transmit_ready(&mut port);

        // Host did not wait for the terminator
        link.on_receive(RxEvent::new(b'S'));
        assert_eq!(link.state(), LinkState::Responding);

        drain(&link, &mut port);
        assert_eq!(engine.poll(&mut port), None);
        assert_eq!(port.sent.as_slice(), b"[R]\r\n");
        assert_eq!(link.stats().busy_drops, 1);
    }

    #[test]
    fn test_new_command_accepted_after_full_transmission() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut engine = engine(&link, 0, MockSwitches::default());
        engine.init(&mut port);

        link.on_receive(RxEvent::new(b'R'));
        let _ = engine.poll(&mut port);
        drain(&link, &mut port);
        assert_eq!(link.state(), LinkState::Receptive);

        link.on_receive(RxEvent::new(b'S'));
        assert_eq!(link.state(), LinkState::PendingStatus);
        assert_eq!(engine.poll(&mut port), Some(Command::Status));
        drain(&link, &mut port);

        assert_eq!(port.sent.as_slice(), b"[R]\r\n[S000000]\r\n");
        assert_eq!(link.stats().responses_sent, 2);
    }
}
