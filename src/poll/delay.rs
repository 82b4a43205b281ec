use embedded_hal::delay::DelayNs;

use crate::command::Command;
use crate::engine::ProtocolEngine;
use crate::hal::{Encoder, SerialPort, SwitchBank};

/// Polls the engine once, then waits `poll_us` microseconds.
///
/// # Arguments
/// - `engine`: The protocol engine to service.
/// - `port`: Serial capability used to arm the transmitter.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `poll_us`: The pause after each poll, in microseconds (see [`char_time_us`](super::char_time_us)).
///
/// # Returns
/// The command answered by this poll, if any.
pub fn poll_with_delay<E, W, P, D>(
    engine: &mut ProtocolEngine<'_, E, W>,
    port: &mut P,
    delay: &mut D,
    poll_us: u32,
) -> Option<Command>
where
    E: Encoder,
    W: SwitchBank,
    P: SerialPort,
    D: DelayNs,
{
    let answered = engine.poll(port);
    delay.delay_us(poll_us);
    answered
}

/// Runs a blocking loop that repeatedly polls the engine.
///
/// Initializes the link first, then never returns; it is intended for
/// single-purpose firmware whose only main-loop work is the pendant link.
///
/// # Example
/// ```rust,ignore
/// static LINK: Link = Link::new();
///
/// let mut engine = ProtocolEngine::new(&LINK, encoder, switches);
/// pendant_link::poll::run_poll_loop(&mut engine, &mut usart, &mut delay, char_time_us(38_400));
/// ```
pub fn run_poll_loop<E, W, P, D>(
    engine: &mut ProtocolEngine<'_, E, W>,
    port: &mut P,
    delay: &mut D,
    poll_us: u32,
) -> !
where
    E: Encoder,
    W: SwitchBank,
    P: SerialPort,
    D: DelayNs,
{
    engine.init(port);
    loop {
        let _ = poll_with_delay(engine, port, delay, poll_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::RxEvent;
    use crate::link::Link;
    use crate::mock::{MockEncoder, MockPort, MockSwitches, drain};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn test_poll_with_delay_answers_pending_request() {
        let link = Link::new();
        let mut port = MockPort::new();
        let mut delay = NoopDelay::new();
        let mut engine = ProtocolEngine::new(
            &link,
            MockEncoder::with_delta(-2),
            MockSwitches::new(3, 2, false),
        );
        engine.init(&mut port);

        assert_eq!(poll_with_delay(&mut engine, &mut port, &mut delay, 261), None);

        link.on_receive(RxEvent::new(b'S'));
        assert_eq!(
            poll_with_delay(&mut engine, &mut port, &mut delay, 261),
            Some(Command::Status)
        );
        drain(&link, &mut port);
        assert_eq!(port.sent.as_slice(), b"[SFFFE13]\r\n");
    }
}
