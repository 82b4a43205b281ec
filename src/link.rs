//! Shared link state and the two interrupt handlers.
//!
//! A [`Link`] is the only state shared between the byte-received interrupt,
//! the transmit-ready interrupt and the main loop. It is `const`-constructible
//! so an application declares exactly one as a `static` and calls into it from
//! all three contexts:
//!
//! ```rust,ignore
//! static LINK: Link = Link::new();
//!
//! #[interrupt]
//! fn USART_RX() {
//!     LINK.on_receive(usart::take_rx_event());
//! }
//!
//! #[interrupt]
//! fn USART_UDRE() {
//!     LINK.on_transmit_ready(&mut usart::Registers);
//! }
//! ```
//!
//! ## State ownership
//!
//! | Transition | Owner |
//! |------------|-------|
//! | `Receptive` → `PendingReset` / `PendingStatus` | [`Link::on_receive`] |
//! | `PendingReset` / `PendingStatus` → `Responding` | [`ProtocolEngine::poll`](crate::engine::ProtocolEngine::poll) |
//! | `Responding` → `Receptive` | [`Link::on_transmit_ready`] |
//!
//! The output [`FrameBuffer`] follows the state: its contents are written only
//! while a request is pending, and its cursor only moves while `Responding`.
//! Transitions that depend on the current value run inside
//! `critical_section::with`, so only plain atomic loads and stores are needed
//! (targets such as AVR have no compare-and-swap).

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use critical_section::{CriticalSection, Mutex};

use crate::buffer::FrameBuffer;
use crate::command::Command;
use crate::frame::Frame;
use crate::hal::{RxEvent, SerialPort};

/// Where the link is in the request/response cycle.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum LinkState {
    /// Idle and accepting a command.
    #[default]
    Receptive = 0,
    /// A reset command arrived and has not been serviced yet.
    PendingReset = 1,
    /// A status command arrived and has not been serviced yet.
    PendingStatus = 2,
    /// A response frame is being transmitted.
    Responding = 3,
}

impl LinkState {
    const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => LinkState::PendingReset,
            2 => LinkState::PendingStatus,
            3 => LinkState::Responding,
            _ => LinkState::Receptive,
        }
    }

    /// The pending state a received command moves the link into.
    pub const fn pending(command: Command) -> Self {
        match command {
            Command::Reset => LinkState::PendingReset,
            Command::Status => LinkState::PendingStatus,
        }
    }

    /// The command awaiting service, if any.
    pub const fn pending_command(self) -> Option<Command> {
        match self {
            LinkState::PendingReset => Some(Command::Reset),
            LinkState::PendingStatus => Some(Command::Status),
            LinkState::Receptive | LinkState::Responding => None,
        }
    }
}

/// Atomically updated [`LinkState`] tag.
///
/// Reads are lock-free. Writes require a [`CriticalSection`] token, so a write
/// and the check that guards it are indivisible with respect to the interrupts.
#[derive(Debug)]
pub struct SharedLinkState(AtomicU8);

impl SharedLinkState {
    /// Creates the tag holding `state`.
    pub const fn new(state: LinkState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    /// Snapshot of the current state.
    pub fn load(&self) -> LinkState {
        LinkState::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, _cs: CriticalSection<'_>, state: LinkState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Diagnostic counters kept by the link. They wrap on overflow.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct LinkStats {
    /// Response frames transmitted in full.
    pub responses_sent: u16,
    /// Bytes dropped because the peripheral flagged a framing error.
    pub framing_errors: u16,
    /// Bytes dropped because they are not a command.
    pub unknown_commands: u16,
    /// Bytes dropped because a request was already pending or being answered.
    pub busy_drops: u16,
}

/// The serial link shared between the interrupt handlers and the main loop.
pub struct Link {
    state: SharedLinkState,
    frame: Mutex<RefCell<FrameBuffer>>,
    stats: Mutex<Cell<LinkStats>>,
}

impl Link {
    /// Creates a link in the [`Receptive`](LinkState::Receptive) state with an empty buffer.
    pub const fn new() -> Self {
        Self {
            state: SharedLinkState::new(LinkState::Receptive),
            frame: Mutex::new(RefCell::new(FrameBuffer::new())),
            stats: Mutex::new(Cell::new(LinkStats {
                responses_sent: 0,
                framing_errors: 0,
                unknown_commands: 0,
                busy_drops: 0,
            })),
        }
    }

    /// Snapshot of the current state. May change right after it is read.
    pub fn state(&self) -> LinkState {
        self.state.load()
    }

    /// Copy of the diagnostic counters.
    pub fn stats(&self) -> LinkStats {
        critical_section::with(|cs| self.stats.borrow(cs).get())
    }

    /// Runs `f` with shared access to the output buffer.
    pub fn inspect_frame<R>(&self, f: impl FnOnce(&FrameBuffer) -> R) -> R {
        critical_section::with(|cs| f(&*self.frame.borrow(cs).borrow()))
    }

    /// Returns `Ok` once the link is back in the receptive state.
    ///
    /// # Returns
    /// - `Ok(())`: the link accepts a new command
    /// - `Err(nb::Error::WouldBlock)`: a request is pending or a response is in flight
    pub fn poll_idle(&self) -> nb::Result<(), Infallible> {
        if self.state() == LinkState::Receptive {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Puts the link into its receptive baseline: state `Receptive`, empty
    /// buffer, transmit-ready event disarmed, receiver enabled.
    ///
    /// Startup only: it forces `Receptive` from any state. Reached through
    /// [`ProtocolEngine::init`](crate::engine::ProtocolEngine::init), before
    /// interrupts are enabled.
    pub(crate) fn reset<P: SerialPort>(&self, port: &mut P) {
        critical_section::with(|cs| {
            self.frame.borrow(cs).borrow_mut().clear();
            self.state.store(cs, LinkState::Receptive);
            port.unlisten_tx_ready();
            port.listen_rx();
        });
        debug!("link reset, receptive");
    }

    /// Receive handler: call from the byte-received interrupt.
    ///
    /// Bytes with a framing error, bytes that are not a command, and any byte
    /// arriving while the link is not receptive are dropped without a trace
    /// on the wire. Never touches the output buffer.
    pub fn on_receive(&self, event: RxEvent) {
        critical_section::with(|cs| {
            if event.framing_error {
                self.count(cs, |s| s.framing_errors = s.framing_errors.wrapping_add(1));
                warn!("framing error, dropped byte {}", event.byte);
                return;
            }

            if self.state.load() != LinkState::Receptive {
                self.count(cs, |s| s.busy_drops = s.busy_drops.wrapping_add(1));
                debug!("link busy, dropped byte {}", event.byte);
                return;
            }

            match Command::try_from(event.byte) {
                Ok(command) => {
                    self.state.store(cs, LinkState::pending(command));
                    trace!("command {} pending", event.byte);
                }
                Err(_) => {
                    self.count(cs, |s| s.unknown_commands = s.unknown_commands.wrapping_add(1));
                    debug!("unknown command byte {}", event.byte);
                }
            }
        });
    }

    /// Transmit handler: call from the transmit-ready interrupt.
    ///
    /// Writes the next byte of the frame to `port`. Once the frame is
    /// exhausted it disarms the transmit-ready event and returns the link to
    /// `Receptive`, which is the only way a response ends.
    pub fn on_transmit_ready<P: SerialPort>(&self, port: &mut P) {
        critical_section::with(|cs| {
            if self.state.load() != LinkState::Responding {
                // Not ours to drain; silence the event.
                port.unlisten_tx_ready();
                return;
            }

            let next = self.frame.borrow(cs).borrow_mut().next_byte();
            match next {
                Some(byte) => port.write_byte(byte),
                None => {
                    port.unlisten_tx_ready();
                    self.state.store(cs, LinkState::Receptive);
                    self.count(cs, |s| s.responses_sent = s.responses_sent.wrapping_add(1));
                    trace!("response sent, receptive");
                }
            }
        });
    }

    /// Loads `frame` and starts transmitting it, provided the link is still in
    /// the `pending` state the caller observed.
    ///
    /// Returns `false` without touching anything otherwise.
    pub(crate) fn respond<P: SerialPort>(
        &self,
        pending: LinkState,
        frame: &Frame,
        port: &mut P,
    ) -> bool {
        if pending.pending_command().is_none() {
            return false;
        }
        critical_section::with(|cs| {
            if self.state.load() != pending {
                return false;
            }
            if self.frame.borrow(cs).borrow_mut().load(frame).is_err() {
                warn!("frame does not fit the output buffer");
                return false;
            }
            self.state.store(cs, LinkState::Responding);
            port.listen_tx_ready();
            true
        })
    }

    fn count(&self, cs: CriticalSection<'_>, update: impl FnOnce(&mut LinkStats)) {
        let cell = self.stats.borrow(cs);
        let mut stats = cell.get();
        update(&mut stats);
        cell.set(stats);
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
