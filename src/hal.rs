//! Capability traits for the hardware the link depends on.
//!
//! The protocol core never touches registers directly. The application
//! implements these traits for its serial peripheral, quadrature decoder and
//! switch inputs (typically thin wrappers over a PAC or HAL), and hands them to
//! the handlers in [`crate::link`] and the [`ProtocolEngine`](crate::engine::ProtocolEngine).

/// One byte delivered by the serial receive event.
///
/// The data byte and the framing-error flag must be sampled together by the
/// interrupt handler, before the data register is read again.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RxEvent {
    /// The received data byte.
    pub byte: u8,
    /// Set if the peripheral flagged a framing error for this byte.
    pub framing_error: bool,
}

impl RxEvent {
    /// A cleanly framed byte.
    pub const fn new(byte: u8) -> Self {
        Self {
            byte,
            framing_error: false,
        }
    }

    /// A byte the peripheral flagged with a framing error.
    pub const fn framing_error(byte: u8) -> Self {
        Self {
            byte,
            framing_error: true,
        }
    }
}

/// Register-level operations on the serial peripheral.
///
/// On an AVR USART these map to writing `UDRn` and toggling `UDRIEn` / the
/// `RXCIEn`, `RXENn`, `TXENn` bits of `UCSRnB`.
pub trait SerialPort {
    /// Writes one byte to the transmit data register.
    ///
    /// Only called from the transmit-ready handler, when the register is empty.
    fn write_byte(&mut self, byte: u8);

    /// Enables the transmit-ready (data register empty) event.
    ///
    /// Hardware fires the event straight away if the data register is already
    /// empty, which is what puts the first byte of a frame on the wire.
    fn listen_tx_ready(&mut self);

    /// Disables the transmit-ready event.
    fn unlisten_tx_ready(&mut self);

    /// Enables the receiver, the transmitter and the byte-received event.
    fn listen_rx(&mut self);
}

/// Rotary encoder delta counter.
pub trait Encoder {
    /// Discards any accumulated movement.
    fn reset(&mut self);

    /// Returns the movement accumulated since the last read or reset, and clears it.
    fn read_and_clear_delta(&mut self) -> i16;
}

/// Debounced pendant selector switches.
pub trait SwitchBank {
    /// Axis selector position (3 bits are reported).
    fn axis(&mut self) -> u8;

    /// Step-size selector position (3 bits are reported).
    fn step(&mut self) -> u8;

    /// Whether the emergency stop is engaged.
    fn e_stop(&mut self) -> bool;
}
