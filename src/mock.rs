//! Test doubles for the hardware capability traits.

use std::vec::Vec;

use crate::hal::{Encoder, SerialPort, SwitchBank};
use crate::link::Link;

/// Records everything the link does to the serial peripheral.
#[derive(Debug, Default)]
pub(crate) struct MockPort {
    pub sent: Vec<u8>,
    pub tx_armed: bool,
    pub rx_enabled: bool,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SerialPort for MockPort {
    fn write_byte(&mut self, byte: u8) {
        assert!(self.tx_armed, "byte written while transmit-ready is disarmed");
        self.sent.push(byte);
    }

    fn listen_tx_ready(&mut self) {
        self.tx_armed = true;
    }

    fn unlisten_tx_ready(&mut self) {
        self.tx_armed = false;
    }

    fn listen_rx(&mut self) {
        self.rx_enabled = true;
    }
}

/// Fires the transmit-ready event for as long as it stays armed, like an
/// empty data register would.
pub(crate) fn drain(link: &Link, port: &mut MockPort) {
    for _ in 0..64 {
        if !port.tx_armed {
            return;
        }
        link.on_transmit_ready(port);
    }
    panic!("transmitter never disarmed");
}

#[derive(Debug, Default)]
pub(crate) struct MockEncoder {
    pub delta: i16,
    pub resets: usize,
    pub reads: usize,
}

impl MockEncoder {
    pub fn with_delta(delta: i16) -> Self {
        Self {
            delta,
            ..Self::default()
        }
    }
}

impl Encoder for MockEncoder {
    fn reset(&mut self) {
        self.resets += 1;
        self.delta = 0;
    }

    fn read_and_clear_delta(&mut self) -> i16 {
        self.reads += 1;
        core::mem::take(&mut self.delta)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MockSwitches {
    pub axis: u8,
    pub step: u8,
    pub e_stop: bool,
}

impl MockSwitches {
    pub fn new(axis: u8, step: u8, e_stop: bool) -> Self {
        Self { axis, step, e_stop }
    }
}

impl SwitchBank for MockSwitches {
    fn axis(&mut self) -> u8 {
        self.axis
    }

    fn step(&mut self) -> u8 {
        self.step
    }

    fn e_stop(&mut self) -> bool {
        self.e_stop
    }
}
