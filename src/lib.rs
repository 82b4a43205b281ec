//! # pendant-link
//!
//! A portable, no_std Rust implementation of the serial command/response engine
//! used by MPG pendant bridges: a microcontroller that reads a rotary encoder and
//! a bank of selector switches and reports them to CNC host software.
//!
//! The host sends single-byte commands and the device answers with fixed-format
//! ASCII frames:
//!
//! | Direction | Payload | Meaning |
//! |-----------|---------|---------|
//! | Host → Device | `R` | Reset the encoder delta |
//! | Host → Device | `S` | Request status |
//! | Device → Host | `[R]\r\n` | Reset acknowledged |
//! | Device → Host | `[S` dddd ss `]\r\n` | Encoder delta (4 hex digits) and switch field (2 hex digits) |
//!
//! This crate implements the protocol core using:
//! - an interrupt-driven receive handler ([`link::Link::on_receive`])
//! - an interrupt-driven transmit handler ([`link::Link::on_transmit_ready`])
//! - a main-loop [`engine::ProtocolEngine`] that formats responses
//! - interrupt-safe shared state with `critical-section`
//!
//! ## Crate features
//! | Feature      | Description |
//! |--------------|-------------|
//! | `std`        | Disables `#![no_std]` support |
//! | `delay-loop` | Provides a blocking poll loop driven by `embedded_hal::delay::DelayNs` |
//! | `defmt-0-3`  | Uses `defmt` logging |
//! | `log`        | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pendant_link::{engine::ProtocolEngine, hal::RxEvent, link::Link};
//!
//! static LINK: Link = Link::new();
//!
//! #[interrupt]
//! fn USART_RX() {
//!     LINK.on_receive(RxEvent { byte: usart.read(), framing_error: usart.framing_error() });
//! }
//!
//! #[interrupt]
//! fn USART_UDRE() {
//!     LINK.on_transmit_ready(&mut usart);
//! }
//!
//! let mut engine = ProtocolEngine::new(&LINK, encoder, switches);
//! engine.init(&mut usart);
//! loop {
//!     engine.poll(&mut usart);
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - Only one [`link::Link`] should exist; declare it as a `static`
//! - The host must wait for the `\n` of a response before sending the next command;
//!   commands arriving earlier are dropped
//! - The application provides the `critical-section` implementation for its target
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(test, not(feature = "std")))]
extern crate std;

pub use critical_section;

#[macro_use]
mod fmt;

pub mod buffer;
pub mod command;
pub mod consts;
pub mod engine;
pub mod error;
pub mod frame;
pub mod hal;
pub mod hex;
pub mod link;
pub mod poll;

#[cfg(test)]
pub(crate) mod mock;

pub use command::Command;
pub use engine::ProtocolEngine;
pub use error::Error;
pub use frame::{Frame, StatusReport, SwitchBits};
pub use link::{Link, LinkState};
