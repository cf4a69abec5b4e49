//! # minifmt-core
//!
//! Freestanding implementations of the C formatted-output and formatted-input
//! engines (`snprintf`, `sprintf`, `sscanf`) and the integer conversions they
//! are built on (`strtoul`, `strtoq`, `strtouq`).
//!
//! Nothing in this crate allocates, logs, or touches global state: every call
//! works on caller-owned buffers and an explicit argument slice. The optional
//! `alloc` feature only adds a [`stdio::Sink`] implementation for `Vec<u8>`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod ctype;
pub mod error;
pub mod stdio;
pub mod stdlib;

pub use error::FormatError;
pub use stdio::{
    BoundedBuf, Discard, FormatArg, ScanArg, ScanOutcome, Sink, snprintf, sprintf, sscanf,
};
pub use stdlib::{strtoq, strtoul, strtouq};
