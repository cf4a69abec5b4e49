//! Standard library utility functions.
//!
//! Only the `<stdlib.h>` integer conversions the formatting engines depend on.

pub mod conversion;

pub use conversion::{strtoq, strtoul, strtouq};
