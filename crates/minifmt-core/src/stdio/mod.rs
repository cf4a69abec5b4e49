//! Formatted output and input.
//!
//! - [`printf`]: the formatter behind [`snprintf`] and [`sprintf`]
//! - [`scanf`]: the scanner behind [`sscanf`]
//! - [`digits`]: reversed-digit encoder shared by numeric conversions
//! - [`scanset`]: `%[...]` table compiler

pub mod args;
pub mod digits;
pub mod length;
pub mod printf;
pub mod scanf;
pub mod scanset;
pub mod sink;

pub use args::{FormatArg, ScanArg};
pub use digits::{MAXNBUF, ksprintn};
pub use length::{LengthFlags, LengthMod};
pub use printf::{snprintf, sprintf};
pub use scanf::{ScanOutcome, sscanf};
pub use scanset::ScanSet;
pub use sink::{BoundedBuf, Discard, Sink};
