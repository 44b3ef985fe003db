//! pbrgen CLI library.
//!
//! Input discovery and command implementations behind the `pbrgen` binary.

pub mod commands;
pub mod input;
