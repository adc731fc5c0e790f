//! Binary input primitives.
//!
//! The mapper never loads PE images itself; it only decodes the small binary payloads that
//! frontends and symbol providers hand over (sequence-point blobs, method bodies). This module
//! holds the bounds-checked readers used for that.

pub mod io;
pub mod parser;
