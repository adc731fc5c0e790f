// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # peeker
//!
//! Analyze decompiled .NET binaries and report the findings against the *original* source.
//!
//! A decompiler reconstructs source text from a binary and a source analyzer reports
//! diagnostics against that reconstructed text. Those locations mean little to whoever owns
//! the original code. `peeker` maps every diagnostic back to the original source file and
//! lines recorded in the binary's debug symbols.
//!
//! Both sides describe the same IL through *sequence points*, so IL offsets are the shared
//! coordinate space. The mapping follows three steps:
//!
//! 1. find the reconstructed sequence points covering the diagnostic's span
//! 2. align that IL range with the statement boundaries of the original points
//! 3. take the original points covering the aligned range and report their source span
//!
//! When that fails the diagnostic can still point into a dumped copy of the reconstructed
//! source, or it stays attributed to the binary.
//!
//! ## Architecture
//!
//! - [`mapping`] - Boundary searches, range mapping and alignment over sequence points
//! - [`metadata`] - Metadata tokens and Portable PDB sequence-point decoding
//! - [`disassembler`] - CIL instruction boundaries of method bodies
//! - [`symbols`] - Debug-symbol providers
//! - [`decompilation`] - Per-binary session that resolves diagnostic locations
//! - [`diagnostics`] - Diagnostics, locations and rule descriptors
//! - [`ruleset`] - `.ruleset` files filtering diagnostics
//! - [`report`] - SARIF reports
//! - [`config`] and [`controller`] - Batch configuration and processing
//!
//! ## Quick Start
//!
//! ```rust
//! use peeker::mapping::{first_by_source, last_by_offset};
//! use peeker::metadata::sequencepoints::SequencePoint;
//!
//! let points = vec![
//!     SequencePoint::new(0x0, 0x6, 10, 4, 10, 30),
//!     SequencePoint::new(0x6, 0xd, 11, 4, 12, 18),
//!     SequencePoint::new(0xd, 0x14, 13, 4, 13, 22),
//! ];
//!
//! assert_eq!(first_by_source(&points, 11, 8), Some(1));
//! assert_eq!(last_by_offset(&points, 0xd), Some(1));
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`](Result). Location resolution itself never
//! fails; anything it cannot map yields `None` and a log entry.
//!
//! ```rust
//! use peeker::{metadata::sequencepoints::parse_sequence_points, Error};
//!
//! match parse_sequence_points(&[0x00, 0x80], 1, 4, &[]) {
//!     Err(Error::OutOfBounds) => println!("truncated blob"),
//!     Err(e) => println!("Error: {}", e),
//!     Ok(points) => println!("{} points", points.0.len()),
//! }
//! ```
//!
//! ## Logging
//!
//! All diagnostics of the library go through the [`log`] facade. Nothing is printed unless
//! the embedding application installs a logger.
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use peeker::prelude::*;
///
/// let token = Token::method_def(3);
/// assert!(token.is_method_def());
/// ```
pub mod prelude;

/// CIL instruction boundaries based on ECMA-335.
///
/// # Examples
///
/// ```rust
/// use peeker::disassembler::instruction_offsets;
///
/// // nop, ldc.i4.s 5, ret
/// let offsets = instruction_offsets(&[0x00, 0x1F, 0x05, 0x2A])?;
/// assert_eq!(offsets, vec![0, 1, 3]);
/// # Ok::<(), peeker::Error>(())
/// ```
pub mod disassembler;

/// Metadata tokens and sequence points.
pub mod metadata;

pub mod config;
pub mod controller;
pub mod decompilation;
pub mod diagnostics;
pub mod mapping;
pub mod report;
pub mod ruleset;
pub mod symbols;

/// `peeker` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `peeker` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// Bounds-checked reader over binary data.
///
/// # Example
///
/// ```rust
/// use peeker::Parser;
///
/// let mut parser = Parser::new(&[0x81, 0x23]);
/// assert_eq!(parser.read_compressed_uint()?, 0x123);
/// # Ok::<(), peeker::Error>(())
/// ```
pub use file::parser::Parser;
