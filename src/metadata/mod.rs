//! Metadata structures shared by the symbol readers.
//!
//! # Key Components
//!
//! - [`token`] - Metadata table row references, used as function identity
//! - [`sequencepoints`] - Sequence points and the Portable PDB blob decoder
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use peeker::metadata::{sequencepoints::parse_sequence_points, token::Token};
//!
//! let documents: Vec<Arc<str>> = vec![Arc::from("Program.cs")];
//! // local signature 0, IL 0x0 at 5:9 spanning 0 lines and 10 columns
//! let points = parse_sequence_points(&[0x00, 0x00, 0x00, 0x0A, 0x05, 0x09], 1, 8, &documents)?;
//!
//! assert_eq!(points.0.len(), 1);
//! assert_eq!(points.0[0].start_line, 5);
//! assert_eq!(Token::method_def(1).value(), 0x0600_0001);
//! # Ok::<(), peeker::Error>(())
//! ```

/// Sequence points and their Portable PDB encoding
pub mod sequencepoints;
/// Commonly used metadata token type
pub mod token;
