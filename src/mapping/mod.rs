//! Reconciliation of reconstructed and original sequence points.
//!
//! A diagnostic reported against decompiled source is translated back into original
//! source coordinates in three steps:
//!
//! 1. [`covering_range`] selects the reconstructed sequence points that cover the
//!    diagnostic's span (the reconstructed stream is sorted by source position).
//! 2. [`nudge_nop_out_of_range`] corrects a leading `nop` that the decompiler attributed
//!    to the wrong statement.
//! 3. [`map_by_offset`] finds the original sequence points spanning the same IL offsets
//!    (the original stream is sorted by IL offset).
//!
//! [`find_enclosing_function`] identifies which function's streams to use in the first
//! place. The searches underneath ([`first_by_source`], [`first_by_offset`],
//! [`last_by_offset`]) are exposed for callers that need the raw indices.

mod ancestry;
mod compare;
mod nudge;
mod range;
mod search;

pub use ancestry::{find_enclosing_function, SyntaxNode, MAX_ANCESTRY_DEPTH};
pub use nudge::{nudge_nop_out_of_range, Alignment};
pub use range::{covering_range, map_by_offset};
pub use search::{first_by_offset, first_by_source, last_by_offset};
