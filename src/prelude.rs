//! # peeker Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the peeker library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all peeker operations
pub use crate::Error;

/// The result type used throughout peeker
pub use crate::Result;

/// Low-level binary parsing
pub use crate::Parser;

// ================================================================================================
// Metadata and Symbols
// ================================================================================================

/// Metadata token type, the identity of a method
pub use crate::metadata::token::Token;

/// Sequence points and their decoder
pub use crate::metadata::sequencepoints::{parse_sequence_points, SequencePoint, SequencePoints};

/// Debug-symbol providers
pub use crate::symbols::{MethodDebugInfo, PortablePdbSymbols, SymbolProvider};

/// CIL instruction boundaries
pub use crate::disassembler::instruction_offsets;

// ================================================================================================
// Location Mapping
// ================================================================================================

/// Boundary searches and range mapping
pub use crate::mapping::{
    covering_range, find_enclosing_function, first_by_offset, first_by_source, last_by_offset,
    map_by_offset, nudge_nop_out_of_range, Alignment, SyntaxNode,
};

/// Decompilation sessions and the frontend interface
pub use crate::decompilation::{Decompilation, DecompiledFunction, Decompiler, SyntaxUnit};

/// Diagnostics and their locations
pub use crate::diagnostics::{
    Diagnostic, LinePosition, LineSpan, Location, ResolvedLocation, RuleDescriptor, Severity,
};

// ================================================================================================
// Batch Processing
// ================================================================================================

/// Configuration, rule sets and the batch controller
pub use crate::{
    config::AnalyzerConfig,
    controller::{AnalysisEngine, Controller, Frontend, LoadedBinary, ProcessSummary},
    report::{ResultWriter, SarifLog},
    ruleset::{MergedRuleSet, ReportAction, RuleSet},
};
