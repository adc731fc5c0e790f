//! Debug-symbol providers.
//!
//! The original stream of a function comes from the binary's debug symbols. The resolution
//! pipeline only needs one query from them, the sequence points of a method by token, which
//! [`SymbolProvider`] captures. [`PortablePdbSymbols`] answers it from decoded Portable PDB
//! tables.
//!
//! # Example
//!
//! ```rust
//! use peeker::{
//!     metadata::token::Token,
//!     symbols::{MethodDebugInfo, PortablePdbSymbols, SymbolProvider},
//! };
//!
//! let mut symbols = PortablePdbSymbols::new(vec!["Program.cs".into()]);
//! symbols.add_method(
//!     Token::method_def(1),
//!     MethodDebugInfo::new(1, vec![0x00, 0x00, 0x00, 0x05, 0x0A, 0x02], 4),
//! );
//!
//! let points = symbols.sequence_points(Token::method_def(1))?.unwrap_or_default();
//! assert_eq!(points.len(), 1);
//! assert!(symbols.sequence_points(Token::method_def(2))?.is_none());
//! # Ok::<(), peeker::Error>(())
//! ```

use std::{collections::HashMap, sync::Arc};

use crate::{
    metadata::{
        sequencepoints::{parse_sequence_points, SequencePoint},
        token::Token,
    },
    Result,
};

/// Source of original sequence points, keyed by method token.
pub trait SymbolProvider {
    /// Returns every sequence point of the method, hidden ones included, in IL order.
    ///
    /// `Ok(None)` means the symbols carry no information for this method.
    ///
    /// # Errors
    /// Returns an error if the stored symbol data for the method is corrupt.
    fn sequence_points(&self, token: Token) -> Result<Option<Vec<SequencePoint>>>;
}

impl SymbolProvider for HashMap<Token, Vec<SequencePoint>> {
    fn sequence_points(&self, token: Token) -> Result<Option<Vec<SequencePoint>>> {
        Ok(self.get(&token).cloned())
    }
}

/// The `MethodDebugInformation` row of a method, along with its body size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDebugInfo {
    /// `Document` column (1-based row, `0` when the blob names its own initial document).
    pub document: u32,
    /// Raw `SequencePoints` blob.
    pub blob: Vec<u8>,
    /// Size of the method's IL body in bytes.
    pub code_size: u32,
}

impl MethodDebugInfo {
    /// Creates a new row.
    #[must_use]
    pub fn new(document: u32, blob: Vec<u8>, code_size: u32) -> Self {
        MethodDebugInfo {
            document,
            blob,
            code_size,
        }
    }
}

/// Symbols backed by Portable PDB `Document` and `MethodDebugInformation` tables.
///
/// Blobs are decoded on every query; callers are expected to cache the result.
#[derive(Debug, Default)]
pub struct PortablePdbSymbols {
    documents: Vec<Arc<str>>,
    methods: HashMap<Token, MethodDebugInfo>,
}

impl PortablePdbSymbols {
    /// Creates a provider over the given `Document` table names, in row order.
    #[must_use]
    pub fn new(documents: Vec<Arc<str>>) -> Self {
        PortablePdbSymbols {
            documents,
            methods: HashMap::new(),
        }
    }

    /// Registers the debug information of one method.
    pub fn add_method(&mut self, token: Token, info: MethodDebugInfo) {
        self.methods.insert(token, info);
    }

    /// Names of the `Document` table rows.
    #[must_use]
    pub fn documents(&self) -> &[Arc<str>] {
        &self.documents
    }

    /// Number of methods with debug information.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

impl SymbolProvider for PortablePdbSymbols {
    fn sequence_points(&self, token: Token) -> Result<Option<Vec<SequencePoint>>> {
        let Some(info) = self.methods.get(&token) else {
            return Ok(None);
        };

        if info.blob.is_empty() {
            return Ok(None);
        }

        let points = parse_sequence_points(
            &info.blob,
            info.document,
            info.code_size,
            &self.documents,
        )?;
        Ok(Some(points.0))
    }
}
