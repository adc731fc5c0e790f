//! One binary's decompilation session.
//!
//! A [`Decompilation`] ties together the collaborators that know about a single binary:
//! the decompiler frontend (reconstructed source, reconstructed sequence points, syntax
//! trees) and, if present, its debug symbols. It owns the per-function stream caches and
//! exposes [`Decompilation::resolve_original_location`], the translation of a diagnostic's
//! reconstructed-source location into original-source coordinates.
//!
//! # Key Components
//!
//! - [`Decompiler`] - The frontend interface a decompiler implements
//! - [`DecompiledFunction`] - Function annotation found on reconstructed syntax nodes
//! - [`SyntaxUnit`] - One reconstructed source file
//! - [`Decompilation`] - The session, with resolution, source dumping and diagnostic rendering
//!
//! # Thread Safety
//!
//! Stream caches are filled lazily on first use and then only read. Resolution takes
//! `&mut self`, so a session resolves one diagnostic at a time; running sessions for
//! different binaries in parallel is fine.

mod cache;
mod describe;
mod dump;
mod resolve;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    diagnostics::LinePosition,
    mapping::SyntaxNode,
    metadata::{sequencepoints::SequencePoint, token::Token},
    symbols::SymbolProvider,
    Result,
};

pub use dump::sanitize_unit_name;

use cache::StreamCache;

/// One reconstructed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxUnit {
    /// File name of the unit, e.g. `Contoso.Widgets.cs`.
    pub name: String,
    /// Full source text.
    pub text: String,
}

impl SyntaxUnit {
    /// Creates a new unit.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        SyntaxUnit {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// The decompiled function a syntax node belongs to.
pub trait DecompiledFunction {
    /// The function's `MethodDef` token, if it maps to a method of the binary.
    fn identity(&self) -> Option<Token>;

    /// Start offsets of the function's IL instructions, in listing order.
    fn instruction_offsets(&self) -> &[u32];
}

/// Interface of a decompiler frontend for one binary.
pub trait Decompiler {
    /// Function annotation carried by syntax nodes.
    type Function: DecompiledFunction;

    /// Handle to a node of a unit's syntax tree.
    type Node<'a>: SyntaxNode<Function = Self::Function>
    where
        Self: 'a;

    /// The reconstructed units, in a stable order.
    fn units(&self) -> &[SyntaxUnit];

    /// The smallest node of `unit` containing the span `start..end`.
    ///
    /// Lines are 1-based, characters are passed through unchanged.
    fn node_containing(
        &self,
        unit: usize,
        start: LinePosition,
        end: LinePosition,
    ) -> Option<Self::Node<'_>>;

    /// Sequence points of every function in `unit`, keyed by function token, as emitted
    /// with the reconstructed text. Hidden points may be included.
    ///
    /// # Errors
    /// Returns an error if the frontend fails to compute them.
    fn sequence_points(&self, unit: usize) -> Result<HashMap<Token, Vec<SequencePoint>>>;
}

/// Decompilation session of one binary.
pub struct Decompilation<D: Decompiler> {
    file_name: PathBuf,
    decompiler: D,
    symbols: Option<Box<dyn SymbolProvider>>,
    dump_source: Option<PathBuf>,
    cache: StreamCache,
}

impl<D: Decompiler> Decompilation<D> {
    /// Creates a session for the binary at `file_name`.
    ///
    /// `symbols` is `None` when the binary has no usable debug symbols. `dump_source` is
    /// the directory reconstructed units are dumped to, which also enables the dumped-file
    /// fallback of location resolution.
    pub fn new(
        file_name: impl Into<PathBuf>,
        decompiler: D,
        symbols: Option<Box<dyn SymbolProvider>>,
        dump_source: Option<PathBuf>,
    ) -> Self {
        let unit_count = decompiler.units().len();
        Decompilation {
            file_name: file_name.into(),
            decompiler,
            symbols,
            dump_source,
            cache: StreamCache::new(unit_count),
        }
    }

    /// Path of the binary.
    #[must_use]
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// The frontend of this session.
    pub fn decompiler(&self) -> &D {
        &self.decompiler
    }

    /// The reconstructed units.
    pub fn units(&self) -> &[SyntaxUnit] {
        self.decompiler.units()
    }

    /// Returns `true` if debug symbols are available for the binary.
    #[must_use]
    pub fn has_symbols(&self) -> bool {
        self.symbols.is_some()
    }

    /// Directory reconstructed units are dumped to, if dumping is enabled.
    #[must_use]
    pub fn dump_source(&self) -> Option<&Path> {
        self.dump_source.as_deref()
    }

    /// Index of the unit named `name`.
    pub fn unit_index(&self, name: &str) -> Option<usize> {
        self.decompiler
            .units()
            .iter()
            .position(|unit| unit.name == name)
    }
}
