//! Lazily filled per-function sequence point streams.

use std::collections::{HashMap, HashSet};

use crate::{
    decompilation::Decompiler,
    metadata::{
        sequencepoints::{SequencePoint, SequencePoints},
        token::Token,
    },
    symbols::SymbolProvider,
};

/// Reconstructed and original streams of every function touched so far.
///
/// Entries are computed once and never recomputed, including failed or empty lookups.
/// Reads go through `&self` after the matching `ensure_*` call has populated the entry.
#[derive(Debug, Default)]
pub(crate) struct StreamCache {
    /// Reconstructed points per unit, `None` until the unit was asked for.
    reconstructed: Vec<Option<HashMap<Token, Vec<SequencePoint>>>>,
    /// Functions whose reconstructed stream is already in source order.
    sanitized: HashSet<(usize, Token)>,
    /// Original streams; `None` records that the symbols had nothing.
    original: HashMap<Token, Option<Vec<SequencePoint>>>,
}

impl StreamCache {
    pub(crate) fn new(unit_count: usize) -> Self {
        StreamCache {
            reconstructed: vec![None; unit_count],
            ..Default::default()
        }
    }

    /// Makes sure the reconstructed stream of `token` in `unit` is loaded and sorted by
    /// source position with hidden points removed.
    pub(crate) fn ensure_reconstructed<D: Decompiler>(
        &mut self,
        decompiler: &D,
        unit: usize,
        token: Token,
    ) {
        let Some(slot) = self.reconstructed.get_mut(unit) else {
            return;
        };

        let points = slot.get_or_insert_with(|| match decompiler.sequence_points(unit) {
            Ok(points) => points,
            Err(error) => {
                log::warn!("Failed to create sequence points for unit {}: {}", unit, error);
                HashMap::new()
            }
        });

        if self.sanitized.contains(&(unit, token)) {
            return;
        }

        if let Some(function_points) = points.get_mut(&token) {
            let raw = std::mem::take(function_points);
            *function_points = SequencePoints(raw).sanitized();
        }
        self.sanitized.insert((unit, token));
    }

    /// Makes sure the original stream of `token` is loaded with hidden points removed.
    pub(crate) fn ensure_original(&mut self, symbols: Option<&dyn SymbolProvider>, token: Token) {
        if self.original.contains_key(&token) {
            return;
        }

        let Some(symbols) = symbols else {
            return;
        };

        let points = match symbols.sequence_points(token) {
            Ok(points) => points.map(|points| SequencePoints(points).visible()),
            Err(error) => {
                log::warn!("Failed to read debug symbols of {}: {}", token, error);
                None
            }
        };
        self.original.insert(token, points);
    }

    /// The reconstructed stream of `token` in `unit`, if loaded.
    pub(crate) fn reconstructed(&self, unit: usize, token: Token) -> Option<&[SequencePoint]> {
        self.reconstructed
            .get(unit)?
            .as_ref()?
            .get(&token)
            .map(Vec::as_slice)
    }

    /// The original stream of `token`, if loaded and present in the symbols.
    pub(crate) fn original(&self, token: Token) -> Option<&[SequencePoint]> {
        self.original.get(&token)?.as_deref()
    }

    /// Returns `true` if the original stream of `token` was looked up already.
    #[cfg(test)]
    pub(crate) fn has_original_entry(&self, token: Token) -> bool {
        self.original.contains_key(&token)
    }
}
