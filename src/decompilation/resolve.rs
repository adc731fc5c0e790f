//! Translation of diagnostic locations into original source coordinates.

use crate::{
    decompilation::{DecompiledFunction, Decompilation, Decompiler},
    diagnostics::{Diagnostic, LinePosition, LineSpan, Location, ResolvedLocation},
    mapping::{covering_range, find_enclosing_function, map_by_offset, nudge_nop_out_of_range},
};

impl<D: Decompiler> Decompilation<D> {
    /// Resolves the original source location of `diagnostic`.
    ///
    /// The diagnostic's span is matched against the reconstructed sequence points of its
    /// enclosing function, and the IL range they cover is looked up in the function's
    /// original sequence points from the debug symbols. If that fails for any reason and
    /// source dumping is enabled, the location of the diagnostic inside the dumped unit is
    /// returned instead. `None` means the diagnostic keeps its reconstructed location.
    ///
    /// Resolution never fails hard: missing symbols, functions or sequence points all end
    /// in the fallback.
    pub fn resolve_original_location(
        &mut self,
        diagnostic: &Diagnostic,
    ) -> Option<ResolvedLocation> {
        let Location::Source { path, span } = &diagnostic.location else {
            return None;
        };
        let unit = self.unit_index(path)?;

        if let Some(resolved) = self.map_through_symbols(unit, span) {
            return Some(resolved);
        }

        self.dumped_location(unit, span)
    }

    fn map_through_symbols(&mut self, unit: usize, span: &LineSpan) -> Option<ResolvedLocation> {
        if self.symbols.is_none() {
            return None;
        }

        // reconstructed trees and streams count lines from 1
        let start = LinePosition::new(span.start.line + 1, span.start.character);
        let end = LinePosition::new(span.end.line + 1, span.end.character);

        let function = {
            let node = self.decompiler.node_containing(unit, start, end)?;
            find_enclosing_function(node)?
        };
        let token = function.identity()?;

        self.cache.ensure_original(self.symbols.as_deref(), token);
        if self.cache.original(token).map_or(true, <[_]>::is_empty) {
            return None;
        }
        self.cache.ensure_reconstructed(&self.decompiler, unit, token);

        let original = self.cache.original(token).unwrap_or_default();
        let reconstructed = self.cache.reconstructed(unit, token).unwrap_or_default();

        let covering = covering_range(
            reconstructed,
            start.line,
            start.character,
            end.line,
            end.character,
        );
        if covering.is_empty() {
            return None;
        }

        let mut selected = covering.to_vec();
        nudge_nop_out_of_range(&mut selected, original, function.instruction_offsets());

        let mapped = map_by_offset(&selected, original);
        let (Some(first), Some(last)) = (mapped.first(), mapped.last()) else {
            log::warn!(
                "No covering sequence points found in the symbols of {} despite having an IL range from decompilation",
                token
            );
            return None;
        };

        if last.end_line < first.start_line
            || (last.end_line == first.start_line && last.end_col < first.start_col)
        {
            log::warn!(
                "Covering sequence point set of {} is unordered, cannot create source mapping",
                token
            );
            return None;
        }

        let Some(document) = first.document.as_deref() else {
            log::debug!("Mapped sequence points of {} carry no document", token);
            return None;
        };

        Some(ResolvedLocation {
            path: document.to_string(),
            start: LinePosition::new(first.start_line, first.start_col),
            end: LinePosition::new(last.end_line, last.end_col),
        })
    }

    fn dumped_location(&self, unit: usize, span: &LineSpan) -> Option<ResolvedLocation> {
        let path = self.unit_dump_path(unit)?;
        Some(ResolvedLocation {
            path: path.display().to_string(),
            start: span.start,
            end: span.end,
        })
    }
}
