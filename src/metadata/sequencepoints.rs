//! Sequence points and Portable PDB sequence-point decoding.
//!
//! A sequence point maps a half-open range of IL offsets inside one method body to a span
//! of source text. Two independent producers hand the mapper sequence points for the same
//! method: the decompiler frontend (for the reconstructed source it just emitted) and the
//! debug symbols (for the source the assembly was originally compiled from). Both are
//! represented with the same [`SequencePoint`] type.
//!
//! # Key Components
//!
//! - [`crate::metadata::sequencepoints::SequencePoint`] - One IL-range to source-span mapping.
//! - [`crate::metadata::sequencepoints::SequencePoints`] - Collection of sequence points for a method.
//! - [`crate::metadata::sequencepoints::parse_sequence_points`] - Decodes a Portable PDB
//!   `SequencePoints` blob into a collection.
//!
//! # Sequence Points Blob Format
//!
//! The blob is stored in the `MethodDebugInformation` table of a Portable PDB:
//!
//! ```text
//! header:   LocalSignature (compressed uint)
//!           InitialDocument (compressed uint, only if the row has no Document)
//! record:   δIL (compressed uint)
//!           if δIL == 0 and this is not the first record:
//!               Document (compressed uint) -- switches the current document
//!           else:
//!               ΔLines (compressed uint)
//!               ΔColumns (compressed uint if ΔLines == 0, compressed int otherwise)
//!               if ΔLines == 0 and ΔColumns == 0: hidden point, record ends here
//!               δStartLine (compressed uint for the first visible point, compressed int after)
//!               δStartColumn (same encoding as δStartLine)
//! ```
//!
//! The blob carries start offsets only. The end offset of each point is the start of the
//! next record, and the last point extends to the end of the method body.
//!
//! ## Hidden Sequence Points
//!
//! A hidden point marks compiler-generated code that has no user-visible source. Such points
//! carry the start line 0xFEEFEE and are removed before any location mapping happens.
//!
//! ## References
//!
//! - [ECMA-335 II.23.2](https://www.ecma-international.org/publications-and-standards/standards/ecma-335/)
//! - [PortablePDB Spec](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md#sequence-points)

use std::sync::Arc;

use crate::{file::parser::Parser, Result};

/// Line number carried by hidden sequence points.
pub const HIDDEN_LINE: u32 = 0xFEEFEE;

/// Represents a single sequence point mapping an IL range to a source code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePoint {
    /// First IL offset covered by this point.
    pub il_offset: u32,
    /// First IL offset after this point (exclusive end).
    pub il_end: u32,
    /// Starting line in the source file.
    pub start_line: u32,
    /// Starting column in the source file.
    pub start_col: u32,
    /// Ending line in the source file.
    pub end_line: u32,
    /// Ending column in the source file.
    pub end_col: u32,
    /// Source document this point belongs to, if known.
    pub document: Option<Arc<str>>,
    /// True if this is a hidden sequence point (start_line == 0xFEEFEE).
    pub is_hidden: bool,
}

impl SequencePoint {
    /// Creates a visible sequence point without a document.
    #[must_use]
    pub fn new(
        il_offset: u32,
        il_end: u32,
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    ) -> Self {
        SequencePoint {
            il_offset,
            il_end,
            start_line,
            start_col,
            end_line,
            end_col,
            document: None,
            is_hidden: false,
        }
    }

    /// Creates a hidden sequence point covering `il_offset..il_end`.
    #[must_use]
    pub fn hidden(il_offset: u32, il_end: u32) -> Self {
        SequencePoint {
            il_offset,
            il_end,
            start_line: HIDDEN_LINE,
            start_col: 0,
            end_line: HIDDEN_LINE,
            end_col: 0,
            document: None,
            is_hidden: true,
        }
    }

    /// Returns this point attributed to `document`.
    #[must_use]
    pub fn with_document(mut self, document: impl Into<Arc<str>>) -> Self {
        self.document = Some(document.into());
        self
    }
}

/// Collection of sequence points for a method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencePoints(pub Vec<SequencePoint>);

impl SequencePoints {
    /// Returns the sequence point starting at the given IL offset, if any.
    pub fn find_by_il_offset(&self, il_offset: u32) -> Option<&SequencePoint> {
        self.0.iter().find(|sp| sp.il_offset == il_offset)
    }

    /// Number of points, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the method has no sequence points at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the collection, dropping hidden points and keeping IL order.
    #[must_use]
    pub fn visible(self) -> Vec<SequencePoint> {
        self.0.into_iter().filter(|sp| !sp.is_hidden).collect()
    }

    /// Consumes the collection, dropping hidden points and ordering the rest by their
    /// source start position.
    ///
    /// The sort is stable, so points starting at the same position keep their IL order.
    #[must_use]
    pub fn sanitized(self) -> Vec<SequencePoint> {
        let mut points = self.visible();
        points.sort_by_key(|sp| (sp.start_line, sp.start_col));
        points
    }
}

impl From<Vec<SequencePoint>> for SequencePoints {
    fn from(points: Vec<SequencePoint>) -> Self {
        SequencePoints(points)
    }
}

/// Parses a Portable PDB sequence points blob into a [`SequencePoints`] collection.
///
/// # Arguments
/// * `blob` - The raw sequence points blob from `MethodDebugInformation`.
/// * `document` - The `Document` column of the method row (1-based row, `0` if absent, in
///   which case the blob starts with an initial document row).
/// * `code_size` - Size of the method's IL body, used as the end of the last point.
/// * `documents` - Names of the rows of the `Document` table, in row order.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] for truncated blobs and [`crate::Error::Malformed`]
/// for invalid encodings, offsets past `code_size`, or unknown document rows.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use peeker::metadata::sequencepoints::parse_sequence_points;
///
/// let documents: Vec<Arc<str>> = vec!["Program.cs".into()];
/// // local signature 0, il 0 -> 10:2-10:7
/// let blob: &[u8] = &[0x00, 0x00, 0x00, 0x05, 0x0A, 0x02];
/// let points = parse_sequence_points(blob, 1, 4, &documents)?;
/// assert_eq!(points.len(), 1);
/// assert_eq!(points.0[0].il_end, 4);
/// assert_eq!(points.0[0].document.as_deref(), Some("Program.cs"));
/// # Ok::<(), peeker::Error>(())
/// ```
pub fn parse_sequence_points(
    blob: &[u8],
    document: u32,
    code_size: u32,
    documents: &[Arc<str>],
) -> Result<SequencePoints> {
    if blob.is_empty() {
        return Ok(SequencePoints::default());
    }

    let resolve_document = |row: u32| -> Result<Arc<str>> {
        row.checked_sub(1)
            .and_then(|index| documents.get(index as usize))
            .cloned()
            .ok_or_else(|| malformed_error!("Unknown document row - {}", row))
    };

    let mut parser = Parser::new(blob);
    let _local_signature = parser.read_compressed_uint()?;
    let mut current_document = if document == 0 {
        resolve_document(parser.read_compressed_uint()?)?
    } else {
        resolve_document(document)?
    };

    let mut points: Vec<SequencePoint> = Vec::new();
    let mut il_offset = 0u32;
    let mut previous_start: Option<(u32, u32)> = None;

    while parser.has_more_data() {
        let il_delta = parser.read_compressed_uint()?;
        if il_delta == 0 && !points.is_empty() {
            current_document = resolve_document(parser.read_compressed_uint()?)?;
            continue;
        }

        il_offset = if points.is_empty() {
            il_delta
        } else {
            il_offset
                .checked_add(il_delta)
                .ok_or_else(|| malformed_error!("IL offset overflow"))?
        };
        if il_offset >= code_size {
            return Err(malformed_error!(
                "Sequence point offset {:#x} outside of method body ({:#x} bytes)",
                il_offset,
                code_size
            ));
        }

        let delta_lines = parser.read_compressed_uint()?;
        let delta_columns = if delta_lines == 0 {
            i64::from(parser.read_compressed_uint()?)
        } else {
            i64::from(parser.read_compressed_int()?)
        };

        if delta_lines == 0 && delta_columns == 0 {
            points.push(
                SequencePoint::hidden(il_offset, code_size).with_document(current_document.clone()),
            );
            continue;
        }

        let (start_line, start_col) = match previous_start {
            None => (
                i64::from(parser.read_compressed_uint()?),
                i64::from(parser.read_compressed_uint()?),
            ),
            Some((line, col)) => (
                i64::from(line) + i64::from(parser.read_compressed_int()?),
                i64::from(col) + i64::from(parser.read_compressed_int()?),
            ),
        };
        let end_line = start_line + i64::from(delta_lines);
        let end_col = start_col + delta_columns;

        let to_u32 = |value: i64, what: &str| -> Result<u32> {
            u32::try_from(value).map_err(|_| malformed_error!("Invalid {} - {}", what, value))
        };
        let point = SequencePoint {
            il_offset,
            il_end: code_size,
            start_line: to_u32(start_line, "start line")?,
            start_col: to_u32(start_col, "start column")?,
            end_line: to_u32(end_line, "end line")?,
            end_col: to_u32(end_col, "end column")?,
            document: Some(current_document.clone()),
            is_hidden: false,
        };
        previous_start = Some((point.start_line, point.start_col));
        points.push(point);
    }

    for index in 1..points.len() {
        points[index - 1].il_end = points[index].il_offset;
    }

    Ok(SequencePoints(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn documents() -> Vec<Arc<str>> {
        vec!["A.cs".into(), "B.cs".into()]
    }

    #[test]
    fn parse_empty_blob() {
        let result = parse_sequence_points(&[], 1, 10, &documents());
        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn parse_single_sequence_point() {
        // il_offset=0, delta_lines=0, delta_cols=5, start_line=10, start_col=2
        let blob: &[u8] = &[0x00, 0x00, 0x00, 0x05, 0x0A, 0x02];
        let result = parse_sequence_points(blob, 1, 6, &documents()).unwrap();
        assert_eq!(result.len(), 1);
        let sp = &result.0[0];
        assert_eq!(sp.il_offset, 0);
        assert_eq!(sp.il_end, 6);
        assert_eq!(sp.start_line, 10);
        assert_eq!(sp.start_col, 2);
        assert_eq!(sp.end_line, 10);
        assert_eq!(sp.end_col, 7);
        assert_eq!(sp.document.as_deref(), Some("A.cs"));
        assert!(!sp.is_hidden);
    }

    #[test]
    fn parse_deltas_hidden_and_document_switch() {
        let blob: &[u8] = &[
            0x00, // local signature
            0x01, // initial document: A.cs
            0x00, 0x00, 0x05, 0x0A, 0x02, // il 0: 10:2-10:7
            0x03, 0x01, 0x08, 0x04, 0x7F, // il 3: 12:1-13:5
            0x04, 0x00, 0x00, // il 7: hidden
            0x00, 0x02, // switch to B.cs
            0x02, 0x00, 0x03, 0x06, 0x00, // il 9: 15:1-15:4
        ];
        let points = parse_sequence_points(blob, 0, 12, &documents()).unwrap();
        assert_eq!(points.len(), 4);

        let expected = vec![
            SequencePoint::new(0, 3, 10, 2, 10, 7).with_document("A.cs"),
            SequencePoint::new(3, 7, 12, 1, 13, 5).with_document("A.cs"),
            SequencePoint::hidden(7, 9).with_document("A.cs"),
            SequencePoint::new(9, 12, 15, 1, 15, 4).with_document("B.cs"),
        ];
        assert_eq!(points.0, expected);

        assert_eq!(points.find_by_il_offset(9).map(|sp| sp.start_line), Some(15));
        assert!(points.find_by_il_offset(8).is_none());

        let visible = points.visible();
        assert_eq!(visible.len(), 3);
        assert!(visible.iter().all(|sp| !sp.is_hidden));
    }

    #[test]
    fn parse_truncated_blob() {
        let blob: &[u8] = &[0x00, 0x00, 0x00, 0x00, 0x05, 0x0A];
        assert!(matches!(
            parse_sequence_points(blob, 1, 8, &documents()),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn parse_unknown_document() {
        let blob: &[u8] = &[0x00, 0x07, 0x00, 0x00, 0x05, 0x0A, 0x02];
        assert!(matches!(
            parse_sequence_points(blob, 0, 8, &documents()),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn parse_offset_outside_body() {
        let blob: &[u8] = &[0x00, 0x10, 0x00, 0x05, 0x0A, 0x02];
        assert!(matches!(
            parse_sequence_points(blob, 1, 8, &documents()),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn sanitize_orders_by_source() {
        let points = SequencePoints(vec![
            SequencePoint::new(0x0, 0x4, 20, 4, 20, 10),
            SequencePoint::hidden(0x4, 0x6),
            SequencePoint::new(0x6, 0x8, 12, 8, 12, 20),
            SequencePoint::new(0x8, 0xa, 12, 0, 12, 30),
            SequencePoint::new(0xa, 0xc, 12, 8, 12, 9),
        ]);

        let sanitized = points.sanitized();
        let offsets: Vec<u32> = sanitized.iter().map(|sp| sp.il_offset).collect();
        assert_eq!(offsets, vec![0x8, 0x6, 0xa, 0x0]);
    }
}
