//! Correction for ranges whose first instruction is a misattributed `nop`.
//!
//! Decompilers sometimes attach a leading `nop` to the statement that follows it, while the
//! original compiler attributed it to the previous statement. The reconstructed range then
//! starts one byte before any original sequence point, and mapping it would drag the
//! previous original statement into the result.

use crate::metadata::sequencepoints::SequencePoint;

/// Ranges spanning this many IL bytes or fewer are never nudged.
const MIN_NUDGE_SPAN: u32 = 2;

/// How a selected range relates to the original sequence points and the function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// The range is empty or too short to be considered.
    Skipped,
    /// An original sequence point starts exactly at the range start.
    PointAligned,
    /// An instruction starts at the range start, but no original sequence point does.
    StatementAligned,
    /// No instruction starts at the range start but one starts right after it; the first
    /// point of the range was moved forward by one byte.
    Nudged,
    /// Neither the range start nor the byte after it begins an instruction.
    Unaligned,
}

/// Moves the start of `selected` forward by one byte when it sits on a misattributed `nop`.
///
/// `original` is the offset-sorted original stream of the function and `instructions` the
/// start offsets of its instructions in listing order. Only the first point of `selected`
/// is ever modified, and only its `il_offset`. `selected` must be a copy owned by the
/// caller.
///
/// # Examples
///
/// ```rust
/// use peeker::{
///     mapping::{nudge_nop_out_of_range, Alignment},
///     metadata::sequencepoints::SequencePoint,
/// };
///
/// let original = vec![SequencePoint::new(0x0, 0x5, 1, 0, 1, 10)];
/// let mut selected = vec![SequencePoint::new(0x4, 0x9, 3, 0, 3, 12)];
///
/// // nop at 0x4 belongs to the previous statement, the next instruction starts at 0x5
/// let outcome = nudge_nop_out_of_range(&mut selected, &original, &[0x0, 0x1, 0x5, 0x6]);
/// assert_eq!(outcome, Alignment::Nudged);
/// assert_eq!(selected[0].il_offset, 0x5);
/// ```
pub fn nudge_nop_out_of_range(
    selected: &mut [SequencePoint],
    original: &[SequencePoint],
    instructions: &[u32],
) -> Alignment {
    let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
        return Alignment::Skipped;
    };

    let il_start = first.il_offset;
    if last.il_end.saturating_sub(il_start) <= MIN_NUDGE_SPAN {
        return Alignment::Skipped;
    }

    for point in original {
        if point.il_offset == il_start {
            return Alignment::PointAligned;
        }
        if point.il_offset > il_start {
            break;
        }
    }

    let next = il_start.checked_add(1);
    let mut alignment = Alignment::Unaligned;
    for &offset in instructions {
        if offset == il_start {
            alignment = Alignment::StatementAligned;
            break;
        }
        if Some(offset) == next {
            alignment = Alignment::Nudged;
            break;
        }
        if offset > il_start {
            break;
        }
    }

    match alignment {
        Alignment::Nudged => {
            log::trace!("Nudging IL range {:#x}..{:#x} forward by 1", il_start, last.il_end);
            if let Some(next) = next {
                selected[0].il_offset = next;
            }
        }
        Alignment::StatementAligned => {
            log::warn!(
                "IL range at {:#x} starts on an instruction but on no original sequence point",
                il_start
            );
        }
        _ => {
            log::warn!("IL range at {:#x} neither aligned nor off by one", il_start);
        }
    }

    alignment
}
