//! Covering-range extraction and cross-stream mapping.

use crate::{
    mapping::search::{first_by_offset, first_by_source, last_by_offset},
    metadata::sequencepoints::SequencePoint,
};

/// Returns the contiguous run of source-sorted `points` that covers the span
/// `(start_line, start_col)..(end_line, end_col)`.
///
/// The run begins at the last point starting at or before the span start and extends up to
/// and including the first point that ends at or after the span end. If no point does, the
/// run extends to the end of the array. An empty slice means the span starts before every
/// point.
///
/// # Examples
///
/// ```rust
/// use peeker::{mapping::covering_range, metadata::sequencepoints::SequencePoint};
///
/// let points = vec![
///     SequencePoint::new(0x0, 0x1, 10, 0, 10, 20),
///     SequencePoint::new(0x1, 0x7, 11, 0, 12, 20),
///     SequencePoint::new(0x7, 0xc, 12, 20, 12, 40),
/// ];
/// let covering = covering_range(&points, 11, 4, 12, 30);
/// assert_eq!(covering, &points[1..3]);
/// ```
#[must_use]
pub fn covering_range(
    points: &[SequencePoint],
    start_line: u32,
    start_col: u32,
    end_line: u32,
    end_col: u32,
) -> &[SequencePoint] {
    let Some(first) = first_by_source(points, start_line, start_col) else {
        return &[];
    };

    let mut last = first;
    while last < points.len() {
        if points[last].is_ahead(end_line, end_col) {
            break;
        }
        last += 1;
    }

    &points[first..(last + 1).min(points.len())]
}

/// Maps a run of `needle` points onto the corresponding run of `haystack` through their
/// shared IL offsets.
///
/// `haystack` must be sorted by IL offset. The result is the sub-run of `haystack` from
/// the last point starting at or before the first needle offset up to the last point
/// starting before the needle's end offset. It is empty when either input is empty or no
/// consistent run exists.
#[must_use]
pub fn map_by_offset<'a>(
    needle: &[SequencePoint],
    haystack: &'a [SequencePoint],
) -> &'a [SequencePoint] {
    let (Some(head), Some(tail)) = (needle.first(), needle.last()) else {
        return &[];
    };

    match (
        first_by_offset(haystack, head.il_offset),
        last_by_offset(haystack, tail.il_end),
    ) {
        (Some(first), Some(last)) if first <= last => &haystack[first..=last],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{offset_point, points_a, points_b};

    #[test]
    fn covering_empty() {
        assert!(covering_range(&[], 0, 0, 10, 0).is_empty());
    }

    #[test]
    fn covering_aligned() {
        let points = points_a();
        let actual = covering_range(&points, 12, 20, 14, 40);
        assert_eq!(actual, &points[2..4]);
    }

    #[test]
    fn covering_misaligned() {
        let points = points_a();
        assert_eq!(covering_range(&points, 12, 18, 14, 40), &points[1..4]);
        assert_eq!(covering_range(&points, 12, 18, 14, 41), &points[1..5]);
    }

    #[test]
    fn covering_single_point() {
        let points = points_a();
        assert_eq!(covering_range(&points, 13, 2, 13, 30), &points[3..4]);
    }

    #[test]
    fn covering_out_of_range() {
        assert!(covering_range(&points_a(), 2222, 0, 3000, 0).is_empty());
    }

    #[test]
    fn covering_past_last_point_clamps() {
        let points = points_a();
        assert_eq!(covering_range(&points, 15, 0, 99, 0), &points[4..5]);
    }

    #[test]
    fn map_empty() {
        assert!(map_by_offset(&[], &[]).is_empty());
        assert!(map_by_offset(&points_a(), &[]).is_empty());
        assert!(map_by_offset(&[], &points_b()).is_empty());
    }

    #[test]
    fn map_fully_aligned() {
        let haystack = points_b();
        assert_eq!(map_by_offset(&points_a(), &haystack), &haystack[..]);
    }

    #[test]
    fn map_subset_aligned() {
        let needle = points_a();
        let haystack = points_b();
        assert_eq!(map_by_offset(&needle[1..2], &haystack), &haystack[1..2]);
        assert_eq!(map_by_offset(&needle[1..3], &haystack), &haystack[1..3]);
        assert_eq!(map_by_offset(&needle[1..4], &haystack), &haystack[1..4]);
        assert_eq!(map_by_offset(&needle[1..5], &haystack), &haystack[1..5]);
    }

    #[test]
    fn map_misaligned() {
        let haystack = points_b();

        let needle = vec![offset_point(0x2, 0x3)];
        assert_eq!(map_by_offset(&needle, &haystack), &haystack[1..2]);

        let needle = vec![offset_point(0x2, 0x3), offset_point(0x3, 0xd)];
        assert_eq!(map_by_offset(&needle, &haystack), &haystack[1..3]);

        let needle = vec![offset_point(0x2, 0x3), offset_point(0x3, 0xe)];
        assert_eq!(map_by_offset(&needle, &haystack), &haystack[1..4]);
    }

    #[test]
    fn map_is_idempotent() {
        let needle = points_a();
        let haystack = points_b();
        let (start, end) = (needle[1].il_offset, needle[2].il_end);

        let mapped = map_by_offset(&needle[1..3], &haystack);
        assert_eq!(mapped, &haystack[1..3]);

        assert_eq!(first_by_offset(mapped, start), Some(0));
        assert_eq!(last_by_offset(mapped, end), Some(mapped.len() - 1));
    }
}
