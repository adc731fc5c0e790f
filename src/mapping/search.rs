//! Boundary searches over ordered sequence point arrays.
//!
//! All three searches run in two phases: a binary search that only approximates the
//! boundary, followed by a linear walk that settles on the exact index. The walk starts
//! from the last point the binary phase looked at, which is not necessarily the point at
//! the final probe index. Both phases are load-bearing; replacing them with a plain binary
//! search changes the results at the edges of the array.
//!
//! Indices are computed in `isize` so that the probe can step below zero, and division
//! truncates toward zero just like the probe arithmetic requires.

use crate::metadata::sequencepoints::SequencePoint;

/// Where the binary phase left off.
struct Probe<'a> {
    middle: isize,
    current: &'a SequencePoint,
}

/// Runs the binary phase. `order` reports whether a point lies before the target
/// (`Some(true)`), after it (`Some(false)`) or on it (`None`, stops the search).
fn probe<'a>(
    points: &'a [SequencePoint],
    order: impl Fn(&SequencePoint) -> Option<bool>,
) -> Probe<'a> {
    let len = points.len() as isize;
    let mut left: isize = 0;
    let mut right: isize = len;
    let mut middle = (left + right) / 2;
    let mut current = &points[middle as usize];

    while left < right {
        current = &points[middle as usize];

        match order(current) {
            Some(true) => left = middle + 1,
            Some(false) => right = middle - 1,
            None => break,
        }

        middle = (left + right) / 2;
    }

    Probe { middle, current }
}

/// Runs the correction walk. While `advance` holds for the current point the cursor moves
/// forward, otherwise it moves backward until `advance` holds.
fn walk(
    points: &[SequencePoint],
    probe: Probe<'_>,
    is_behind: bool,
    advance: impl Fn(&SequencePoint) -> bool,
) -> isize {
    let len = points.len() as isize;
    let Probe {
        mut middle,
        mut current,
    } = probe;

    if is_behind {
        while advance(current) {
            middle += 1;
            if middle >= len {
                break;
            }
            current = &points[middle as usize];
        }
        middle -= 1;
    } else {
        while !advance(current) {
            middle -= 1;
            if middle < 0 {
                break;
            }
            current = &points[middle as usize];
        }
        middle += 1;
    }

    middle
}

fn offset_order(target: u32) -> impl Fn(&SequencePoint) -> Option<bool> {
    move |sp| match sp.il_offset.cmp(&target) {
        std::cmp::Ordering::Less => Some(true),
        std::cmp::Ordering::Greater => Some(false),
        std::cmp::Ordering::Equal => None,
    }
}

/// Walks an offset-sorted array to the last point starting at or before `target`.
fn offset_boundary(points: &[SequencePoint], target: u32) -> isize {
    let probe = probe(points, offset_order(target));
    let is_behind = probe.current.il_offset < target;
    walk(points, probe, is_behind, |sp| {
        if is_behind {
            sp.il_offset <= target
        } else {
            // backward walk continues while the point does not start before the target
            sp.il_offset < target
        }
    })
}

/// Index of the last point whose start position is at or before `(line, col)`.
///
/// `points` must be sorted by source start position. Returns `None` for an empty array
/// or if every point starts after the target. A single-element array always yields `0`.
///
/// # Examples
///
/// ```rust
/// use peeker::{mapping::first_by_source, metadata::sequencepoints::SequencePoint};
///
/// let points = vec![
///     SequencePoint::new(0x0, 0x1, 10, 0, 10, 20),
///     SequencePoint::new(0x1, 0x7, 11, 0, 12, 20),
///     SequencePoint::new(0x7, 0xc, 12, 20, 12, 40),
/// ];
/// assert_eq!(first_by_source(&points, 12, 18), Some(1));
/// ```
#[must_use]
pub fn first_by_source(points: &[SequencePoint], line: u32, col: u32) -> Option<usize> {
    match points.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    // the binary phase only looks at start lines and never stops early
    let probe = probe(points, |sp| Some(sp.start_line < line));
    let is_behind = probe.current.is_behind(line, col);
    let middle = walk(points, probe, is_behind, |sp| sp.is_behind(line, col));

    usize::try_from(middle).ok().filter(|&i| i < points.len())
}

/// Index of the last point whose IL offset is at or before `start`.
///
/// `points` must be sorted by IL offset. Returns `None` for an empty array and when
/// `start` lies beyond the start of every point.
#[must_use]
pub fn first_by_offset(points: &[SequencePoint], start: u32) -> Option<usize> {
    match points.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    let middle = offset_boundary(points, start);
    usize::try_from(middle).ok().filter(|&i| i < points.len())
}

/// Index of the last point whose IL offset lies strictly before `end`.
///
/// `points` must be sorted by IL offset. Unlike [`first_by_offset`] this never reports
/// "no candidate" at the upper end: an `end` beyond every point clamps to the final index.
/// Only an empty array yields `None`.
#[must_use]
pub fn last_by_offset(points: &[SequencePoint], end: u32) -> Option<usize> {
    match points.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    let last = points.len() - 1;
    let mut middle = usize::try_from(offset_boundary(points, end))
        .unwrap_or(0)
        .min(last);

    if points[middle].il_offset >= end && middle > 0 {
        middle -= 1;
    }

    Some(middle)
}
