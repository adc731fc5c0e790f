//! Position predicates on sequence points.

use crate::metadata::sequencepoints::SequencePoint;

impl SequencePoint {
    /// Returns `true` if this point starts at or before `(line, col)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use peeker::metadata::sequencepoints::SequencePoint;
    ///
    /// let point = SequencePoint::new(0, 2, 1, 1, 1, 10);
    /// assert!(point.is_behind(1, 1));
    /// assert!(point.is_behind(2, 0));
    /// assert!(!point.is_behind(1, 0));
    /// ```
    #[must_use]
    pub fn is_behind(&self, line: u32, col: u32) -> bool {
        self.start_line < line || (self.start_line == line && self.start_col <= col)
    }

    /// Returns `true` if this point ends at or after `(line, col)`.
    #[must_use]
    pub fn is_ahead(&self, line: u32, col: u32) -> bool {
        self.end_line > line || (self.end_line == line && self.end_col >= col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> SequencePoint {
        SequencePoint::new(0, 0, 1, 1, 1, 10)
    }

    #[test]
    fn behind() {
        let sp = point();
        assert!(sp.is_behind(1, 1));
        assert!(sp.is_behind(1, 10));
        assert!(sp.is_behind(1, 11));
        assert!(sp.is_behind(2, 0));

        assert!(!sp.is_behind(1, 0));
        assert!(!sp.is_behind(0, 11));
    }

    #[test]
    fn ahead() {
        let sp = point();
        assert!(sp.is_ahead(1, 0));
        assert!(sp.is_ahead(1, 1));
        assert!(sp.is_ahead(1, 10));
        assert!(sp.is_ahead(0, 11));

        assert!(!sp.is_ahead(1, 11));
        assert!(!sp.is_ahead(2, 0));
    }
}
