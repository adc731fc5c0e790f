//! Metadata tokens used as function identities.
//!
//! The reconstructed syntax and the debug symbols describe the same method through the same
//! `MethodDef` token, which makes the token the natural key for every per-function cache.

use std::fmt;

/// A metadata token: table id in the high byte, 1-based row in the low 24 bits.
///
/// Only `MethodDef` tokens identify functions; other tables are accepted so that frontends
/// can pass through whatever their syntax annotations carry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Table id of the `MethodDef` table.
    pub const METHOD_DEF: u8 = 0x06;

    /// Wraps a raw token value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a `MethodDef` token for the given 1-based row.
    #[must_use]
    pub fn method_def(row: u32) -> Self {
        Token((u32::from(Self::METHOD_DEF) << 24) | (row & 0x00FF_FFFF))
    }

    /// The raw value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Table id.
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Row within the table.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns `true` for the nil token.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token points into the `MethodDef` table.
    #[must_use]
    pub fn is_method_def(&self) -> bool {
        self.table() == Self::METHOD_DEF && self.row() != 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn method_def_rows() {
        let token = Token::method_def(0x2A);
        assert_eq!(token.value(), 0x0600_002A);
        assert_eq!(token.table(), Token::METHOD_DEF);
        assert_eq!(token.row(), 0x2A);
        assert!(token.is_method_def());

        // rows wider than 24 bits are truncated instead of leaking into the table byte
        assert_eq!(Token::method_def(0x0100_0001).row(), 1);
    }

    #[test]
    fn not_a_method() {
        assert!(Token::new(0).is_null());
        assert!(!Token::new(0).is_method_def());
        assert!(!Token::new(0x0600_0000).is_method_def());
        assert!(!Token::new(0x0200_0001).is_method_def());
    }

    #[test]
    fn conversions() {
        let token: Token = 0x0600_0007u32.into();
        assert_eq!(token, Token::method_def(7));
        assert_eq!(u32::from(token), 0x0600_0007);
    }

    #[test]
    fn formatting() {
        let token = Token::method_def(1);
        assert_eq!(token.to_string(), "0x06000001");
        assert_eq!(
            format!("{:?}", token),
            "Token(0x06000001, table: 0x06, row: 1)"
        );
    }

    #[test]
    fn keys_per_function_state() {
        let mut streams: HashMap<Token, &str> = HashMap::new();
        streams.insert(Token::method_def(2), "Run");
        streams.insert(Token::method_def(1), "Main");

        assert_eq!(streams[&Token::new(0x0600_0001)], "Main");
        assert!(Token::method_def(1) < Token::method_def(2));
    }
}
