use std::fmt;

/// Attribute selector in a `Name[Attribute]` scope reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Resolves to the text "YES" or "NO".
    InScope,
    /// Resolves to the item's quantity.
    Details,
}

impl Attribute {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "InScope" => Some(Self::InScope),
            "Details" => Some(Self::Details),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InScope => write!(f, "InScope"),
            Self::Details => write!(f, "Details"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Text(String),
    Identifier(String),
    Reference { item: String, attribute: Attribute },

    LParen,
    RParen,
    Comma,

    Plus,
    Minus,
    Star,
    Slash,

    // `=` and `==` both lex to Eq, `<>` and `!=` both lex to Ne
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::Identifier(s) => write!(f, "{}", s),
            Self::Reference { item, attribute } => write!(f, "{}[{}]", item, attribute),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
            Self::Eof => write!(f, "end of formula"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the formula text.
    pub offset: usize,
}
