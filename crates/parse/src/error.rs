use lex::{LexError, Loc};

use crate::scope::NameKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("{loc}: syntax error before '{lexeme}' (expected {expected})")]
    Syntax {
        lexeme: String,
        loc: Loc,
        expected: String,
    },

    #[error("syntax error at end of input (expected {expected})")]
    UnexpectedEof { expected: String },

    #[error("{loc}: nesting too deep (limit is {limit} levels)")]
    TooDeep { loc: Loc, limit: usize },

    #[error("{loc}: {previous} `{name}` redeclared as {requested} in the same scope")]
    DeclarationConflict {
        name: String,
        loc: Loc,
        previous: NameKind,
        requested: NameKind,
    },
}

impl ParseError {
    /// Where the error happened; end-of-input errors have no location.
    pub fn loc(&self) -> Option<Loc> {
        match self {
            ParseError::Lex(e) => Some(e.loc),
            ParseError::Syntax { loc, .. }
            | ParseError::TooDeep { loc, .. }
            | ParseError::DeclarationConflict { loc, .. } => Some(*loc),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

pub type PResult<T> = Result<T, ParseError>;
