pub mod keywords;
mod lexer;
pub mod token;

use std::collections::HashSet;

pub use lexer::{classify_identifier, Lexer};
pub use token::{IntBase, Keyword, LiteralKind, Loc, Punctuator, Span, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{loc}: {message}")]
pub struct LexError {
    pub message: String,
    pub loc: Loc,
}

/// Answers whether a name currently denotes a typedef. The lexer asks this
/// for every non-keyword identifier it produces.
pub trait TypedefLookup {
    fn is_typedef(&self, name: &str) -> bool;
}

/// No typedef names at all: every identifier stays an identifier.
impl TypedefLookup for () {
    fn is_typedef(&self, _name: &str) -> bool {
        false
    }
}

impl TypedefLookup for HashSet<String> {
    fn is_typedef(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<T: TypedefLookup + ?Sized> TypedefLookup for &T {
    fn is_typedef(&self, name: &str) -> bool {
        (**self).is_typedef(name)
    }
}

/// Lexes the whole buffer against a fixed set of typedef names.
pub fn tokenize(src: &str, names: &impl TypedefLookup) -> Result<Vec<Token>, LexError> {
    let mut lx = Lexer::new(src);
    let mut toks = Vec::new();
    while let Some(t) = lx.next_token(names)? {
        toks.push(t);
    }
    Ok(toks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_ident_keyword_number() {
        let src = "int x = 42;";
        let toks = tokenize(src, &()).unwrap();
        use TokenKind as K;
        assert!(matches!(toks[0].kind, K::Keyword(Keyword::Int)));
        assert!(matches!(toks[1].kind, K::Identifier(ref s) if s == "x"));
        assert!(matches!(toks[2].kind, K::Punct(Punctuator::Assign)));
        assert!(matches!(toks[3].kind, K::Literal(LiteralKind::Int { .. })));
        assert!(matches!(toks[4].kind, K::Punct(Punctuator::Semicolon)));
        assert_eq!(toks[3].lexeme, "42");
        assert_eq!(toks[3].loc, Loc::new(1, 9));
    }

    #[test]
    fn typedef_lookup_drives_classification() {
        let names: HashSet<String> = ["size_t".to_string()].into_iter().collect();
        let toks = tokenize("size_t n;", &names).unwrap();
        assert!(matches!(toks[0].kind, TokenKind::TypeName(ref s) if s == "size_t"));
        assert!(matches!(toks[1].kind, TokenKind::Identifier(ref s) if s == "n"));
    }
}
