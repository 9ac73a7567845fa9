//! Lazily lexed token window.
//!
//! Tokens are pulled from the lexer only when the parser looks at them, and
//! any identifier already sitting in the window is re-classified whenever the
//! scope stack changes, so a typedef declared just before the window was
//! filled is still seen.

use std::collections::VecDeque;

use lex::{classify_identifier, LexError, Lexer, Token, TokenKind as K, TypedefLookup};

pub(crate) struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buf: VecDeque<Token>,
    done: bool,
    // surfaced once the tokens before it have been consumed
    error: Option<LexError>,
}

impl<'a> TokenStream<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { lexer: Lexer::new(src), buf: VecDeque::new(), done: false, error: None }
    }

    fn fill(&mut self, n: usize, names: &impl TypedefLookup) {
        while self.buf.len() <= n && !self.done {
            match self.lexer.next_token(names) {
                Ok(Some(t)) => {
                    log::trace!("token {} {:?} @{}", t.kind.category(), t.lexeme, t.loc);
                    self.buf.push_back(t);
                }
                Ok(None) => self.done = true,
                Err(e) => {
                    self.error = Some(e);
                    self.done = true;
                }
            }
        }
    }

    /// The `n`th unconsumed token, or `None` at end of input (or at a lex error).
    pub fn peek(&mut self, n: usize, names: &impl TypedefLookup) -> Option<&Token> {
        self.fill(n, names);
        self.buf.get(n)
    }

    pub fn bump(&mut self, names: &impl TypedefLookup) -> Option<Token> {
        self.fill(0, names);
        self.buf.pop_front()
    }

    pub fn reclassify(&mut self, names: &impl TypedefLookup) {
        for t in self.buf.iter_mut() {
            let fresh = match &t.kind {
                K::Identifier(name) | K::TypeName(name) => Some(classify_identifier(name, names)),
                _ => None,
            };
            if let Some(kind) = fresh {
                t.kind = kind;
            }
        }
    }

    /// A pending lex error, once every token lexed before it is consumed.
    pub fn take_error(&mut self) -> Option<LexError> {
        if self.buf.is_empty() {
            self.error.take()
        } else {
            None
        }
    }
}
