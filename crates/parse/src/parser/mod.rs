//! Recursive-descent parser for C99 translation units.
//!
//! The parser owns the scope stack that the lexer consults, so declarations
//! take effect for every token lexed after the declarator that introduced them.

mod decl;
mod expr;
mod stmt;
mod stream;

use lex::{Keyword as Kw, Loc, Punctuator as P, Token, TokenKind as K};

use crate::ast::*;
use crate::error::{PResult, ParseError};
use crate::scope::{DeclarationConflict, NameKind, ScopeStack};
use stream::TokenStream;

/// Default limit on open nesting levels (parenthesized expressions,
/// statements, declarators, initializer lists, struct and enum bodies).
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub struct Parser<'a> {
    toks: TokenStream<'a>,
    scopes: ScopeStack,
    last_loc: Loc,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::with_scopes(src, ScopeStack::new())
    }

    /// Starts from an existing scope stack, e.g. one seeded with typedef names
    /// from headers the input would have included.
    pub fn with_scopes(src: &'a str, scopes: ScopeStack) -> Self {
        Self {
            toks: TokenStream::new(src),
            scopes,
            last_loc: Loc::new(1, 1),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replaces `DEFAULT_MAX_DEPTH`. Deeper input needs a correspondingly
    /// larger thread stack.
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn into_scopes(self) -> ScopeStack {
        self.scopes
    }

    pub fn parse_translation_unit(&mut self) -> PResult<TranslationUnit> {
        let loc = self.peek().map(|t| t.loc).unwrap_or(Loc::new(1, 1));
        let mut items = Vec::new();
        while let Some(kind) = self.peek_kind() {
            // a stray `;` at file scope
            if kind == K::Punct(P::Semicolon) {
                self.bump();
                continue;
            }
            if let K::Pragma(text) = kind {
                let loc = self.peek_loc();
                self.bump();
                items.push(ExternalDecl::Pragma(Pragma { text, loc }));
                continue;
            }
            let Some(specs) = self.parse_decl_specifiers(true)? else {
                return self.unexpected("declaration");
            };
            for d in self.parse_declaration(specs, true)? {
                items.push(match d {
                    Declared::Func(f) => ExternalDecl::FuncDef(f),
                    Declared::Decl(d) => ExternalDecl::Decl(d),
                    Declared::Typedef(t) => ExternalDecl::Typedef(t),
                });
            }
        }
        if let Some(e) = self.toks.take_error() {
            return Err(e.into());
        }
        log::debug!("parsed translation unit: {} external declarations", items.len());
        Ok(TranslationUnit { items, loc })
    }

    // ---- token access ----

    fn peek(&mut self) -> Option<&Token> {
        self.toks.peek(0, &self.scopes)
    }

    fn peek_kind(&mut self) -> Option<K> {
        self.peek().map(|t| t.kind.clone())
    }

    fn peek_kind_n(&mut self, n: usize) -> Option<K> {
        self.toks.peek(n, &self.scopes).map(|t| t.kind.clone())
    }

    fn peek_loc(&mut self) -> Loc {
        match self.peek() {
            Some(t) => t.loc,
            None => self.last_loc,
        }
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.toks.bump(&self.scopes);
        if let Some(t) = &t {
            self.last_loc = t.loc;
        }
        t
    }

    fn check_punct(&mut self, p: P) -> bool {
        matches!(self.peek().map(|t| &t.kind), Some(K::Punct(pp)) if *pp == p)
    }

    fn check_keyword(&mut self, kw: Kw) -> bool {
        matches!(self.peek().map(|t| &t.kind), Some(K::Keyword(k)) if *k == kw)
    }

    fn consume_punct(&mut self, p: P) -> bool {
        if self.check_punct(p) {
            self.bump();
            return true;
        }
        false
    }

    fn consume_keyword(&mut self, kw: Kw) -> bool {
        if self.check_keyword(kw) {
            self.bump();
            return true;
        }
        false
    }

    fn expect_punct(&mut self, p: P) -> PResult<Loc> {
        if self.check_punct(p) {
            let loc = self.peek_loc();
            self.bump();
            return Ok(loc);
        }
        self.unexpected(&format!("'{}'", p.as_str()))
    }

    /// Identifier in a position where a typedef-name is just a name: declarators,
    /// members, labels, tags.
    fn expect_name(&mut self) -> PResult<(String, Loc)> {
        match self.peek_kind() {
            Some(K::Identifier(s)) | Some(K::TypeName(s)) => {
                let loc = self.peek_loc();
                self.bump();
                Ok((s, loc))
            }
            _ => self.unexpected("identifier"),
        }
    }

    /// Error at the current token. A pending lex error wins once every token
    /// before it has been consumed.
    fn unexpected<T>(&mut self, expected: &str) -> PResult<T> {
        if let Some(t) = self.peek() {
            return Err(ParseError::Syntax { lexeme: t.lexeme.clone(), loc: t.loc, expected: expected.to_string() });
        }
        if let Some(e) = self.toks.take_error() {
            return Err(e.into());
        }
        Err(ParseError::UnexpectedEof { expected: expected.to_string() })
    }

    /// Runs `f` one nesting level deeper, failing once `max_depth` levels are open.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.max_depth {
            let loc = self.peek_loc();
            return Err(ParseError::TooDeep { loc, limit: self.max_depth });
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    // ---- scopes ----

    fn push_scope(&mut self) {
        self.scopes.push_scope();
        self.toks.reclassify(&self.scopes);
    }

    fn pop_scope(&mut self) {
        self.scopes.pop_scope();
        self.toks.reclassify(&self.scopes);
    }

    fn declare(&mut self, name: &str, kind: NameKind, loc: Loc) -> PResult<()> {
        let bound = self.scopes.declare(name, kind);
        self.after_declare(bound, loc)
    }

    fn declare_enumerator(&mut self, name: &str, value: Option<i64>, loc: Loc) -> PResult<()> {
        let bound = self.scopes.declare_enumerator(name, value);
        self.after_declare(bound, loc)
    }

    fn after_declare(&mut self, bound: Result<(), DeclarationConflict>, loc: Loc) -> PResult<()> {
        bound.map_err(|c| ParseError::DeclarationConflict {
            name: c.name,
            loc,
            previous: c.previous,
            requested: c.requested,
        })?;
        self.toks.reclassify(&self.scopes);
        Ok(())
    }
}

/// One result of a declaration: a function definition or one declarator.
pub(crate) enum Declared {
    Func(FuncDef),
    Decl(Decl),
    Typedef(Typedef),
}

pub fn parse_translation_unit(src: &str) -> PResult<TranslationUnit> {
    Parser::new(src).parse_translation_unit()
}

/// Parses with `typedefs` already visible at file scope.
pub fn parse_with_typedefs<I, S>(src: &str, typedefs: I) -> PResult<TranslationUnit>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Parser::with_scopes(src, ScopeStack::with_typedefs(typedefs)).parse_translation_unit()
}
