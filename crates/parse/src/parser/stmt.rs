use lex::{Keyword as Kw, Punctuator as P, TokenKind as K};

use super::decl::starts_declaration;
use super::{Declared, Parser};
use crate::ast::*;
use crate::error::PResult;

enum Prefix {
    Label(String),
    Case(Expr),
    Default,
}

impl<'a> Parser<'a> {
    /// Block items through the closing `}`, which is consumed.
    pub(crate) fn parse_block_items(&mut self) -> PResult<Vec<BlockItem>> {
        let mut items = Vec::new();
        while !self.consume_punct(P::RBrace) {
            let is_decl = self.peek().is_some_and(|t| starts_declaration(&t.kind));
            if is_decl {
                let Some(specs) = self.parse_decl_specifiers(true)? else {
                    return self.unexpected("declaration");
                };
                for d in self.parse_declaration(specs, false)? {
                    match d {
                        Declared::Decl(d) => items.push(BlockItem::Decl(d)),
                        Declared::Typedef(t) => items.push(BlockItem::Typedef(t)),
                        // function definitions are not accepted in blocks
                        Declared::Func(_) => {}
                    }
                }
            } else {
                items.push(BlockItem::Stmt(self.parse_stmt()?));
            }
        }
        Ok(items)
    }

    /// `{ ... }` in its own scope; the scope is left before anything after
    /// the `}` is lexed.
    fn parse_compound(&mut self) -> PResult<Compound> {
        let loc = self.expect_punct(P::LBrace)?;
        self.push_scope();
        let items = self.parse_block_items();
        self.pop_scope();
        Ok(Compound { items: items?, loc })
    }

    /// One statement, opening a nesting level.
    pub(crate) fn parse_stmt(&mut self) -> PResult<Stmt> {
        self.nested(Self::parse_labeled_stmt)
    }

    // Runs of `L:`, `case v:` and `default:` are read in a loop and wrapped
    // around the statement they prefix.
    fn parse_labeled_stmt(&mut self) -> PResult<Stmt> {
        let mut prefixes = Vec::new();
        loop {
            let loc = self.peek_loc();
            let prefix = match self.peek_kind() {
                Some(K::Identifier(name)) if self.peek_kind_n(1) == Some(K::Punct(P::Colon)) => {
                    self.bump();
                    self.bump();
                    Prefix::Label(name)
                }
                Some(K::Keyword(Kw::Case)) => {
                    self.bump();
                    let value = self.parse_conditional()?;
                    self.expect_punct(P::Colon)?;
                    Prefix::Case(value)
                }
                Some(K::Keyword(Kw::Default)) => {
                    self.bump();
                    self.expect_punct(P::Colon)?;
                    Prefix::Default
                }
                _ => break,
            };
            prefixes.push((prefix, loc));
        }
        let stmt = self.parse_unlabeled_stmt()?;
        Ok(prefixes.into_iter().rev().fold(stmt, |body, (prefix, loc)| {
            let body = Box::new(body);
            let kind = match prefix {
                Prefix::Label(name) => StmtKind::Label { name, body },
                Prefix::Case(value) => StmtKind::Case { value, body },
                Prefix::Default => StmtKind::Default { body },
            };
            Stmt::new(kind, loc)
        }))
    }

    fn parse_unlabeled_stmt(&mut self) -> PResult<Stmt> {
        let loc = self.peek_loc();
        let Some(kind) = self.peek_kind() else {
            return self.unexpected("statement");
        };
        let kind = match kind {
            K::Punct(P::LBrace) => StmtKind::Compound(self.parse_compound()?),
            K::Punct(P::Semicolon) => {
                self.bump();
                StmtKind::Empty
            }
            K::Pragma(text) => {
                self.bump();
                StmtKind::Pragma(text)
            }
            K::Keyword(Kw::If) => self.parse_if()?,
            K::Keyword(Kw::Switch) => {
                self.bump();
                let cond = self.parse_paren_expr()?;
                StmtKind::Switch { cond, body: Box::new(self.parse_stmt()?) }
            }
            K::Keyword(Kw::While) => {
                self.bump();
                let cond = self.parse_paren_expr()?;
                StmtKind::While { cond, body: Box::new(self.parse_stmt()?) }
            }
            K::Keyword(Kw::Do) => {
                self.bump();
                let body = Box::new(self.parse_stmt()?);
                if !self.consume_keyword(Kw::While) {
                    return self.unexpected("'while'");
                }
                let cond = self.parse_paren_expr()?;
                self.expect_punct(P::Semicolon)?;
                StmtKind::DoWhile { body, cond }
            }
            K::Keyword(Kw::For) => {
                self.bump();
                self.expect_punct(P::LParen)?;
                // declarations in the init clause are scoped to the loop
                self.push_scope();
                let kind = self.parse_for_rest();
                self.pop_scope();
                kind?
            }
            K::Keyword(Kw::Goto) => {
                self.bump();
                let (label, _) = self.expect_name()?;
                self.expect_punct(P::Semicolon)?;
                StmtKind::Goto(label)
            }
            K::Keyword(Kw::Continue) => {
                self.bump();
                self.expect_punct(P::Semicolon)?;
                StmtKind::Continue
            }
            K::Keyword(Kw::Break) => {
                self.bump();
                self.expect_punct(P::Semicolon)?;
                StmtKind::Break
            }
            K::Keyword(Kw::Return) => {
                self.bump();
                let value = if self.check_punct(P::Semicolon) { None } else { Some(self.parse_expr()?) };
                self.expect_punct(P::Semicolon)?;
                StmtKind::Return(value)
            }
            _ => {
                let e = self.parse_expr()?;
                self.expect_punct(P::Semicolon)?;
                StmtKind::Expr(e)
            }
        };
        Ok(Stmt::new(kind, loc))
    }

    // `if` through its last `else`. An `else if` chain is read in a loop and
    // nested afterwards; each `else` binds to the nearest `if`.
    fn parse_if(&mut self) -> PResult<StmtKind> {
        self.bump();
        let cond = self.parse_paren_expr()?;
        let then_branch = Box::new(self.parse_stmt()?);
        let mut chain = Vec::new();
        let mut tail = None;
        while self.consume_keyword(Kw::Else) {
            if !self.check_keyword(Kw::If) {
                tail = Some(Box::new(self.parse_stmt()?));
                break;
            }
            let loc = self.peek_loc();
            self.bump();
            let cond = self.parse_paren_expr()?;
            let then_branch = Box::new(self.parse_stmt()?);
            chain.push((cond, then_branch, loc));
        }
        let else_branch = chain.into_iter().rev().fold(tail, |else_branch, (cond, then_branch, loc)| {
            Some(Box::new(Stmt::new(StmtKind::If { cond, then_branch, else_branch }, loc)))
        });
        Ok(StmtKind::If { cond, then_branch, else_branch })
    }

    fn parse_paren_expr(&mut self) -> PResult<Expr> {
        self.expect_punct(P::LParen)?;
        let e = self.parse_expr()?;
        self.expect_punct(P::RParen)?;
        Ok(e)
    }

    // after `for (`, through the loop body
    fn parse_for_rest(&mut self) -> PResult<StmtKind> {
        let is_decl = self.peek().is_some_and(|t| starts_declaration(&t.kind));
        let init = if is_decl {
            let Some(specs) = self.parse_decl_specifiers(true)? else {
                return self.unexpected("declaration");
            };
            if specs.is_typedef {
                return self.unexpected("object declaration");
            }
            let decls = self
                .parse_declaration(specs, false)?
                .into_iter()
                .filter_map(|d| match d {
                    Declared::Decl(d) => Some(d),
                    _ => None,
                })
                .collect();
            Some(ForInit::Decls(decls))
        } else if self.consume_punct(P::Semicolon) {
            None
        } else {
            let e = self.parse_expr()?;
            self.expect_punct(P::Semicolon)?;
            Some(ForInit::Expr(e))
        };
        let cond = if self.check_punct(P::Semicolon) { None } else { Some(self.parse_expr()?) };
        self.expect_punct(P::Semicolon)?;
        let step = if self.check_punct(P::RParen) { None } else { Some(self.parse_expr()?) };
        self.expect_punct(P::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(StmtKind::For { init, cond, step, body })
    }
}
