use lex::{Keyword as Kw, LiteralKind, Punctuator as P, TokenKind as K};

use super::decl::starts_type_name;
use super::Parser;
use crate::ast::*;
use crate::error::PResult;

// Binary operator precedence, loosest first. All are left-associative.
fn binary_op(p: P) -> Option<(u8, BinaryOp)> {
    let entry = match p {
        P::OrOr => (1, BinaryOp::LOr),
        P::AndAnd => (2, BinaryOp::LAnd),
        P::Pipe => (3, BinaryOp::BitOr),
        P::Caret => (4, BinaryOp::BitXor),
        P::Amp => (5, BinaryOp::BitAnd),
        P::Eq => (6, BinaryOp::Eq),
        P::Ne => (6, BinaryOp::Ne),
        P::Lt => (7, BinaryOp::Lt),
        P::Gt => (7, BinaryOp::Gt),
        P::Le => (7, BinaryOp::Le),
        P::Ge => (7, BinaryOp::Ge),
        P::Shl => (8, BinaryOp::Shl),
        P::Shr => (8, BinaryOp::Shr),
        P::Plus => (9, BinaryOp::Plus),
        P::Minus => (9, BinaryOp::Minus),
        P::Star => (10, BinaryOp::Mul),
        P::Slash => (10, BinaryOp::Div),
        P::Percent => (10, BinaryOp::Mod),
        _ => return None,
    };
    Some(entry)
}

// `=` maps to Some(None), `op=` to Some(Some(op))
fn assign_op(p: P) -> Option<Option<BinaryOp>> {
    let op = match p {
        P::Assign => None,
        P::PlusAssign => Some(BinaryOp::Plus),
        P::MinusAssign => Some(BinaryOp::Minus),
        P::StarAssign => Some(BinaryOp::Mul),
        P::SlashAssign => Some(BinaryOp::Div),
        P::PercentAssign => Some(BinaryOp::Mod),
        P::ShlAssign => Some(BinaryOp::Shl),
        P::ShrAssign => Some(BinaryOp::Shr),
        P::AndAssign => Some(BinaryOp::BitAnd),
        P::OrAssign => Some(BinaryOp::BitOr),
        P::XorAssign => Some(BinaryOp::BitXor),
        _ => return None,
    };
    Some(op)
}

fn unary_op(p: P) -> Option<UnaryOp> {
    match p {
        P::Amp => Some(UnaryOp::AddrOf),
        P::Star => Some(UnaryOp::Deref),
        P::Plus => Some(UnaryOp::Plus),
        P::Minus => Some(UnaryOp::Minus),
        P::Tilde => Some(UnaryOp::BitNot),
        P::Bang => Some(UnaryOp::LogicalNot),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// Full expression, comma operator included. Each one opens a nesting level.
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.nested(Self::parse_comma)
    }

    fn parse_comma(&mut self) -> PResult<Expr> {
        let first = self.parse_assignment()?;
        if !self.check_punct(P::Comma) {
            return Ok(first);
        }
        let loc = first.loc;
        let mut list = vec![first];
        while self.consume_punct(P::Comma) {
            list.push(self.parse_assignment()?);
        }
        Ok(Expr::new(ExprKind::Comma(list), loc))
    }

    pub(crate) fn parse_assignment(&mut self) -> PResult<Expr> {
        let lhs = self.parse_conditional()?;
        let op = match self.peek_kind() {
            Some(K::Punct(p)) => assign_op(p),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(lhs);
        };
        // only unary expressions can be assigned to
        if matches!(
            lhs.kind,
            ExprKind::Binary { .. } | ExprKind::Cond { .. } | ExprKind::Assign { .. } | ExprKind::Cast { .. } | ExprKind::Comma(_)
        ) {
            return self.unexpected("end of expression");
        }
        self.bump();
        let rhs = self.nested(Self::parse_assignment)?;
        Ok(Expr::assign(op, lhs, rhs))
    }

    pub(crate) fn parse_conditional(&mut self) -> PResult<Expr> {
        let cond = self.parse_binary(1)?;
        if !self.consume_punct(P::Question) {
            return Ok(cond);
        }
        let then_e = self.parse_expr()?;
        self.expect_punct(P::Colon)?;
        let else_e = self.nested(Self::parse_conditional)?;
        Ok(Expr::cond(cond, then_e, else_e))
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_cast()?;
        loop {
            let Some(K::Punct(p)) = self.peek_kind() else { break };
            let Some((prec, op)) = binary_op(p) else { break };
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // `(` followed by something that starts a type name
    fn at_paren_type_name(&mut self) -> bool {
        self.check_punct(P::LParen) && self.peek_kind_n(1).is_some_and(|k| starts_type_name(&k))
    }

    fn parse_cast(&mut self) -> PResult<Expr> {
        if !self.at_paren_type_name() {
            return self.parse_unary();
        }
        let loc = self.peek_loc();
        self.bump();
        let ty = self.parse_type_name()?;
        self.expect_punct(P::RParen)?;
        if self.check_punct(P::LBrace) {
            let init = self.nested(Self::parse_init_list)?;
            let lit = Expr::new(ExprKind::CompoundLiteral { ty, init }, loc);
            return self.parse_postfix_tail(lit);
        }
        let expr = self.nested(Self::parse_cast)?;
        Ok(Expr::new(ExprKind::Cast { ty, expr: Box::new(expr) }, loc))
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let loc = self.peek_loc();
        match self.peek_kind() {
            Some(K::Punct(P::Inc)) | Some(K::Punct(P::Dec)) => {
                let op = if self.consume_punct(P::Inc) {
                    UnaryOp::PreInc
                } else {
                    self.bump();
                    UnaryOp::PreDec
                };
                let e = self.nested(Self::parse_unary)?;
                Ok(Expr::unary(op, e, loc))
            }
            Some(K::Punct(p)) if unary_op(p).is_some() => {
                self.bump();
                let e = self.nested(Self::parse_cast)?;
                match unary_op(p) {
                    Some(op) => Ok(Expr::unary(op, e, loc)),
                    None => Ok(e),
                }
            }
            Some(K::Keyword(Kw::Sizeof)) => {
                self.bump();
                if self.at_paren_type_name() {
                    self.bump();
                    let ty = self.parse_type_name()?;
                    self.expect_punct(P::RParen)?;
                    if self.check_punct(P::LBrace) {
                        // sizeof applied to a compound literal
                        let init = self.nested(Self::parse_init_list)?;
                        let lit = Expr::new(ExprKind::CompoundLiteral { ty, init }, loc);
                        let e = self.parse_postfix_tail(lit)?;
                        return Ok(Expr::unary(UnaryOp::Sizeof, e, loc));
                    }
                    return Ok(Expr::new(ExprKind::SizeofType(ty), loc));
                }
                let e = self.nested(Self::parse_unary)?;
                Ok(Expr::unary(UnaryOp::Sizeof, e, loc))
            }
            _ => {
                let e = self.parse_primary()?;
                self.parse_postfix_tail(e)
            }
        }
    }

    fn parse_postfix_tail(&mut self, mut e: Expr) -> PResult<Expr> {
        loop {
            let loc = e.loc;
            e = match self.peek_kind() {
                Some(K::Punct(P::LBracket)) => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect_punct(P::RBracket)?;
                    Expr::new(ExprKind::Index { base: Box::new(e), index: Box::new(index) }, loc)
                }
                Some(K::Punct(P::LParen)) => {
                    self.bump();
                    let mut args = Vec::new();
                    if !self.consume_punct(P::RParen) {
                        loop {
                            args.push(self.nested(Self::parse_assignment)?);
                            if self.consume_punct(P::Comma) {
                                continue;
                            }
                            self.expect_punct(P::RParen)?;
                            break;
                        }
                    }
                    Expr::new(ExprKind::Call { callee: Box::new(e), args }, loc)
                }
                Some(K::Punct(p @ (P::Dot | P::Arrow))) => {
                    self.bump();
                    let (field, _) = self.expect_name()?;
                    Expr::new(ExprKind::Member { base: Box::new(e), field, arrow: p == P::Arrow }, loc)
                }
                Some(K::Punct(P::Inc)) => {
                    self.bump();
                    Expr::unary(UnaryOp::PostInc, e, loc)
                }
                Some(K::Punct(P::Dec)) => {
                    self.bump();
                    Expr::unary(UnaryOp::PostDec, e, loc)
                }
                _ => return Ok(e),
            };
        }
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let loc = self.peek_loc();
        match self.peek_kind() {
            Some(K::Identifier(name)) => {
                self.bump();
                Ok(Expr::ident(name, loc))
            }
            Some(K::Literal(lit)) => {
                self.bump();
                let (kind, value) = match lit {
                    LiteralKind::Int { repr, .. } => (ConstKind::Int, repr),
                    LiteralKind::Float { repr } => (ConstKind::Float, repr),
                    LiteralKind::Char { repr } => (ConstKind::Char, repr),
                    LiteralKind::String { repr } => (ConstKind::String, self.concat_strings(repr)),
                };
                Ok(Expr::constant(kind, value, loc))
            }
            Some(K::Punct(P::LParen)) => {
                self.bump();
                let e = self.parse_expr()?;
                self.expect_punct(P::RParen)?;
                Ok(e)
            }
            _ => self.unexpected("expression"),
        }
    }

    // Adjacent string literals form one constant: the closing quote of the
    // first and the opening quote (and prefix) of the next are dropped.
    fn concat_strings(&mut self, mut acc: String) -> String {
        while let Some(K::Literal(LiteralKind::String { repr })) = self.peek_kind() {
            self.bump();
            acc.pop();
            let body = repr.find('"').map_or(repr.as_str(), |i| &repr[i + 1..]);
            acc.push_str(body);
        }
        acc
    }
}
