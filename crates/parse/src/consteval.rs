//! Integer constant folding for enumerator values.

use std::collections::HashMap;

use crate::ast::{BinaryOp, ConstKind, Expr, ExprKind, Type, TypeName, TypeSpec, UnaryOp};
use crate::scope::ScopeStack;

/// Source of enumeration constant values for identifiers.
pub trait Constants {
    fn constant(&self, name: &str) -> Option<i64>;
}

impl Constants for HashMap<String, i64> {
    fn constant(&self, name: &str) -> Option<i64> {
        self.get(name).copied()
    }
}

impl Constants for ScopeStack {
    fn constant(&self, name: &str) -> Option<i64> {
        ScopeStack::constant(self, name)
    }
}

/// Folds `expr` to an integer, resolving identifiers through `names`
/// (enumeration constants visible at that point). Returns `None` for anything
/// that is not an integer constant expression or would trap (division by
/// zero, out-of-range shifts).
pub fn eval_int(expr: &Expr, names: &impl Constants) -> Option<i64> {
    match &expr.kind {
        ExprKind::Constant { kind: ConstKind::Int, value } => parse_int_literal(value),
        ExprKind::Constant { kind: ConstKind::Char, value } => decode_char_literal(value),
        ExprKind::Constant { .. } => None,
        ExprKind::Ident(name) => names.constant(name),
        ExprKind::Unary { op, expr } => {
            let v = eval_int(expr, names)?;
            match op {
                UnaryOp::Plus => Some(v),
                UnaryOp::Minus => Some(v.wrapping_neg()),
                UnaryOp::BitNot => Some(!v),
                UnaryOp::LogicalNot => Some((v == 0) as i64),
                _ => None,
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let l = eval_int(lhs, names)?;
            // && and || short-circuit like the runtime operators
            match op {
                BinaryOp::LAnd if l == 0 => return Some(0),
                BinaryOp::LOr if l != 0 => return Some(1),
                _ => {}
            }
            let r = eval_int(rhs, names)?;
            fold_binary(*op, l, r)
        }
        ExprKind::Cond { cond, then_e, else_e } => {
            if eval_int(cond, names)? != 0 {
                eval_int(then_e, names)
            } else {
                eval_int(else_e, names)
            }
        }
        ExprKind::Cast { ty, expr } => convert(eval_int(expr, names)?, ty),
        _ => None,
    }
}

// Conversion to a builtin integer type, assuming an LP64 target with signed
// plain `char`. Other cast targets do not fold.
fn convert(v: i64, ty: &TypeName) -> Option<i64> {
    let Type::Decl { spec: TypeSpec::Builtin { names, .. }, .. } = &ty.ty else {
        return None;
    };
    let has = |w: &str| names.iter().any(|n| n == w);
    if has("float") || has("double") || has("void") || has("_Complex") {
        return None;
    }
    if has("_Bool") {
        return Some((v != 0) as i64);
    }
    let bits = if has("char") {
        8
    } else if has("short") {
        16
    } else if has("long") {
        64
    } else {
        32
    };
    if bits == 64 {
        // unsigned long keeps its bit pattern in the i64 carrier
        return Some(v);
    }
    let mask = (1i64 << bits) - 1;
    let low = v & mask;
    if has("unsigned") || low < (1i64 << (bits - 1)) {
        Some(low)
    } else {
        Some(low - (1i64 << bits))
    }
}

fn fold_binary(op: BinaryOp, l: i64, r: i64) -> Option<i64> {
    let v = match op {
        BinaryOp::Plus => l.wrapping_add(r),
        BinaryOp::Minus => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::Div => l.checked_div(r)?,
        BinaryOp::Mod => l.checked_rem(r)?,
        BinaryOp::Shl => l.checked_shl(u32::try_from(r).ok()?)?,
        BinaryOp::Shr => l.checked_shr(u32::try_from(r).ok()?)?,
        BinaryOp::BitAnd => l & r,
        BinaryOp::BitOr => l | r,
        BinaryOp::BitXor => l ^ r,
        BinaryOp::LAnd => (l != 0 && r != 0) as i64,
        BinaryOp::LOr => (l != 0 || r != 0) as i64,
        BinaryOp::Lt => (l < r) as i64,
        BinaryOp::Le => (l <= r) as i64,
        BinaryOp::Gt => (l > r) as i64,
        BinaryOp::Ge => (l >= r) as i64,
        BinaryOp::Eq => (l == r) as i64,
        BinaryOp::Ne => (l != r) as i64,
    };
    Some(v)
}

/// Value of an integer literal spelling such as `42`, `0x1Fu` or `017L`.
pub fn parse_int_literal(repr: &str) -> Option<i64> {
    let digits = repr.trim_end_matches(['u', 'U', 'l', 'L']);
    let (body, radix) = if let Some(h) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (h, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (&digits[1..], 8)
    } else {
        (digits, 10)
    };
    // unsigned constants above i64::MAX keep their bit pattern
    u64::from_str_radix(body, radix).ok().map(|v| v as i64)
}

/// Value of a character constant spelling such as `'a'`, `'\n'` or `L'\x41'`.
pub fn decode_char_literal(repr: &str) -> Option<i64> {
    let quoted = repr.strip_prefix('L').unwrap_or(repr);
    let inner = quoted.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let c0 = chars.next()?;
    if c0 != '\\' {
        return Some(c0 as i64);
    }
    let v = match chars.next()? {
        'n' => 10,
        'r' => 13,
        't' => 9,
        'a' => 7,
        'b' => 8,
        'f' => 12,
        'v' => 11,
        '\\' => 92,
        '\'' => 39,
        '"' => 34,
        '?' => 63,
        'x' => {
            let mut acc: i64 = 0;
            for d in chars.map_while(|ch| ch.to_digit(16)) {
                acc = ((acc << 4) | d as i64) & 0xFF;
            }
            acc
        }
        d @ '0'..='7' => {
            let mut acc = d as i64 - '0' as i64;
            for ch in chars.take(2) {
                match ch.to_digit(8) {
                    Some(o) => acc = ((acc << 3) | o as i64) & 0xFF,
                    None => break,
                }
            }
            acc
        }
        other => other as i64,
    };
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lex::Loc;

    fn int(v: &str) -> Expr {
        Expr::constant(ConstKind::Int, v, Loc::default())
    }

    #[test]
    fn int_literal_bases_and_suffixes() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("0x1F"), Some(31));
        assert_eq!(parse_int_literal("017"), Some(15));
        assert_eq!(parse_int_literal("10UL"), Some(10));
        assert_eq!(parse_int_literal("0xffffffffffffffffull"), Some(-1));
    }

    #[test]
    fn char_literals() {
        assert_eq!(decode_char_literal("'a'"), Some(97));
        assert_eq!(decode_char_literal("'\\n'"), Some(10));
        assert_eq!(decode_char_literal("'\\0'"), Some(0));
        assert_eq!(decode_char_literal("'\\101'"), Some(65));
        assert_eq!(decode_char_literal("L'\\x41'"), Some(65));
    }

    #[test]
    fn folds_arithmetic_and_names() {
        let mut names = HashMap::new();
        names.insert("B".to_string(), 10);
        let e = Expr::binary(
            BinaryOp::Plus,
            Expr::ident("B", Loc::default()),
            Expr::binary(BinaryOp::Shl, int("1"), int("2")),
        );
        assert_eq!(eval_int(&e, &names), Some(14));
        let neg = Expr::unary(UnaryOp::Minus, int("3"), Loc::default());
        assert_eq!(eval_int(&neg, &names), Some(-3));
    }

    fn cast(names: &[&str], e: Expr) -> Expr {
        let loc = Loc::default();
        let spec = TypeSpec::Builtin { names: names.iter().map(|n| n.to_string()).collect(), loc };
        let ty = TypeName { ty: Type::Decl { declname: None, quals: Vec::new(), spec, loc }, loc };
        Expr::new(ExprKind::Cast { ty, expr: Box::new(e) }, loc)
    }

    #[test]
    fn casts_convert_to_the_target_width() {
        let names = HashMap::new();
        assert_eq!(eval_int(&cast(&["char"], int("300")), &names), Some(44));
        assert_eq!(eval_int(&cast(&["char"], int("200")), &names), Some(-56));
        assert_eq!(eval_int(&cast(&["unsigned", "char"], int("300")), &names), Some(44));
        assert_eq!(eval_int(&cast(&["short"], int("65535")), &names), Some(-1));
        assert_eq!(eval_int(&cast(&["unsigned", "int"], int("-1")), &names), Some(4294967295));
        assert_eq!(eval_int(&cast(&["int"], int("4294967296")), &names), Some(0));
        assert_eq!(eval_int(&cast(&["long"], int("4294967296")), &names), Some(4294967296));
        assert_eq!(eval_int(&cast(&["_Bool"], int("7")), &names), Some(1));
        assert_eq!(eval_int(&cast(&["double"], int("7")), &names), None);
    }

    #[test]
    fn traps_and_unknowns_are_none() {
        let names = HashMap::new();
        assert_eq!(eval_int(&Expr::binary(BinaryOp::Div, int("1"), int("0")), &names), None);
        assert_eq!(eval_int(&Expr::ident("nope", Loc::default()), &names), None);
        assert_eq!(eval_int(&Expr::constant(ConstKind::Float, "1.5", Loc::default()), &names), None);
    }
}
