use lex::{tokenize, IntBase, LiteralKind, TokenKind as K};

fn one(src: &str) -> K {
    let toks = tokenize(src, &()).expect("lex ok");
    toks[0].kind.clone()
}

#[test]
fn lex_string_basic_and_escape() {
    match one("\"hello\\n\";") {
        K::Literal(LiteralKind::String { ref repr }) => {
            assert_eq!(repr, "\"hello\\n\"");
        }
        other => panic!("expected string literal, got: {:?}", other),
    }
}

#[test]
fn lex_string_with_escaped_quote() {
    let toks = tokenize(r#""a\"b" x"#, &()).unwrap();
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].lexeme, r#""a\"b""#);
}

#[test]
fn lex_char_basic() {
    match one("'A';") {
        K::Literal(LiteralKind::Char { ref repr }) => assert_eq!(repr, "'A'"),
        other => panic!("expected char literal, got: {:?}", other),
    }
}

#[test]
fn lex_char_hex_octal_and_wide() {
    for s in ["'\\x41';", "'\\101';", "'\\n';", "L'a';"] {
        assert!(
            matches!(one(s), K::Literal(LiteralKind::Char { .. })),
            "not a char literal for {}",
            s
        );
    }
    assert!(matches!(one("L\"wide\""), K::Literal(LiteralKind::String { .. })));
}

#[test]
fn integer_bases_and_suffixes() {
    assert!(matches!(one("42"), K::Literal(LiteralKind::Int { base: IntBase::Dec, .. })));
    assert!(matches!(one("0"), K::Literal(LiteralKind::Int { base: IntBase::Dec, .. })));
    assert!(matches!(one("0755"), K::Literal(LiteralKind::Int { base: IntBase::Oct, .. })));
    assert!(matches!(one("0xFFu"), K::Literal(LiteralKind::Int { base: IntBase::Hex, .. })));
    for s in ["10u", "10UL", "10ll", "10LLU", "10lu"] {
        match one(s) {
            K::Literal(LiteralKind::Int { repr, .. }) => assert_eq!(repr, s),
            other => panic!("{}: {:?}", s, other),
        }
    }
}

#[test]
fn floating_constants_use_longest_match() {
    for s in ["1.5", "1.", ".5", "1e10", "1.5e-3f", "2.0L", "0x1.8p3"] {
        match one(s) {
            K::Literal(LiteralKind::Float { repr }) => assert_eq!(repr, s),
            other => panic!("{}: {:?}", s, other),
        }
    }
}

#[test]
fn member_access_after_number_is_not_float() {
    let toks = tokenize("s.a", &()).unwrap();
    assert_eq!(toks.len(), 3);
}
