use lex::{tokenize, LexError, Loc, TokenKind};

#[test]
fn line_markers_reset_line_numbers() {
    let src = "# 1 \"year.c\"\nint a;\n# 40 \"year.c\"\nint b;\n";
    let toks = tokenize(src, &()).unwrap();
    assert_eq!(toks.len(), 6);
    assert_eq!(toks[0].loc, Loc::new(1, 1));
    assert_eq!(toks[3].loc, Loc::new(40, 1));
}

#[test]
fn hash_line_form_and_pragmas() {
    let src = "#line 7\nx\n#pragma once\n  y";
    let toks = tokenize(src, &()).unwrap();
    assert_eq!(toks.len(), 3);
    assert_eq!(toks[0].loc, Loc::new(7, 1));
    assert_eq!(toks[1].kind, TokenKind::Pragma("once".into()));
    assert_eq!(toks[1].loc, Loc::new(8, 1));
    assert_eq!(toks[2].loc, Loc::new(9, 3));
}

#[test]
fn pragma_token_keeps_line_text() {
    let src = "int a;\n  #  pragma   omp parallel for  \nint b;\n#pragma\n";
    let toks = tokenize(src, &()).unwrap();
    let pragmas: Vec<_> = toks.iter().filter(|t| matches!(t.kind, TokenKind::Pragma(_))).collect();
    assert_eq!(pragmas.len(), 2);
    assert_eq!(pragmas[0].kind, TokenKind::Pragma("omp parallel for".into()));
    assert_eq!(pragmas[0].lexeme, "#  pragma   omp parallel for");
    assert_eq!(pragmas[0].loc, Loc::new(2, 3));
    assert_eq!(pragmas[0].kind.category(), "pragma");
    assert_eq!(pragmas[1].kind, TokenKind::Pragma(String::new()));
    // the line after a pragma keeps its number
    assert_eq!(toks[4].loc, Loc::new(3, 1));
}

#[test]
fn pragmatic_is_not_a_pragma() {
    assert!(tokenize("#pragmatic\n", &()).is_err());
}

#[test]
fn unexpanded_directives_are_rejected() {
    let e: LexError = tokenize("#include <stdio.h>\nint a;", &()).unwrap_err();
    assert!(e.message.contains("#include"), "{}", e);
    assert_eq!(e.loc, Loc::new(1, 1));
}

#[test]
fn hash_in_middle_of_line_is_not_a_directive() {
    assert!(tokenize("int a # 3", &()).is_err());
}
