use parse::*;

// Initializer of the last file-scope declaration.
fn init_expr(src: &str) -> Expr {
    let tu = parse_translation_unit(src).expect("parse ok");
    let d = tu.decls().last().expect("declaration");
    match &d.init {
        Some(Initializer::Expr(e)) => e.clone(),
        other => panic!("expected expression initializer, got {:?}", other),
    }
}

// Expression statements of `void f(...) { ... }`.
fn stmt_exprs(src: &str) -> Vec<Expr> {
    let tu = parse_translation_unit(src).expect("parse ok");
    let f = tu.functions().next().expect("function");
    f.body
        .items
        .iter()
        .filter_map(|i| match i {
            BlockItem::Stmt(Stmt { kind: StmtKind::Expr(e), .. }) => Some(e.clone()),
            _ => None,
        })
        .collect()
}

fn leaf(e: &Expr) -> &str {
    e.as_leaf().unwrap_or_else(|| panic!("expected leaf, got {:?}", e))
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let e = init_expr("int v = 1+2*3;");
    let ExprKind::Binary { op: BinaryOp::Plus, lhs, rhs } = &e.kind else { panic!("expected +, got {:?}", e) };
    assert_eq!(leaf(lhs), "1");
    let ExprKind::Binary { op: BinaryOp::Mul, lhs: l2, rhs: r2 } = &rhs.kind else { panic!("expected *") };
    assert_eq!(leaf(l2), "2");
    assert_eq!(leaf(r2), "3");
}

#[test]
fn binary_operators_are_left_associative() {
    let e = init_expr("int v = 10 - 4 - 3;");
    let ExprKind::Binary { op: BinaryOp::Minus, lhs, rhs } = &e.kind else { panic!() };
    assert!(matches!(lhs.kind, ExprKind::Binary { op: BinaryOp::Minus, .. }));
    assert_eq!(leaf(rhs), "3");
}

#[test]
fn precedence_ladder() {
    // || < && < | < ^ < & < == < < < << < +
    let e = init_expr("int v = a || b && c | d ^ e & f == g < h << i + j;");
    let mut ops = Vec::new();
    let mut cur = &e;
    while let ExprKind::Binary { op, rhs, .. } = &cur.kind {
        ops.push(op.symbol());
        cur = rhs;
    }
    assert_eq!(ops, ["||", "&&", "|", "^", "&", "==", "<", "<<", "+"]);
}

#[test]
fn assignment_is_right_associative() {
    let exprs = stmt_exprs("void f(int a, int b, int c) { a = b += c; }");
    let ExprKind::Assign { op: None, rhs, .. } = &exprs[0].kind else { panic!("expected =") };
    assert!(matches!(rhs.kind, ExprKind::Assign { op: Some(BinaryOp::Plus), .. }));
    assert_eq!(assign_symbol(Some(BinaryOp::Shl)), "<<=");
}

#[test]
fn assignment_to_non_lvalue_form_is_a_syntax_error() {
    let err = parse_translation_unit("void f(int a, int b) { a + b = 1; }").unwrap_err();
    match err {
        ParseError::Syntax { lexeme, loc, .. } => {
            assert_eq!(lexeme, "=");
            assert_eq!(loc, Loc::new(1, 30));
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn conditional_nests_to_the_right() {
    let e = init_expr("int v = a ? 1 : b ? 2 : 3;");
    let ExprKind::Cond { else_e, .. } = &e.kind else { panic!("expected ?:") };
    assert!(matches!(else_e.kind, ExprKind::Cond { .. }));
}

#[test]
fn comma_expression_collects_operands() {
    let exprs = stmt_exprs("void f(int a, int b) { a = 1, b = 2, a + b; }");
    let ExprKind::Comma(items) = &exprs[0].kind else { panic!("expected comma list") };
    assert_eq!(items.len(), 3);
    assert_eq!(Node::Expr(&exprs[0]).kind(), NodeKind::ExprList);
}

#[test]
fn call_arguments_are_not_comma_expressions() {
    let exprs = stmt_exprs("void f(void) { g(1, (2, 3)); }");
    let ExprKind::Call { callee, args } = &exprs[0].kind else { panic!("expected call") };
    assert_eq!(leaf(callee), "g");
    assert_eq!(args.len(), 2);
    assert!(matches!(args[1].kind, ExprKind::Comma(_)));
}

#[test]
fn postfix_chain() {
    let exprs = stmt_exprs("void f(void) { s.a[1]->b(2)++; }");
    let ExprKind::Unary { op: UnaryOp::PostInc, expr } = &exprs[0].kind else { panic!("expected p++") };
    let ExprKind::Call { callee, .. } = &expr.kind else { panic!("expected call") };
    let ExprKind::Member { base, field, arrow: true } = &callee.kind else { panic!("expected ->") };
    assert_eq!(field, "b");
    let ExprKind::Index { base: arr, .. } = &base.kind else { panic!("expected index") };
    assert!(matches!(&arr.kind, ExprKind::Member { field, arrow: false, .. } if field == "a"));
}

#[test]
fn unary_operators() {
    let exprs = stmt_exprs("void f(int x, int *p) { -x; !x; ~x; *p; &x; ++x; --x; x--; }");
    let ops: Vec<_> = exprs
        .iter()
        .map(|e| match &e.kind {
            ExprKind::Unary { op, .. } => op.symbol(),
            other => panic!("expected unary, got {:?}", other),
        })
        .collect();
    assert_eq!(ops, ["-", "!", "~", "*", "&", "++", "--", "p--"]);
}

#[test]
fn cast_versus_parenthesized_expression() {
    let src = "typedef long L; void f(int x) { (L)x; (x) + 1; (unsigned char *)0; }";
    let exprs = stmt_exprs(src);
    match &exprs[0].kind {
        ExprKind::Cast { ty, expr } => {
            assert!(matches!(&ty.ty, Type::Decl { spec: TypeSpec::TypedefName { name, .. }, .. } if name == "L"));
            assert_eq!(leaf(expr), "x");
        }
        other => panic!("expected cast, got {:?}", other),
    }
    assert!(matches!(exprs[1].kind, ExprKind::Binary { op: BinaryOp::Plus, .. }));
    match &exprs[2].kind {
        ExprKind::Cast { ty, .. } => assert!(matches!(ty.ty, Type::Ptr { .. })),
        other => panic!("expected cast, got {:?}", other),
    }
}

#[test]
fn sizeof_type_and_expression() {
    let exprs = stmt_exprs("void f(int x) { sizeof(int *); sizeof x; sizeof(x); }");
    assert!(matches!(&exprs[0].kind, ExprKind::SizeofType(tn) if matches!(tn.ty, Type::Ptr { .. })));
    assert!(matches!(exprs[1].kind, ExprKind::Unary { op: UnaryOp::Sizeof, .. }));
    assert!(matches!(exprs[2].kind, ExprKind::Unary { op: UnaryOp::Sizeof, .. }));
}

#[test]
fn compound_literal() {
    let src = "struct P { int x, y; }; void f(void) { g((struct P){ .x = 1, .y = 2 }); }";
    let exprs = stmt_exprs(src);
    let ExprKind::Call { args, .. } = &exprs[0].kind else { panic!("expected call") };
    match &args[0].kind {
        ExprKind::CompoundLiteral { ty, init } => {
            assert_eq!(ty.ty.base_spec().to_string(), "struct P");
            assert_eq!(init.items.len(), 2);
        }
        other => panic!("expected compound literal, got {:?}", other),
    }
}

#[test]
fn adjacent_string_literals_concatenate() {
    let e = init_expr(r#"char *s = "ab" "cd" "";"#);
    assert!(matches!(&e.kind, ExprKind::Constant { kind: ConstKind::String, value } if value == "\"abcd\""));
}

#[test]
fn constants_keep_their_spelling() {
    let exprs = stmt_exprs("void f(void) { 0x1Fu; 1.5e3f; 'b'; }");
    let spellings: Vec<_> = exprs.iter().map(|e| leaf(e).to_string()).collect();
    assert_eq!(spellings, ["0x1Fu", "1.5e3f", "'b'"]);
    assert!(matches!(exprs[1].kind, ExprKind::Constant { kind: ConstKind::Float, .. }));
    assert!(matches!(exprs[2].kind, ExprKind::Constant { kind: ConstKind::Char, .. }));
}

#[test]
fn member_names_may_collide_with_typedefs() {
    let exprs = stmt_exprs("typedef int len; struct S { int len; }; void f(struct S s) { s.len; }");
    assert!(matches!(&exprs[0].kind, ExprKind::Member { field, .. } if field == "len"));
}
