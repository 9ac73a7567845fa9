use parse::*;

const YEAR_C: &str = include_str!("fixtures/year.c");

#[test]
fn year_sample_parses() {
    let tu = parse_translation_unit(YEAR_C).expect("year.c parses");
    let fns: Vec<_> = tu.functions().map(|f| f.name()).collect();
    assert_eq!(fns, ["convert", "main"]);

    let globals: Vec<_> = tu.decls().filter_map(|d| d.name.as_deref()).collect();
    assert_eq!(globals, ["r", "y", "t", "x", "x", "char_const", "a", "qwerty", "abc"]);

    let convert = tu.functions().next().unwrap();
    assert_eq!(convert.params().len(), 4);
}

#[test]
fn year_sample_enum_and_member_access() {
    let tu = parse_translation_unit(YEAR_C).unwrap();
    // `enum suit {...};` is a tag-only declaration without a name
    let suit = tu
        .decls()
        .find_map(|d| match d.ty.base_spec() {
            TypeSpec::Enum(e) if d.name.is_none() => Some(e),
            _ => None,
        })
        .expect("enum declaration");
    assert_eq!(suit.tag.as_deref(), Some("suit"));
    let vals: Vec<_> = suit.enumerators.as_ref().unwrap().iter().map(|e| e.value).collect();
    assert_eq!(vals, [Some(0), Some(10), Some(20), Some(3)]);

    // `int x= suit.club;`
    let x = tu.decls().filter(|d| d.name.as_deref() == Some("x")).nth(1).unwrap();
    assert!(matches!(
        &x.init,
        Some(Initializer::Expr(Expr { kind: ExprKind::Member { field, arrow: false, .. }, .. })) if field == "club"
    ));
}

#[test]
fn year_sample_main_body() {
    let tu = parse_translation_unit(YEAR_C).unwrap();
    let main = tu.functions().nth(1).unwrap();
    assert!(matches!(main.decl.ty, Type::Func { params: None, .. }));
    let first = match &main.body.items[0] {
        BlockItem::Decl(d) => d,
        other => panic!("expected declaration, got {:?}", other),
    };
    assert_eq!(first.type_name(), "_Bool");
    let decls = main.body.items.iter().filter(|i| matches!(i, BlockItem::Decl(_))).count();
    assert_eq!(decls, 6);
    assert!(matches!(
        main.body.items.last(),
        Some(BlockItem::Stmt(Stmt { kind: StmtKind::Return(Some(_)), .. }))
    ));
}

#[test]
fn year_sample_node_view() {
    let tu = parse_translation_unit(YEAR_C).unwrap();
    let root = Node::from(&tu);
    assert_eq!(root.kind().name(), "FileAST");
    assert_eq!(root.children().len(), tu.items.len());
    let total = count_nodes(root);
    assert!(total > 200, "unexpectedly small tree: {}", total);
}
