use parse::*;

fn init_of(src: &str) -> Initializer {
    let tu = parse_translation_unit(src).expect("parse ok");
    tu.decls().last().and_then(|d| d.init.clone()).expect("initializer")
}

#[test]
fn flat_list_with_trailing_comma() {
    let Initializer::List(l) = init_of("int a[] = { 1, 2, 3, };") else { panic!("expected list") };
    assert_eq!(l.items.len(), 3);
    assert!(l.items.iter().all(|i| i.designators.is_empty()));
}

#[test]
fn nested_lists() {
    let Initializer::List(l) = init_of("int m[2][2] = { {1, 2}, {3, 4} };") else { panic!() };
    assert_eq!(l.items.len(), 2);
    assert!(matches!(&l.items[1].init, Initializer::List(inner) if inner.items.len() == 2));
}

#[test]
fn designators_field_index_and_chained() {
    let src = "struct P { int x, y; int v[4]; } p = { .y = 2, .v[1] = 7, [0] = 1, 9 };";
    let Initializer::List(l) = init_of(src) else { panic!() };
    assert_eq!(l.items.len(), 4);
    assert!(matches!(&l.items[0].designators[..], [Designator::Field { name, .. }] if name == "y"));
    assert!(matches!(
        &l.items[1].designators[..],
        [Designator::Field { .. }, Designator::Index { .. }]
    ));
    assert!(matches!(&l.items[2].designators[..], [Designator::Index { .. }]));
    assert!(l.items[3].designators.is_empty());
}

#[test]
fn designated_items_become_named_initializers() {
    let src = "struct P { int x; } p = { .x = 1, 2 };";
    let tu = parse_translation_unit(src).unwrap();
    let d = tu.decls().next().unwrap();
    let Some(Initializer::List(l)) = &d.init else { panic!() };
    let kids = Node::InitList(l).children();
    assert_eq!(kids[0].kind(), NodeKind::NamedInitializer);
    // an undesignated item is just its value
    assert_eq!(kids[1].kind(), NodeKind::Constant);
    let named = kids[0].children();
    assert_eq!(named[0].kind(), NodeKind::Designator);
    assert_eq!(named[0].attribute().as_deref(), Some(".x"));
}

#[test]
fn string_initializers() {
    let Initializer::List(l) = init_of(r#"char *num[] = {"", "One", "Two"};"#) else { panic!() };
    let values: Vec<_> = l
        .items
        .iter()
        .map(|i| match &i.init {
            Initializer::Expr(e) => e.as_leaf().unwrap_or_default().to_string(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(values, ["\"\"", "\"One\"", "\"Two\""]);
}

#[test]
fn designator_without_equals_is_rejected() {
    let err = parse_translation_unit("int a[3] = { [1] 5 };").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref lexeme, .. } if lexeme == "5"), "{:?}", err);
}
