//! End-to-end rendering through the public API.

use stencil::dom::{parse_xml, to_xml};
use stencil::{
    BindingError, CsrfProtection, Document, Error, FormData, Record, SimpleSnippet,
    SnippetCollection, TextSnippet, Value, ViewModelRenderer,
};

const PAGE: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><h1 property="title">Title</h1><ul><li property="items">item</li></ul><div id="footer"/><form id="search"><input name="q"/></form></body></html>"#;

fn page_model() -> Value {
    Record::new()
        .field("title", "Products")
        .field(
            "items",
            Value::sequence(["Apple".into(), "Pear".into(), "Plum".into()]),
        )
        .into()
}

#[test]
fn test_full_pipeline() {
    let mut doc = Document::parse_xml(PAGE).unwrap();
    doc.apply_view_model(page_model()).unwrap();

    let mut snippets = SnippetCollection::new();
    snippets.add(SimpleSnippet::from_xml("footer", "<p>(c) Shop</p>").unwrap());
    doc.apply_snippets(&snippets).unwrap();

    doc.apply_form_data(&FormData::new("search", [("q", "fruit")]))
        .unwrap();
    doc.apply_csrf_protection(&CsrfProtection::new("csrf", "token"))
        .unwrap();

    let out = doc.to_xml_string();
    assert!(out.contains(r#"<h1 property="title">Products</h1>"#));
    assert!(out.contains(
        r#"<ul><li property="items">Apple</li><li property="items">Pear</li><li property="items">Plum</li></ul>"#
    ));
    assert!(out.contains(r#"<div id="footer"><p>(c) Shop</p></div>"#));
    assert!(out.contains(
        r#"<form id="search"><input type="hidden" name="csrf" value="token"/><input name="q" value="fruit"/></form>"#
    ));
}

#[test]
fn test_render_into_html_parsed_document() {
    let mut doc =
        Document::parse_html(r#"<p property="greeting">hi</p><p property="hidden">x</p>"#).unwrap();
    doc.apply_view_model(
        Record::new()
            .field("greeting", "Hello")
            .field("hidden", false)
            .into(),
    )
    .unwrap();

    assert_eq!(
        doc.to_html_string(),
        r#"<html><head></head><body><p property="greeting">Hello</p></body></html>"#
    );
}

#[test]
fn test_nested_sequences() {
    let model = Record::new().field(
        "rows",
        Value::sequence([
            Value::sequence(["a".into(), "b".into()]),
            Value::sequence(["c".into()]),
        ]),
    );
    let mut dom = parse_xml(r#"<div><p property="rows">x</p></div>"#).unwrap();
    let root = dom.document_element().unwrap();

    ViewModelRenderer::new()
        .render(&mut dom, root, model.into())
        .unwrap();

    assert_eq!(
        to_xml(&dom, dom.document()),
        r#"<div><p property="rows">a</p><p property="rows">b</p><p property="rows">c</p></div>"#
    );
}

#[test]
fn test_sequence_entries_bind_nested_properties_and_attributes() {
    let product = |name: &str, url: &str| {
        Value::from(
            Record::new()
                .field("name", name)
                .field("href", url.to_string()),
        )
    };
    let model = Record::new().field(
        "products",
        Value::sequence([product("Apple", "/apple"), product("Pear", "/pear")]),
    );

    let mut doc = Document::parse_xml(
        r##"<ul><li property="products"><a href="#"><span property="name"/></a></li><li>static</li></ul>"##,
    )
    .unwrap();
    doc.apply_view_model(model.into()).unwrap();

    // `href` on the nested anchor is not bound: only the element carrying
    // `property` has its attributes resolved against the model.
    assert_eq!(
        doc.to_xml_string(),
        concat!(
            r##"<ul><li property="products"><a href="#"><span property="name">Apple</span></a></li>"##,
            r##"<li property="products"><a href="#"><span property="name">Pear</span></a></li>"##,
            r#"<li>static</li></ul>"#
        )
    );
}

#[test]
fn test_sibling_alternatives_are_consumed_once() {
    // Both alternatives share the property; they must not be walked again
    // after being moved into the temporary container.
    let calls = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = std::rc::Rc::clone(&calls);
    let model = Record::new().operation("user", move |_| {
        counter.set(counter.get() + 1);
        Record::new().type_tag("b").field("asString", "chosen").into()
    });

    let mut doc = Document::parse_xml(
        r#"<div><p property="user" typeof="a"/><p property="user" typeof="b"/><p>after</p></div>"#,
    )
    .unwrap();
    doc.apply_view_model(model.into()).unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(
        doc.to_xml_string(),
        r#"<div><p property="user" typeof="b">chosen</p><p>after</p></div>"#
    );
}

#[test]
fn test_binding_error_reports_path() {
    let model = Record::new().field("shop", Record::new().field("name", "x"));
    let mut doc = Document::parse_xml(
        r#"<div><section property="shop"><p property="owner"/></section></div>"#,
    )
    .unwrap();

    let err = doc.apply_view_model(model.into()).unwrap_err();
    match err {
        Error::Binding(BindingError::MissingAccessor { path }) => assert_eq!(path, "shop.owner"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_snippet_duplicate_id_aborts() {
    let mut doc =
        Document::parse_xml(r#"<div><p id="x"/><section><p id="x"/></section></div>"#).unwrap();
    let mut snippets = SnippetCollection::new();
    snippets.add(TextSnippet::new("x", "set"));

    let err = doc.apply_snippets(&snippets).unwrap_err();
    assert!(matches!(err, Error::DuplicateId(ref id) if id == "x"));
    assert_eq!(
        doc.to_xml_string(),
        r#"<div><p id="x">set</p><section><p id="x"/></section></div>"#
    );
}

#[test]
fn test_snippet_replacing_root_child_keeps_walking() {
    let mut doc = Document::parse_xml(
        r#"<div><header id="top">old</header><main><p id="body"/></main></div>"#,
    )
    .unwrap();
    let mut snippets = SnippetCollection::new();
    snippets.add(
        SimpleSnippet::from_xml("top", r#"<header id="top"><h1 id="brand"/></header>"#).unwrap(),
    );
    snippets.add(TextSnippet::new("brand", "Shop"));
    snippets.add(TextSnippet::new("body", "Welcome"));

    doc.apply_snippets(&snippets).unwrap();

    assert_eq!(
        doc.to_xml_string(),
        r#"<div><header id="top"><h1 id="brand">Shop</h1></header><main><p id="body">Welcome</p></main></div>"#
    );
}
