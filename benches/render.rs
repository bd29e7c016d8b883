//! Benchmarks for the rendering pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use stencil::dom::{parse_xml, to_xml};
use stencil::{Record, SnippetCollection, SnippetRenderer, TextSnippet, Value, ViewModelRenderer};

const TEMPLATE: &str = concat!(
    r#"<html xmlns="http://www.w3.org/1999/xhtml"><body>"#,
    r#"<h1 property="title">Title</h1>"#,
    r#"<table><tr property="rows" typeof="even"><td property="name"/><td property="price"/></tr>"#,
    r#"<tr property="rows" typeof="odd" class="odd"><td property="name"/><td property="price"/></tr></table>"#,
    r#"<div id="footer"/></body></html>"#
);

fn model(rows: usize) -> Value {
    let entries = (0..rows).map(|i| -> Value {
        Record::new()
            .type_tag(if i % 2 == 0 { "even" } else { "odd" })
            .field("name", format!("Product {i}"))
            .field("price", format!("{}.99", i % 100))
            .into()
    });
    Record::new()
        .field("title", "Catalogue")
        .field("rows", Value::sequence(entries))
        .into()
}

// ============================================================================
// Parsing and serialization
// ============================================================================

fn bench_parse_xml(c: &mut Criterion) {
    c.bench_function("parse_xml", |b| {
        b.iter(|| parse_xml(TEMPLATE).unwrap());
    });
}

fn bench_serialize(c: &mut Criterion) {
    let mut dom = parse_xml(TEMPLATE).unwrap();
    let root = dom.document_element().unwrap();
    ViewModelRenderer::new()
        .render(&mut dom, root, model(500))
        .unwrap();

    c.bench_function("serialize_500_rows", |b| {
        b.iter(|| to_xml(&dom, dom.document()));
    });
}

// ============================================================================
// Renderers
// ============================================================================

fn bench_view_model(c: &mut Criterion) {
    let model = model(500);
    let mut renderer = ViewModelRenderer::new();

    c.bench_function("view_model_500_rows", |b| {
        b.iter(|| {
            let mut dom = parse_xml(TEMPLATE).unwrap();
            let root = dom.document_element().unwrap();
            renderer.render(&mut dom, root, model.clone()).unwrap();
        });
    });
}

fn bench_snippets(c: &mut Criterion) {
    let mut snippets = SnippetCollection::new();
    snippets.add(TextSnippet::new("footer", "(c) Catalogue"));

    let mut dom = parse_xml(TEMPLATE).unwrap();
    let root = dom.document_element().unwrap();
    ViewModelRenderer::new()
        .render(&mut dom, root, model(500))
        .unwrap();

    c.bench_function("snippets_after_500_rows", |b| {
        b.iter(|| {
            let mut dom = dom.clone();
            SnippetRenderer::new(&snippets).render(&mut dom, root).unwrap();
        });
    });
}

criterion_group!(
    benches,
    // Parsing and serialization
    bench_parse_xml,
    bench_serialize,
    // Renderers
    bench_view_model,
    bench_snippets,
);
criterion_main!(benches);
