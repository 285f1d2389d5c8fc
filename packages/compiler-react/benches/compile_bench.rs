use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecraft_compiler_react::{compile_page, CompileOptions, ComponentCatalog};
use pagecraft_dom::{BindableValue, Document, IdGenerator, NodeId, NodeInit};

fn build_page(elements: usize, derived: usize) -> (Document, NodeId) {
    let mut ids = IdGenerator::seeded(1);
    let doc = Document::new_with(&mut ids);
    let root = doc.root_id().clone();
    let page = doc.create_node_with(&mut ids, NodeInit::page("Dashboard").named("dashboard"));
    let page_id = page.id.clone();
    let mut doc = doc.add_node(page, &root, "pages", None).unwrap();

    let stack = doc.create_node_with(&mut ids, NodeInit::element("Stack").named("layout"));
    let stack_id = stack.id.clone();
    doc = doc.add_node(stack, &page_id, "children", None).unwrap();

    for i in 0..derived {
        let mut init = NodeInit::derived_state("({ prev }) => (prev ?? 0) + 1").named(format!("step{}", i));
        if i > 0 {
            init = init.with_param("prev", BindableValue::bound(format!("{{{{step{}}}}}", i - 1)));
        }
        let node = doc.create_node_with(&mut ids, init);
        doc = doc.add_node(node, &page_id, "derivedState", None).unwrap();
    }

    for i in 0..elements {
        let init = if i % 2 == 0 {
            NodeInit::element("TextField").named(format!("field{}", i))
        } else {
            NodeInit::element("Text").with_prop(
                "content",
                BindableValue::bound(format!("Field says {{{{field{}.value}}}}", i - 1)),
            )
        };
        let node = doc.create_node_with(&mut ids, init);
        doc = doc.add_node(node, &stack_id, "children", None).unwrap();
    }

    (doc, page_id)
}

fn compile_small_page(c: &mut Criterion) {
    let (doc, page_id) = build_page(4, 2);
    let catalog = ComponentCatalog::builtin();
    let options = CompileOptions::default();

    c.bench_function("compile_small_page", |b| {
        b.iter(|| compile_page(black_box(&doc), &page_id, &catalog, &options))
    });
}

fn compile_large_page(c: &mut Criterion) {
    let (doc, page_id) = build_page(200, 50);
    let catalog = ComponentCatalog::builtin();
    let options = CompileOptions::default();

    c.bench_function("compile_large_page", |b| {
        b.iter(|| compile_page(black_box(&doc), &page_id, &catalog, &options))
    });
}

fn compile_large_page_editor_mode(c: &mut Criterion) {
    let (doc, page_id) = build_page(200, 50);
    let catalog = ComponentCatalog::builtin();
    let options = CompileOptions::editor();

    c.bench_function("compile_large_page_editor_mode", |b| {
        b.iter(|| compile_page(black_box(&doc), &page_id, &catalog, &options))
    });
}

criterion_group!(
    benches,
    compile_small_page,
    compile_large_page,
    compile_large_page_editor_mode
);
criterion_main!(benches);
