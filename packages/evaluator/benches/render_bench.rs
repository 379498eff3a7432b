use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use storefront_evaluator::{DataContext, Product, Renderer};
use storefront_schema::LayoutDocument;

fn catalog(count: usize) -> DataContext {
    let products = (0..count)
        .map(|i| Product {
            id: format!("p{i}"),
            name: format!("Product {i}"),
            price: 5.0 + i as f64,
            tags: vec![if i % 3 == 0 { "summer" } else { "basics" }.to_string()],
            is_featured: i % 2 == 0,
            on_sale: i % 4 == 0,
            ..Product::default()
        })
        .collect();

    DataContext::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()).with_products(products)
}

fn render_home_page(c: &mut Criterion) {
    let doc = LayoutDocument::from_value(
        "bench",
        json!({ "sections": [
            { "id": "s1", "type": "announcement-bar", "settings": { "text": "Free shipping" } },
            { "id": "s2", "type": "header" },
            { "id": "s3", "type": "hero", "settings": { "heading": "Summer drop" } },
            { "id": "s4", "type": "product-grid", "settings": { "filterType": "featured" } },
            { "id": "s5", "type": "flash-sale" },
            { "id": "s6", "type": "tags-products", "settings": { "tagName": "summer" } },
            { "id": "s7", "type": "newsletter" },
            { "id": "s8", "type": "footer" }
        ] }),
    )
    .unwrap();
    let ctx = catalog(200);
    let renderer = Renderer::builtin();

    c.bench_function("render_home_page", |b| b.iter(|| renderer.render(black_box(&doc), &ctx)));
}

fn render_many_sections(c: &mut Criterion) {
    let sections: Vec<_> = (0..50)
        .map(|i| json!({ "id": format!("s{i}"), "type": "product-grid", "settings": { "productsToShow": 12 } }))
        .collect();
    let doc = LayoutDocument::from_value("bench", json!({ "sections": sections })).unwrap();
    let ctx = catalog(500);
    let renderer = Renderer::builtin();

    c.bench_function("render_50_product_grids", |b| b.iter(|| renderer.render(black_box(&doc), &ctx)));
}

fn render_with_display_order(c: &mut Criterion) {
    let doc = LayoutDocument::from_value(
        "bench",
        json!({ "sections": [{ "id": "grid", "type": "product-grid", "settings": { "productsToShow": 24 } }] }),
    )
    .unwrap();
    let mut ctx = catalog(1000);
    ctx.product_display_order = (0..1000).rev().step_by(7).map(|i| format!("p{i}")).collect();
    let renderer = Renderer::builtin();

    c.bench_function("render_with_display_order_1000", |b| {
        b.iter(|| renderer.render(black_box(&doc), &ctx))
    });
}

criterion_group!(benches, render_home_page, render_many_sections, render_with_display_order);
criterion_main!(benches);
