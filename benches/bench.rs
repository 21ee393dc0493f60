// Criterion benchmarks for the Smart Catalog search pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use smart_catalog::core::{build_search_prompt, merge_recommendations};
use smart_catalog::models::{Product, RecommendationEntry, RecommendationResponse};
use chrono::Utc;

fn create_product(id: usize) -> Product {
    Product {
        id: id as i32,
        name: format!("Product {}", id),
        description: format!("Description for product {}", id),
        price: 10.0 + (id % 100) as f64,
        image_url: Some(format!("https://img.example/{}.png", id)),
        category_id: (id % 5) as i32 + 1,
        attributes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        category: None,
    }
}

fn create_catalog(size: usize) -> Vec<Product> {
    (1..=size).map(create_product).collect()
}

fn create_response(catalog_size: usize, entries: usize) -> RecommendationResponse {
    RecommendationResponse {
        recommendations: (0..entries)
            .map(|i| RecommendationEntry {
                product_id: ((i % catalog_size) + 1).to_string(),
                relevance_score: 1.0 - (i as f64 / entries as f64),
                explanation: format!("Recommendation {}", i),
            })
            .collect(),
    }
}

fn bench_prompt_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt_construction");

    for catalog_size in [10, 50, 100, 500, 1000].iter() {
        let catalog = create_catalog(*catalog_size);

        group.bench_with_input(
            BenchmarkId::new("build_search_prompt", catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| {
                    build_search_prompt(
                        black_box("cheap laptop for school"),
                        black_box(&catalog),
                    )
                    .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_recommendation_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendation_join");

    for catalog_size in [100, 500, 1000].iter() {
        let catalog = create_catalog(*catalog_size);
        let response = create_response(*catalog_size, 20);

        group.bench_with_input(
            BenchmarkId::new("merge_recommendations", catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| {
                    merge_recommendations(black_box(&catalog), black_box(response.clone()))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_prompt_construction, bench_recommendation_join);
criterion_main!(benches);
