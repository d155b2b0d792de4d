//! Measures the identifier validators and the dashboard filters over a
//! request table large enough to matter.

#![allow(missing_docs)]

use std::{hint::black_box, path::Path};

use cidade::{
    Fixtures,
    domain::{
        collection::{SortDirection, group_by, sort_by},
        filter::{RequestQuery, Search},
        format::format_cpf,
        model::ServiceRequest,
        password,
    },
    is_valid_cnpj, is_valid_cpf,
};
use criterion::{Criterion, criterion_group, criterion_main};

/// Repeats the bundled sample requests until there are `count` of them.
fn requests(count: usize) -> Vec<ServiceRequest> {
    let fixtures = Fixtures::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")).unwrap();
    fixtures
        .requests
        .iter()
        .cycle()
        .take(count)
        .enumerate()
        .map(|(i, request)| ServiceRequest {
            id: i.to_string(),
            protocol: format!("SOL-2024-{i:06}"),
            ..request.clone()
        })
        .collect()
}

fn validators(c: &mut Criterion) {
    c.bench_function("is_valid_cpf", |b| {
        b.iter(|| is_valid_cpf(black_box("111.444.777-35")));
    });
    c.bench_function("is_valid_cnpj", |b| {
        b.iter(|| is_valid_cnpj(black_box("11.222.333/0001-81")));
    });
    c.bench_function("format_cpf", |b| {
        b.iter(|| format_cpf(black_box("11144477735")));
    });
    c.bench_function("password evaluate", |b| {
        b.iter(|| password::evaluate(black_box("Abcdef1!")));
    });
}

fn collections(c: &mut Criterion) {
    let requests = requests(10_000);
    let query = RequestQuery {
        search: Search::new("ilumin"),
        ..RequestQuery::default()
    };

    c.bench_function("filter 10k requests", |b| {
        b.iter(|| query.apply(black_box(&requests)).len());
    });
    c.bench_function("group 10k requests by status", |b| {
        b.iter(|| group_by(black_box(&requests), |r| r.status).len());
    });
    c.bench_function("sort 10k requests by protocol", |b| {
        b.iter(|| sort_by(black_box(&requests), |r| r.protocol.clone(), SortDirection::Desc).len());
    });
}

criterion_group!(benches, validators, collections);
criterion_main!(benches);
