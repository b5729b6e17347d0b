//! Benchmarks for output normalization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crewflow::normalize::parse_json_safely;
use crewflow::report::parse_risk_items;

fn normalize_benchmark(c: &mut Criterion) {
    let fenced = format!(
        "Here is the structured output:\n```json\n{}\n```\nLet me know if you need more.",
        r#"{"primary_symptoms": ["headache", "nausea"], "duration": "3 days", "severity": "moderate"}"#
    );
    let prose = "The patient describes intermittent headaches. ".repeat(40);
    let risks = (1..=20)
        .map(|n| format!("{n}. [HIGH RISK] - Clause {n}. Risk: one-sided. Impact: exposure."))
        .collect::<Vec<_>>()
        .join("\n");

    c.bench_function("parse_json_safely/fenced", |b| {
        b.iter(|| parse_json_safely(black_box(&fenced)));
    });
    c.bench_function("parse_json_safely/plain_text", |b| {
        b.iter(|| parse_json_safely(black_box(&prose)));
    });
    c.bench_function("parse_risk_items/20", |b| {
        b.iter(|| parse_risk_items(black_box(&risks)));
    });
}

criterion_group!(benches, normalize_benchmark);
criterion_main!(benches);
