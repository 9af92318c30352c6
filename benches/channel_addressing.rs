use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use tenantflow::domain::models::channel::{chat_direct, extract_id, is_valid_channel, matches_pattern};
use tenantflow::services::{CachePolicyRegistry, MessageCodec};

fn bench_channels(c: &mut Criterion) {
    c.bench_function("chat_direct", |b| {
        b.iter(|| chat_direct(black_box("user-8841"), black_box("user-1023")));
    });

    c.bench_function("is_valid_channel", |b| {
        b.iter(|| is_valid_channel(black_box("maintenance:status:req-7781")));
    });

    c.bench_function("extract_id", |b| {
        b.iter(|| extract_id(black_box("notifications:user:42"), black_box("notifications:user")));
    });

    c.bench_function("matches_pattern", |b| {
        b.iter(|| matches_pattern(black_box("notifications:user:*"), black_box("notifications:user:42")));
    });
}

fn bench_registry(c: &mut Criterion) {
    let registry = CachePolicyRegistry::with_builtin_defaults();

    c.bench_function("entity_config_mixed_case", |b| {
        b.iter(|| registry.entity_config(black_box("Maintenance")));
    });

    c.bench_function("entities_to_warm", |b| {
        b.iter(|| registry.entities_to_warm().len());
    });
}

fn bench_envelope(c: &mut Criterion) {
    let codec = MessageCodec::default();
    let payload = json!({"lease_id": "l-1", "tenant_id": "t-9", "amount_cents": 125_000});

    c.bench_function("create_envelope", |b| {
        b.iter(|| codec.create_envelope("lease.created", black_box(payload.clone()), None));
    });

    let wire = codec
        .create_envelope("lease.created", payload, None)
        .unwrap_or_default();
    c.bench_function("parse_envelope", |b| {
        b.iter(|| codec.parse_envelope(black_box(&wire)));
    });
}

criterion_group!(benches, bench_channels, bench_registry, bench_envelope);
criterion_main!(benches);
