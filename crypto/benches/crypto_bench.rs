use criterion::{black_box, criterion_group, criterion_main, Criterion};
use idseal_crypto::{canonical_payload, BlockPreimage};
use idseal_types::{BlockHash, Timestamp};
use serde_json::json;

fn sha256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("sha256_256B", |b| {
        b.iter(|| idseal_crypto::sha256(black_box(&data)))
    });
}

fn canonical_payload_bench(c: &mut Criterion) {
    let template: Vec<f64> = (0..128).map(|i| i as f64 / 128.0).collect();
    let payload = json!({
        "name": "Asha Rao",
        "key": "ABCDE1234F",
        "secondary_id_hash": "ab".repeat(32),
        "biometric_template": template,
        "status": "VERIFIED_ORIGINAL",
    });

    c.bench_function("canonical_payload_128d", |b| {
        b.iter(|| canonical_payload(black_box(&payload)))
    });
}

fn preimage_nonce_bench(c: &mut Criterion) {
    let preimage = BlockPreimage::new(7, &BlockHash::ZERO, Timestamp::from_millis(1), &json!({"k": 1}));

    c.bench_function("preimage_hash_with_nonce", |b| {
        b.iter(|| preimage.hash_with_nonce(black_box(12345)))
    });
}

criterion_group!(
    benches,
    sha256_bench,
    canonical_payload_bench,
    preimage_nonce_bench
);
criterion_main!(benches);
