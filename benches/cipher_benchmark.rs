//! Throughput benchmark for the per-secret encryption path.
//!
//! Measures the full derive-then-encrypt/decrypt pipeline the way the
//! routing layer drives it: one HKDF derivation plus one AES-256-GCM
//! operation per secret.
//!
//! Run with: `cargo bench --bench cipher_benchmark`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use securevault_core::{decrypt, derive_user_key, encrypt, generate_master_key};

fn bench_encrypt_sizes(c: &mut Criterion) {
    let master = generate_master_key().unwrap();
    let key = derive_user_key(&master, "bench-user").unwrap();

    let mut group = c.benchmark_group("encrypt");
    for size in [64usize, 1024, 10 * 1024] {
        let plaintext = vec![0u8; size];
        group.bench_function(format!("{}b", size), |b| {
            b.iter(|| encrypt(black_box(&key), black_box(&plaintext)).unwrap());
        });
    }
    group.finish();
}

fn bench_derive_and_roundtrip(c: &mut Criterion) {
    let master = generate_master_key().unwrap();
    let plaintext = vec![0u8; 1024];

    // The realistic request path: the derived key is not cached.
    c.bench_function("derive_encrypt_decrypt_1kb", |b| {
        b.iter(|| {
            let key = derive_user_key(black_box(&master), black_box("bench-user")).unwrap();
            let sealed = encrypt(&key, black_box(&plaintext)).unwrap();
            decrypt(&key, &sealed).unwrap()
        });
    });
}

criterion_group!(benches, bench_encrypt_sizes, bench_derive_and_roundtrip);
criterion_main!(benches);
