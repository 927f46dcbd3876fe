use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn master_key_bench(c: &mut Criterion) {
    let seed = [0xABu8; 64];

    c.bench_function("slip10_master_key", |b| {
        b.iter(|| lodestar_crypto::master_key(black_box(&seed)))
    });
}

fn account_path_bench(c: &mut Criterion) {
    let master = lodestar_crypto::master_key(&[0u8; 64]);

    c.bench_function("slip10_child_m_44_148_0", |b| {
        b.iter(|| lodestar_crypto::child_key(black_box("m/44'/148'/0'"), &master))
    });
}

fn derive_account_bench(c: &mut Criterion) {
    let seed = [7u8; 64];

    c.bench_function("derive_account_keypair", |b| {
        b.iter(|| lodestar_crypto::derive_account(black_box(&seed), 0))
    });
}

fn pin_digest_bench(c: &mut Criterion) {
    c.bench_function("pin_digest_2048_rounds", |b| {
        b.iter(|| lodestar_crypto::pin_digest(black_box("1234"), "0123456789abcdef"))
    });
}

fn legacy_cbc_bench(c: &mut Criterion) {
    let key = [0x11u8; 32];
    let payload = vec![0xCDu8; 1024];

    c.bench_function("legacy_cbc_encrypt_1KB", |b| {
        b.iter(|| {
            lodestar_crypto::encrypt(
                lodestar_crypto::CipherScheme::LegacyCbc,
                &key,
                black_box(&payload),
                &lodestar_crypto::OsEntropy,
            )
        })
    });
}

criterion_group!(
    benches,
    master_key_bench,
    account_path_bench,
    derive_account_bench,
    pin_digest_bench,
    legacy_cbc_bench,
);
criterion_main!(benches);
