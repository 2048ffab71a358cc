use criterion::{black_box, criterion_group, criterion_main, Criterion};
use film_overlay::diff::compare;

fn bench_compare(c: &mut Criterion) {
    let original: String = (0..10_000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let mut attempt = original.clone();
    attempt.replace_range(5_000..5_001, "#");
    c.bench_function("compare_10k", |b| {
        b.iter(|| compare(black_box(&original), black_box(&attempt)))
    });
}

criterion_group!(benches, bench_compare);
criterion_main!(benches);
