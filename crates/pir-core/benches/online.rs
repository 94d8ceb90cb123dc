use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pir_core::{
    build_queries, compute_answer, compute_hint, decode, diagonal_indices, generate_database,
    generate_secret_vector, indices_to_coordinates, QueryParams, SessionRng,
};

fn bench_online(c: &mut Criterion) {
    let mut group = c.benchmark_group("online");
    let params = QueryParams::new(3u32, 1000u32).unwrap();

    for n in [16usize, 64, 128] {
        let mut rng = SessionRng::from_seed(n as u64);
        let db = generate_database(n, 64, rng.secure()).unwrap();
        let vector = generate_secret_vector(n, rng.fast());
        let hint = compute_hint(&db, &vector).unwrap();
        let coords = indices_to_coordinates(&diagonal_indices(n), n).unwrap();
        let queries = build_queries(&coords, &vector, &params).unwrap();
        let answer = compute_answer(&db, &queries).unwrap();

        group.bench_with_input(BenchmarkId::new("hint", n), &n, |b, _| {
            b.iter(|| compute_hint(black_box(&db), black_box(&vector)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("answer", n), &n, |b, _| {
            b.iter(|| compute_answer(black_box(&db), black_box(&queries)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &n, |b, _| {
            b.iter(|| decode(black_box(&answer), black_box(&hint), &params).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_online);
criterion_main!(benches);
