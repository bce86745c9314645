use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use nempi_network::{enumerate_moves, NetworkModel};

fn genes(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{i}")).collect()
}

fn bench_closure(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let net = NetworkModel::random(&genes(50), 0.1, &mut rng);

    c.bench_function("closure_50_nodes", |b| {
        b.iter(|| net.closure());
    });
}

fn bench_move_application(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let net = NetworkModel::random(&genes(30), 0.1, &mut rng);
    let moves = enumerate_moves(&net);

    c.bench_function("apply_all_moves_30_nodes", |b| {
        b.iter(|| {
            moves
                .iter()
                .filter(|m| net.apply(m).is_ok())
                .count()
        });
    });
}

criterion_group!(benches, bench_closure, bench_move_application);
criterion_main!(benches);
