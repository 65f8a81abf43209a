use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxroute::{
    generation::utils, Algorithm, CityGenerator, GenerationConfig, Generator, Heuristic,
    SearchConfig, SearchEngine, VoxelGrid,
};

fn generated_city(config: &GenerationConfig) -> VoxelGrid {
    let mut rng = utils::create_rng(config);
    CityGenerator::new()
        .generate(config, &mut rng)
        .expect("benchmark city should generate")
}

fn bench_algorithms(c: &mut Criterion) {
    let grid = generated_city(&GenerationConfig::for_dense_city(12345));
    let mut group = c.benchmark_group("dense_city");

    for heuristic in [Heuristic::Manhattan, Heuristic::LevelChebyshev] {
        let engine = SearchEngine::with_config(&grid, SearchConfig::with_heuristic(heuristic));
        for algorithm in Algorithm::ALL {
            if algorithm == Algorithm::Dijkstra && heuristic != Heuristic::Manhattan {
                continue;
            }
            let id = BenchmarkId::new(algorithm.label(), format!("{:?}", heuristic));
            group.bench_function(id, |b| {
                b.iter(|| engine.run_endpoints(black_box(algorithm)).expect("search"))
            });
        }
    }
    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let config = GenerationConfig::for_dense_city(7);
    c.bench_function("generate_dense_city", |b| {
        b.iter(|| generated_city(black_box(&config)))
    });
}

criterion_group!(benches, bench_algorithms, bench_generation);
criterion_main!(benches);
