use benchmarks::synthetic_csv;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use potability::dataset::{DatasetLoader, TrainingDataset};
use potability::prediction::{PredictionService, WaterSample};
use potability::trainer::{ForestConfig, TrainedModel, TrainingPipeline};

fn dataset(rows: usize) -> TrainingDataset {
    DatasetLoader::new()
        .load_from_bytes(synthetic_csv(rows, 42).as_bytes())
        .expect("synthetic table loads")
}

fn train(dataset: &TrainingDataset, n_trees: usize) -> TrainedModel {
    TrainingPipeline::new(ForestConfig::builder().n_trees(n_trees).build())
        .train(dataset)
        .expect("training succeeds")
}

fn bench_train_forest(c: &mut Criterion) {
    let data = dataset(1000);
    let mut group = c.benchmark_group("train_forest");
    group.sample_size(10);

    for n_trees in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n_trees), &n_trees, |b, &n| {
            b.iter(|| black_box(train(&data, n)));
        });
    }
    group.finish();
}

fn bench_predict_single(c: &mut Criterion) {
    let model = train(&dataset(1000), 100);
    let sample = WaterSample {
        ph: 7.08,
        hardness: 196.37,
        solids: 22014.09,
        chloramines: 7.12,
        sulfate: 333.78,
        conductivity: 426.21,
        organic_carbon: 14.28,
        trihalomethanes: 66.40,
        turbidity: 3.97,
    };

    c.bench_function("predict_single", |b| {
        b.iter(|| {
            let prediction = PredictionService::predict(&model, black_box(&sample));
            black_box(prediction)
        });
    });
}

fn bench_load_and_impute(c: &mut Criterion) {
    let csv = synthetic_csv(3000, 7);
    c.bench_function("load_and_impute_3000_rows", |b| {
        b.iter(|| black_box(DatasetLoader::new().load_from_bytes(black_box(csv.as_bytes()))));
    });
}

criterion_group!(
    benches,
    bench_train_forest,
    bench_predict_single,
    bench_load_and_impute
);
criterion_main!(benches);
