use potability::dataset::{DatasetLoader, RawDataset};
use potability::feature::Feature;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Share of blank cells in the columns that are incomplete in the reference table.
const MISSING_RATE: f64 = 0.08;

/// Share of labels flipped at random.
const LABEL_NOISE: f64 = 0.1;

/// Generate a water-quality table with the reference dataset's header.
///
/// Each measurement is drawn uniformly from its documented range. The label
/// is mostly determined by pH, sulfate and solids, with some label noise.
/// `ph`, `Sulfate` and `Trihalomethanes` have blank cells, as in the real data.
/// The same `(n_rows, seed)` always gives the same text.
///
/// # Example
///
/// ```
/// use benchmarks::data::synthetic_csv;
///
/// let csv = synthetic_csv(5, 1);
/// assert_eq!(csv.lines().count(), 6);
/// assert!(csv.starts_with("ph,Hardness,"));
/// ```
pub fn synthetic_csv(n_rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::new();

    let header: Vec<&str> = Feature::ALL.iter().map(|f| f.column_name()).collect();
    out.push_str(&format!("{},Potability\n", header.join(",")));

    for _ in 0..n_rows {
        let values: Vec<f64> = Feature::ALL
            .iter()
            .map(|f| {
                let range = f.range();
                rng.gen_range(*range.start()..=*range.end())
            })
            .collect();

        let ph = values[0];
        let sulfate = values[4];
        let solids = values[2];
        let mut potable = (6.5..=8.5).contains(&ph) && sulfate < 400.0 && solids < 40_000.0;
        if rng.gen_bool(LABEL_NOISE) {
            potable = !potable;
        }

        let cells: Vec<String> = Feature::ALL
            .iter()
            .zip(&values)
            .map(|(f, v)| {
                let may_be_missing = matches!(
                    f,
                    Feature::Ph | Feature::Sulfate | Feature::Trihalomethanes
                );
                if may_be_missing && rng.gen_bool(MISSING_RATE) {
                    String::new()
                } else {
                    format!("{v:.4}")
                }
            })
            .collect();
        out.push_str(&format!("{},{}\n", cells.join(","), u8::from(potable)));
    }
    out
}

/// Read the table at `path` without imputing it, or generate `n_rows`
/// synthetic rows when no path is given.
pub fn load_or_synthesize(
    path: Option<&Path>,
    n_rows: usize,
    seed: u64,
) -> potability::Result<RawDataset> {
    let loader = DatasetLoader::new();
    match path {
        Some(p) => loader.read_raw(p),
        None => loader.read_raw_from_bytes(synthetic_csv(n_rows, seed).as_bytes()),
    }
}
