use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `0..n` with `seed` and cut it into train and test index sets.
///
/// The train set gets `round(n * train_ratio)` indices; `train_ratio` is
/// clamped to `[0, 1]`. Not stratified.
pub fn train_test_indices(n: usize, train_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_train = ((n as f64) * train_ratio.clamp(0.0, 1.0)).round() as usize;
    let test = indices.split_off(n_train.min(n));
    (indices, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes_and_disjointness() {
        let (train, test) = train_test_indices(10, 0.8, 1);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_seeded() {
        assert_eq!(train_test_indices(50, 0.7, 9), train_test_indices(50, 0.7, 9));
        assert_ne!(train_test_indices(50, 0.7, 9), train_test_indices(50, 0.7, 10));
    }

    #[test]
    fn test_ratio_is_clamped() {
        assert_eq!(train_test_indices(4, 1.5, 0).0.len(), 4);
        assert_eq!(train_test_indices(4, -1.0, 0).1.len(), 4);
    }
}
