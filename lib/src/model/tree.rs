//! Weighted CART decision tree for binary classification.
//!
//! Nodes live in a flat vector; node `0` is the root. Splits send a sample
//! left when `value <= threshold`. Split quality is the decrease in weighted
//! Gini impurity, which is also accumulated per feature as the tree's
//! (mean-decrease-impurity) feature importance.

use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand::Rng;

/// Growth limits for a single tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of non-constant features examined per split.
    pub max_features: usize,
}

/// A node in the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    Leaf {
        class: u8,
        /// Weighted sample mass per class that reached this leaf.
        weights: [f64; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

impl TreeNode {
    fn leaf(weights: [f64; 2]) -> Self {
        TreeNode::Leaf {
            class: u8::from(weights[1] > weights[0]),
            weights,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// A fitted binary decision tree.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
    importances: Vec<f64>,
}

fn gini(weights: [f64; 2]) -> f64 {
    let total = weights[0] + weights[1];
    if total <= 0.0 {
        return 0.0;
    }
    let p0 = weights[0] / total;
    let p1 = weights[1] / total;
    1.0 - (p0 * p0 + p1 * p1)
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// `parent_mass * parent_gini - left_mass * left_gini - right_mass * right_gini`
    decrease: f64,
}

struct TreeBuilder<'a, R> {
    x: ArrayView2<'a, f64>,
    y: &'a [u8],
    weights: &'a [f64],
    params: &'a TreeParams,
    rng: &'a mut R,
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
}

impl<R: Rng> TreeBuilder<'_, R> {
    fn class_mass(&self, rows: &[usize]) -> [f64; 2] {
        rows.iter().fold([0.0; 2], |mut acc, &r| {
            acc[usize::from(self.y[r])] += self.weights[r];
            acc
        })
    }

    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let mass = self.class_mass(&rows);
        let impurity = gini(mass);
        let idx = self.nodes.len();
        self.nodes.push(TreeNode::leaf(mass));

        let depth_exhausted = self.params.max_depth.is_some_and(|d| depth >= d);
        if impurity <= f64::EPSILON
            || depth_exhausted
            || rows.len() < self.params.min_samples_split
            || rows.len() / 2 < self.params.min_samples_leaf
        {
            return idx;
        }

        let Some(split) = self.best_split(&rows, mass, impurity) else {
            return idx;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.x[[r, split.feature]] <= split.threshold);

        self.importances[split.feature] += split.decrease;
        let left = self.build(left_rows, depth + 1);
        let right = self.build(right_rows, depth + 1);
        self.nodes[idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    fn best_split(&mut self, rows: &[usize], parent: [f64; 2], impurity: f64) -> Option<SplitCandidate> {
        let parent_mass = parent[0] + parent[1];
        let min_leaf = self.params.min_samples_leaf;

        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut examined = 0;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(rows.len());

        for feature in features {
            if examined >= self.params.max_features {
                break;
            }

            sorted.clear();
            sorted.extend(rows.iter().map(|&r| (self.x[[r, feature]], r)));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            let (lo, hi) = (sorted[0].0, sorted[sorted.len() - 1].0);
            if lo >= hi {
                // Constant here; does not count towards max_features.
                continue;
            }
            examined += 1;

            let mut left = [0.0; 2];
            for i in 0..sorted.len() - 1 {
                let (value, row) = sorted[i];
                left[usize::from(self.y[row])] += self.weights[row];

                let next = sorted[i + 1].0;
                if next <= value {
                    continue;
                }
                let n_left = i + 1;
                if n_left < min_leaf || sorted.len() - n_left < min_leaf {
                    continue;
                }

                let right = [(parent[0] - left[0]).max(0.0), (parent[1] - left[1]).max(0.0)];
                let left_mass = left[0] + left[1];
                let right_mass = right[0] + right[1];
                let decrease = parent_mass * impurity
                    - left_mass * gini(left)
                    - right_mass * gini(right);

                if best.as_ref().map_or(true, |b| decrease > b.decrease) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next || !threshold.is_finite() {
                        threshold = value;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        decrease,
                    });
                }
            }
        }

        best.filter(|b| b.decrease > 1e-12)
    }
}

impl DecisionTree {
    /// Grow a tree on `rows` of `x`.
    ///
    /// `weights[r]` is the mass of row `r` (class weight times bootstrap
    /// multiplicity); rows not listed in `rows` are ignored. `y` holds 0/1.
    pub fn fit<R: Rng>(
        x: ArrayView2<'_, f64>,
        y: &[u8],
        weights: &[f64],
        rows: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> DecisionTree {
        let n_features = x.ncols();
        let mut builder = TreeBuilder {
            x: x.reborrow(),
            y,
            weights,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        builder.build(rows, 0);

        let mut importances = builder.importances;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        DecisionTree {
            nodes: builder.nodes,
            n_features,
            importances,
        }
    }

    /// Classify a single sample.
    pub fn predict(&self, features: &[f64]) -> u8 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { class, .. } => return *class,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Impurity decrease per feature, normalised to sum to 1 (all zeros for a stump).
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    /// Longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.node_depth(0)
    }

    fn node_depth(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.node_depth(*left).max(self.node_depth(*right))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(max_features: usize) -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features,
        }
    }

    fn fit(x: &Array2<f64>, y: &[u8], weights: &[f64], params: &TreeParams) -> DecisionTree {
        let mut rng = StdRng::seed_from_u64(0);
        DecisionTree::fit(x.view(), y, weights, (0..y.len()).collect(), params, &mut rng)
    }

    #[test]
    fn test_single_threshold() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let tree = fit(&x, &[0, 0, 1, 1], &[1.0; 4], &params(1));

        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.depth(), 1);
        assert!(matches!(
            tree.nodes()[0],
            TreeNode::Split { feature: 0, threshold, .. } if (threshold - 1.5).abs() < 1e-12
        ));
        assert_eq!(tree.predict(&[0.4]), 0);
        assert_eq!(tree.predict(&[1.5]), 0); // <= threshold goes left
        assert_eq!(tree.predict(&[2.7]), 1);
    }

    #[test]
    fn test_uninformative_feature_gets_no_importance() {
        // Feature 1 is constant; only feature 0 separates the classes.
        let x = array![[0.0, 5.0], [1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let tree = fit(&x, &[0, 0, 1, 1], &[1.0; 4], &params(2));
        assert_eq!(tree.feature_importances(), &[1.0, 0.0]);
    }

    #[test]
    fn test_weights_decide_leaf_class() {
        let x = array![[0.0], [0.0], [0.0], [0.0]];
        let y = [0, 0, 0, 1];

        let uniform = fit(&x, &y, &[1.0; 4], &params(1));
        assert_eq!(uniform.n_nodes(), 1);
        assert_eq!(uniform.predict(&[0.0]), 0);

        let weighted = fit(&x, &y, &[1.0, 1.0, 1.0, 5.0], &params(1));
        assert_eq!(weighted.predict(&[0.0]), 1);
    }

    #[test]
    fn test_rows_outside_sample_are_ignored() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = [0, 1, 0, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(x.view(), &y, &[1.0; 4], vec![0, 2], &params(1), &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(&[3.0]), 0);
    }

    #[test]
    fn test_max_depth_and_min_leaf() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = [0, 1, 0, 1, 0, 1];

        let stump = fit(
            &x,
            &y,
            &[1.0; 6],
            &TreeParams {
                max_depth: Some(0),
                ..params(1)
            },
        );
        assert_eq!(stump.n_nodes(), 1);

        let shallow = fit(
            &x,
            &y,
            &[1.0; 6],
            &TreeParams {
                max_depth: Some(2),
                ..params(1)
            },
        );
        assert!(shallow.depth() <= 2);

        let full = fit(&x, &y, &[1.0; 6], &params(1));
        for (row, &label) in y.iter().enumerate() {
            assert_eq!(full.predict(&[x[[row, 0]]]), label);
        }

        let min_leaf = fit(
            &x,
            &y,
            &[1.0; 6],
            &TreeParams {
                min_samples_leaf: 3,
                ..params(1)
            },
        );
        for node in min_leaf.nodes() {
            if let TreeNode::Leaf { weights, .. } = node {
                assert!(weights[0] + weights[1] >= 3.0);
            }
        }
    }

    #[test]
    fn test_oversized_min_leaf_keeps_root_leaf() {
        let x = array![[0.0], [1.0], [2.0]];
        let tree = fit(
            &x,
            &[0, 1, 1],
            &[1.0; 3],
            &TreeParams {
                min_samples_leaf: usize::MAX,
                ..params(1)
            },
        );
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(&[0.0]), 1);
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini([0.0, 0.0]), 0.0);
        assert_eq!(gini([4.0, 0.0]), 0.0);
        assert!((gini([2.0, 2.0]) - 0.5).abs() < 1e-12);
    }
}
