pub mod forest;
pub mod state;
pub mod tree;

pub use forest::{RandomForest, VoteCount};
pub use state::{Fitted, Unfitted};
pub use tree::{DecisionTree, TreeNode, TreeParams};

/// Prediction interface of a trained model.
///
/// Only implemented for `Fitted` models, so an untrained model cannot be asked
/// for a prediction.
pub trait InferenceModel {
    type InputSingle: ?Sized;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;
}
