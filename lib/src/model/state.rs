/// Marker for an ensemble that has **not been trained yet**.
///
/// `RandomForest<Unfitted>` only carries its configuration; prediction
/// methods are not available until `fit` turns it into `RandomForest<Fitted>`.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// Marker for a **trained** ensemble.
///
/// A fitted forest holds only what inference needs: the trees, the number of
/// features and the feature importances.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
