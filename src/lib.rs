//! `confmat` provides the evaluation side of a classification or outlier
//! detection experiment: a running [`ConfusionMatrix`] that is filled batch
//! by batch during an evaluation loop, and the usual score-based summaries
//! (ROC-AUC, precision/recall at k, average precision, F1) as free
//! functions.
//!
//! The confusion matrix owns nothing but its counts. Derived metrics are
//! recomputed from the current counts on every call, so they can be read at
//! any point without invalidation logic, and partial matrices filled by
//! independent workers can be combined with
//! [`merge`](ConfusionMatrix::merge) before reading.
//!
//! ```
//! use ndarray::array;
//! use confmat::ConfusionMatrix;
//!
//! let mut cm = ConfusionMatrix::new(2);
//!
//! // one batch per evaluation step
//! cm.add(&array![0, 1, 1, 0], &array![0, 1, 0, 0])?;
//!
//! println!("{}", cm.report(None, 4)?);
//! # Ok::<(), confmat::error::Error>(())
//! ```

mod confusion;
pub mod error;
mod ranking;
mod weights;

pub mod prelude;

pub use confusion::ConfusionMatrix;
pub use ranking::{average_precision, f1, precision_at_k, recall_at_k, roc_auc};
pub use weights::class_weights;
