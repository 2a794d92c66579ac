//! Running confusion matrix for multi-class evaluation
//!
//! The matrix is updated batch-by-batch with integer class predictions and
//! ground truth labels; all derived scores (accuracy, precision, recall,
//! f1-score, IoU) are computed fresh from the current counts, so they can be
//! read at any point of an evaluation loop.
use std::fmt;

use ndarray::prelude::*;
use ndarray::Data;

use crate::error::{Error, Result};

/// Default floor for denominators in derived metrics.
const EPS: f64 = 1e-6;

/// Confusion matrix accumulator over a fixed number of classes
///
/// Rows correspond to ground truth and columns to predictions, so
/// `counts[(t, p)]` holds the number of samples of class `t` that were
/// predicted as `p`. The diagonal entries are correct predictions.
///
/// Degenerate denominators (e.g. a class without any samples) are clamped at
/// a small epsilon instead of shifted by it, so that metrics for an empty
/// class come out as exactly zero rather than as a tiny artifact.
///
/// ```
/// use ndarray::array;
/// use confmat::ConfusionMatrix;
///
/// let mut cm = ConfusionMatrix::new(2);
/// cm.add(&array![0, 1, 1, 0], &array![0, 1, 0, 0]).unwrap();
///
/// assert_eq!(cm.global_accuracy(), 0.75);
/// ```
pub struct ConfusionMatrix {
    counts: Array2<f64>,
    eps: f64,
}

impl ConfusionMatrix {
    /// Create an empty matrix for `size` classes
    ///
    /// Panics for `size == 0`, which is a programming error rather than a
    /// recoverable condition.
    pub fn new(size: usize) -> ConfusionMatrix {
        assert!(size > 0, "a confusion matrix needs at least one class");

        ConfusionMatrix {
            counts: Array2::zeros((size, size)),
            eps: EPS,
        }
    }

    /// Override the denominator floor used in derived metrics
    pub fn with_epsilon(mut self, eps: f64) -> ConfusionMatrix {
        self.eps = eps;
        self
    }

    /// Number of classes
    pub fn size(&self) -> usize {
        self.counts.nrows()
    }

    /// The raw count matrix, rows are ground truth and columns predictions
    pub fn counts(&self) -> ArrayView2<f64> {
        self.counts.view()
    }

    /// Total number of samples added since the last reset
    pub fn total(&self) -> f64 {
        self.counts.sum()
    }

    /// Number of ground truth samples per class
    pub fn support(&self) -> Array1<f64> {
        self.counts.sum_axis(Axis(1))
    }

    /// Drop all counts, returning the matrix to its initial state
    pub fn reset(&mut self) {
        self.counts.fill(0.0);
    }

    /// Accumulate one batch of predictions against ground truth labels
    ///
    /// Both sequences must have the same length and contain class indices in
    /// `[0, size)`; anything else is rejected before any count is touched, so
    /// a failed call leaves the matrix unchanged. An empty batch is a no-op.
    pub fn add<C, D>(
        &mut self,
        predictions: &ArrayBase<C, Ix1>,
        labels: &ArrayBase<D, Ix1>,
    ) -> Result<()>
    where
        C: Data<Elem = usize>,
        D: Data<Elem = usize>,
    {
        if predictions.len() != labels.len() {
            return Err(Error::LengthMismatch(predictions.len(), labels.len()));
        }

        let size = self.size();
        for &index in predictions.iter().chain(labels.iter()) {
            if index >= size {
                return Err(Error::ClassOutOfRange {
                    index,
                    classes: size,
                });
            }
        }

        for (&pred, &label) in predictions.iter().zip(labels.iter()) {
            self.counts[(label, pred)] += 1.0;
        }

        Ok(())
    }

    /// Fold the counts of another matrix of the same size into this one
    ///
    /// Partial matrices filled by independent workers can be combined this
    /// way; addition is commutative and associative, so the merge order does
    /// not matter.
    pub fn merge(&mut self, other: &ConfusionMatrix) -> Result<()> {
        if self.size() != other.size() {
            return Err(Error::SizeMismatch(self.size(), other.size()));
        }

        self.counts += &other.counts;

        Ok(())
    }

    /// Intersection-over-union for every class
    ///
    /// The union counts every sample that was of class `c` or predicted as
    /// `c`, with the correctly predicted ones counted once.
    pub fn class_iou(&self) -> Array1<f64> {
        let diag = self.counts.diag();
        let union = &self.counts.sum_axis(Axis(0)) + &self.counts.sum_axis(Axis(1)) - &diag;

        &diag / &self.clamp(union)
    }

    /// Mean intersection-over-union over all classes
    pub fn iou(&self) -> f64 {
        self.class_iou().mean().unwrap()
    }

    /// Fraction of all samples that were predicted correctly
    pub fn global_accuracy(&self) -> f64 {
        self.counts.diag().sum() / self.total().max(self.eps)
    }

    /// Per-class accuracy, the fraction of each class that was recovered
    ///
    /// This is the same quantity as [`recall`](ConfusionMatrix::recall).
    pub fn class_accuracy(&self) -> Array1<f64> {
        &self.counts.diag() / &self.clamp(self.support())
    }

    /// Unweighted mean of the per-class accuracies
    pub fn average_accuracy(&self) -> f64 {
        self.class_accuracy().mean().unwrap()
    }

    /// Precision for every class
    pub fn precision(&self) -> Array1<f64> {
        &self.counts.diag() / &self.clamp(self.counts.sum_axis(Axis(0)))
    }

    /// Recall for every class
    pub fn recall(&self) -> Array1<f64> {
        &self.counts.diag() / &self.clamp(self.support())
    }

    /// F1 score for every class
    pub fn f1_score(&self) -> Array1<f64> {
        let precision = self.precision();
        let recall = self.recall();
        let denom = self.clamp(&precision + &recall);

        2.0 * (&precision * &recall) / denom
    }

    /// Count matrix with every row normalized by its class support
    pub fn per_class(&self) -> Array2<f64> {
        let support = self.support().insert_axis(Axis(1)) + self.eps;

        &self.counts / &support
    }

    /// Render a classification report
    ///
    /// One row per class with columns `precision`, `recall`, `f1-score` and
    /// `support`, followed by the overall accuracy. Class names default to
    /// `Class 0`, `Class 1`, ... when none are given; a name list of the
    /// wrong length is rejected. Floats are formatted with `digits`
    /// fractional digits.
    pub fn report(&self, class_names: Option<&[&str]>, digits: usize) -> Result<String> {
        let names = match class_names {
            Some(names) => {
                if names.len() != self.size() {
                    return Err(Error::ClassNames {
                        expected: self.size(),
                        found: names.len(),
                    });
                }

                names.iter().map(|name| name.to_string()).collect::<Vec<_>>()
            }
            None => (0..self.size()).map(|i| format!("Class {}", i)).collect(),
        };

        let precision = self.precision();
        let recall = self.recall();
        let f1_score = self.f1_score();
        let support = self.support();

        let name_width = names.iter().map(|name| name.len()).max().unwrap_or(0);
        let width = name_width.max(8).max("average".len());

        let mut report = format!("{:>width$} ", "", width = width);
        for header in &["precision", "recall", "f1-score", "support"] {
            report.push_str(&format!(" {:>9}", header));
        }
        report.push_str("\n\n");

        for (i, name) in names.iter().enumerate() {
            report.push_str(&format!("{:>width$} ", name, width = width));
            for value in &[precision[i], recall[i], f1_score[i]] {
                report.push_str(&format!(" {:>9.digits$}", value, digits = digits));
            }
            report.push_str(&format!(" {:>9}\n", support[i] as u64));
        }

        report.push_str(&format!(
            "Accuracy:\t{:.digits$}",
            self.global_accuracy(),
            digits = digits
        ));

        Ok(report)
    }

    /// Like [`report`](ConfusionMatrix::report), but also echoed to stdout
    pub fn print_report(&self, class_names: Option<&[&str]>, digits: usize) -> Result<String> {
        let report = self.report(class_names, digits)?;
        println!("{}", report);

        Ok(report)
    }

    fn clamp(&self, denom: Array1<f64>) -> Array1<f64> {
        let eps = self.eps;
        denom.mapv_into(|d| d.max(eps))
    }
}

/// Binary classification by default
impl Default for ConfusionMatrix {
    fn default() -> ConfusionMatrix {
        ConfusionMatrix::new(2)
    }
}

/// Print the raw count grid
impl fmt::Debug for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let len = self.size();
        for _ in 0..len * 4 + 1 {
            write!(f, "-")?;
        }
        writeln!(f)?;

        for i in 0..len {
            write!(f, "| ")?;

            for j in 0..len {
                write!(f, "{} | ", self.counts[(i, j)])?;
            }
            writeln!(f)?;
        }

        for _ in 0..len * 4 + 1 {
            write!(f, "-")?;
        }

        Ok(())
    }
}
