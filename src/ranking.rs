//! Ranking metrics for binary outlier scores
//!
//! These functions evaluate a scoring model that assigns every sample a real
//! valued outlier score, against boolean labels where `true` marks a
//! positive. They are stateless and independent of the confusion matrix
//! accumulator, which works on hard class predictions instead.
use ndarray::prelude::*;
use ndarray::{Data, NdFloat};
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

fn check_lengths(scores: usize, labels: usize) -> Result<()> {
    if scores != labels {
        return Err(Error::LengthMismatch(scores, labels));
    }

    Ok(())
}

/// Sample indices ordered by descending score
fn descending_order<F: NdFloat, D: Data<Elem = F>>(scores: &ArrayBase<D, Ix1>) -> Vec<usize> {
    let mut order = (0..scores.len()).collect::<Vec<_>>();
    order.sort_unstable_by(|&i, &j| match scores[j].partial_cmp(&scores[i]) {
        Some(ord) => ord,
        None => unreachable!(),
    });

    order
}

/// Number of positive labels among the k best scored samples
fn top_k_hits<F: NdFloat, D: Data<Elem = F>>(
    labels: &[bool],
    scores: &ArrayBase<D, Ix1>,
    k: usize,
) -> usize {
    descending_order(scores)
        .into_iter()
        .take(k)
        .filter(|&i| labels[i])
        .count()
}

/// Integration using the trapezoidal rule.
fn trapezoidal<F: NdFloat>(vals: &[(F, F)]) -> F {
    let mut prev_x = vals[0].0;
    let mut prev_y = vals[0].1;
    let mut integral = F::zero();

    for (x, y) in vals.iter().skip(1) {
        integral = integral + (*x - prev_x) * (prev_y + *y) / F::from(2.0).unwrap();
        prev_x = *x;
        prev_y = *y;
    }
    integral
}

/// Area under the ROC curve
///
/// The curve is swept over descending score thresholds with tied scores
/// grouped into a single step, then integrated with the trapezoidal rule.
/// The area is undefined when all labels belong to one class.
pub fn roc_auc<F, D>(labels: &[bool], scores: &ArrayBase<D, Ix1>) -> Result<F>
where
    F: NdFloat,
    D: Data<Elem = F>,
{
    check_lengths(scores.len(), labels.len())?;

    let positives = labels.iter().filter(|label| **label).count();
    if positives == 0 || positives == labels.len() {
        return Err(Error::SingleClass);
    }

    let (mut tp, mut fp) = (F::zero(), F::zero());
    let mut curve = vec![(F::zero(), F::zero())];
    let mut prev_score = None;

    for i in descending_order(scores) {
        if prev_score.map_or(false, |prev: F| prev != scores[i]) {
            curve.push((fp, tp));
        }
        prev_score = Some(scores[i]);

        if labels[i] {
            tp = tp + F::one();
        } else {
            fp = fp + F::one();
        }
    }
    curve.push((fp, tp));

    // tp and fp now hold the class totals
    for (x, y) in &mut curve {
        *x = *x / fp;
        *y = *y / tp;
    }

    Ok(trapezoidal(&curve))
}

/// Recall among the k best scored samples
///
/// `k` defaults to the number of positive labels, in which case the result
/// coincides with plain recall at the score cutoff.
pub fn recall_at_k<F, D>(labels: &[bool], scores: &ArrayBase<D, Ix1>, k: Option<usize>) -> Result<F>
where
    F: NdFloat + FromPrimitive,
    D: Data<Elem = F>,
{
    check_lengths(scores.len(), labels.len())?;

    let positives = labels.iter().filter(|label| **label).count();
    if positives == 0 {
        return Err(Error::NoPositives);
    }

    let k = k.unwrap_or(positives);
    if k == 0 || k > labels.len() {
        return Err(Error::InvalidK {
            k,
            len: labels.len(),
        });
    }

    let hits = top_k_hits(labels, scores, k);

    Ok(F::from_usize(hits).unwrap() / F::from_usize(positives).unwrap())
}

/// Precision among the k best scored samples
///
/// `k` defaults to the number of positive labels.
pub fn precision_at_k<F, D>(
    labels: &[bool],
    scores: &ArrayBase<D, Ix1>,
    k: Option<usize>,
) -> Result<F>
where
    F: NdFloat + FromPrimitive,
    D: Data<Elem = F>,
{
    check_lengths(scores.len(), labels.len())?;

    let k = k.unwrap_or_else(|| labels.iter().filter(|label| **label).count());
    if k == 0 || k > labels.len() {
        return Err(Error::InvalidK {
            k,
            len: labels.len(),
        });
    }

    let hits = top_k_hits(labels, scores, k);

    Ok(F::from_usize(hits).unwrap() / F::from_usize(k).unwrap())
}

/// Average precision over the precision-recall curve
///
/// Summarizes the curve as `sum((R_n - R_n-1) * P_n)` over descending
/// distinct score thresholds.
pub fn average_precision<F, D>(labels: &[bool], scores: &ArrayBase<D, Ix1>) -> Result<F>
where
    F: NdFloat + FromPrimitive,
    D: Data<Elem = F>,
{
    check_lengths(scores.len(), labels.len())?;

    let positives = labels.iter().filter(|label| **label).count();
    if positives == 0 {
        return Err(Error::NoPositives);
    }
    let total = F::from_usize(positives).unwrap();

    let order = descending_order(scores);

    let mut tp = 0;
    let mut prev_recall = F::zero();
    let mut sum = F::zero();

    for (rank, &i) in order.iter().enumerate() {
        if labels[i] {
            tp += 1;
        }

        // tied scores fall under the same threshold
        let tied = order
            .get(rank + 1)
            .map_or(false, |&next| scores[next] == scores[i]);
        if tied {
            continue;
        }

        let recall = F::from_usize(tp).unwrap() / total;
        let precision = F::from_usize(tp).unwrap() / F::from_usize(rank + 1).unwrap();
        sum = sum + (recall - prev_recall) * precision;
        prev_recall = recall;
    }

    Ok(sum)
}

/// Binary F1 score over hard predictions
///
/// Without a single positive in either labels or predictions the score
/// degenerates to zero.
pub fn f1(labels: &[bool], predictions: &[bool]) -> Result<f64> {
    check_lengths(predictions.len(), labels.len())?;

    let (mut tp, mut fp, mut missed) = (0, 0, 0);
    for (&label, &pred) in labels.iter().zip(predictions.iter()) {
        match (label, pred) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => missed += 1,
            (false, false) => {}
        }
    }

    let denom = 2 * tp + fp + missed;
    if denom == 0 {
        return Ok(0.0);
    }

    Ok(2.0 * tp as f64 / denom as f64)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};
    use rand::{distributions::Uniform, rngs::SmallRng, Rng, SeedableRng};

    use super::{average_precision, f1, precision_at_k, recall_at_k, roc_auc};
    use crate::error::Error;

    #[test]
    fn recall_at_one() {
        let labels = [false, true, true, false];
        let scores = array![0.1, 0.9, 0.8, 0.4];

        // the single best scored sample is a positive, out of two positives
        let recall: f64 = recall_at_k(&labels, &scores, Some(1)).unwrap();
        assert_abs_diff_eq!(recall, 0.5);

        let precision: f64 = precision_at_k(&labels, &scores, Some(1)).unwrap();
        assert_abs_diff_eq!(precision, 1.0);
    }

    #[test]
    fn k_defaults_to_positive_count() {
        let labels = [false, true, true, false];
        let scores = array![0.1, 0.9, 0.8, 0.4];

        // top-2 are exactly the two positives
        let recall: f64 = recall_at_k(&labels, &scores, None).unwrap();
        assert_abs_diff_eq!(recall, 1.0);

        let precision: f64 = precision_at_k(&labels, &scores, None).unwrap();
        assert_abs_diff_eq!(precision, 1.0);
    }

    #[test]
    fn top_k_validation() {
        let labels = [false, true];
        let scores = array![0.2, 0.8];

        assert_eq!(
            recall_at_k::<f64, _>(&labels, &scores, Some(3)),
            Err(Error::InvalidK { k: 3, len: 2 })
        );
        assert_eq!(
            precision_at_k::<f64, _>(&labels, &scores, Some(0)),
            Err(Error::InvalidK { k: 0, len: 2 })
        );
        assert_eq!(
            recall_at_k::<f64, _>(&[false, false], &scores, None),
            Err(Error::NoPositives)
        );
    }

    #[test]
    fn auc_of_separable_scores() {
        let labels = [false, false, true, true];
        let scores = array![0.1, 0.2, 0.8, 0.9];

        let auc: f64 = roc_auc(&labels, &scores).unwrap();
        assert_abs_diff_eq!(auc, 1.0);

        // invert the ranking and no positive outranks a negative
        let auc: f64 = roc_auc(&labels, &array![0.9, 0.8, 0.2, 0.1]).unwrap();
        assert_abs_diff_eq!(auc, 0.0);
    }

    #[test]
    fn auc_with_ranking_errors() {
        let labels = [false, false, true, true];
        let scores = array![0.1, 0.4, 0.35, 0.8];

        // one of four positive/negative pairs is ranked wrongly
        let auc: f64 = roc_auc(&labels, &scores).unwrap();
        assert_abs_diff_eq!(auc, 0.75);
    }

    #[test]
    fn auc_of_constant_scores() {
        let labels = [true, false, true, false];
        let scores = array![0.5, 0.5, 0.5, 0.5];

        let auc: f64 = roc_auc(&labels, &scores).unwrap();
        assert_abs_diff_eq!(auc, 0.5);
    }

    #[test]
    fn auc_of_random_labels() {
        let scores = Array1::linspace(0.0, 1.0, 1000);

        let mut rng = SmallRng::seed_from_u64(42);
        let range = Uniform::new(0, 2);
        let labels = (0..1000)
            .map(|_| rng.sample(&range) == 1)
            .collect::<Vec<_>>();

        let auc: f64 = roc_auc(&labels, &scores).unwrap();
        assert_abs_diff_eq!(auc, 0.5, epsilon = 0.1);
    }

    #[test]
    fn auc_needs_both_classes() {
        let scores = array![0.1, 0.2, 0.3];

        assert_eq!(
            roc_auc::<f64, _>(&[true, true, true], &scores),
            Err(Error::SingleClass)
        );
        assert_eq!(
            roc_auc::<f64, _>(&[false, false, false], &scores),
            Err(Error::SingleClass)
        );
    }

    #[test]
    fn average_precision_of_ranking() {
        let labels = [false, false, true, true];
        let scores = array![0.1, 0.4, 0.35, 0.8];

        let ap: f64 = average_precision(&labels, &scores).unwrap();
        assert_abs_diff_eq!(ap, 0.5 + 1.0 / 3.0, epsilon = 1e-12);

        // a perfect ranking reaches full precision at every recall level
        let ap: f64 = average_precision(&labels, &array![0.1, 0.2, 0.8, 0.9]).unwrap();
        assert_abs_diff_eq!(ap, 1.0);
    }

    #[test]
    fn f1_of_hard_predictions() {
        let labels = [true, true, false, false];

        let score = f1(&labels, &[true, false, true, false]).unwrap();
        assert_abs_diff_eq!(score, 0.5);

        let score = f1(&labels, &[true, true, false, false]).unwrap();
        assert_abs_diff_eq!(score, 1.0);

        // degenerate case without any positives
        let score = f1(&[false, false], &[false, false]).unwrap();
        assert_abs_diff_eq!(score, 0.0);
    }

    #[test]
    fn rejects_length_mismatch() {
        let scores = array![0.1, 0.2];

        assert_eq!(
            roc_auc::<f64, _>(&[true], &scores),
            Err(Error::LengthMismatch(2, 1))
        );
        assert_eq!(f1(&[true], &[true, false]), Err(Error::LengthMismatch(2, 1)));
    }
}
