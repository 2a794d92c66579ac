//! Inverse class-frequency weights
use ndarray::prelude::*;
use ndarray::Data;

use crate::error::{Error, Result};

/// Class weights inversely proportional to the class frequencies
///
/// The weight of class `c` is `total / (n_classes * count[c])`, with classes
/// running from 0 to the largest label seen. Weights are normalized to sum
/// to one when `normalize` is set, which is what loss functions usually
/// expect.
pub fn class_weights<D: Data<Elem = usize>>(
    labels: &ArrayBase<D, Ix1>,
    normalize: bool,
) -> Result<Array1<f64>> {
    if labels.is_empty() {
        return Err(Error::NotEnoughSamples);
    }

    let classes = labels.iter().max().unwrap() + 1;
    let mut counts = vec![0usize; classes];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    let total = labels.len() as f64;
    let mut weights = counts
        .iter()
        .map(|&count| total / (classes as f64 * count as f64))
        .collect::<Array1<_>>();

    if normalize {
        let sum = weights.sum();
        weights /= sum;
    }

    Ok(weights)
}
