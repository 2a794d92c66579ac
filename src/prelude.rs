//! Confmat prelude.
//!
//! This module contains the most used types, traits and functions that you
//! can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::confusion::ConfusionMatrix;

#[doc(no_inline)]
pub use crate::ranking::{average_precision, f1, precision_at_k, recall_at_k, roc_auc};

#[doc(no_inline)]
pub use crate::weights::class_weights;
