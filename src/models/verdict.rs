//! Prediction outcome

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a risk prediction
///
/// Only the class is exposed. The classifier's decision value and any
/// probability estimate stay internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Classifier label 0
    NotDiabetic,
    /// Any non-zero classifier label
    Diabetic,
}

impl Verdict {
    /// Map a classifier label to a verdict. Every non-zero label is positive.
    #[must_use]
    pub const fn from_label(label: i64) -> Self {
        if label == 0 {
            Self::NotDiabetic
        } else {
            Self::Diabetic
        }
    }

    /// Short outcome text
    #[must_use]
    pub const fn label_text(self) -> &'static str {
        match self {
            Self::NotDiabetic => "not diabetic",
            Self::Diabetic => "diabetic",
        }
    }

    /// Full sentence shown to the user
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotDiabetic => "The person is not diabetic",
            Self::Diabetic => "The person is diabetic",
        }
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Diabetic)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_text())
    }
}
