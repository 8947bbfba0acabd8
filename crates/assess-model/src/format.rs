use std::fmt;

use serde::{Deserialize, Serialize};

/// The known third-party export formats an assessment column family can
/// originate from.
///
/// Detection is deterministic for a given header set and the tag is
/// immutable once assigned to a column-prefix group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentSourceFormat {
    /// LinkIt NJSLS benchmark, Form A (standards-aligned sub-scores present).
    LinkItNjslsFormA,
    /// LinkIt NJSLS benchmark, Form B (percent/raw scoring).
    LinkItNjslsFormB,
    /// NJ Start Strong administration (no numeric score ceiling).
    StartStrong,
    /// Direct NJSLA export with reading/writing scale scores.
    Njsla,
    /// LinkIt NJSLS export without a recognizable form marker.
    LinkItNjsls,
    /// No assessment-shaped columns at all.
    Generic,
}

impl AssessmentSourceFormat {
    /// Canonical display name as shown to operators.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkItNjslsFormA => "LinkIt NJSLS Form A",
            Self::LinkItNjslsFormB => "LinkIt NJSLS Form B",
            Self::StartStrong => "Start Strong",
            Self::Njsla => "NJSLA",
            Self::LinkItNjsls => "LinkIt NJSLS",
            Self::Generic => "Generic",
        }
    }

    /// Source token used when deriving the categorical `assessmentType` tag.
    pub fn source_token(&self) -> &'static str {
        match self {
            Self::LinkItNjslsFormA | Self::LinkItNjslsFormB | Self::LinkItNjsls => "LINKIT_NJSLS",
            Self::StartStrong => "START_STRONG",
            Self::Njsla => "NJSLA",
            Self::Generic => "GENERIC",
        }
    }

    /// Form token appended to `assessmentType` for form-specific benchmarks.
    pub fn form_token(&self) -> Option<&'static str> {
        match self {
            Self::LinkItNjslsFormA => Some("FORM_A"),
            Self::LinkItNjslsFormB => Some("FORM_B"),
            _ => None,
        }
    }

    /// True for the LinkIt benchmark forms, which always score 0-100.
    pub fn is_benchmark_form(&self) -> bool {
        matches!(self, Self::LinkItNjslsFormA | Self::LinkItNjslsFormB)
    }
}

impl fmt::Display for AssessmentSourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
