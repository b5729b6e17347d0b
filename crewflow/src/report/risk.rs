//! Severity and urgency classification.

use crate::normalize::DisplayValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Matches `1. [HIGH RISK] - Liability. Risk: ...`; the `RISK` word and the
/// dash are optional.
const RISK_LINE_PATTERN: &str =
    r"(?im)^\s*(\d+)[.)]\s*\[\s*(high|medium|low)(?:\s+risk)?\s*\]\s*(?:[-–:]\s*)?(.*?)\s*$";

static RISK_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(RISK_LINE_PATTERN).ok());

/// Severity of one contract risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    /// Likely to cause material harm.
    High,
    /// Worth negotiating.
    Medium,
    /// Minor.
    Low,
}

impl RiskSeverity {
    /// Parses `high`, `medium` or `low`, ignoring case.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "HIGH RISK"),
            Self::Medium => write!(f, "MEDIUM RISK"),
            Self::Low => write!(f, "LOW RISK"),
        }
    }
}

/// One entry of a numbered risk list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    /// The list number as written.
    pub number: u32,
    /// Parsed severity.
    pub severity: RiskSeverity,
    /// Everything after the severity tag.
    pub summary: String,
}

/// Extracts the severity-tagged lines of a risk assessment.
///
/// Lines without a recognizable `[LEVEL RISK]` tag are ignored, so
/// substitute texts yield an empty list.
#[must_use]
pub fn parse_risk_items(text: &str) -> Vec<RiskItem> {
    let Some(pattern) = RISK_LINE.as_ref() else {
        return Vec::new();
    };

    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            Some(RiskItem {
                number: caps.get(1)?.as_str().parse().ok()?,
                severity: RiskSeverity::parse(caps.get(2)?.as_str())?,
                summary: caps.get(3).map_or("", |m| m.as_str()).to_string(),
            })
        })
        .collect()
}

/// Urgency reported by the condition-mapping stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    /// Routine appointment.
    Low,
    /// See a doctor soon.
    Medium,
    /// Seek care promptly.
    High,
    /// Missing or unrecognized.
    Unknown,
}

impl UrgencyLevel {
    /// Parses a label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" | "moderate" => Self::Medium,
            "high" | "urgent" => Self::High,
            _ => Self::Unknown,
        }
    }

    /// Reads `urgency_level` from normalized mapped conditions.
    #[must_use]
    pub fn from_conditions(conditions: &DisplayValue) -> Self {
        conditions
            .get("urgency_level")
            .and_then(serde_json::Value::as_str)
            .map_or(Self::Unknown, Self::parse)
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
