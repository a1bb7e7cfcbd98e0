//! Analysis phases shown to the user.

use std::sync::Arc;

use serde::Serialize;

use crate::models::ForensicReport;

/// Message shown when a failure has no description of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred during the forensic audit.";

/// Where the current audit stands. Each phase carries only what is valid in it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Extracting {
        preview: Option<String>,
    },
    Verifying {
        preview: Option<String>,
    },
    Reasoning {
        preview: Option<String>,
    },
    Completed {
        preview: Option<String>,
        report: Arc<ForensicReport>,
    },
    Error {
        preview: Option<String>,
        message: String,
    },
}

/// Discriminant of [`AnalysisPhase`] without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseKind {
    Idle,
    Extracting,
    Verifying,
    Reasoning,
    Completed,
    Error,
}

impl PhaseKind {
    /// Progress steps in display order.
    pub const PROGRESS_STEPS: [PhaseKind; 3] =
        [PhaseKind::Extracting, PhaseKind::Verifying, PhaseKind::Reasoning];

    /// Progress label for in-flight phases.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Awaiting upload",
            Self::Extracting => "OCR & Visual Asset Extraction",
            Self::Verifying => "CDSCO Database Grounding",
            Self::Reasoning => "Forensic Logic Processing",
            Self::Completed => "Audit complete",
            Self::Error => "Forensic Audit Failed",
        }
    }
}

impl AnalysisPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle => PhaseKind::Idle,
            Self::Extracting { .. } => PhaseKind::Extracting,
            Self::Verifying { .. } => PhaseKind::Verifying,
            Self::Reasoning { .. } => PhaseKind::Reasoning,
            Self::Completed { .. } => PhaseKind::Completed,
            Self::Error { .. } => PhaseKind::Error,
        }
    }

    /// True while an audit is running (Extracting, Verifying or Reasoning).
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::Extracting { .. } | Self::Verifying { .. } | Self::Reasoning { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Error { .. })
    }

    pub fn preview(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Extracting { preview }
            | Self::Verifying { preview }
            | Self::Reasoning { preview }
            | Self::Completed { preview, .. }
            | Self::Error { preview, .. } => preview.as_deref(),
        }
    }

    pub fn report(&self) -> Option<&Arc<ForensicReport>> {
        match self {
            Self::Completed { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// JSON-friendly view (the preview URI itself is omitted).
    pub fn snapshot(&self) -> PhaseSnapshot<'_> {
        PhaseSnapshot {
            phase: self.kind(),
            label: self.kind().label(),
            has_preview: self.preview().is_some(),
            report: self.report().map(|r| r.as_ref()),
            error: self.error(),
        }
    }
}

/// Serializable projection of an [`AnalysisPhase`].
#[derive(Debug, Serialize)]
pub struct PhaseSnapshot<'a> {
    pub phase: PhaseKind,
    pub label: &'static str,
    pub has_preview: bool,
    pub report: Option<&'a ForensicReport>,
    pub error: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_has_nothing() {
        let phase = AnalysisPhase::default();
        assert_eq!(phase.kind(), PhaseKind::Idle);
        assert!(phase.preview().is_none());
        assert!(phase.report().is_none());
        assert!(phase.error().is_none());
        assert!(!phase.is_in_progress());
        assert!(!phase.is_terminal());
    }

    #[test]
    fn test_error_snapshot() {
        let phase = AnalysisPhase::Error {
            preview: Some("data:image/png;base64,AA==".to_string()),
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(phase.snapshot()).unwrap();
        assert_eq!(json["phase"], "ERROR");
        assert_eq!(json["error"], "boom");
        assert_eq!(json["has_preview"], true);
        assert!(json["report"].is_null());
    }

    #[test]
    fn test_progress_labels() {
        let labels: Vec<_> = PhaseKind::PROGRESS_STEPS.iter().map(|k| k.label()).collect();
        assert_eq!(
            labels,
            vec![
                "OCR & Visual Asset Extraction",
                "CDSCO Database Grounding",
                "Forensic Logic Processing"
            ]
        );
    }
}
