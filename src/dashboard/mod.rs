//! Report dashboard.
//!
//! [`DashboardView`] holds every presentational derivation of a report
//! (score band, status badge, placeholders, conditional blocks); the
//! terminal and HTML renderers only lay it out.

mod html;
mod terminal;

pub use html::{html_escape, render_html, render_page};
pub use terminal::render_terminal;

use crate::models::{ForensicReport, ReportStatus, Source};

/// Placeholder for an empty extracted field.
pub const NOT_DETECTED: &str = "Not detected";

/// Shown in the registry panel when no alerts were found.
pub const REGISTRY_CLEAR: &str = "Registry Clear";

/// Colour band of the authenticity gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Warning,
    Danger,
}

impl ScoreBand {
    /// Above 80 is good, above 50 a warning, anything else danger.
    pub fn for_score(score: u8) -> Self {
        if score > 80 {
            Self::Good
        } else if score > 50 {
            Self::Warning
        } else {
            Self::Danger
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "#10b981",
            Self::Warning => "#f59e0b",
            Self::Danger => "#f43f5e",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Visual variant of the status badge, one per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub status: ReportStatus,
}

impl StatusBadge {
    pub fn css_class(&self) -> &'static str {
        match self.status {
            ReportStatus::Verified => "badge-verified",
            ReportStatus::Suspect => "badge-suspect",
            ReportStatus::Counterfeit => "badge-counterfeit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self.status {
            ReportStatus::Verified => "✓",
            ReportStatus::Suspect => "!",
            ReportStatus::Counterfeit => "✗",
        }
    }

    pub fn label(&self) -> &'static str {
        self.status.as_str()
    }
}

/// One extracted label field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow<'a> {
    pub label: &'static str,
    /// The value, or [`NOT_DETECTED`].
    pub value: &'a str,
    pub detected: bool,
}

/// Pass/fail badge of the registry panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryBadge {
    pub label: &'static str,
    pub passed: bool,
    pub pass_text: &'static str,
    pub fail_text: &'static str,
}

impl RegistryBadge {
    pub fn text(&self) -> &'static str {
        if self.passed {
            self.pass_text
        } else {
            self.fail_text
        }
    }
}

/// Registry alerts, or the clear message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertsView<'a> {
    Alerts(&'a [String]),
    Clear,
}

/// Everything a renderer needs, derived from one report.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub score: u8,
    pub band: ScoreBand,
    pub badge: StatusBadge,
    pub recommendation: &'a str,
    pub reasoning_summary: &'a str,
    pub fields: Vec<FieldRow<'a>>,
    pub findings: &'a [String],
    /// None when there are no red flags; the block is then hidden.
    pub red_flags: Option<&'a [String]>,
    pub logo_analysis: &'a str,
    pub font_analysis: &'a str,
    pub security_marker: bool,
    pub manufacturer: RegistryBadge,
    pub batch: RegistryBadge,
    pub alerts: AlertsView<'a>,
    pub sources: &'a [Source],
}

impl<'a> DashboardView<'a> {
    pub fn new(report: &'a ForensicReport) -> Self {
        let fields = report
            .extracted_data
            .labelled_fields()
            .into_iter()
            .map(|(label, value)| {
                let detected = !value.trim().is_empty();
                FieldRow {
                    label,
                    value: if detected { value } else { NOT_DETECTED },
                    detected,
                }
            })
            .collect();

        let forensics = &report.visual_forensics;
        let grounding = &report.grounding_check;

        Self {
            score: report.authenticity_score,
            band: ScoreBand::for_score(report.authenticity_score),
            badge: StatusBadge {
                status: report.status,
            },
            recommendation: &report.recommendation,
            reasoning_summary: &report.reasoning_summary,
            fields,
            findings: &forensics.findings,
            red_flags: Some(forensics.red_flags.as_slice()).filter(|f| !f.is_empty()),
            logo_analysis: &forensics.assets.logo_analysis,
            font_analysis: &forensics.assets.font_analysis,
            security_marker: forensics.assets.qr_present,
            manufacturer: RegistryBadge {
                label: "Mfg Registry",
                passed: grounding.manufacturer_verified,
                pass_text: "VERIFIED",
                fail_text: "FAILED",
            },
            batch: RegistryBadge {
                label: "Batch Logic",
                passed: grounding.batch_valid,
                pass_text: "VALID",
                fail_text: "INVALID",
            },
            alerts: if grounding.alerts_found.is_empty() {
                AlertsView::Clear
            } else {
                AlertsView::Alerts(&grounding.alerts_found)
            },
            sources: &grounding.sources,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::*;

    pub fn report(score: u8, status: ReportStatus) -> ForensicReport {
        ForensicReport {
            authenticity_score: score,
            status,
            extracted_data: ExtractedData {
                brand: "Pan 40".to_string(),
                generic_name: "Pantoprazole".to_string(),
                manufacturer: "Alkem Laboratories".to_string(),
                batch: "PB24<017>".to_string(),
                exp_date: "09/2027".to_string(),
                ..Default::default()
            },
            visual_forensics: VisualForensics {
                findings: vec!["Blister foil print consistent".to_string()],
                red_flags: Vec::new(),
                assets: VisualAssets {
                    logo_analysis: "Logo matches reference".to_string(),
                    font_analysis: "Consistent".to_string(),
                    qr_present: true,
                },
            },
            grounding_check: GroundingCheck {
                manufacturer_verified: true,
                batch_valid: false,
                alerts_found: Vec::new(),
                sources: vec![Source {
                    title: "CDSCO & Drug Alerts".to_string(),
                    uri: "https://cdsco.gov.in/opencms/alerts?q=1&r=2".to_string(),
                }],
            },
            recommendation: "Verify with the dispensing pharmacist".to_string(),
            reasoning_summary: "Batch code format deviates".to_string(),
        }
    }
}
