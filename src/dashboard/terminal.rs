//! Terminal rendering of the dashboard.

use std::fmt::Write;

use console::{style, StyledObject};

use super::{AlertsView, DashboardView, RegistryBadge, ScoreBand};
use crate::models::ReportStatus;

const GAUGE_WIDTH: usize = 20;

/// Model text with control characters removed, so it cannot drive the terminal.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

fn band_style<D>(band: ScoreBand, value: D) -> StyledObject<D> {
    match band {
        ScoreBand::Good => style(value).green(),
        ScoreBand::Warning => style(value).yellow(),
        ScoreBand::Danger => style(value).red(),
    }
}

fn badge_line(badge: &RegistryBadge) -> String {
    let text = if badge.passed {
        style(format!("✓ {}", badge.text())).green()
    } else {
        style(format!("✗ {}", badge.text())).red()
    };
    format!("  {:<14} {}", badge.label, text)
}

/// Render the dashboard as styled terminal text.
pub fn render_terminal(view: &DashboardView<'_>) -> String {
    let mut out = String::new();

    let status = match view.badge.status {
        ReportStatus::Verified => style(format!("{} {}", view.badge.symbol(), view.badge.label()))
            .green()
            .bold(),
        ReportStatus::Suspect => style(format!("{} {}", view.badge.symbol(), view.badge.label()))
            .yellow()
            .bold(),
        ReportStatus::Counterfeit => {
            style(format!("{} {}", view.badge.symbol(), view.badge.label()))
                .red()
                .bold()
        }
    };

    let filled = usize::from(view.score) * GAUGE_WIDTH / 100;
    let gauge = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(GAUGE_WIDTH - filled)
    );

    let _ = writeln!(out, "\n{}  [{}]", style("Forensic Audit Result").bold(), status);
    let _ = writeln!(
        out,
        "  Authenticity {} {}",
        band_style(view.band, gauge),
        band_style(view.band, format!("{}%", view.score)).bold()
    );
    if !view.reasoning_summary.is_empty() {
        let _ = writeln!(out, "  {}", style(printable(view.reasoning_summary)).dim());
    }

    let _ = writeln!(out, "\n{}", style("Forensic Recommendation").cyan().bold());
    let _ = writeln!(out, "  {}", printable(view.recommendation));

    let _ = writeln!(out, "\n{}", style("Extracted Data").cyan());
    for field in &view.fields {
        let value = if field.detected {
            style(printable(field.value))
        } else {
            style(field.value.to_string()).dim()
        };
        let _ = writeln!(out, "  {:<22} {}", field.label, value);
    }

    let _ = writeln!(out, "\n{}", style("Visual Forensics").cyan());
    let _ = writeln!(out, "  {}", style("Analysis Findings").bold());
    for finding in view.findings {
        let _ = writeln!(out, "    • {}", printable(finding));
    }
    if let Some(red_flags) = view.red_flags {
        let _ = writeln!(out, "  {}", style("Integrity Red Flags").red().bold());
        for flag in red_flags {
            let _ = writeln!(out, "    {} {}", style("⚠").red(), printable(flag));
        }
    }
    if !view.logo_analysis.is_empty() {
        let _ = writeln!(out, "  {:<14} {}", "Logo", printable(view.logo_analysis));
    }
    if !view.font_analysis.is_empty() {
        let _ = writeln!(out, "  {:<14} {}", "Typography", printable(view.font_analysis));
    }
    let marker = if view.security_marker {
        style("DETECTED").green()
    } else {
        style("NOT DETECTED").dim()
    };
    let _ = writeln!(out, "  Security Markers: {}", marker);

    let _ = writeln!(out, "\n{}", style("Registry Check").cyan());
    let _ = writeln!(out, "{}", badge_line(&view.manufacturer));
    let _ = writeln!(out, "{}", badge_line(&view.batch));
    let _ = writeln!(out, "  {}", style("Market Alerts (2025-2026)").bold());
    match view.alerts {
        AlertsView::Alerts(alerts) => {
            for alert in alerts {
                let _ = writeln!(out, "    {} {}", style("!").red(), printable(alert));
            }
        }
        AlertsView::Clear => {
            let _ = writeln!(out, "    {} {}", style("✓").green(), super::REGISTRY_CLEAR);
        }
    }

    if !view.sources.is_empty() {
        let _ = writeln!(out, "\n{}", style("Evidence Links").cyan());
        for source in view.sources {
            let _ = writeln!(
                out,
                "  {} {} {}",
                style("→").dim(),
                printable(&source.title),
                style(printable(&source.uri)).dim()
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::report;
    use super::*;

    fn plain(view: &DashboardView<'_>) -> String {
        console::strip_ansi_codes(&render_terminal(view)).into_owned()
    }

    #[test]
    fn test_render_core_sections() {
        let report = report(64, ReportStatus::Suspect);
        let text = plain(&DashboardView::new(&report));

        assert!(text.contains("[! Suspect]"));
        assert!(text.contains("64%"));
        assert!(text.contains("Pan 40"));
        assert!(text.contains("Manufacturer Address"));
        assert!(text.contains("Not detected"));
        assert!(text.contains("✓ VERIFIED"));
        assert!(text.contains("✗ INVALID"));
        assert!(text.contains("Registry Clear"));
        assert!(text.contains("CDSCO & Drug Alerts"));
        assert!(!text.contains("Integrity Red Flags"));
    }

    #[test]
    fn test_render_red_flags_and_alerts() {
        let mut report = report(12, ReportStatus::Counterfeit);
        report.visual_forensics.red_flags = vec!["Misspelt generic name".to_string()];
        report.grounding_check.alerts_found = vec!["NSQ alert for batch".to_string()];
        report.grounding_check.sources.clear();
        let text = plain(&DashboardView::new(&report));

        assert!(text.contains("Integrity Red Flags"));
        assert!(text.contains("Misspelt generic name"));
        assert!(text.contains("NSQ alert for batch"));
        assert!(!text.contains("Registry Clear"));
        assert!(!text.contains("Evidence Links"));
    }

    #[test]
    fn test_model_text_cannot_emit_escape_sequences() {
        let mut report = report(55, ReportStatus::Suspect);
        report.recommendation = "Consult\x1b[2J a pharmacist\x07".to_string();
        report.visual_forensics.findings = vec!["Seal\x1b]0;pwned\x07 intact".to_string()];
        report.grounding_check.alerts_found = vec!["Recall\r\nnotice".to_string()];
        report.extracted_data.brand = "Pan\x1b[31m 40".to_string();

        let text = render_terminal(&DashboardView::new(&report));
        let plain = console::strip_ansi_codes(&text);
        assert!(!plain.contains('\x1b'));
        assert!(!plain.contains('\x07'));
        assert!(!plain.contains('\r'));
        assert!(plain.contains("Consult[2J a pharmacist"));
        assert!(plain.contains("Recall notice"));
        assert!(plain.contains("Pan[31m 40"));
    }

    #[test]
    fn test_gauge_bounds() {
        let report = report(100, ReportStatus::Verified);
        let text = plain(&DashboardView::new(&report));
        assert!(text.contains(&"█".repeat(GAUGE_WIDTH)));

        let report = super::super::fixtures::report(0, ReportStatus::Counterfeit);
        let text = plain(&DashboardView::new(&report));
        assert!(text.contains(&"░".repeat(GAUGE_WIDTH)));
    }
}
