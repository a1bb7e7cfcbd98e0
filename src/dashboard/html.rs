//! HTML rendering for the web interface.

use super::{AlertsView, DashboardView, RegistryBadge};
use crate::session::{AnalysisPhase, PhaseKind};

const GAUGE_RADIUS: f64 = 52.0;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; }
header { padding: 1rem 2rem; border-bottom: 1px solid #1e293b; font-weight: 700; letter-spacing: .05em; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.card { background: #1e293b; border-radius: 12px; padding: 1.25rem; margin-bottom: 1rem; }
.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.badge { display: inline-block; padding: .25rem .75rem; border-radius: 999px; font-weight: 700; }
.badge-verified { background: #064e3b; color: #10b981; }
.badge-suspect { background: #78350f; color: #f59e0b; }
.badge-counterfeit { background: #881337; color: #f43f5e; }
.pass { color: #10b981; } .fail { color: #f43f5e; } .muted { color: #64748b; }
.steps li { padding: .4rem 0; color: #64748b; } .steps li.active { color: #38bdf8; font-weight: 700; }
.steps li.done { color: #10b981; }
.preview { max-width: 240px; border-radius: 8px; }
.red-flags { border: 1px solid #f43f5e; }
table { width: 100%; border-collapse: collapse; } td { padding: .3rem 0; }
td.label { color: #94a3b8; width: 45%; }
button { background: #38bdf8; color: #0f172a; border: 0; border-radius: 8px; padding: .5rem 1rem; font-weight: 700; cursor: pointer; }
"#;

const UPLOAD_SCRIPT: &str = r#"
<script>
const input = document.getElementById('media');
const status = document.getElementById('upload-status');
document.getElementById('upload-form').addEventListener('submit', async (event) => {
    event.preventDefault();
    const file = input.files[0];
    if (!file) { return; }
    status.textContent = 'Uploading...';
    const headers = file.type ? { 'Content-Type': file.type } : {};
    const response = await fetch('/api/scan', { method: 'POST', headers, body: file });
    input.value = '';
    if (response.ok) {
        window.location.reload();
    } else {
        status.textContent = await response.text();
    }
});
</script>
"#;

/// Escape HTML special characters for safe rendering.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Only http and https URIs are rendered as links.
fn is_web_link(uri: &str) -> bool {
    let uri = uri.trim_start().to_ascii_lowercase();
    uri.starts_with("https://") || uri.starts_with("http://")
}

fn base_page(body: &str, refresh: bool) -> String {
    let refresh = if refresh {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {refresh}
    <title>PharmAudit - Forensic Medicine Verification</title>
    <style>{STYLE}</style>
</head>
<body>
    <header>PharmAudit</header>
    <main>
{body}
    </main>
</body>
</html>"#
    )
}

fn gauge_svg(view: &DashboardView<'_>) -> String {
    let circumference = 2.0 * std::f64::consts::PI * GAUGE_RADIUS;
    let offset = circumference * (1.0 - f64::from(view.score) / 100.0);
    format!(
        r##"<svg class="gauge gauge-{class}" width="140" height="140" viewBox="0 0 140 140">
    <circle cx="70" cy="70" r="{r}" fill="none" stroke="#334155" stroke-width="12"/>
    <circle cx="70" cy="70" r="{r}" fill="none" stroke="{color}" stroke-width="12"
        stroke-linecap="round" stroke-dasharray="{circumference:.2}" stroke-dashoffset="{offset:.2}"
        transform="rotate(-90 70 70)"/>
    <text x="70" y="78" text-anchor="middle" font-size="28" font-weight="700" fill="{color}">{score}%</text>
</svg>"##,
        class = view.band.css_class(),
        r = GAUGE_RADIUS,
        color = view.band.color(),
        score = view.score,
    )
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", html_escape(item)))
        .collect()
}

fn registry_badge(badge: &RegistryBadge) -> String {
    format!(
        r#"<div>{} <span class="{}">{}</span></div>"#,
        badge.label,
        if badge.passed { "pass" } else { "fail" },
        badge.text()
    )
}

/// Render the report dashboard fragment.
pub fn render_html(view: &DashboardView<'_>) -> String {
    let fields: String = view
        .fields
        .iter()
        .map(|field| {
            format!(
                r#"<tr><td class="label">{}</td><td{}>{}</td></tr>"#,
                field.label,
                if field.detected { "" } else { r#" class="muted""# },
                html_escape(field.value)
            )
        })
        .collect();

    let red_flags = match view.red_flags {
        Some(flags) => format!(
            r#"<div class="card red-flags"><h3 class="fail">Integrity Red Flags</h3><ul>{}</ul></div>"#,
            list_items(flags)
        ),
        None => String::new(),
    };

    let alerts = match view.alerts {
        AlertsView::Alerts(alerts) => format!(r#"<ul class="fail">{}</ul>"#, list_items(alerts)),
        AlertsView::Clear => format!(r#"<p class="pass">{}</p>"#, super::REGISTRY_CLEAR),
    };

    let sources = if view.sources.is_empty() {
        String::new()
    } else {
        let links: String = view
            .sources
            .iter()
            .map(|source| {
                if is_web_link(&source.uri) {
                    format!(
                        r#"<li><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></li>"#,
                        html_escape(source.uri.trim()),
                        html_escape(&source.title)
                    )
                } else {
                    format!(
                        r#"<li>{} <span class="muted">{}</span></li>"#,
                        html_escape(&source.title),
                        html_escape(&source.uri)
                    )
                }
            })
            .collect();
        format!(r#"<div class="card"><h3>Evidence Links</h3><ul>{links}</ul></div>"#)
    };

    format!(
        r#"<section class="dashboard">
    <div class="card grid">
        <div>{gauge}</div>
        <div>
            <span class="badge {badge_class}">{symbol} {badge_label}</span>
            <p>{summary}</p>
        </div>
    </div>
    <div class="card">
        <h3>Forensic Recommendation</h3>
        <p>{recommendation}</p>
    </div>
    <div class="grid">
        <div class="card">
            <h3>Extracted Data</h3>
            <table>{fields}</table>
        </div>
        <div class="card">
            <h3>Visual Forensics</h3>
            <h4>Analysis Findings</h4>
            <ul>{findings}</ul>
            <p><span class="muted">Logo:</span> {logo}</p>
            <p><span class="muted">Typography:</span> {font}</p>
            <p>Security Markers: {marker}</p>
        </div>
    </div>
    {red_flags}
    <div class="card">
        <h3>Registry Check</h3>
        {manufacturer}
        {batch}
        <h4>Market Alerts (2025-2026)</h4>
        {alerts}
    </div>
    {sources}
</section>"#,
        gauge = gauge_svg(view),
        badge_class = view.badge.css_class(),
        symbol = view.badge.symbol(),
        badge_label = view.badge.label(),
        summary = html_escape(view.reasoning_summary),
        recommendation = html_escape(view.recommendation),
        findings = list_items(view.findings),
        logo = html_escape(view.logo_analysis),
        font = html_escape(view.font_analysis),
        marker = if view.security_marker {
            r#"<span class="pass">DETECTED</span>"#
        } else {
            r#"<span class="muted">NOT DETECTED</span>"#
        },
        manufacturer = registry_badge(&view.manufacturer),
        batch = registry_badge(&view.batch),
    )
}

fn preview_img(phase: &AnalysisPhase) -> String {
    phase
        .preview()
        .map(|uri| {
            format!(
                r#"<img class="preview" src="{}" alt="Uploaded media">"#,
                html_escape(uri)
            )
        })
        .unwrap_or_default()
}

fn progress_steps(current: PhaseKind) -> String {
    let position = PhaseKind::PROGRESS_STEPS
        .iter()
        .position(|step| *step == current)
        .unwrap_or(0);
    let items: String = PhaseKind::PROGRESS_STEPS
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let class = match i.cmp(&position) {
                std::cmp::Ordering::Less => "done",
                std::cmp::Ordering::Equal => "active",
                std::cmp::Ordering::Greater => "pending",
            };
            format!(r#"<li class="{class}">{}</li>"#, html_escape(step.label()))
        })
        .collect();
    format!(r#"<ol class="steps">{items}</ol>"#)
}

/// Render the full page for the current phase.
pub fn render_page(phase: &AnalysisPhase) -> String {
    match phase {
        AnalysisPhase::Idle => {
            let body = format!(
                r#"<div class="card">
    <h2>Forensic Medicine Verification</h2>
    <p class="muted">Upload a photo or video of a medicine strip or pack.</p>
    <form id="upload-form">
        <input type="file" id="media" name="media" accept="image/*,video/*">
        <button type="submit">Start Audit</button>
    </form>
    <p id="upload-status" class="muted"></p>
</div>
{UPLOAD_SCRIPT}"#
            );
            base_page(&body, false)
        }
        AnalysisPhase::Extracting { .. }
        | AnalysisPhase::Verifying { .. }
        | AnalysisPhase::Reasoning { .. } => {
            let body = format!(
                r#"<div class="card grid">
    <div>{preview}</div>
    <div>
        <h2>Forensic Audit in Progress</h2>
        {steps}
    </div>
</div>"#,
                preview = preview_img(phase),
                steps = progress_steps(phase.kind()),
            );
            base_page(&body, true)
        }
        AnalysisPhase::Completed { report, .. } => {
            let view = DashboardView::new(report);
            let body = format!(
                r#"<div class="card grid">
    <div>{preview}</div>
    <form method="post" action="/reset"><button type="submit">New Scan</button></form>
</div>
{dashboard}"#,
                preview = preview_img(phase),
                dashboard = render_html(&view),
            );
            base_page(&body, false)
        }
        AnalysisPhase::Error { message, .. } => {
            let body = format!(
                r#"<div class="card">
    {preview}
    <h2 class="fail">{title}</h2>
    <p>{message}</p>
    <form method="post" action="/reset"><button type="submit">Try Again</button></form>
</div>"#,
                preview = preview_img(phase),
                title = PhaseKind::Error.label(),
                message = html_escape(message),
            );
            base_page(&body, false)
        }
    }
}
