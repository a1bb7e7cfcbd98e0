//! Single-file audit from the terminal.

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::AnalysisFacade;
use crate::config::Config;
use crate::dashboard::{render_terminal, DashboardView};
use crate::llm::GeminiProvider;
use crate::media::MediaSource;
use crate::session::ScanController;

/// Run one scan, showing the progress steps, then print the report.
pub async fn cmd_scan(config: &Config, file: &Path, json: bool) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let provider = GeminiProvider::new(config.llm.clone())?;
    let facade = AnalysisFacade::new(provider, &config.llm);
    let controller = ScanController::new(config.session.timings());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let mut watcher = controller.subscribe();
    let spinner = {
        let pb = pb.clone();
        tokio::spawn(async move {
            while let Some(phase) = watcher.changed().await {
                if phase.is_in_progress() {
                    pb.set_message(format!("{}...", phase.kind().label()));
                }
            }
        })
    };

    let result = controller
        .scan(&facade, MediaSource::File(file.to_path_buf()))
        .await;
    spinner.abort();
    pb.finish_and_clear();

    match result {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(report.as_ref())?);
            } else {
                print!("{}", render_terminal(&DashboardView::new(&report)));
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Forensic Audit Failed", style("✗").red());
            eprintln!("  {}", e);
            Err(e.into())
        }
    }
}
