//! Scan controller: owns the current [`AnalysisPhase`].
//!
//! Every transition is guarded. Each scan gets a [`ScanTicket`]; only the
//! ticket of the current scan may move the phase, so results of a scan that
//! was reset or superseded are dropped. The cosmetic progress steps run as
//! one timer task per scan that is aborted when the scan ends, and each step
//! only fires from its exact predecessor phase.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::phase::{AnalysisPhase, PhaseKind, GENERIC_FAILURE_MESSAGE};
use crate::analysis::{AnalysisError, AnalysisFacade};
use crate::llm::AnalysisProvider;
use crate::media::{self, MediaError, MediaSource};
use crate::models::ForensicReport;

/// Delays of the cosmetic progress steps, measured from file selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Extracting → Verifying.
    pub verify_after: Duration,
    /// Verifying → Reasoning.
    pub reason_after: Duration,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            verify_after: Duration::from_secs(2),
            reason_after: Duration::from_secs(5),
        }
    }
}

/// Identifies one scan. Stale tickets cannot change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket(u64);

/// Why [`ScanController::scan`] produced no report.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Scan was reset or replaced by a newer scan")]
    Superseded,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    /// Ticket allowed to move the phase; 0 when no scan is active.
    ticket: u64,
    phase: AnalysisPhase,
}

struct Inner {
    slot: watch::Sender<Slot>,
    next_ticket: AtomicU64,
    /// Timer task of the current scan, with the ticket it belongs to.
    timers: Mutex<Option<(u64, JoinHandle<()>)>>,
    timings: PhaseTimings,
}

/// Owner of the current analysis phase. Cheap to clone.
#[derive(Clone)]
pub struct ScanController {
    inner: Arc<Inner>,
}

impl Default for ScanController {
    fn default() -> Self {
        Self::new(PhaseTimings::default())
    }
}

impl ScanController {
    pub fn new(timings: PhaseTimings) -> Self {
        let (slot, _) = watch::channel(Slot::default());
        Self {
            inner: Arc::new(Inner {
                slot,
                next_ticket: AtomicU64::new(0),
                timers: Mutex::new(None),
                timings,
            }),
        }
    }

    pub fn timings(&self) -> PhaseTimings {
        self.inner.timings
    }

    /// Current phase.
    pub fn phase(&self) -> AnalysisPhase {
        self.inner.slot.borrow().phase.clone()
    }

    /// Watch phase changes.
    pub fn subscribe(&self) -> PhaseWatcher {
        PhaseWatcher {
            rx: self.inner.slot.subscribe(),
        }
    }

    /// Start a new scan: moves to Extracting and starts the progress timers.
    ///
    /// Any scan already running is superseded.
    pub fn begin(&self) -> ScanTicket {
        // The stored timers always belong to the published ticket.
        let mut timers = self.lock_timers();
        let ticket = ScanTicket(self.inner.next_ticket.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner.slot.send_modify(|slot| {
            slot.ticket = ticket.0;
            slot.phase = AnalysisPhase::Extracting { preview: None };
        });
        if let Some((_, previous)) = timers.replace((ticket.0, self.spawn_timers(ticket))) {
            previous.abort();
        }
        debug!("Scan {} started", ticket.0);
        ticket
    }

    /// Attach the preview once the media has been encoded.
    pub fn set_preview(&self, ticket: ScanTicket, uri: String) -> bool {
        self.transition(ticket, |phase| match phase {
            AnalysisPhase::Extracting { .. } => Some(AnalysisPhase::Extracting { preview: Some(uri) }),
            AnalysisPhase::Verifying { .. } => Some(AnalysisPhase::Verifying { preview: Some(uri) }),
            AnalysisPhase::Reasoning { .. } => Some(AnalysisPhase::Reasoning { preview: Some(uri) }),
            _ => None,
        })
    }

    /// Finish the scan with a report. Returns false if the ticket is stale.
    pub fn complete(&self, ticket: ScanTicket, report: Arc<ForensicReport>) -> bool {
        let applied = self.transition(ticket, |phase| {
            phase.is_in_progress().then(|| AnalysisPhase::Completed {
                preview: phase.preview().map(str::to_string),
                report,
            })
        });
        if applied {
            self.cancel_timers_for(ticket);
        }
        applied
    }

    /// Finish the scan with an error message. Returns false if the ticket is stale.
    pub fn fail(&self, ticket: ScanTicket, message: impl Into<String>) -> bool {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = GENERIC_FAILURE_MESSAGE.to_string();
        }
        let applied = self.transition(ticket, |phase| {
            phase.is_in_progress().then(|| AnalysisPhase::Error {
                preview: phase.preview().map(str::to_string),
                message,
            })
        });
        if applied {
            self.cancel_timers_for(ticket);
        }
        applied
    }

    /// Return to Idle from any phase, dropping report, error and preview.
    ///
    /// A scan still waiting on the provider is not aborted; its result is
    /// discarded when it arrives.
    pub fn reset(&self) {
        let mut timers = self.lock_timers();
        if let Some((_, handle)) = timers.take() {
            handle.abort();
        }
        self.inner.slot.send_modify(|slot| {
            slot.ticket = 0;
            slot.phase = AnalysisPhase::Idle;
        });
        debug!("Scan state reset");
    }

    /// Encode `source`, analyze it and record the outcome.
    pub async fn scan<P: AnalysisProvider>(
        &self,
        facade: &AnalysisFacade<P>,
        source: MediaSource,
    ) -> Result<Arc<ForensicReport>, ScanError> {
        let ticket = self.begin();

        let media = match media::encode(source).await {
            Ok(media) => media,
            Err(e) => {
                warn!("Failed to encode media: {}", e);
                self.fail(ticket, e.to_string());
                return Err(e.into());
            }
        };
        self.set_preview(ticket, media.preview_uri());

        match facade.analyze(&media).await {
            Ok(report) => {
                let report = Arc::new(report);
                if self.complete(ticket, report.clone()) {
                    Ok(report)
                } else {
                    info!("Discarding result of superseded scan {}", ticket.0);
                    Err(ScanError::Superseded)
                }
            }
            Err(e) => {
                self.fail(ticket, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Apply `next` if `ticket` is current. `next` returns None to refuse.
    fn transition<F>(&self, ticket: ScanTicket, next: F) -> bool
    where
        F: FnOnce(&AnalysisPhase) -> Option<AnalysisPhase>,
    {
        self.inner.slot.send_if_modified(|slot| {
            if slot.ticket != ticket.0 {
                return false;
            }
            match next(&slot.phase) {
                Some(phase) => {
                    slot.phase = phase;
                    true
                }
                None => false,
            }
        })
    }

    /// Advance one cosmetic step, only from its exact predecessor.
    fn advance(&self, ticket: ScanTicket, from: PhaseKind) -> bool {
        self.transition(ticket, |phase| {
            if phase.kind() != from {
                return None;
            }
            let preview = phase.preview().map(str::to_string);
            match from {
                PhaseKind::Extracting => Some(AnalysisPhase::Verifying { preview }),
                PhaseKind::Verifying => Some(AnalysisPhase::Reasoning { preview }),
                _ => None,
            }
        })
    }

    fn spawn_timers(&self, ticket: ScanTicket) -> JoinHandle<()> {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let timings = self.inner.timings;
        let started = Instant::now();

        tokio::spawn(async move {
            let steps = [
                (timings.verify_after, PhaseKind::Extracting),
                (timings.reason_after, PhaseKind::Verifying),
            ];
            for (offset, from) in steps {
                tokio::time::sleep_until(started + offset).await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                ScanController { inner }.advance(ticket, from);
            }
        })
    }

    /// Abort the timers of `ticket`; timers of a newer scan are left alone.
    fn cancel_timers_for(&self, ticket: ScanTicket) {
        let mut timers = self.lock_timers();
        if matches!(*timers, Some((owner, _)) if owner == ticket.0) {
            if let Some((_, handle)) = timers.take() {
                handle.abort();
            }
        }
    }

    fn lock_timers(&self) -> std::sync::MutexGuard<'_, Option<(u64, JoinHandle<()>)>> {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Receives phase updates from a [`ScanController`].
pub struct PhaseWatcher {
    rx: watch::Receiver<Slot>,
}

impl PhaseWatcher {
    /// Latest phase, marking it seen.
    pub fn current(&mut self) -> AnalysisPhase {
        self.rx.borrow_and_update().phase.clone()
    }

    /// Wait for the next change. None once the controller is gone.
    pub async fn changed(&mut self) -> Option<AnalysisPhase> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }
}
