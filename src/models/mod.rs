//! Data models for PharmAudit.

mod report;

pub use report::{
    ExtractedData, ForensicReport, GroundingCheck, ReportStatus, Source, VisualAssets,
    VisualForensics, MAX_SCORE,
};
