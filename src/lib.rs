//! PharmAudit - forensic verification of medicine packaging.
//!
//! A photo or video of a medicine strip is sent to a hosted multimodal model
//! that extracts label data, inspects visual security features and checks
//! regulatory records through web search. The reply is parsed into a
//! [`models::ForensicReport`] and shown as a dashboard in the terminal or
//! the browser.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod llm;
pub mod media;
pub mod models;
pub mod server;
pub mod session;
