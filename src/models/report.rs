//! Forensic report returned by one packaging analysis.

use serde::{Deserialize, Deserializer, Serialize};

/// Authenticity verdict issued by the analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Verified,
    Suspect,
    Counterfeit,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "Verified",
            Self::Suspect => "Suspect",
            Self::Counterfeit => "Counterfeit",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label fields read off the packaging. Empty strings mean "not detected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub brand: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub manufacturer_address: String,
    pub batch: String,
    pub license: String,
    pub mfg_date: String,
    pub exp_date: String,
}

impl ExtractedData {
    /// Fields in display order, paired with their labels.
    pub fn labelled_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("Brand", self.brand.as_str()),
            ("Generic Name", self.generic_name.as_str()),
            ("Manufacturer", self.manufacturer.as_str()),
            ("Manufacturer Address", self.manufacturer_address.as_str()),
            ("Batch Number", self.batch.as_str()),
            ("License (DL No)", self.license.as_str()),
            ("Mfg Date", self.mfg_date.as_str()),
            ("Exp Date", self.exp_date.as_str()),
        ]
    }
}

/// Commentary on logo, typography and security markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualAssets {
    pub logo_analysis: String,
    pub font_analysis: String,
    /// Whether a QR/DataMatrix security marker was seen.
    pub qr_present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualForensics {
    pub findings: Vec<String>,
    pub red_flags: Vec<String>,
    pub assets: VisualAssets,
}

/// A web citation returned by search grounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Registry cross-check results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingCheck {
    pub manufacturer_verified: bool,
    pub batch_valid: bool,
    pub alerts_found: Vec<String>,
    /// Filled from provider citation metadata, never from the model's JSON body.
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Typed result of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForensicReport {
    #[serde(deserialize_with = "deserialize_score")]
    pub authenticity_score: u8,
    pub status: ReportStatus,
    pub extracted_data: ExtractedData,
    pub visual_forensics: VisualForensics,
    pub grounding_check: GroundingCheck,
    pub recommendation: String,
    pub reasoning_summary: String,
}

/// Maximum authenticity score.
pub const MAX_SCORE: u8 = 100;

/// Accept whole numbers in `0..=100`; models sometimes emit `87.0`.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.fract() != 0.0 || !(0.0..=f64::from(MAX_SCORE)).contains(&raw) {
        return Err(serde::de::Error::custom(format!(
            "authenticity_score must be an integer between 0 and {}, got {}",
            MAX_SCORE, raw
        )));
    }
    Ok(raw as u8)
}
