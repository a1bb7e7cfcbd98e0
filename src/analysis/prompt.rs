//! Instruction prompt for the forensic audit.

/// Forensic-auditor instruction sent with every packaging image.
///
/// The reply must end with a ```json fenced block matching
/// [`crate::models::ForensicReport`] minus `grounding_check.sources`.
pub const FORENSIC_AUDIT_PROMPT: &str = r#"Act as a Senior Pharmaceutical Forensic Auditor specialized in the Indian market (CDSCO standards).
Analyze this medicine packaging image.

STAGE 1: EXTRACT DATA
- Brand Name, Generic Name (API), Manufacturer, Address, Batch Number, Mfg/Exp Dates, License Number (DL No).
- Analyze logo placement, font, color consistency. Check for QR/DataMatrix.

STAGE 2: VERIFICATION (Use Google Search Grounding)
- Verify if the License Number corresponds to the Manufacturer in CDSCO database.
- Check if Batch Number format matches standard formats for this specific manufacturer.
- Search for recent Drug Alerts or Recalls for this Brand or Batch in India (2025-2026).

STAGE 3: FORENSIC REASONING
- Identify misspellings, blurry micro-text, or non-standard logo gradients.
- Flag data mismatches.

IMPORTANT: Provide a detailed analysis.
You MUST end your response with a valid JSON block enclosed in triple backticks ```json ... ```.
The JSON MUST follow this structure:
{
  "authenticity_score": number (0-100),
  "status": "Verified" | "Suspect" | "Counterfeit",
  "extracted_data": {
    "brand": "string",
    "generic_name": "string",
    "manufacturer": "string",
    "manufacturer_address": "string",
    "batch": "string",
    "license": "string",
    "mfg_date": "string",
    "exp_date": "string"
  },
  "visual_forensics": {
    "findings": ["string"],
    "red_flags": ["string"],
    "assets": {
      "logo_analysis": "string",
      "font_analysis": "string",
      "qr_present": boolean
    }
  },
  "grounding_check": {
    "manufacturer_verified": boolean,
    "batch_valid": boolean,
    "alerts_found": ["string"]
  },
  "recommendation": "string",
  "reasoning_summary": "string"
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_every_report_field() {
        for field in [
            "authenticity_score",
            "status",
            "extracted_data",
            "manufacturer_address",
            "mfg_date",
            "exp_date",
            "red_flags",
            "qr_present",
            "manufacturer_verified",
            "batch_valid",
            "alerts_found",
            "recommendation",
            "reasoning_summary",
        ] {
            assert!(FORENSIC_AUDIT_PROMPT.contains(field), "missing {}", field);
        }
        assert!(FORENSIC_AUDIT_PROMPT.contains("```json"));
        assert!(!FORENSIC_AUDIT_PROMPT.contains("\"sources\""));
    }
}
