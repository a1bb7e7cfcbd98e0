//! Strict extraction of the fenced JSON verdict from a model reply.

use std::sync::LazyLock;

use regex::Regex;

use super::AnalysisError;
use crate::models::{ForensicReport, Source};

/// First ```json fenced block; the body is captured lazily up to the closing fence.
static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\r?\n(.*?)\r?\n```").unwrap());

/// Return the body of the first ```json fenced block, if any.
pub fn extract_fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a model reply into a report, attaching the provider's citations.
///
/// Fails closed: no block means [`AnalysisError::ExtractionFailed`], and any
/// JSON or schema error in the block is propagated as-is.
pub fn parse_report(text: &str, citations: Vec<Source>) -> Result<ForensicReport, AnalysisError> {
    if text.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let block = extract_fenced_json(text).ok_or(AnalysisError::ExtractionFailed)?;
    let mut report: ForensicReport = serde_json::from_str(block)?;
    report.grounding_check.sources = citations;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportStatus;

    const BODY: &str = r#"{
  "authenticity_score": 34,
  "status": "Counterfeit",
  "extracted_data": {"brand": "Augmentin 625", "generic_name": "Amoxicillin + Clavulanic Acid",
    "manufacturer": "GSK", "manufacturer_address": "", "batch": "X1", "license": "",
    "mfg_date": "", "exp_date": "12/2026"},
  "visual_forensics": {"findings": ["Font kerning uneven"], "red_flags": ["Misspelt 'Clavulanic'"],
    "assets": {"logo_analysis": "Gradient banding", "font_analysis": "Non-standard", "qr_present": false}},
  "grounding_check": {"manufacturer_verified": true, "batch_valid": false,
    "alerts_found": ["CDSCO NSQ alert Aug 2025"]},
  "recommendation": "Do not consume",
  "reasoning_summary": "Batch not in manufacturer format"
}"#;

    fn reply(prefix: &str, suffix: &str) -> String {
        format!("{}```json\n{}\n```{}", prefix, BODY, suffix)
    }

    #[test]
    fn test_extract_first_block() {
        let text = "intro\n```json\n{\"a\": 1}\n```\nmore\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_fenced_json(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_tolerates_crlf() {
        assert_eq!(extract_fenced_json("```json\r\n{}\r\n```"), Some("{}"));
    }

    #[test]
    fn test_parse_with_trailing_prose_and_citations() {
        let citations = vec![Source {
            title: "CDSCO drug alerts".to_string(),
            uri: "https://cdsco.gov.in/alerts".to_string(),
        }];
        let report = parse_report(
            &reply("Detailed analysis follows.\n\n", "\n\nStay safe."),
            citations.clone(),
        )
        .unwrap();

        let expected: ForensicReport = serde_json::from_str(BODY).unwrap();
        assert_eq!(report.authenticity_score, expected.authenticity_score);
        assert_eq!(report.status, ReportStatus::Counterfeit);
        assert_eq!(report.extracted_data, expected.extracted_data);
        assert_eq!(report.visual_forensics, expected.visual_forensics);
        assert_eq!(report.grounding_check.alerts_found, expected.grounding_check.alerts_found);
        assert_eq!(report.grounding_check.sources, citations);
    }

    #[test]
    fn test_parse_without_citations_has_empty_sources() {
        let report = parse_report(&reply("", ""), Vec::new()).unwrap();
        assert!(report.grounding_check.sources.is_empty());
    }

    #[test]
    fn test_model_supplied_sources_are_replaced() {
        let body = BODY.replace(
            "\"alerts_found\": [\"CDSCO NSQ alert Aug 2025\"]",
            "\"alerts_found\": [], \"sources\": [{\"title\": \"made up\", \"uri\": \"x\"}]",
        );
        let text = format!("```json\n{}\n```", body);
        let report = parse_report(&text, Vec::new()).unwrap();
        assert!(report.grounding_check.sources.is_empty());
    }

    #[test]
    fn test_no_block_is_extraction_failure() {
        let long = "The packaging looks authentic. ".repeat(500);
        for text in [long.as_str(), BODY, "```\n{}\n```", "```json {} ```"] {
            assert!(matches!(
                parse_report(text, Vec::new()),
                Err(AnalysisError::ExtractionFailed)
            ));
        }
    }

    #[test]
    fn test_empty_text_is_empty_response() {
        assert!(matches!(
            parse_report("", Vec::new()),
            Err(AnalysisError::EmptyResponse)
        ));
    }

    #[test]
    fn test_malformed_block_propagates_json_error() {
        let err = parse_report("```json\n{\"authenticity_score\": 12,\n```", Vec::new()).unwrap_err();
        match err {
            AnalysisError::MalformedJson(inner) => assert!(inner.is_eof() || inner.is_syntax()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_schema_violation_is_malformed_json() {
        let text = format!("```json\n{}\n```", BODY.replace("\"Counterfeit\"", "\"Unknown\""));
        assert!(matches!(
            parse_report(&text, Vec::new()),
            Err(AnalysisError::MalformedJson(_))
        ));
    }
}
