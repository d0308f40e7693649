//! JSON reporter
//!
//! Pretty-printed [`Report`] document; sections that were not requested are
//! omitted.

use super::Report;
use anyhow::Result;

pub fn render(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["repository"], "/work/app");
        assert_eq!(parsed["authors"][0]["email"], "alice@x");
        assert_eq!(parsed["summary"]["total_issues"], 3);
        assert_eq!(parsed["churn"][0]["net_lines"], 20);
        assert_eq!(parsed["warnings"].as_array().expect("warnings array").len(), 1);
    }

    #[test]
    fn test_json_omits_unrequested_sections() {
        let report = test_report();
        let parsed: serde_json::Value = serde_json::from_str(&render(&report).unwrap()).unwrap();
        assert!(parsed.get("coverage").is_none());
        assert!(parsed.get("spelling").is_none());
        assert!(parsed.get("files").is_none());
    }
}
