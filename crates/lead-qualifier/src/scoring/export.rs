use std::io::Write;

use serde::Serialize;

use super::domain::{Intent, ScoreResult};

pub const EXPORT_FILENAME: &str = "results.csv";

const EXPORT_HEADER: [&str; 7] = [
    "name", "role", "company", "industry", "intent", "score", "reasoning",
];

#[derive(Serialize)]
struct ExportRow<'a> {
    name: Option<&'a str>,
    role: Option<&'a str>,
    company: Option<&'a str>,
    industry: Option<&'a str>,
    intent: Intent,
    score: u8,
    reasoning: &'a str,
}

impl<'a> From<&'a ScoreResult> for ExportRow<'a> {
    fn from(result: &'a ScoreResult) -> Self {
        Self {
            name: result.name.as_deref(),
            role: result.role.as_deref(),
            company: result.company.as_deref(),
            industry: result.industry.as_deref(),
            intent: result.intent,
            score: result.score,
            reasoning: &result.reasoning,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode results as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV export: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the header row, then one row per result in result order.
pub fn write_results_csv<W: Write>(writer: W, results: &[ScoreResult]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for result in results {
        csv_writer.serialize(ExportRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn results_to_csv(results: &[ScoreResult]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_results_csv(&mut buffer, results)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::LeadId;

    #[test]
    fn quotes_free_text_that_needs_it() {
        let results = vec![ScoreResult {
            id: LeadId("lead-1".to_string()),
            name: Some("Ava \"AP\" Patel".to_string()),
            role: Some("Head of Growth".to_string()),
            company: None,
            industry: Some("B2B SaaS".to_string()),
            intent: Intent::High,
            score: 90,
            reasoning: "Strong fit, clear budget. (rule_score=40, ai_points=50)".to_string(),
        }];

        let csv = String::from_utf8(results_to_csv(&results).expect("export")).expect("utf8");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("name,role,company,industry,intent,score,reasoning")
        );
        assert_eq!(
            lines.next(),
            Some("\"Ava \"\"AP\"\" Patel\",Head of Growth,,B2B SaaS,High,90,\"Strong fit, clear budget. (rule_score=40, ai_points=50)\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_result_set_still_exports_header() {
        let csv = results_to_csv(&[]).expect("export");
        assert_eq!(
            String::from_utf8(csv).expect("utf8"),
            "name,role,company,industry,intent,score,reasoning\n"
        );
    }
}
