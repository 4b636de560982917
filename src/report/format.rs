//! Formatted terminal output for summaries and suggestions.

use crate::domain::{AnalysisSuggestion, DatasetSummary};
use crate::report::privacy::PrivacyReport;

/// Format the overview block (counts, adherence stats, date range).
pub fn format_overview(summary: &DatasetSummary, group_by: &str) -> String {
    let mut out = String::new();

    out.push_str("=== Adherence Insights - Overview ===\n");
    out.push_str(&format!(
        "Records: n={} | unique {group_by}: {}\n",
        summary.record_count, summary.unique_patient_count
    ));
    out.push_str(&format!(
        "Adherence: mean={:.1}% | range=[{:.1}%, {:.1}%]\n",
        summary.mean_adherence * 100.0,
        summary.min_adherence * 100.0,
        summary.max_adherence * 100.0
    ));
    out.push_str(&format!(
        "Dates: {} - {}\n",
        summary.start_date.format("%Y-%m-%d"),
        summary.end_date.format("%Y-%m-%d")
    ));

    out
}

/// Format the suggestion list returned by the model.
pub fn format_suggestions(suggestions: &[AnalysisSuggestion]) -> String {
    let mut out = String::new();

    out.push_str("Suggested analyses:\n");
    for (i, s) in suggestions.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, s.analysis_type));
        out.push_str(&format!("   Description: {}\n", s.description));
        out.push_str(&format!("   Rationale  : {}\n", s.rationale));
    }

    out
}

/// Format the simulated disclosure-risk display.
pub fn format_privacy_report(report: &PrivacyReport) -> String {
    let mut out = String::new();

    out.push_str("Anonymization report (simulated):\n");
    out.push_str(&format!(
        "- Overall privacy score: {}/100 ({})\n",
        report.score(),
        report.overall_label()
    ));
    out.push_str(&format!(
        "- k-Anonymity: {} ({})\n",
        report.k_anonymity,
        report.k_anonymity_label()
    ));
    out.push_str(&format!(
        "- l-Diversity: {} ({})\n",
        report.l_diversity,
        report.l_diversity_label()
    ));
    out.push_str(&format!("- t-Closeness: {} (Good)\n", report.t_closeness));
    out.push_str("All processing happens locally; records never leave this machine.\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn overview_renders_percentages_and_dates() {
        let summary = DatasetSummary {
            record_count: 3,
            unique_patient_count: 2,
            mean_adherence: 0.825,
            min_adherence: 0.75,
            max_adherence: 0.9,
            start_date: DateTime::from_timestamp_millis(1_672_531_200_000).unwrap(),
            end_date: DateTime::from_timestamp_millis(1_672_704_000_000).unwrap(),
        };

        let text = format_overview(&summary, "patientId");
        assert!(text.contains("n=3 | unique patientId: 2"));
        assert!(text.contains("mean=82.5%"));
        assert!(text.contains("range=[75.0%, 90.0%]"));
        assert!(text.contains("2023-01-01 - 2023-01-03"));
    }

    #[test]
    fn suggestions_are_numbered() {
        let suggestions = vec![
            AnalysisSuggestion {
                analysis_type: "trend detection".to_string(),
                description: "d1".to_string(),
                rationale: "r1".to_string(),
            },
            AnalysisSuggestion {
                analysis_type: "anomaly detection".to_string(),
                description: "d2".to_string(),
                rationale: "r2".to_string(),
            },
        ];

        let text = format_suggestions(&suggestions);
        assert!(text.contains("1. trend detection"));
        assert!(text.contains("2. anomaly detection"));
        assert!(text.contains("Rationale  : r2"));
    }
}
