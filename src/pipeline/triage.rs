// src/pipeline/triage.rs

//! End-to-end triage of one log object.

use serde::Serialize;

use crate::error::Result;
use crate::models::{Config, ObjectRef};
use crate::services::notify::notify;
use crate::services::{Analyzer, Notifier};
use crate::storage::LogSource;

use super::filter::scan;
use super::prompt::build_prompt;

/// How a triage run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TriageOutcome {
    /// Nothing was flagged; no model call and no alert
    NoActivity { rows_scanned: usize },

    /// An assessment was produced and published
    Notified {
        rows_scanned: usize,
        flagged: usize,
        sampled: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
}

/// Run the full pipeline for one object: fetch, filter, analyze, notify.
///
/// Every step runs once, in order. The first failure is returned as is.
pub async fn run_triage(
    config: &Config,
    source: &dyn LogSource,
    analyzer: &dyn Analyzer,
    notifier: &dyn Notifier,
    object: &ObjectRef,
) -> Result<TriageOutcome> {
    log::info!("Step 1/4: Fetching {}", object);
    let content = source.fetch_text(object).await?;

    log::info!("Step 2/4: Scanning rows");
    let report = scan(&content, config.triage.delimiter_byte()?)?;

    if report.is_empty() {
        log::info!(
            "No suspicious activity detected in {} rows",
            report.rows_scanned
        );
        return Ok(TriageOutcome::NoActivity {
            rows_scanned: report.rows_scanned,
        });
    }

    let (errors, paths, bots) = report.breakdown();
    log::info!(
        "Flagged {} of {} rows (errors: {}, sensitive paths: {}, scanners: {})",
        report.entries.len(),
        report.rows_scanned,
        errors,
        paths,
        bots
    );

    log::info!("Step 3/4: Requesting analysis");
    let sampled = report.entries.len().min(config.triage.sample_limit);
    let prompt = build_prompt(&report.entries, config.triage.sample_limit);
    let analysis = analyzer.analyze(&prompt).await?;

    log::info!("Step 4/4: Publishing alert");
    let message_id = notify(notifier, &analysis).await?;

    Ok(TriageOutcome::Notified {
        rows_scanned: report.rows_scanned,
        flagged: report.entries.len(),
        sampled,
        message_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::notify::SUBJECT;
    use crate::testing::{MemorySource, RecordingAnalyzer, RecordingNotifier};

    const HEADER: &str = "sc-status,cs-uri-stem,c-ip,cs(User-Agent),cs-method\n";

    fn object() -> ObjectRef {
        ObjectRef::new("logs", "access.csv")
    }

    #[tokio::test]
    async fn test_flagged_rows_are_analyzed_and_published() {
        let content = format!(
            "{HEADER}200,/,1.1.1.1,Mozilla/5.0,GET\n403,/wp-admin/login,10.0.0.5,Mozilla/5.0,GET\n"
        );
        let source = MemorySource::default().with("logs", "access.csv", content);
        let analyzer = RecordingAnalyzer::replying("Escaneo de wp-admin");
        let notifier = RecordingNotifier::default();

        let outcome = run_triage(&Config::default(), &source, &analyzer, &notifier, &object())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TriageOutcome::Notified {
                rows_scanned: 2,
                flagged: 1,
                sampled: 1,
                message_id: Some("msg-1".to_string()),
            }
        );

        let prompts = analyzer.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(
            "MÉTODO: GET | IP: 10.0.0.5 | RUTA: /wp-admin/login | STATUS: 403 | AGENTE: Mozilla/5.0"
        ));
        assert!(!prompts[0].contains("IP: 1.1.1.1"));

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, SUBJECT);
        assert!(sent[0].1.contains("Escaneo de wp-admin"));
    }

    #[tokio::test]
    async fn test_no_activity_skips_model_and_alert() {
        let content = format!("{HEADER}200,/,1.1.1.1,Mozilla/5.0,GET\n301,/blog,1.1.1.2,curl,GET\n");
        let source = MemorySource::default().with("logs", "access.csv", content);
        let analyzer = RecordingAnalyzer::replying("unused");
        let notifier = RecordingNotifier::default();

        let outcome = run_triage(&Config::default(), &source, &analyzer, &notifier, &object())
            .await
            .unwrap();

        assert_eq!(outcome, TriageOutcome::NoActivity { rows_scanned: 2 });
        assert!(analyzer.prompts().is_empty());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_header_only_exits_early() {
        let source = MemorySource::default().with("logs", "access.csv", HEADER);
        let analyzer = RecordingAnalyzer::replying("unused");
        let notifier = RecordingNotifier::default();

        let outcome = run_triage(&Config::default(), &source, &analyzer, &notifier, &object())
            .await
            .unwrap();

        assert_eq!(outcome, TriageOutcome::NoActivity { rows_scanned: 0 });
        assert!(analyzer.prompts().is_empty());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_sample_capped_at_thirty() {
        let mut content = String::from(HEADER);
        for i in 0..45 {
            content.push_str(&format!("404,/missing/{i},10.0.1.{i},curl,GET\n"));
        }
        let source = MemorySource::default().with("logs", "access.csv", content);
        let analyzer = RecordingAnalyzer::replying("ok");
        let notifier = RecordingNotifier::default();

        let outcome = run_triage(&Config::default(), &source, &analyzer, &notifier, &object())
            .await
            .unwrap();

        match outcome {
            TriageOutcome::Notified {
                flagged, sampled, ..
            } => {
                assert_eq!(flagged, 45);
                assert_eq!(sampled, 30);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let prompt = &analyzer.prompts()[0];
        assert_eq!(prompt.matches("MÉTODO:").count(), 30);
        assert!(prompt.contains("RUTA: /missing/29 "));
        assert!(!prompt.contains("RUTA: /missing/30 "));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let source = MemorySource::default();
        let analyzer = RecordingAnalyzer::replying("unused");
        let notifier = RecordingNotifier::default();

        let err = run_triage(&Config::default(), &source, &analyzer, &notifier, &object())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::S3(_)));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_inference_failure_sends_no_alert() {
        let content = format!("{HEADER}500,/,1.1.1.1,x,GET\n");
        let source = MemorySource::default().with("logs", "access.csv", content);
        let analyzer = RecordingAnalyzer::failing("ThrottlingException");
        let notifier = RecordingNotifier::default();

        let err = run_triage(&Config::default(), &source, &analyzer, &notifier, &object())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Bedrock(_)));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_parse_fault_stops_before_analysis() {
        let content = format!("{HEADER}404,/,1.1.1.1,x,GET\nabc,/,1.1.1.2,x,GET\n");
        let source = MemorySource::default().with("logs", "access.csv", content);
        let analyzer = RecordingAnalyzer::replying("unused");
        let notifier = RecordingNotifier::default();

        let err = run_triage(&Config::default(), &source, &analyzer, &notifier, &object())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Parse { line: 3, .. }));
        assert!(analyzer.prompts().is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let value = serde_json::to_value(TriageOutcome::NoActivity { rows_scanned: 4 }).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "status": "no_activity", "rows_scanned": 4 })
        );
    }
}
