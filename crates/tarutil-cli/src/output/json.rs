//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use tarutil_core::ExtractionError;
use tarutil_core::ExtractionReport;

pub struct JsonFormatter;

#[derive(Serialize)]
struct ExtractionOutput {
    files_extracted: usize,
    directories_created: usize,
    hardlinks_created: usize,
    symlinks_created: usize,
    links_skipped: usize,
    headers_ignored: usize,
    entries_failed: usize,
    bytes_written: u64,
    duration_ms: u128,
}

impl From<&ExtractionReport> for ExtractionOutput {
    fn from(report: &ExtractionReport) -> Self {
        Self {
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            hardlinks_created: report.hardlinks_created,
            symlinks_created: report.symlinks_created,
            links_skipped: report.links_skipped,
            headers_ignored: report.headers_ignored,
            entries_failed: report.entries_failed,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn render(report: &ExtractionReport, failure: Option<&ExtractionError>) -> JsonOutput<ExtractionOutput> {
        let data = ExtractionOutput::from(report);
        match failure {
            Some(err) => JsonOutput::failure("extract", data, err.to_string()),
            None => JsonOutput::success("extract", data),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(
        &self,
        report: &ExtractionReport,
        failure: Option<&ExtractionError>,
    ) -> Result<()> {
        Self::output(&Self::render(report, failure))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tarutil_core::EntryKind;

    #[test]
    fn test_success_document() {
        let mut report = ExtractionReport::new();
        report.files_extracted = 3;
        report.bytes_written = 42;

        let json = serde_json::to_value(JsonFormatter::render(&report, None)).unwrap();

        assert_eq!(json["operation"], "extract");
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["files_extracted"], 3);
        assert_eq!(json["data"]["bytes_written"], 42);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_document_keeps_counts() {
        let mut report = ExtractionReport::new();
        report.files_extracted = 2;
        report.entries_failed = 1;
        let err = ExtractionError::UnsupportedType {
            tag: b'6',
            kind: EntryKind::Fifo,
            name: PathBuf::from("run/pipe"),
        };

        let json = serde_json::to_value(JsonFormatter::render(&report, Some(&err))).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["data"]["files_extracted"], 2);
        assert_eq!(json["data"]["entries_failed"], 1);
        assert!(json["error"].as_str().unwrap().contains("run/pipe"));
    }
}
