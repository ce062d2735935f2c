//! Console output formatter for orchestration results

use colored::Colorize;
use ensemble_domain::{
    Contribution, ContributionOutcome, OutputFormat, PerformanceRecord, ResponseEnvelope,
};

/// Formats response envelopes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `envelope` in the requested format.
    pub fn render(
        format: OutputFormat,
        request: &str,
        envelope: &ResponseEnvelope,
        stats: &[PerformanceRecord],
    ) -> String {
        match format {
            OutputFormat::Answer => Self::format_answer(envelope),
            OutputFormat::Full => Self::format_full(request, envelope, stats),
            OutputFormat::Json => Self::format_json(envelope),
        }
    }

    /// Final answer only, or the error when the run failed
    pub fn format_answer(envelope: &ResponseEnvelope) -> String {
        if envelope.success {
            let mut output = envelope.content.clone();
            output.push('\n');
            if envelope.degraded() {
                let failed = envelope.failed_contributions().count();
                output.push_str(&format!(
                    "{}\n",
                    format!(
                        "({} of {} models failed)",
                        failed,
                        envelope.contributions.len()
                    )
                    .dimmed()
                ));
            }
            output
        } else {
            format!("{} {}\n", "Error:".red().bold(), Self::error_text(envelope))
        }
    }

    /// Answer, every contribution and ledger statistics
    pub fn format_full(
        request: &str,
        envelope: &ResponseEnvelope,
        stats: &[PerformanceRecord],
    ) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Ensemble Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Request:".cyan().bold(), request));
        output.push_str(&format!(
            "{} {}\n",
            "Strategy:".cyan().bold(),
            envelope.strategy
        ));
        output.push_str(&format!(
            "{} {} ms, average confidence {:.2}\n",
            "Time:".cyan().bold(),
            envelope.total_time_ms,
            envelope.average_confidence()
        ));

        output.push_str(&Self::section_header("Contributions"));
        if envelope.contributions.is_empty() {
            output.push_str(&format!("\n{}\n", "(no model was dispatched)".dimmed()));
        }
        for contribution in &envelope.contributions {
            output.push_str(&Self::contribution(contribution));
        }

        output.push_str(&Self::section_header("Answer"));
        if envelope.success {
            output.push_str(&format!("\n{}\n", envelope.content));
        } else {
            output.push_str(&format!(
                "\n{} {}\n",
                "Error:".red().bold(),
                Self::error_text(envelope)
            ));
        }

        if !stats.is_empty() {
            output.push_str(&Self::section_header("Model Statistics"));
            output.push_str(&Self::stats_table(stats));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(envelope: &ResponseEnvelope) -> String {
        serde_json::to_string_pretty(envelope).unwrap_or_else(|_| "{}".to_string())
    }

    fn contribution(contribution: &Contribution) -> String {
        let title = format!(
            "── {} ({} ms, confidence {:.2}) ──",
            contribution.model_name, contribution.latency_ms, contribution.confidence
        );
        match &contribution.outcome {
            ContributionOutcome::Success { content } => {
                format!("\n{}\n{}\n", title.yellow().bold(), content)
            }
            ContributionOutcome::Failure { kind, message } => format!(
                "\n{}\n{} {}\n",
                title.red().bold(),
                format!("[{}]", kind).red(),
                message
            ),
        }
    }

    fn stats_table(stats: &[PerformanceRecord]) -> String {
        let mut rows: Vec<&PerformanceRecord> = stats.iter().collect();
        rows.sort_by(|a, b| a.model_id.cmp(&b.model_id));

        let mut output = format!(
            "{:<24} {:>8} {:>8} {:>12} {:>8}\n",
            "model", "calls", "failed", "avg latency", "success"
        );
        for record in rows {
            output.push_str(&format!(
                "{:<24} {:>8} {:>8} {:>9.0} ms {:>7.0}%\n",
                record.model_id,
                record.total_calls,
                record.failed_calls,
                record.average_latency_ms,
                record.success_rate * 100.0
            ));
        }
        output
    }

    fn error_text(envelope: &ResponseEnvelope) -> String {
        envelope
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
