//! Console report rendering for decision records.

use colored::Colorize;
use conclave_domain::{DecisionOutcome, DecisionRecord};

/// Output format for decision reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full human-readable report
    #[default]
    Full,
    /// Machine-readable JSON
    Json,
}

/// Formats decision records for console display
pub struct ConsoleReport;

impl ConsoleReport {
    /// Format the complete decision record
    pub fn format(record: &DecisionRecord) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!(
            "Decision Report ({})",
            record.strategy
        )));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            record.question
        ));
        output.push_str(&format!("{} {}\n\n", "Domain:".cyan().bold(), record.domain));

        // Outcome line
        let outcome = match record.outcome {
            DecisionOutcome::Passed => record.outcome.to_string().to_uppercase().green().bold(),
            DecisionOutcome::Failed => record.outcome.to_string().to_uppercase().red().bold(),
            DecisionOutcome::NoConsensus => {
                record.outcome.to_string().to_uppercase().yellow().bold()
            }
        };
        output.push_str(&format!(
            "{} {}  {}\n",
            "Outcome:".cyan().bold(),
            outcome,
            record.vote_summary()
        ));

        match &record.winning_choice {
            Some(choice) => output.push_str(&format!(
                "{} {} ({:.1}% of total weight)\n",
                "Winner:".cyan().bold(),
                choice,
                record.winning_share * 100.0
            )),
            None if record.tied => output.push_str(&format!(
                "{} exact tie — escalate, never auto-broken\n",
                "Winner:".cyan().bold()
            )),
            None => output.push_str(&format!("{} none\n", "Winner:".cyan().bold())),
        }

        if let Some(policy) = record.policy {
            output.push_str(&format!(
                "{} {}\n",
                "Policy:".cyan().bold(),
                policy.description()
            ));
        }
        if let Some(convergence) = record.convergence {
            output.push_str(&format!(
                "{} {} after {} challenge round(s)\n",
                "Convergence:".cyan().bold(),
                convergence,
                record.rounds_executed
            ));
        }

        // Per-participant breakdown
        if !record.breakdown.entries.is_empty() {
            output.push_str(&Self::section_header("Breakdown"));
            for entry in &record.breakdown.entries {
                let line = match &entry.ballot {
                    conclave_domain::Ballot::Voted { opinion } => format!(
                        "  {:<20} w={:<5} {:<12} ({}) {}",
                        entry.participant.to_string(),
                        entry.weight,
                        opinion.choice,
                        opinion.confidence,
                        opinion.reasoning
                    ),
                    conclave_domain::Ballot::Abstained { reason } => format!(
                        "  {:<20} w={:<5} {}",
                        entry.participant.to_string(),
                        entry.weight,
                        format!("abstained: {}", reason).dimmed()
                    ),
                    conclave_domain::Ballot::Invalid { reason, .. } => format!(
                        "  {:<20} w={:<5} {}",
                        entry.participant.to_string(),
                        entry.weight,
                        format!("invalid: {}", reason).red()
                    ),
                };
                output.push_str(&line);
                output.push('\n');
            }
        }

        // Dissent survives even a passing vote
        if let Some(dissent) = &record.dissent {
            output.push_str(&Self::section_header("Dissent"));
            output.push_str(&format!(
                "  {} (weight {}) voted {}:\n  {}\n",
                dissent.participant.to_string().yellow().bold(),
                dissent.weight,
                dissent.choice,
                dissent.reasoning
            ));
        }

        // Cascade trace
        if let Some(cascade) = &record.cascade {
            output.push_str(&Self::section_header("Cascade"));
            output.push_str(&format!(
                "  degradation: {}\n  level: {} of {} attempted\n  elapsed: {}ms\n",
                cascade.degradation.yellow().bold(),
                cascade.level_index + 1,
                cascade.attempted.len(),
                cascade.elapsed_ms
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(record: &DecisionRecord) -> String {
        serde_json::to_string_pretty(record)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn header(title: &str) -> String {
        format!("\n{}\n{}\n", title.bold(), "=".repeat(60))
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(60))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60))
    }
}
