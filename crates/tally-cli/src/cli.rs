use clap::{Parser, Subcommand};
use tally_client::DEFAULT_CLUSTER_SEED;

/// Input notes shared by every analysis command's `--help`.
pub const INPUT_AFTER_HELP: &str = "\
Input:
  <path> is a local file. Use `-` (or omit it) to read piped stdin.
  Example: cat expenses.json | tally anomalies -

  Accepted formats:
    JSON array:   [{\"date\": \"2026-01-15\", \"amount\": 42.15, \"category\": \"Food\"}]
    JSON object:  {\"expenses\": [ ...same objects... ]}
    CSV:          date,amount,category
                  2026-01-15,42.15,Food

Field rules:
  date      ISO-8601 date or timestamp (time of day is ignored)
  amount    non-negative number
  category  Food, Transport, Shopping, Bills, Entertainment, Healthcare,
            Education or Other. Other labels are kept but are not clustered.

Any malformed record fails the whole run; nothing is partially analyzed.
";

#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "Expense analytics: budget forecast, spending patterns and anomalies",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast next month's total spending (needs 3+ records)
    #[command(after_help = INPUT_AFTER_HELP)]
    Forecast {
        /// Expense file path, or `-` for stdin
        path: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Group spending into behavioral patterns with k-means (needs 5+ records)
    #[command(after_help = INPUT_AFTER_HELP)]
    Patterns {
        /// Expense file path, or `-` for stdin
        path: Option<String>,
        /// Seed for cluster initialization; the same seed gives the same clusters
        #[arg(long, default_value_t = DEFAULT_CLUSTER_SEED)]
        seed: u64,
        #[arg(long)]
        json: bool,
    },
    /// Flag unusually large transactions (needs 5+ records)
    #[command(after_help = INPUT_AFTER_HELP)]
    Anomalies {
        /// Expense file path, or `-` for stdin
        path: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Report that the analysis core is ready
    Health {
        #[arg(long)]
        json: bool,
    },
    /// Run an analysis over bundled sample data
    Demo {
        #[command(subcommand)]
        command: DemoCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DemoCommand {
    /// Forecast on sample data
    Forecast {
        #[arg(long)]
        json: bool,
    },
    /// Spending patterns on sample data
    Patterns {
        #[arg(long)]
        json: bool,
    },
    /// Anomaly detection on sample data
    Anomalies {
        #[arg(long)]
        json: bool,
    },
}

impl DemoCommand {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Forecast { .. } => "forecast",
            Self::Patterns { .. } => "patterns",
            Self::Anomalies { .. } => "anomalies",
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
