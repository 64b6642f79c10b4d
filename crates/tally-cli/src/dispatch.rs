use tally_client::commands;
use tally_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Forecast { path, .. } => commands::forecast::run(path.as_deref()),
        Commands::Patterns { path, seed, .. } => commands::patterns::run(path.as_deref(), *seed),
        Commands::Anomalies { path, .. } => commands::anomalies::run(path.as_deref()),
        Commands::Health { .. } => commands::health::run(),
        Commands::Demo { command } => commands::demo::run(command.topic()),
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::parse_from;

    use super::dispatch;

    #[test]
    fn dispatches_to_expected_command_names() {
        let cases: [(&[&str], &str); 4] = [
            (&["tally", "health"], "health"),
            (&["tally", "demo", "forecast"], "demo forecast"),
            (&["tally", "demo", "patterns"], "demo patterns"),
            (&["tally", "demo", "anomalies", "--json"], "demo anomalies"),
        ];

        for (args, expected_command) in cases {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch(&cli);
                assert!(response.is_ok());
                if let Ok(success) = response {
                    assert_eq!(success.command, expected_command);
                }
            }
        }
    }
}
