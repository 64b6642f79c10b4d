use crate::cli::{Commands, DemoCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Forecast { json, .. }
        | Commands::Patterns { json, .. }
        | Commands::Anomalies { json, .. }
        | Commands::Health { json } => *json,
        Commands::Demo { command } => match command {
            DemoCommand::Forecast { json }
            | DemoCommand::Patterns { json }
            | DemoCommand::Anomalies { json } => *json,
        },
    };
    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
