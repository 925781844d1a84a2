use crate::cli::{Commands, ImportCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Import { command } => match command {
            ImportCommand::Create { json, .. }
            | ImportCommand::List { json }
            | ImportCommand::Delete { json, .. }
            | ImportCommand::Clear { json } => *json,
        },
        Commands::Drill(args) => args.json,
        Commands::Categories(args) => args.json,
        Commands::Trend(args) => args.json,
    };
    OutputMode::from_flag(json)
}
