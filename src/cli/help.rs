//! CLI help: stable command names for logging.

use crate::cli::parse::{Commands, RegistryCommands, TagCommands};

/// Dotted command name (e.g. "tag.add", "registry.list").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Scan => "scan".to_string(),
        Commands::List { .. } => "list".to_string(),
        Commands::Status { .. } => "status".to_string(),
        Commands::Tag { command } => format!("tag.{}", tag_command_name(command)),
        Commands::Revert { .. } => "revert".to_string(),
        Commands::History { .. } => "history".to_string(),
        Commands::Names { .. } => "names".to_string(),
        Commands::Registry { command } => format!("registry.{}", registry_command_name(command)),
        Commands::Activity { .. } => "activity".to_string(),
        Commands::Config => "config".to_string(),
    }
}

pub fn tag_command_name(command: &TagCommands) -> &'static str {
    match command {
        TagCommands::Add { .. } => "add",
        TagCommands::Remove { .. } => "remove",
    }
}

pub fn registry_command_name(command: &RegistryCommands) -> &'static str {
    match command {
        RegistryCommands::Add { .. } => "add",
        RegistryCommands::Remove { .. } => "remove",
        RegistryCommands::List { .. } => "list",
    }
}
