//! CLI route: single route table and run context. Dispatches to the catalog and presentation.

use crate::app::AppContext;
use crate::catalog::Catalog;
use crate::codec;
use crate::error::CatalogError;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use crate::cli::command_name;
use crate::cli::parse::{Commands, RegistryCommands, TagCommands};
use crate::cli::presentation::{
    format_activity, format_history_json, format_history_text, format_image_list_json,
    format_image_list_text, format_image_result, format_names, format_registry_json,
    format_registry_text, format_scan_summary, format_status_json, format_status_text,
};

/// Runtime context for CLI execution: catalog root and the application context.
pub struct RunContext {
    app: AppContext,
    root: PathBuf,
}

impl RunContext {
    /// Create run context from the catalog root and optional config path.
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, CatalogError> {
        let app = AppContext::load(&root, config_path.as_deref())?;
        Ok(Self { app, root })
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, CatalogError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = %name, "Executing command");
        let result = self.execute_inner(command);
        info!(
            command = %name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, CatalogError> {
        match command {
            Commands::Scan => {
                let catalog = self.open_catalog()?;
                Ok(format_scan_summary(catalog.report(), catalog.len()))
            }
            Commands::List { format, tag } => {
                let catalog = self.open_catalog()?;
                let tag = tag.as_deref().map(codec::normalize_tag).transpose()?;
                let images: Vec<_> = catalog
                    .images()
                    .iter()
                    .filter(|i| tag.as_deref().map_or(true, |t| i.has_tag(t)))
                    .collect();
                if format == "json" {
                    Ok(format_image_list_json(&images))
                } else {
                    Ok(format_image_list_text(&images))
                }
            }
            Commands::Status { format } => {
                let catalog = self.open_catalog()?;
                let registered = self.app.registry().read().len();
                if format == "json" {
                    Ok(format_status_json(&catalog, registered))
                } else {
                    Ok(format_status_text(&catalog, registered))
                }
            }
            Commands::Tag { command } => self.handle_tag_command(command),
            Commands::Revert { image, name } => {
                let mut catalog = self.open_catalog()?;
                let id = catalog.find(image)?.id();
                let image = catalog.revert(id, name)?;
                Ok(format_image_result(image))
            }
            Commands::History { image, format } => {
                let catalog = self.open_catalog()?;
                let image = catalog.find(image)?;
                let history = catalog.history(image.id())?;
                if format == "json" {
                    Ok(format_history_json(image, history))
                } else {
                    Ok(format_history_text(image, history))
                }
            }
            Commands::Names { image } => {
                let catalog = self.open_catalog()?;
                let id = catalog.find(image)?.id();
                Ok(format_names(&catalog.names(id)?))
            }
            Commands::Registry { command } => self.handle_registry_command(command),
            Commands::Activity { lines } => {
                let lines = self.app.activity().tail(*lines)?;
                Ok(format_activity(&lines))
            }
            Commands::Config => self.app.config().to_toml(),
        }
    }

    fn handle_tag_command(&self, command: &TagCommands) -> Result<String, CatalogError> {
        let mut catalog = self.open_catalog()?;
        match command {
            TagCommands::Add { image, tags } => {
                let tags = normalize_all(tags)?;
                let id = catalog.find(image)?.id();
                let image = catalog.add_tags(id, &tags)?;
                Ok(format_image_result(image))
            }
            TagCommands::Remove { image, tags } => {
                let tags = normalize_all(tags)?;
                let id = catalog.find(image)?.id();
                let image = catalog.delete_tags(id, &tags)?;
                Ok(format_image_result(image))
            }
        }
    }

    fn handle_registry_command(&self, command: &RegistryCommands) -> Result<String, CatalogError> {
        match command {
            RegistryCommands::Add { tags } => {
                let tags = normalize_all(tags)?;
                let mut registry = self.app.registry().write();
                let mut added = 0;
                for tag in &tags {
                    if registry.add(tag)? {
                        added += 1;
                    }
                }
                Ok(format!(
                    "Registered {} new tag(s); {} total",
                    added,
                    registry.len()
                ))
            }
            RegistryCommands::Remove { tags } => {
                let tags = normalize_all(tags)?;
                let mut registry = self.app.registry().write();
                for tag in &tags {
                    registry.remove(tag)?;
                }
                Ok(format!(
                    "Removed {} tag(s); {} total",
                    tags.len(),
                    registry.len()
                ))
            }
            RegistryCommands::List { format } => {
                let registry = self.app.registry().read();
                if format == "json" {
                    Ok(format_registry_json(registry.all()))
                } else {
                    Ok(format_registry_text(registry.all()))
                }
            }
        }
    }

    fn open_catalog(&self) -> Result<Catalog, CatalogError> {
        self.app.open_catalog(&self.root)
    }
}

fn normalize_all(tags: &[String]) -> Result<Vec<String>, CatalogError> {
    tags.iter().map(|t| codec::normalize_tag(t)).collect()
}
