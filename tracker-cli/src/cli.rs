use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use std::sync::Arc;

use tracker_core::{
    Config, FileStore, SearchOrchestrator, SelectionSnapshot, SelectionStore, client_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tracker", version, about = "Weather tracker CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key.
    Configure,

    /// Show current weather for a location name, zip, or "lat,lon" pair.
    ///
    /// On success the location becomes the remembered selection.
    Current {
        /// Location name, zip, or "lat,lon".
        query: String,
    },

    /// Search matching locations, pick one, and remember it.
    Search {
        /// Partial location name.
        text: String,
    },

    /// Show weather for the remembered location.
    Show,

    /// Forget the remembered location.
    Clear,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { query } => {
                let selection = build_selection_store()?;
                selection.update_weather(&query).await;
                render_selection(&selection.state());
                Ok(())
            }
            Command::Search { text } => search(&text).await,
            Command::Show => {
                let selection = build_selection_store()?;
                if selection.saved_query().is_none() {
                    println!("No saved location. Try `tracker search <name>` first.");
                    return Ok(());
                }
                selection.restore_on_start().await;
                render_selection(&selection.state());
                Ok(())
            }
            Command::Clear => {
                let selection = build_selection_store()?;
                selection.clear();
                println!("Saved location cleared.");
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search(text: &str) -> Result<()> {
    let config = Config::load()?;
    let client = Arc::new(client_from_config(&config)?);
    let store = Arc::new(FileStore::open_default()?);

    let orchestrator = SearchOrchestrator::new(client.clone());
    orchestrator.set_search_text(text);
    orchestrator.perform_search().await;

    let state = orchestrator.state();
    if let Some(message) = &state.error_message {
        println!("{message}");
        return Ok(());
    }
    if state.results.is_empty() {
        // Empty search text is a no-op in the orchestrator.
        println!("Nothing to search for.");
        return Ok(());
    }

    let labels: Vec<String> = state
        .results
        .iter()
        .map(|entry| {
            format!(
                "{}, {}, {} ({}°F, {})",
                entry.candidate.name,
                entry.candidate.region,
                entry.candidate.country,
                entry.formatted_temperature,
                entry.snapshot.condition_text,
            )
        })
        .collect();

    let picked = Select::new("Select a location:", labels)
        .raw_prompt()
        .context("Selection cancelled")?;
    let entry = &state.results[picked.index];

    let selection = SelectionStore::new(client, store);
    selection.update_weather(&entry.candidate.coordinate_query()).await;
    render_selection(&selection.state());
    Ok(())
}

fn build_selection_store() -> Result<SelectionStore> {
    let config = Config::load()?;
    let client = client_from_config(&config)?;
    let store = FileStore::open_default()?;
    Ok(SelectionStore::new(Arc::new(client), Arc::new(store)))
}

fn render_selection(snapshot: &SelectionSnapshot) {
    if let Some(message) = &snapshot.error_message {
        println!("{message}");
        return;
    }
    if !snapshot.is_selected {
        println!("No location selected. Try `tracker search <name>`.");
        return;
    }

    println!("{}", snapshot.city_name);
    println!("  Temperature: {}°F (feels like {})", snapshot.temperature, snapshot.feels_like);
    println!("  Humidity:    {}", snapshot.humidity);
    println!("  UV index:    {}", snapshot.uv_index);
    if let Some(icon) = &snapshot.icon_url {
        println!("  Icon:        {icon}");
    }
}
