use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};
use std::{fs, path::PathBuf};
use tracing::debug;
use weather_journal_core::{
    Config, Endpoints, Export, ExportFormat, LoadOutcome, RecordStore, WeatherApp,
    provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-journal",
    version,
    about = "Weather lookups and a journal of past weather"
)]
pub struct Cli {
    /// Records file to use instead of the configured one.
    #[arg(long, global = true)]
    pub records: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure language, records location and service endpoints.
    Configure,

    #[command(flatten)]
    Journal(JournalCommand),
}

/// Commands that act on the records file and the weather services.
#[derive(Debug, Subcommand)]
pub enum JournalCommand {
    /// Show current conditions and a five-day forecast.
    Current {
        /// City, zip code, "lat,lon" or landmark.
        location: String,
    },

    /// Summarize past weather for a location and save it.
    Save {
        location: String,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start: String,

        /// Last day (inclusive), YYYY-MM-DD.
        #[arg(long)]
        end: String,
    },

    /// List saved records, most recent first.
    List,

    /// Show one record with its daily series.
    Show { id: String },

    /// Change a record's location or dates and refetch its data.
    Edit {
        id: String,

        /// New location; defaults to the record's current one.
        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,
    },

    /// Delete a saved record.
    Delete {
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Export all records as json, csv, xml or markdown.
    Export {
        format: ExportFormat,

        /// Output file; "-" writes to stdout. Defaults to weather_data.<ext>.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Journal(command) => {
                let app = open_app(self.records)?;
                run_journal(app, command).await
            }
        }
    }
}

async fn run_journal(mut app: WeatherApp, command: JournalCommand) -> anyhow::Result<()> {
    match command {
        JournalCommand::Current { location } => {
            let report = app.current_weather(&location).await?;
            print!("{}", render::current_report(&report));
        }
        JournalCommand::Save { location, start, end } => {
            let record = app.save_range(&location, &start, &end).await?;
            println!("Weather data saved successfully.");
            print!("{}", render::record_summary(&record));
        }
        JournalCommand::List => {
            print!("{}", render::record_list(app.records()));
        }
        JournalCommand::Show { id } => {
            let record =
                app.record(&id).with_context(|| format!("No saved record with id '{id}'"))?;
            print!("{}", render::record_detail(record));
        }
        JournalCommand::Edit { id, location, start, end } => {
            let current =
                app.record(&id).with_context(|| format!("No saved record with id '{id}'"))?;

            // Unspecified fields keep the record's current values.
            let location = location.unwrap_or_else(|| current.location.clone());
            let start = start.unwrap_or_else(|| current.start_date.to_string());
            let end = end.unwrap_or_else(|| current.end_date.to_string());

            let record = app.edit_record(&id, &location, &start, &end).await?;
            println!("Record updated successfully.");
            print!("{}", render::record_summary(&record));
        }
        JournalCommand::Delete { id, yes } => {
            if !yes
                && !Confirm::new("Are you sure you want to delete this record?")
                    .with_default(false)
                    .prompt()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            if app.delete_record(&id)? {
                println!("Record deleted successfully.");
            } else {
                println!("No record with id '{id}'; nothing deleted.");
            }
        }
        JournalCommand::Export { format, output } => match app.export(format) {
            Export::Empty(notice) => println!("{notice}"),
            Export::File(file) => {
                let path = output.unwrap_or_else(|| PathBuf::from(file.filename));
                if path.as_os_str() == "-" {
                    print!("{}", file.content);
                } else {
                    fs::write(&path, &file.content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported to {} ({})", path.display(), file.mime_type);
                }
            }
        },
    }

    Ok(())
}

fn open_app(records: Option<PathBuf>) -> anyhow::Result<WeatherApp> {
    let config = Config::load()?;
    let path = match records {
        Some(path) => path,
        None => config.records_file_path()?,
    };

    let (store, outcome) = RecordStore::open(path);
    match &outcome {
        LoadOutcome::Loaded(n) => debug!("Loaded {n} records from {}", store.path().display()),
        LoadOutcome::Missing => debug!("No records file at {}", store.path().display()),
        // Already logged by the store; an unreadable file reads as an empty journal.
        LoadOutcome::Corrupt(_) => {}
    }

    let provider = provider_from_config(&config);
    Ok(WeatherApp::new(Box::new(provider.clone()), Box::new(provider), store))
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load()?;

    let language = Text::new("Geocoding language:").with_default(&config.language).prompt()?;
    config.language = language;

    let records_default = config.records_file_path()?.display().to_string();
    let records = Text::new("Records file:").with_default(&records_default).prompt()?;
    config.records_path = Some(PathBuf::from(records));

    if Confirm::new("Change service endpoints?").with_default(false).prompt()? {
        let endpoints = &config.endpoints;
        let geocoding =
            Text::new("Geocoding endpoint:").with_default(&endpoints.geocoding).prompt()?;
        let forecast =
            Text::new("Forecast endpoint:").with_default(&endpoints.forecast).prompt()?;
        let archive = Text::new("Archive endpoint:").with_default(&endpoints.archive).prompt()?;
        config.endpoints = Endpoints { geocoding, forecast, archive };
    }

    config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
