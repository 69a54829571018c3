use std::io::{self, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weather_core::{App, Config, Route, landing::PLACEHOLDER, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key in the config file.
    Configure,

    /// Prompt for cities until cancelled (default).
    Search,

    /// Show current weather for a city.
    Show {
        /// City name, used as typed.
        city: String,
    },

    /// Open a route path, e.g. "/weather/Paris".
    Open {
        path: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Search) {
            Command::Configure => configure(),
            Command::Search => {
                let mut app = build_app()?;
                search_loop(&mut app).await
            }
            Command::Show { city } => {
                let mut app = build_app()?;
                visit(&mut app, Route::for_city(&city)).await
            }
            Command::Open { path } => {
                let mut app = build_app()?;
                visit(&mut app, Route::parse(&path)).await
            }
        }
    }
}

fn build_app() -> anyhow::Result<App> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(App::new(provider))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(inquire::validator::Validation::Invalid("API key must not be empty".into()))
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key.trim().to_string());
    let path = config.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

/// Navigate and print the resulting screen. While the detail view waits for
/// its request the loading screen is printed first.
async fn visit(app: &mut App, route: Route) -> anyhow::Result<()> {
    if let Some(ticket) = app.begin(route) {
        print!("{app}");
        io::stdout().flush().context("Failed to flush stdout")?;
        app.finish(ticket).await;
    }
    print!("{app}");
    Ok(())
}

/// The landing page as a prompt: each accepted city shows its weather, then
/// the prompt comes back. Esc or Ctrl-C leaves.
async fn search_loop(app: &mut App) -> anyhow::Result<()> {
    loop {
        print!("{app}");

        let input = match Text::new("City:").with_placeholder(PLACEHOLDER).prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                debug!("search cancelled");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        app.landing_mut().set_input(input);
        let Ok(route) = app.landing_mut().submit() else {
            continue;
        };

        println!();
        visit(app, route).await?;
        println!();

        app.navigate(Route::Landing).await;
    }
}
