use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, DataBlock, DataPoint, ExcludeBlock, ExtensionMode, ForecastClient, ForecastRequest,
    ForecastResponse, HeaderPolicy, Location, UnitSystem,
};
use inquire::{Password, Select};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Forecast.io weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default unit system.
    Configure,

    /// Show the forecast for a location.
    Show {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// RFC 3339 instant; if absent, means "now".
        #[arg(long)]
        time: Option<String>,

        /// us, si, ca, uk or auto. Defaults to the configured units.
        #[arg(long)]
        units: Option<UnitSystem>,

        /// Extended forecast range, e.g. "hourly".
        #[arg(long)]
        extend: Option<ExtensionMode>,

        /// Blocks to leave out, comma separated.
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<ExcludeBlock>,

        /// Don't fail when quota/timing headers are missing.
        #[arg(long)]
        lenient: bool,

        /// Print the decoded response as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                latitude,
                longitude,
                time,
                units,
                extend,
                exclude,
                lenient,
                json,
            } => {
                let config = Config::load()?;
                let mut client_config = config.client_config()?;
                if lenient {
                    client_config.header_policy = HeaderPolicy::Lenient;
                }

                let mut request = ForecastRequest::new(Location::new(latitude, longitude)?)
                    .exclude(exclude);
                if let Some(time) = time.as_deref().map(parse_time).transpose()? {
                    request = request.at(time);
                }
                if let Some(units) = units.or(config.default_units()?) {
                    request = request.units(units);
                }
                if let Some(extend) = extend {
                    request = request.extend(extend);
                }

                let client = ForecastClient::from_config(client_config)?;
                let response = client.fetch(&request).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                } else {
                    print_response(&response);
                }
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Forecast.io API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Default units:", UnitSystem::all().to_vec())
        .prompt()
        .context("Failed to read default units")?;

    config.api_key = Some(api_key.trim().to_string());
    config.set_default_units(units);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --time '{value}', expected RFC 3339"))
}

fn print_response(response: &ForecastResponse) {
    let coord = |v: Option<f64>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
    println!(
        "Location: {}, {} ({})",
        coord(response.latitude),
        coord(response.longitude),
        response.timezone.as_deref().unwrap_or("unknown time zone"),
    );

    if let Some(currently) = &response.currently {
        println!();
        print_point(currently);
    }

    for (name, block) in [
        ("Minutely", &response.minutely),
        ("Hourly", &response.hourly),
        ("Daily", &response.daily),
    ] {
        if let Some(block) = block {
            print_block(name, block);
        }
    }

    for alert in response.alerts.iter().flatten() {
        println!();
        println!(
            "Alert: {} [{}]",
            alert.title.as_deref().unwrap_or("(untitled)"),
            alert.severity.as_deref().unwrap_or("unknown severity"),
        );
        if let Some(expires) = alert.expires {
            println!("  until {expires}");
        }
    }

    let meta = &response.metadata;
    println!();
    if let Some(calls) = meta.api_calls {
        println!("API calls today: {calls}");
    }
    if let Some(ms) = meta.response_time_ms {
        println!("Response time: {ms}ms");
    }
    if let Some(expires) = meta.expires {
        println!("Expires: {expires}");
    }
}

fn print_point(point: &DataPoint) {
    if let Some(time) = point.time {
        println!("At {time}");
    }
    if let Some(summary) = &point.summary {
        println!("  {summary}");
    }
    if let Some(t) = point.temperature {
        match point.apparent_temperature {
            Some(feels) => println!("  Temperature: {t} (feels like {feels})"),
            None => println!("  Temperature: {t}"),
        }
    }
    if let Some(h) = point.humidity {
        println!("  Humidity: {:.0}%", h * 100.0);
    }
    if let Some(w) = point.wind_speed {
        println!("  Wind: {w}");
    }
    if let Some(p) = point.precip_probability {
        println!(
            "  Precipitation: {:.0}% {}",
            p * 100.0,
            point.precip_type.as_deref().unwrap_or("")
        );
    }
}

fn print_block(name: &str, block: &DataBlock) {
    println!();
    println!(
        "{name}: {} ({} points)",
        block.summary.as_deref().unwrap_or("-"),
        block.data.len()
    );
}
