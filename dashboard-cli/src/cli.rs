use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, ProviderId, Services, WeatherQuery, WeatherReport, currency, model::CurrencyConversion,
};
use inquire::Password;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Weather, currency and quote dashboard backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Listen address; overrides the config file and DASHBOARD_BIND.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather".
        provider: String,
    },

    /// Show current weather for a city.
    Weather {
        /// City name.
        #[arg(default_value = dashboard_core::model::DEFAULT_CITY)]
        city: String,
    },

    /// Convert an INR amount to USD and EUR.
    Convert {
        #[arg(default_value = "100")]
        amount: String,
    },

    /// Print a motivational quote.
    Quote,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind } => {
                let mut config = Config::load_with_env()?;
                if let Some(bind) = bind {
                    config.bind = bind;
                }
                crate::server::serve(config).await?;
            }
            Command::Configure { provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                configure(id)?;
            }
            Command::Weather { city } => {
                let services = services()?;
                let report = services
                    .weather
                    .resolve(&WeatherQuery::from_param(Some(&city)))
                    .await
                    .map_err(|err| anyhow!("{}", err.message()))?;
                println!("{}", render_weather(&report));
            }
            Command::Convert { amount } => {
                let amount = currency::parse_amount(Some(&amount))
                    .map_err(|err| anyhow!("{}", err.user_message()))?;
                let conversion = services()?
                    .currency
                    .convert(amount)
                    .await
                    .context("Could not fetch exchange rates")?;
                println!("{}", render_conversion(&conversion));
            }
            Command::Quote => {
                let quote = services()?.quotes.random().await;
                println!("\"{}\"\n  - {}", quote.quote, quote.author);
            }
        }

        Ok(())
    }
}

fn services() -> anyhow::Result<Services> {
    let config = Config::load_with_env()?;
    Services::from_config(&config).context("Failed to initialise HTTP client")
}

fn configure(id: ProviderId) -> anyhow::Result<()> {
    if !id.requires_api_key() {
        println!("Provider '{id}' needs no configuration.");
        return Ok(());
    }

    // Read the file only; environment overrides must not be persisted.
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key)?;
    config.save()?;

    println!(
        "Saved API key for '{id}' to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

pub fn render_weather(report: &WeatherReport) -> String {
    format!(
        "{city}\n  {temp}°C, {description}\n  Humidity: {humidity}%\n  Wind: {wind} m/s",
        city = report.city,
        temp = report.temperature,
        description = report.description,
        humidity = report.humidity,
        wind = report.wind_speed,
    )
}

pub fn render_conversion(conversion: &CurrencyConversion) -> String {
    format!(
        "₹{inr:.2} = ${usd:.2} = €{eur:.2}\n  1 INR = {rate_usd} USD, {rate_eur} EUR (as of {date})",
        inr = conversion.inr,
        usd = conversion.usd,
        eur = conversion.eur,
        rate_usd = conversion.rates.usd,
        rate_eur = conversion.rates.eur,
        date = conversion.date,
    )
}
