//! Wallet CLI
//!
//! Command-line access to exchange rates, conversion, amount parsing and the
//! client-local preferences.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use wallet_client::ExchangeRateClient;
use wallet_currency::{AmountInput, format_currency};
use wallet_hex::{CurrencyService, DisplayCurrency};
use wallet_repo::build_store;
use wallet_types::{ConversionRequest, CurrencyCode, ExchangeRateSource, Language};

#[derive(Parser)]
#[command(name = "wallet")]
#[command(author, version, about = "Wallet currency CLI", long_about = None)]
struct Cli {
    /// Preference store location
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://wallet.db?mode=rwc")]
    database_url: String,

    /// Rate API mirrors, tried in order (comma-separated)
    #[arg(long, env = "RATE_API_URLS", value_delimiter = ',')]
    rate_api_urls: Vec<String>,

    /// Per-attempt timeout for the rate API
    #[arg(long, env = "RATE_TIMEOUT_SECS", default_value = "10")]
    rate_timeout_secs: u64,

    /// Currency stored amounts are denominated in
    #[arg(long, env = "BASE_CURRENCY", default_value = "vnd")]
    base_currency: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every rate quoted against a currency
    Rates {
        /// Base currency (usd, vnd)
        base: String,
    },
    /// Show the rate for one pair
    Rate { from: String, to: String },
    /// Convert an amount between currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        from: String,
        to: String,
    },
    /// Format an amount for display
    Format {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        currency: String,
    },
    /// Parse a typed amount the way the amount field does
    Parse {
        #[arg(allow_hyphen_values = true)]
        text: String,
        #[arg(long, default_value = "vnd")]
        currency: String,
        /// Accept a leading minus sign
        #[arg(long)]
        allow_negative: bool,
    },
    /// Display currency preference
    Currency {
        #[command(subcommand)]
        action: PreferenceCommands,
    },
    /// UI language preference
    Language {
        #[command(subcommand)]
        action: PreferenceCommands,
    },
    /// Render a base-currency amount in the display currency
    Display {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}

#[derive(Subcommand)]
enum PreferenceCommands {
    /// Print the current value
    Get,
    /// Change the value
    Set { value: String },
}

fn parse_currency(s: &str) -> Result<CurrencyCode> {
    s.parse::<CurrencyCode>().map_err(|e| {
        let supported: Vec<&str> = CurrencyCode::all().iter().map(|c| c.code()).collect();
        anyhow::anyhow!("{}. Supported: {}", e, supported.join(", "))
    })
}

fn rate_client(cli: &Cli) -> ExchangeRateClient {
    let urls: Vec<&String> = cli.rate_api_urls.iter().filter(|u| !u.is_empty()).collect();
    let client = if urls.is_empty() {
        ExchangeRateClient::new()
    } else {
        ExchangeRateClient::with_endpoints(urls.into_iter().cloned())
    };
    client.with_timeout(Duration::from_secs(cli.rate_timeout_secs))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Diagnostics go to stderr so stdout stays scriptable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = parse_currency(&cli.base_currency)?;

    match &cli.command {
        Commands::Rates { base } => {
            let base = parse_currency(base)?;
            let mut rates: Vec<_> = rate_client(&cli)
                .get_exchange_rates(base)
                .await?
                .into_iter()
                .collect();
            rates.sort_by_key(|(code, _)| *code);
            for (code, rate) in rates {
                println!("1 {} = {} {}", base, rate, code);
            }
        }

        Commands::Rate { from, to } => {
            let from = parse_currency(from)?;
            let to = parse_currency(to)?;
            let rate = rate_client(&cli).get_exchange_rate(from, to).await?;
            println!("1 {} = {} {}", from, rate, to);
        }

        Commands::Convert { amount, from, to } => {
            let service = CurrencyService::new(rate_client(&cli));
            let conversion = service
                .convert_currency(ConversionRequest {
                    amount: *amount,
                    from: from.clone(),
                    to: to.clone(),
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&conversion)?);
        }

        Commands::Format { amount, currency } => {
            println!("{}", format_currency(*amount, parse_currency(currency)?));
        }

        Commands::Parse {
            text,
            currency,
            allow_negative,
        } => {
            let mut input = AmountInput::new(parse_currency(currency)?).allow_negative(*allow_negative);
            let update = input.on_change(text, text.chars().count());
            if let Some(err) = update.error {
                anyhow::bail!("{}", err);
            }
            let value = input.on_blur();
            println!("{}\t{}", input.display(), value);
        }

        Commands::Currency { action } => {
            let display = load_display(&cli, base).await?;
            match action {
                PreferenceCommands::Get => println!("{}", display.currency().await),
                PreferenceCommands::Set { value } => {
                    let currency = parse_currency(value)?;
                    display.set_currency(currency).await?;
                    println!("✓ Display currency set to {}", currency);
                }
            }
        }

        Commands::Language { action } => {
            let display = load_display(&cli, base).await?;
            match action {
                PreferenceCommands::Get => println!("{}", display.language().await),
                PreferenceCommands::Set { value } => {
                    let language = value.parse::<Language>().map_err(anyhow::Error::msg)?;
                    display.set_language(language).await?;
                    println!("✓ Language set to {}", language);
                }
            }
        }

        Commands::Display { amount } => {
            let display = load_display(&cli, base).await?;
            let token = CancellationToken::new();
            let on_interrupt = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            match display.convert_and_format(*amount, &token).await {
                Some(formatted) => println!("{}", formatted),
                None => anyhow::bail!("Interrupted"),
            }
        }
    }

    Ok(())
}

async fn load_display(
    cli: &Cli,
    base: CurrencyCode,
) -> Result<DisplayCurrency<wallet_repo::Store, ExchangeRateClient>> {
    let store = build_store(&cli.database_url).await?;
    let service = Arc::new(CurrencyService::new(rate_client(cli)));
    Ok(DisplayCurrency::load(service, store, base).await)
}
