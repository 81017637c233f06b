mod birth_args;
mod repl;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jyotish_agents::GeminiProvider;
use jyotish_config::{AppConfig, ConfigLoader};
use jyotish_gateway::GatewayServer;
use jyotish_kundali::{ChartSummary, Facet, KundaliClient};
use jyotish_security::RedactingWriter;
use tracing::info;
use tracing_subscriber::EnvFilter;

use birth_args::BirthArgs;

const LOG_ENV: &str = "JYOTISH_LOG";

#[derive(Parser)]
#[command(
    name = "jyotish",
    version,
    about = "Jyotish - Vedic astrology assistant backed by a Kundali API and Gemini"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Override JYOTISH_HOST
        #[arg(long)]
        host: Option<String>,
        /// Override JYOTISH_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch the composite Kundali for a birth moment
    Kundali {
        #[command(flatten)]
        birth: BirthArgs,
        /// Print the full composite as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Fetch a single chart facet and print the raw payload
    Facet {
        /// Facet name or provider path, e.g. `planets` or `dashas/mahadasha`
        facet: Facet,
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Interactive chat about a freshly fetched chart
    Chat {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        name: Option<String>,
        /// Place of birth, used only in conversation
        #[arg(long)]
        place: Option<String>,
    },
    /// List Gemini models visible to the configured key
    Models,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(RedactingWriter::stderr())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ConfigLoader::from_env().context("failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Kundali { birth, json } => kundali(&config, &birth, json).await,
        Commands::Facet { facet, birth } => fetch_facet(&config, facet, &birth).await,
        Commands::Chat { birth, name, place } => {
            repl::run(&config, &birth, name, place).await
        }
        Commands::Models => list_models(&config).await,
    }
}

async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }

    info!("starting jyotish gateway on {}", config.gateway.bind_addr());
    GatewayServer::new(config)?.run().await?;
    Ok(())
}

async fn kundali(config: &AppConfig, birth: &BirthArgs, json: bool) -> Result<()> {
    let birth = birth.to_birth_data()?;
    let client = KundaliClient::new(&config.astrology)?;
    let composite = client.fetch_all_facets(&birth).await;

    if !composite.is_usable() {
        anyhow::bail!(
            "Unable to fetch valid kundali data. Please check your Astrology API key/user ID and try again."
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&composite)?);
    } else {
        println!("Birth:     {} {}", birth.date_label(), birth.time_label());
        println!("{}", ChartSummary::from_composite(&composite));
        let missing = composite.missing_facets();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
            println!("Missing:   {}", names.join(", "));
        }
    }
    Ok(())
}

async fn fetch_facet(config: &AppConfig, facet: Facet, birth: &BirthArgs) -> Result<()> {
    let birth = birth.to_birth_data()?;
    let client = KundaliClient::new(&config.astrology)?;
    let payload = client
        .fetch_facet(facet, &birth)
        .await
        .with_context(|| format!("failed to fetch {facet}"))?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn list_models(config: &AppConfig) -> Result<()> {
    let provider = GeminiProvider::new(&config.gemini);
    let models = provider.list_models().await?;

    if models.is_empty() {
        println!("No models returned.");
        return Ok(());
    }

    for model in &models {
        let marker = if model.supports_generate_content() {
            "*"
        } else {
            " "
        };
        let id = model.name.strip_prefix("models/").unwrap_or(&model.name);
        match &model.display_name {
            Some(display) => println!("{marker} {id:<40} {display}"),
            None => println!("{marker} {id}"),
        }
    }
    println!();
    println!("* supports generateContent (usable as GEMINI_MODEL)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIRTH: [&str; 14] = [
        "--day", "15", "--month", "8", "--year", "1990", "--hour", "14", "--minute", "30",
        "--lat", "28.6139", "--lon", "77.2090",
    ];

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jyotish").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn serve_overrides_are_optional() {
        match parse(&["serve", "--port", "8080"]).command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn facet_accepts_name_or_path() {
        for facet in ["current-dasha", "dashas/current_mahadasha_full"] {
            let mut args = vec!["facet", facet];
            args.extend(BIRTH);
            match parse(&args).command {
                Commands::Facet { facet, .. } => assert_eq!(facet, Facet::CurrentMahadashaFull),
                _ => panic!("expected facet"),
            }
        }
    }

    #[test]
    fn unknown_facet_is_rejected() {
        let mut args = vec!["jyotish", "facet", "navamsa"];
        args.extend(BIRTH);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn kundali_requires_birth_fields() {
        assert!(Cli::try_parse_from(["jyotish", "kundali", "--day", "15"]).is_err());

        let mut args = vec!["kundali", "--json"];
        args.extend(BIRTH);
        match parse(&args).command {
            Commands::Kundali { birth, json } => {
                assert!(json);
                assert_eq!(birth.to_birth_data().unwrap().date_label(), "15/8/1990");
            }
            _ => panic!("expected kundali"),
        }
    }
}
