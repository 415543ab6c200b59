use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paygate::config::{Configuration, Environment};
use paygate::domain::document::{DATETIME_FORMAT, Document};
use paygate::error::GatewayError;
use paygate::interfaces::xml;
use paygate::{TransparentRedirect, WebhookNotifications};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, global = true, env = "PAYGATE_ENVIRONMENT", default_value = "development")]
    environment: Environment,

    #[arg(long, global = true, env = "PAYGATE_MERCHANT_ID", default_value = "")]
    merchant_id: String,

    #[arg(long, global = true, env = "PAYGATE_PUBLIC_KEY", default_value = "")]
    public_key: String,

    #[arg(long, global = true, env = "PAYGATE_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Development gateway port
    #[arg(long, global = true, env = "GATEWAY_PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a gateway XML document and print it as JSON
    Decode { file: PathBuf },
    /// Encode a JSON document as gateway XML
    Encode { file: PathBuf },
    /// Issue a signed tr_data token for a transparent-redirect form
    TrData {
        #[arg(long)]
        redirect_url: String,
        /// JSON file with the params to sign
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Validate a redirect-back query string and print its params
    Validate { query: String },
    /// Verify a webhook delivery and print the notification as JSON
    Webhook {
        #[arg(long)]
        signature: String,
        #[arg(long)]
        payload: String,
    },
}

impl Cli {
    fn configuration(&self) -> paygate::Result<Configuration> {
        let private_key = self
            .private_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GatewayError::Configuration("private key is not set".to_string()))?;
        let config = Configuration::new(
            self.environment,
            self.merchant_id.as_str(),
            self.public_key.as_str(),
            private_key,
        );
        Ok(match self.port {
            Some(port) => config.with_port(port),
            None => config,
        })
    }

    fn transparent_redirect(&self) -> Result<TransparentRedirect> {
        let config = self.configuration().into_diagnostic()?;
        TransparentRedirect::new(Arc::new(config)).into_diagnostic()
    }

    fn webhook_notifications(&self) -> Result<WebhookNotifications> {
        let config = self.configuration().into_diagnostic()?;
        WebhookNotifications::new(Arc::new(config)).into_diagnostic()
    }
}

fn read_json(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path).into_diagnostic()?;
    let value: serde_json::Value = serde_json::from_str(&text).into_diagnostic()?;
    Ok(Document::from(value))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Decode { file } => {
            let text = fs::read_to_string(file).into_diagnostic()?;
            let document = xml::decode(&text).into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&document).into_diagnostic()?
            );
        }
        Command::Encode { file } => {
            let document = read_json(file)?;
            println!("{}", xml::encode(&document).into_diagnostic()?);
        }
        Command::TrData {
            redirect_url,
            params,
        } => {
            let params = match params {
                Some(path) => read_json(path)?,
                None => Document::mapping(),
            };
            let token = cli
                .transparent_redirect()?
                .tr_data(&params, redirect_url)
                .into_diagnostic()?;
            println!("{token}");
        }
        Command::Validate { query } => {
            let result = cli
                .transparent_redirect()?
                .parse_and_validate_query_string(query)
                .into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(result.params()).into_diagnostic()?
            );
        }
        Command::Webhook { signature, payload } => {
            let notification = cli
                .webhook_notifications()?
                .parse(signature, payload)
                .into_diagnostic()?;
            let output = serde_json::json!({
                "kind": notification.kind.as_str(),
                "timestamp": notification.timestamp.format(DATETIME_FORMAT).to_string(),
                "subject": notification.subject,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).into_diagnostic()?
            );
        }
    }

    Ok(())
}
