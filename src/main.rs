use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use nagadpay::application::client::NagadClient;
use nagadpay::domain::config::MerchantConfig;
use nagadpay::infrastructure::http::HttpTransport;
use nagadpay::interfaces::callback::CallbackRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initiate and complete a checkout, printing the redirect URL
    Checkout {
        #[command(flatten)]
        merchant: MerchantArgs,

        /// Amount to charge, e.g. 100.00
        #[arg(long)]
        amount: String,

        /// Merchant order id (letters and digits only)
        #[arg(long)]
        invoice: String,
    },
    /// Ask the gateway how a payment ended
    Verify {
        #[command(flatten)]
        merchant: MerchantArgs,

        /// Payment reference id returned by checkout
        payment_ref_id: String,
    },
    /// Decode the query string the gateway appends to the callback URL
    ParseCallback {
        /// Query string or full callback URL
        query: String,
    },
}

#[derive(Args)]
struct MerchantArgs {
    #[arg(long, env = "NAGAD_MERCHANT_ID")]
    merchant_id: Option<String>,

    /// Gateway API root, e.g. https://api.mynagad.com/api/dfs
    #[arg(long, env = "NAGAD_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "NAGAD_CALLBACK_URL")]
    callback_url: Option<String>,

    /// File holding the gateway public key (PEM or bare base64)
    #[arg(long, env = "NAGAD_PUBLIC_KEY_FILE")]
    public_key_file: Option<PathBuf>,

    /// File holding the merchant private key (PEM or bare base64)
    #[arg(long, env = "NAGAD_PRIVATE_KEY_FILE")]
    private_key_file: Option<PathBuf>,

    #[arg(long, env = "NAGAD_CLIENT_IP")]
    client_ip: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "NAGAD_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

impl MerchantArgs {
    fn into_client(self) -> Result<NagadClient> {
        let mut builder = MerchantConfig::builder();
        if let Some(v) = self.merchant_id {
            builder = builder.merchant_id(v);
        }
        if let Some(v) = self.base_url {
            builder = builder.base_url(v);
        }
        if let Some(v) = self.callback_url {
            builder = builder.callback_url(v);
        }
        if let Some(path) = self.public_key_file {
            builder = builder.public_key(read_key(&path)?);
        }
        if let Some(path) = self.private_key_file {
            builder = builder.private_key(read_key(&path)?);
        }
        if let Some(v) = self.client_ip {
            builder = builder.client_ip_address(v);
        }
        let config = builder.build().into_diagnostic()?;

        let transport =
            HttpTransport::with_timeout(Duration::from_secs(self.timeout_secs)).into_diagnostic()?;
        Ok(NagadClient::new(config, Arc::new(transport)))
    }
}

fn read_key(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("could not read key file {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

#[derive(Serialize)]
struct VerifyOutput<T: Serialize> {
    #[serde(flatten)]
    result: T,
    settled: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Checkout {
            merchant,
            amount,
            invoice,
        } => {
            let client = merchant.into_client()?;
            let outcome = client
                .checkout_process(&amount, &invoice)
                .await
                .into_diagnostic()?;
            print_json(&outcome)
        }
        Command::Verify {
            merchant,
            payment_ref_id,
        } => {
            let client = merchant.into_client()?;
            let result = client
                .verify_payment(&payment_ref_id)
                .await
                .into_diagnostic()?;
            let settled = result.is_settled();
            print_json(&VerifyOutput { result, settled })
        }
        Command::ParseCallback { query } => print_json(&CallbackRecord::parse(&query)),
    }
}
