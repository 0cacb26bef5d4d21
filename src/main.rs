use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use careclaims::client::ContractClient;
use careclaims::config::ClientConfig;
use careclaims::faucet;
use careclaims::keystore::Keystore;
use careclaims::rpc::HttpLedgerRpc;
use careclaims::scanner::RegistryScanner;
use careclaims::types::{ClaimStatus, TransactionResult};
use careclaims::wallet::{format_address, LocalWallet, WalletGateway};

#[derive(Parser)]
#[command(author, version, about = "Client for the CareClaims health-insurance contract")]
struct Cli {
    /// Path to the client configuration file
    #[arg(short, long, default_value = "config/client.toml")]
    config: PathBuf,
    /// Path to the signing key file
    #[arg(short, long, default_value = "keys/wallet.toml")]
    key: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    GenerateConfig,
    /// Generate a new signing keypair
    Keygen,
    /// Request test funds for the wallet address from the faucet
    Fund {
        #[arg(long, default_value_t = 3)]
        attempts: u32,
    },
    /// One-time contract initialization (admin)
    Init,
    /// Register the wallet address as a clinic
    RegisterClinic {
        name: String,
        license_number: String,
    },
    /// Mark a clinic as verified (admin)
    VerifyClinic { clinic: String },
    /// Submit a claim from the wallet's clinic address
    SubmitClaim {
        patient_id: String,
        service_code: String,
        /// Amount in display units, e.g. 42.50
        amount: String,
    },
    /// Approve a pending claim (admin)
    Approve { claim_id: u64 },
    /// Reject a pending claim (admin)
    Reject { claim_id: u64 },
    /// Release payment for an approved claim (admin)
    Release { claim_id: u64 },
    /// Fetch one claim by id
    GetClaim { claim_id: u64 },
    /// Fetch a clinic's metadata and reputation
    Clinic { address: Option<String> },
    /// Scan the registry and list claims, optionally filtered
    Claims {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        clinic: Option<String>,
        #[arg(long)]
        patient: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    if let Commands::GenerateConfig = cli.command {
        let config = ClientConfig::default();
        config.save(&cli.config)?;
        println!("wrote {}", cli.config.display());
        return Ok(());
    }
    if let Commands::Keygen = cli.command {
        let keystore = Keystore::generate();
        keystore.save(&cli.key)?;
        println!("wrote {} for {}", cli.key.display(), keystore.address());
        return Ok(());
    }

    let config = if cli.config.exists() {
        ClientConfig::load(&cli.config)?
    } else {
        let config = ClientConfig::default();
        config.save(&cli.config)?;
        config
    };

    let wallet = LocalWallet::from_key_file(&cli.key, &config.network_passphrase)?;
    let address = wallet.address().await?;
    let client = ContractClient::new(
        config.clone(),
        Arc::new(HttpLedgerRpc::new(&config.rpc_url)),
    );

    match cli.command {
        Commands::GenerateConfig | Commands::Keygen => unreachable!("handled above"),
        Commands::Fund { attempts } => {
            let http = reqwest::Client::new();
            let funded = faucet::fund_account(&http, &config.faucet_url, &address, attempts).await;
            if !funded {
                bail!(
                    "faucet did not credit {}; fund it manually via {}",
                    format_address(&address),
                    config.faucet_url
                );
            }
            println!("funded {}", format_address(&address));
        }
        Commands::Init => {
            report(client.initialize(&wallet, &address).await)?;
        }
        Commands::RegisterClinic {
            name,
            license_number,
        } => {
            report(
                client
                    .register_clinic(&wallet, &address, &name, &license_number)
                    .await,
            )?;
        }
        Commands::VerifyClinic { clinic } => {
            report(client.verify_clinic(&wallet, &address, &clinic).await)?;
        }
        Commands::SubmitClaim {
            patient_id,
            service_code,
            amount,
        } => {
            report(
                client
                    .submit_claim(&wallet, &address, &patient_id, &service_code, &amount)
                    .await,
            )?;
        }
        Commands::Approve { claim_id } => {
            report(client.approve_claim(&wallet, &address, claim_id).await)?;
        }
        Commands::Reject { claim_id } => {
            report(client.reject_claim(&wallet, &address, claim_id).await)?;
        }
        Commands::Release { claim_id } => {
            report(client.release_claim(&wallet, &address, claim_id).await)?;
        }
        Commands::GetClaim { claim_id } => match client.get_claim(claim_id).await? {
            Some(claim) => {
                println!("{}", serde_json::to_string_pretty(&claim)?);
                println!("display amount: {}", claim.display_amount());
            }
            None => println!("claim {claim_id} not found"),
        },
        Commands::Clinic { address: clinic } => {
            let clinic = clinic.unwrap_or(address);
            match client.get_clinic_metadata(&clinic).await? {
                Some(metadata) => println!("{}", serde_json::to_string_pretty(&metadata)?),
                None => println!("clinic {} is not registered", format_address(&clinic)),
            }
            if let Some(reputation) = client.get_clinic_reputation(&clinic).await? {
                println!("{}", serde_json::to_string_pretty(&reputation)?);
            }
        }
        Commands::Claims {
            status,
            clinic,
            patient,
        } => {
            let scanner = RegistryScanner::new(&client);
            let claims = match (status, clinic, patient) {
                (Some(status), None, None) => {
                    let status: ClaimStatus = status.parse()?;
                    scanner.list_by_status(status).await?
                }
                (None, Some(clinic), None) => scanner.list_by_clinic(&clinic).await?,
                (None, None, Some(patient)) => scanner.list_by_patient(&patient).await?,
                (None, None, None) => scanner.list_all().await?,
                _ => bail!("use at most one of --status, --clinic, --patient"),
            };
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
    }

    Ok(())
}

fn report(result: TransactionResult) -> Result<()> {
    if result.success {
        println!(
            "submitted: {}",
            result.hash.unwrap_or_else(|| "<no hash>".to_string())
        );
        Ok(())
    } else {
        bail!(
            "{}",
            result
                .error
                .unwrap_or_else(|| "transaction failed".to_string())
        )
    }
}
