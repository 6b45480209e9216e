//! bitten-keygen: issue a VLESS key from JSON fixture data.
//!
//! ```text
//! bitten-keygen --hosts hosts.json free --country US
//! bitten-keygen --hosts hosts.json --users users.json --subscriptions subs.json \
//!     user 5ccc43c4-3c3e-4220-a878-761aa1182dd9 --remarks Laptop
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use uuid::Uuid;

use bitten_key_generation::{
    InMemoryHostStore, InMemorySubscriptionStore, InMemoryUserStore, KeyGenConfig,
    KeyGenerationApi, KeyGenerationService, KeyRequest, RequestContext,
};
use bitten_telemetry::{init_telemetry, TelemetryConfig};

/// bitten-keygen: BittenVPN key generator
#[derive(Parser, Debug)]
#[command(name = "bitten-keygen")]
#[command(about = "Generate BittenVPN VLESS keys from JSON host, user and subscription data")]
struct Args {
    /// JSON array of hosts
    #[arg(long)]
    hosts: PathBuf,

    /// JSON array of users
    #[arg(long)]
    users: Option<PathBuf>,

    /// JSON array of subscriptions
    #[arg(long)]
    subscriptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Anonymous free-tier key
    Free {
        /// Preferred host country
        #[arg(long)]
        country: Option<String>,

        /// Label shown in the client
        #[arg(long)]
        remarks: Option<String>,
    },

    /// Key for a registered user
    User {
        /// User id
        user_id: Uuid,

        /// Preferred host country
        #[arg(long)]
        country: Option<String>,

        /// Label shown in the client
        #[arg(long)]
        remarks: Option<String>,
    },
}

type Service = KeyGenerationService<InMemoryUserStore, InMemorySubscriptionStore, InMemoryHostStore>;

/// Raw JSON fixture contents.
#[derive(Debug, Default)]
struct Fixtures {
    hosts: String,
    users: Option<String>,
    subscriptions: Option<String>,
}

impl Fixtures {
    fn read(args: &Args) -> Result<Self> {
        Ok(Self {
            hosts: read(&args.hosts)?,
            users: args.users.as_deref().map(read).transpose()?,
            subscriptions: args.subscriptions.as_deref().map(read).transpose()?,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn build_service(fixtures: &Fixtures, config: KeyGenConfig) -> Result<Service> {
    let hosts = InMemoryHostStore::from_json(&fixtures.hosts).context("parsing hosts")?;
    let users = match &fixtures.users {
        Some(json) => InMemoryUserStore::from_json(json).context("parsing users")?,
        None => InMemoryUserStore::new(),
    };
    let subscriptions = match &fixtures.subscriptions {
        Some(json) => {
            InMemorySubscriptionStore::from_json(json).context("parsing subscriptions")?
        }
        None => InMemorySubscriptionStore::new(),
    };
    info!(hosts = hosts.len(), "Loaded fixtures");

    Ok(KeyGenerationService::new(
        Arc::new(users),
        Arc::new(subscriptions),
        Arc::new(hosts),
        config,
    ))
}

/// Issue the key `command` asks for and render it as pretty JSON.
async fn issue(service: &Service, ctx: &RequestContext, command: Command) -> Result<String> {
    let output = match command {
        Command::Free { country, remarks } => service
            .generate_free_key(ctx, &KeyRequest { remarks, country })
            .await
            .map(|key| serde_json::to_string_pretty(&key)),
        Command::User {
            user_id,
            country,
            remarks,
        } => service
            .generate_key_for_user(ctx, user_id, &KeyRequest { remarks, country })
            .await
            .map(|key| serde_json::to_string_pretty(&key)),
    };

    match output {
        Ok(json) => Ok(json?),
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), "Key generation failed");
            bail!(e.public_message())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _telemetry = init_telemetry(TelemetryConfig::from_env().with_service_name("bitten-keygen"))?;

    let config = KeyGenConfig::from_env().context("invalid key generation config")?;
    let service = build_service(&Fixtures::read(&args)?, config)?;

    let (ctx, cancel) = RequestContext::background().with_cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    println!("{}", issue(&service, &ctx, args.command).await?);
    Ok(())
}
