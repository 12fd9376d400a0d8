//! CLI for reading and updating bucket properties

use anyhow::Result;
use bucketprops::client::{plan_set, WriteRequest};
use bucketprops::codec::to_json;
use bucketprops::{BucketClient, BucketProperties, ClientConfig, CommitHook, NativeHook, QuorumValue};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "bucketprops")]
#[command(about = "Read and update bucket properties")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, default_value = "bucketprops.toml")]
    config: PathBuf,

    /// REST base URL
    #[arg(long)]
    rest_url: Option<String>,

    /// Compact protocol address
    #[arg(long)]
    pbc_addr: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the properties of a bucket
    Get {
        /// Bucket name
        bucket: String,

        /// Fetch every setting (REST) instead of n_val/allow_mult only
        #[arg(long)]
        extended: bool,
    },

    /// Change the properties of a bucket
    Set {
        /// Bucket name
        bucket: String,

        /// Number of replicas
        #[arg(long)]
        n_val: Option<u32>,

        /// Keep conflicting writes as siblings
        #[arg(long)]
        allow_mult: Option<bool>,

        #[arg(long)]
        last_write_wins: Option<bool>,

        /// Storage backend name
        #[arg(long)]
        backend: Option<String>,

        /// Read quorum (count, or all/quorum/one)
        #[arg(long)]
        r: Option<QuorumValue>,

        /// Read-write quorum
        #[arg(long)]
        rw: Option<QuorumValue>,

        /// Durable-write quorum
        #[arg(long)]
        dw: Option<QuorumValue>,

        /// Write quorum
        #[arg(long)]
        w: Option<QuorumValue>,

        /// Pre-commit hook: script name or module:function (repeatable)
        #[arg(long)]
        precommit: Vec<CommitHook>,

        /// Post-commit hook: module:function (repeatable)
        #[arg(long)]
        postcommit: Vec<NativeHook>,

        /// Remove existing pre-commit hooks first
        #[arg(long)]
        clear_precommit: bool,

        /// Remove existing post-commit hooks first
        #[arg(long)]
        clear_postcommit: bool,

        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(Some(&cli.config))?;
    if let Some(rest_url) = cli.rest_url {
        config.rest_url = rest_url;
    }
    if let Some(pbc_addr) = cli.pbc_addr {
        config.pbc_addr = pbc_addr;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Get { bucket, extended } => {
            let mut client = BucketClient::new(config)?;
            let props = client.get_bucket_properties(&bucket, extended).await?;
            println!("{}", to_json(&props)?);
        }

        Commands::Set {
            bucket,
            n_val,
            allow_mult,
            last_write_wins,
            backend,
            r,
            rw,
            dw,
            w,
            precommit,
            postcommit,
            clear_precommit,
            clear_postcommit,
            dry_run,
        } => {
            let mut props = BucketProperties::new();
            if let Some(n_val) = n_val {
                props.set_replication_factor(n_val);
            }
            if let Some(allow_mult) = allow_mult {
                props.set_allow_siblings(allow_mult);
            }
            if let Some(last_write_wins) = last_write_wins {
                props.set_last_write_wins(last_write_wins);
            }
            if let Some(backend) = backend {
                props.set_backend(backend);
            }
            if let Some(r) = r {
                props.set_read_quorum(r)?;
            }
            if let Some(rw) = rw {
                props.set_read_write_quorum(rw)?;
            }
            if let Some(dw) = dw {
                props.set_durable_write_quorum(dw)?;
            }
            if let Some(w) = w {
                props.set_write_quorum(w)?;
            }
            if clear_precommit {
                props.clear_pre_commit_hooks();
            }
            if clear_postcommit {
                props.clear_post_commit_hooks();
            }
            for hook in precommit {
                props.add_pre_commit_hook(hook);
            }
            for hook in postcommit {
                props.add_post_commit_hook(hook);
            }

            if dry_run {
                match plan_set(&props)? {
                    WriteRequest::Compact(record) => {
                        println!("Protocol: compact");
                        println!("  n_val: {:?}", record.n_val);
                        println!("  allow_mult: {:?}", record.allow_mult);
                    }
                    WriteRequest::Rich(body) => {
                        println!("Protocol: rich");
                        println!("  {}", body);
                    }
                }
                return Ok(());
            }

            let mut client = BucketClient::new(config)?;
            let protocol = client.set_bucket_properties(&bucket, &props).await?;
            println!("Updated {} over {} protocol", bucket, protocol.as_str());
        }
    }

    Ok(())
}
