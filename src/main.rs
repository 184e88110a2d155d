use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use betterboss::connector::http;
use betterboss::connector::DEFAULT_PROXY_URL;
use betterboss::{Commands, Container, ContainerConfig, Router};

const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(name = "betterboss")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.betterboss")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // RUST_LOG, when set, overrides --verbose.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (proxy_url, mock_provider) = match &cli.command {
        Commands::Chat { proxy_url, .. } => (resolve_proxy_url(proxy_url.clone()), false),
        Commands::Serve { mock_provider, .. } => (resolve_proxy_url(None), *mock_provider),
        _ => (resolve_proxy_url(None), false),
    };

    let container = Container::new(ContainerConfig {
        data_dir: expand_tilde(&cli.data_dir),
        proxy_url,
        mock_provider,
    })
    .await?;

    if let Commands::Serve { port, public, .. } = cli.command {
        let port = port.unwrap_or_else(env_port);
        let host = if public {
            warn!("Binding to 0.0.0.0: the proxy is reachable from the network");
            Ipv4Addr::UNSPECIFIED
        } else {
            Ipv4Addr::LOCALHOST
        };
        return http::serve(container.chat_proxy_use_case(), SocketAddr::from((host, port))).await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn resolve_proxy_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("BETTERBOSS_PROXY_URL").ok())
        .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string())
}

fn env_port() -> u16 {
    match std::env::var("BETTERBOSS_PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid BETTERBOSS_PORT '{raw}'");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    }
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
