use std::process::ExitCode;
use std::sync::Arc;

use artemis::config::{ArtemisConfig, ConfigOverrides};
use artemis::server::Server;
use artemis::{AnalyticEphemeris, ArtemisError, QueryResolver, WorldInstant};
use clap::Parser;
use tracing::{error, info};

/// Moon phase, rise/set and lunar eclipse timing server.
#[derive(Parser)]
#[command(name = "artemis", version, about)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,
}

async fn run(config: ArtemisConfig) -> Result<(), ArtemisError> {
    let resolver = Arc::new(QueryResolver::new(
        Arc::new(AnalyticEphemeris::new()),
        config.observer()?,
    ));
    let site = resolver.site();
    info!(
        site = site.name.as_deref().unwrap_or("unnamed"),
        latitude = site.latitude,
        longitude = site.longitude,
        "observing site"
    );
    match WorldInstant::now() {
        Ok(world) => info!(%world, "world clock"),
        Err(err) => info!(error = %err, "world clock has no date right now"),
    }

    let server = Server::bind(&config.listen_addr(), resolver, config.limits()).await?;

    server
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let outcome = match ArtemisConfig::resolve(&cli.overrides) {
        Ok(config) => run(config).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "artemis stopped");
            ExitCode::FAILURE
        }
    }
}
