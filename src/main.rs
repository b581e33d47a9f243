use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use matjip_api::{
    api::{build_pipeline, create_router, AppState},
    cli::{print_results, StdinCollector},
    config::Config,
};

/// Personalised restaurant recommendations
#[derive(Parser)]
#[command(name = "matjip-api")]
#[command(about = "Restaurant recommendation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default command)
    Serve,
    /// Answer the prompts on the console and print one recommendation
    Ask,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matjip_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Ask => ask(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).await?;
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ask(config: Config) -> anyhow::Result<()> {
    let pipeline = build_pipeline(&config)?;

    let stdin = std::io::stdin();
    let mut collector = StdinCollector::new(stdin.lock(), std::io::stdout());
    let state = pipeline.run(&mut collector).await;

    print_results(&state, &mut std::io::stdout())?;
    Ok(())
}
