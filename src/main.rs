use piecekeeper::commands::Cli;
use piecekeeper::libs::messages::macros::{is_debug_mode, LOG_ENV};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::DEBUG.into())
                    .with_env_var(LOG_ENV)
                    .from_env_lossy(),
            )
            .try_init()?;
    }

    Cli::menu().await
}
