use anyhow::Result;
use tui_sketch::app::App;
use tui_sketch::config::{APP_NAME, SketchConfig};
use tui_sketch::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get logging settings
    let config = SketchConfig::load();
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Initialize the terminal first: while the sketch owns it, logs must not
    // reach stdout/stderr, so they go to a daily rotating file. If the
    // terminal cannot be set up, log to the console instead.
    match tui::init() {
        Ok(mut terminal) => {
            let file_appender = tracing_appender::rolling::daily(
                config.logging.directory(),
                format!("{APP_NAME}.log"),
            );
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            // If RUST_LOG is set, it takes precedence over the configured levels.
            let env_filter = match std::env::var("RUST_LOG") {
                Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
                Err(_) => tracing_subscriber::EnvFilter::new(config.logging.filter_directives()),
            };

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            tracing::info!(
                log_file = %config.logging.current_log_file().display(),
                ?args,
                "starting sketch"
            );

            let res = App::main(&args, &config, &mut terminal).await;

            // Restore before reporting so the message lands on a usable console.
            tui::restore()?;

            if let Err(err) = res {
                tracing::error!("{err:#}");
                eprintln!("{err:?}");
                return Err(err);
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();

            tracing::error!(error = %e, "failed to initialize terminal");
            eprintln!("Failed to initialize terminal: {e:?}");
            Err(e.into())
        }
    }
}
