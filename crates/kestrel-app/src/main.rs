mod app_state;
mod cli;

use std::io::BufRead;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use kestrel_api::{ChatApi, HttpChatApi};
use kestrel_common::KestrelError;
use kestrel_config::KestrelConfig;
use kestrel_feed::RedisSource;
use kestrel_ui::UiDispatcher;
use tracing_subscriber::EnvFilter;

use app_state::{ChatApp, ChatShell};

const DEFAULT_DIRECTIVE: &str = "kestrel=info";

fn init_logging(directive: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| DEFAULT_DIRECTIVE.parse().expect("static directive")),
            ),
        )
        .init();
}

/// Forward stdin lines to the surface. EOF quits.
fn spawn_input_reader(ui: UiDispatcher<ChatShell>) {
    let spawned = std::thread::Builder::new()
        .name("kestrel-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if !ui.post(move |shell| shell.handle_line(&line)) {
                    return;
                }
            }
            ui.post(ChatShell::request_exit);
        });
    if let Err(e) = spawned {
        tracing::error!("Failed to spawn input reader: {e}");
    }
}

fn launch(args: &cli::Args, config: &KestrelConfig) -> Result<ChatApp, KestrelError> {
    let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(
        &config.api.base_url,
        config.api.connect_timeout(),
        config.api.request_timeout(),
    )?);

    if args.offline {
        tracing::info!("Offline mode: live updates disabled");
        ChatApp::launch_offline(config, &args.username, api)
    } else {
        let source = RedisSource::new(config.feed.redis_url.clone())
            .with_connect_timeout(config.feed.connect_timeout());
        ChatApp::launch(config, &args.username, api, source)
    }
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Load config before logging so its level can seed the filter
    let loaded = match args.config.as_deref() {
        Some(path) => kestrel_config::load_config_from(Path::new(path)),
        None => kestrel_config::load_config(),
    };

    let log_directive = args.log_level.clone().unwrap_or_else(|| {
        let level = loaded
            .as_ref()
            .map(|c| c.logging.level)
            .unwrap_or_default();
        format!("kestrel={}", level.as_directive())
    });
    init_logging(&log_directive);

    tracing::info!("Kestrel v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        KestrelConfig::default()
    });
    tracing::info!(
        api = %config.api.base_url,
        feed = %config.feed.redis_url,
        channel = %config.feed.channel,
        "Config loaded"
    );

    let mut app = match launch(&args, &config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let span = tracing::info_span!("session", id = %app.session_id());
    let _guard = span.enter();

    spawn_input_reader(app.dispatcher());

    let mut stdout = std::io::stdout();
    if let Err(e) = app.run(&mut stdout) {
        tracing::error!("Transcript write failed: {e}");
    }

    app.shutdown();
    if let Err(e) = app.flush(&mut stdout) {
        tracing::debug!("Final flush failed: {e}");
    }
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
