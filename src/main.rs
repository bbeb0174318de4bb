use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ticketrelay::application::SubmissionGate;
use ticketrelay::application::usecases::SubmitTicketUseCase;
use ticketrelay::domain::{CooldownPolicy, MessageStyle};
use ticketrelay::infrastructure::{
    console_notifier::ConsoleNotifier, discord_notifier::DiscordNotifier,
    json_store::JsonFileThrottleStore, multi_notifier::MultiNotifier,
};
use ticketrelay::interfaces::config::Config;
use ticketrelay::interfaces::http_api::{ApiState, build_router};

#[derive(Parser, Debug)]
#[command(name = "ticketrelay")]
struct Args {
    /// Path to config.yaml
    #[arg(long, default_value = "config.yaml")]
    config: String,

    /// Do not send external notifications (console only)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ticketrelay=info".parse().unwrap()),
        )
        .init();
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env"));
    }
    let args = Args::parse();

    // 1) load config
    let cfg = match Config::load_from_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    let listen_addr = cfg
        .listen_addr
        .clone()
        .unwrap_or_else(|| "0.0.0.0:5000".to_string());
    let state_path = cfg
        .state_path
        .clone()
        .unwrap_or_else(|| "state/submissions.json".to_string());
    let max_backoff = cfg
        .max_backoff_seconds
        .map(Duration::from_secs)
        .unwrap_or(ticketrelay::infrastructure::discord_notifier::DEFAULT_MAX_BACKOFF);

    // 2) build infra
    let store = Arc::new(JsonFileThrottleStore::new(&state_path));
    let policy = CooldownPolicy {
        window_seconds: cfg.cooldown_seconds,
    };
    let gate = match SubmissionGate::load(policy, store).await {
        Ok(g) => g,
        Err(e) => {
            tracing::error!("Failed to load throttle state: {e}");
            std::process::exit(1);
        }
    };

    // notifiers fanout
    let mut notifiers: Vec<Box<dyn ticketrelay::application::Notifier>> = vec![];
    notifiers.push(Box::new(ConsoleNotifier::new()));

    if !args.dry_run {
        match &cfg.webhook_url {
            Some(hook) => {
                notifiers.push(Box::new(DiscordNotifier::new(hook.clone(), max_backoff)))
            }
            None => tracing::warn!("webhook_url not set, webhook delivery disabled"),
        }
    } else {
        tracing::warn!("--dry-run enabled: only console output");
    }

    let notifier = MultiNotifier::new(notifiers);

    // 3) usecase + router
    let submit = SubmitTicketUseCase {
        gate: Arc::new(gate),
        notifier: Arc::new(notifier),
    };
    let app = build_router(ApiState {
        submit: Arc::new(submit),
        message_style: cfg.message_style.unwrap_or(MessageStyle::Embed),
    });

    // 4) serve
    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!(listen_addr = %listen_addr, cooldown_seconds = cfg.cooldown_seconds, "serving");

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
