//! Lifecycle: validate config, init logging, build components, then run the HTTP server and the
//! Telegram dispatcher (long polling or webhook) side by side until a termination signal arrives.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use dbot_core::{init_tracing, Message as CoreMessage};
use dbot_telegram::{run_polling, setup_webhook};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use super::components::{build_bot_components, BotComponents};
use super::config::BotConfig;
use super::health::{health_router, serve_http};

/// How long each task gets to finish after the stop signal before it is aborted.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// TelegramBot: config plus built components. Lets tests drive the chain without polling.
pub struct TelegramBot {
    pub config: BotConfig,
    pub components: BotComponents,
}

impl TelegramBot {
    pub fn new(config: BotConfig) -> Result<Self> {
        let components = build_bot_components(&config, None)?;
        Ok(Self { config, components })
    }

    /// Drive handler chain with core Message (for integration tests).
    #[doc(hidden)]
    pub async fn handle_core_message(&self, message: &CoreMessage) -> Result<()> {
        info!(
            user_id = message.user.id,
            message_content = %message.content,
            "Handling core message (test)"
        );
        if let Err(e) = self.components.handler_chain.handle(message).await {
            error!(error = %e, user_id = message.user.id, "Handler chain failed");
        }
        Ok(())
    }
}

/// Main entry: validate config, init logging, build components, bind the health port, then run
/// until SIGINT or SIGTERM.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        port = config.port(),
        model = %config.model(),
        "Initializing bot"
    );

    let components = build_bot_components(&config, None)?;
    let listener = TcpListener::bind(("0.0.0.0", config.port())).await?;

    info!("Bot started successfully");

    run_until(components, listener, shutdown_signal()).await
}

type DispatchFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Runs the HTTP server and the Telegram dispatcher until `shutdown` resolves or either task exits
/// on its own. With a webhook URL the webhook route is served by the same HTTP server as the health
/// routes; otherwise updates are long-polled. Both tasks are stopped and joined before returning;
/// a task that exits early is an error.
pub async fn run_until<F>(components: BotComponents, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let BotComponents {
        teloxide_bot,
        handler_chain,
        webhook_url,
    } = components;

    let (router, dispatch): (axum::Router, DispatchFuture) = match webhook_url {
        Some(url) => {
            let address = listener.local_addr()?;
            let (webhook_router, run) = setup_webhook(
                teloxide_bot,
                handler_chain,
                url,
                address,
                wait_for_stop(stop_rx.clone()),
            )
            .await?;
            (health_router().merge(webhook_router), Box::pin(run))
        }
        None => (
            health_router(),
            Box::pin(run_polling(
                teloxide_bot,
                handler_chain,
                wait_for_stop(stop_rx.clone()),
            )),
        ),
    };

    let mut http = tokio::spawn(serve_http(listener, router, wait_for_stop(stop_rx)));
    let mut dispatcher = tokio::spawn(dispatch);

    let early_exit = tokio::select! {
        _ = shutdown => {
            info!("Shutdown signal received");
            None
        }
        res = &mut http => Some(("HTTP server", flatten(res))),
        res = &mut dispatcher => Some(("telegram dispatcher", flatten(res))),
    };

    let _ = stop_tx.send(true);

    if let Some((task, res)) = early_exit {
        let other = if task == "HTTP server" { dispatcher } else { http };
        let _ = join_with_grace("remaining task", other).await;
        return match res {
            Ok(()) => Err(anyhow::anyhow!("{} exited unexpectedly", task)),
            Err(e) => Err(e.context(format!("{} failed", task))),
        };
    }

    let http_res = join_with_grace("HTTP server", http).await;
    let dispatcher_res = join_with_grace("telegram dispatcher", dispatcher).await;
    http_res?;
    dispatcher_res?;

    info!("Bot stopped");
    Ok(())
}

async fn wait_for_stop(mut rx: watch::Receiver<bool>) {
    // An Err means the sender is gone, which also means stop.
    let _ = rx.wait_for(|stopped| *stopped).await;
}

fn flatten(res: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(inner) => inner,
        Err(e) => Err(anyhow::anyhow!("task panicked or was cancelled: {}", e)),
    }
}

async fn join_with_grace(task: &str, mut handle: JoinHandle<Result<()>>) -> Result<()> {
    match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await {
        Ok(res) => {
            let res = flatten(res);
            if let Err(ref e) = res {
                error!(task, error = %e, "Task finished with error");
            }
            res
        }
        Err(_) => {
            warn!(task, "Task did not stop in time, aborting");
            handle.abort();
            Ok(())
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
