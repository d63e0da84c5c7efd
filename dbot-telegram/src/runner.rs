//! Update dispatch: converts teloxide messages to core::Message and hands them to the
//! HandlerChain, one spawned task per message. Updates arrive by long polling or by webhook;
//! either way the dispatcher stops when the given shutdown future resolves.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use dbot_core::ToCoreMessage;
use handler_chain::HandlerChain;
use teloxide::dispatching::{DefaultKey, ShutdownToken};
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use teloxide::RequestError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

const SHUTDOWN_RETRIES: usize = 50;
const SHUTDOWN_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Converts one Telegram message and runs the chain on it in its own task, so a slow upstream
/// call only delays this message.
pub fn dispatch_message(chain: HandlerChain, msg: &teloxide::types::Message) -> JoinHandle<()> {
    let core_msg = TelegramMessageWrapper(msg).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        message_type = %core_msg.message_type,
        text = %core_msg.content,
        "Received message"
    );

    tokio::spawn(async move {
        if let Err(e) = chain.handle(&core_msg).await {
            error!(error = %e, chat_id = core_msg.chat.id, "Handler chain failed");
        }
    })
}

/// Polls Telegram for updates until `shutdown` resolves, then stops the dispatcher gracefully.
#[instrument(skip(bot, handler_chain, shutdown))]
pub async fn run_polling<F>(bot: teloxide::Bot, handler_chain: HandlerChain, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    log_me(&bot).await;

    let mut dispatcher = build_dispatcher(bot, handler_chain);
    stop_on(dispatcher.shutdown_token(), shutdown);

    info!("Polling Telegram for updates");
    dispatcher.dispatch().await;
    info!("Telegram dispatcher stopped");

    Ok(())
}

/// Registers `url` with setWebhook and returns the router that receives updates on the URL's path,
/// plus the dispatcher future to drive until `shutdown` resolves. The router is meant to be merged
/// into the HTTP server already listening on `address`.
#[instrument(skip(bot, handler_chain, shutdown), fields(url = %url))]
pub async fn setup_webhook<F>(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    url: reqwest::Url,
    address: SocketAddr,
    shutdown: F,
) -> Result<(axum::Router, impl Future<Output = Result<()>> + Send)>
where
    F: Future<Output = ()> + Send + 'static,
{
    log_me(&bot).await;

    let options = webhooks::Options::new(address, url);
    let (listener, _stop_flag, router) = webhooks::axum_to_router(bot.clone(), options)
        .await
        .map_err(|e| anyhow::anyhow!("setWebhook failed: {}", e))?;
    info!("Webhook registered");

    let mut dispatcher = build_dispatcher(bot, handler_chain);
    stop_on(dispatcher.shutdown_token(), shutdown);

    let run = async move {
        info!("Receiving Telegram updates via webhook");
        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("Webhook update listener error"),
            )
            .await;
        info!("Telegram dispatcher stopped");
        Ok(())
    };

    Ok((router, run))
}

async fn log_me(bot: &teloxide::Bot) {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "Connected to Telegram"),
        Err(e) => warn!(error = %e, "getMe failed, starting anyway"),
    }
}

/// Message updates go to the chain; everything else is dropped.
fn build_dispatcher(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
) -> Dispatcher<teloxide::Bot, RequestError, DefaultKey> {
    let handler = Update::filter_message().endpoint(move |msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        async move {
            dispatch_message(chain, &msg);
            respond(())
        }
    });

    Dispatcher::builder(bot, handler)
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "Ignoring non-message update");
        })
        .build()
}

/// Stops the dispatcher once `shutdown` resolves.
fn stop_on<F>(token: ShutdownToken, shutdown: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        shutdown.await;
        info!("Stopping Telegram dispatcher");
        // The dispatcher may still be starting up; shutdown() is refused while it is idle.
        for _ in 0..SHUTDOWN_RETRIES {
            match token.shutdown() {
                Ok(stopped) => {
                    stopped.await;
                    return;
                }
                Err(_) => tokio::time::sleep(SHUTDOWN_RETRY_DELAY).await,
            }
        }
        warn!("Dispatcher was not running at shutdown");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dbot_core::{Handler, HandlerResponse, Message as CoreMessage};
    use std::sync::{Arc, Mutex};

    struct Capture(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl Handler for Capture {
        async fn handle(&self, message: &CoreMessage) -> dbot_core::Result<HandlerResponse> {
            self.0.lock().unwrap().push(message.content.clone());
            Ok(HandlerResponse::Stop)
        }
    }

    /// **Test: dispatch_message runs the chain on the converted message.**
    #[tokio::test]
    async fn test_dispatch_message_runs_chain() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let chain = HandlerChain::new().add_handler(Arc::new(Capture(seen.clone())));
        let msg: teloxide::types::Message = serde_json::from_value(serde_json::json!({
            "message_id": 1,
            "date": 1706529600,
            "chat": {"id": 5, "type": "private", "first_name": "Ann"},
            "from": {"id": 5, "is_bot": false, "first_name": "Ann"},
            "text": "Hello"
        }))
        .unwrap();

        dispatch_message(chain, &msg).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["Hello".to_string()]);
    }
}
