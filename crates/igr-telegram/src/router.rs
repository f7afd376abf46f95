use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use igr_core::{
    account::AccountClient, config::Config, messaging::port::MessagingPort, relay::Relay,
};

use crate::handlers;
use crate::TelegramMessenger;

/// Wire the relay to Telegram and long-poll until ctrl-c.
///
/// Teloxide processes updates of one chat sequentially, so a user's flow
/// state is never mutated by two updates at once.
pub async fn run_polling(cfg: Arc<Config>, client: Arc<dyn AccountClient>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_token.clone());

    let me = bot.get_me().await?;
    tracing::info!(bot = %me.username(), operator = cfg.operator_id.0, "telegram bot connected");

    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let relay = Arc::new(Relay::new(
        cfg.clone(),
        client,
        messenger.clone() as Arc<dyn MessagingPort>,
        messenger,
    ));

    relay.startup_login().await;

    let handler = Update::filter_message().endpoint(handlers::handle_message);

    tracing::info!("instagram relay is running");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
