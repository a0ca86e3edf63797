mod bootstrap;
mod cycle;
mod dedup;
mod error;
mod logging;
mod scheduler;
mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use mentionrelay_sprout::SproutClient;
use mentionrelay_webhook::WebhookClient;

use crate::{cycle::Relay, error::BotError, scheduler::Schedule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = mentionrelay_core::load_app_config()?;
    logging::init(&config.log_level, &config.log_file)?;

    tracing::info!(
        profile = %config.profile.name,
        version = %config.profile.bot_version,
        lookback_hours = config.profile.lookback_hours,
        cycle_interval_secs = config.profile.cycle_interval_secs,
        dedup = config.dedup_enabled(),
        "mentionrelay starting"
    );
    tracing::debug!(?config, "loaded configuration");

    let sprout = SproutClient::new(
        &config.sprout_api_token,
        &config.sprout_base_url,
        config.discovery_timeout_secs,
        config.query_timeout_secs,
    )?;
    let webhook = WebhookClient::new(&config.webhook_url, config.webhook_timeout_secs)?;

    let session = bootstrap::bootstrap(&sprout).await.inspect_err(|e| {
        tracing::error!(
            error = %e,
            "setup failed; check the API token and that listening topics exist"
        );
    })?;
    tracing::info!(
        customer = %session.customer_name,
        topics = session.topics.len(),
        "setup complete; starting continuous monitoring"
    );

    let schedule = Schedule::from_profile(&config.profile);
    let mut relay = Relay::new(sprout, webhook, config.profile.clone(), session);
    if config.dedup_enabled() {
        relay = relay.with_dedup(
            Duration::from_secs(config.dedup_ttl_secs),
            config.dedup_capacity,
        );
    }
    let relay = Arc::new(relay);

    let cycles = scheduler::run_forever(
        schedule,
        |n| {
            let relay = Arc::clone(&relay);
            async move {
                // Run on its own task so a panic aborts only this cycle.
                tokio::spawn(async move { cycle::run_cycle(&relay, n).await })
                    .await
                    .map_err(|e| BotError::CycleAborted(e.to_string()))
            }
        },
        shutdown::signal(),
    )
    .await?;

    tracing::info!(cycles, "monitoring stopped");
    Ok(())
}
