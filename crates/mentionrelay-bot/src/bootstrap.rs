//! One-time account and topic discovery.

use mentionrelay_sprout::{SproutClient, Topic};

use crate::error::BotError;

/// Topics logged individually at startup.
const TOPICS_LOGGED: usize = 5;

/// Account and topics resolved at startup. Fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct Session {
    pub customer_id: String,
    pub customer_name: String,
    pub topics: Vec<Topic>,
}

/// Resolve the customer account and enumerate its listening topics.
///
/// # Errors
///
/// - [`BotError::Sprout`] if either discovery call fails.
/// - [`BotError::Bootstrap`] if no customer or no topics are returned.
pub async fn bootstrap(client: &SproutClient) -> Result<Session, BotError> {
    let clients = client
        .get_client_metadata()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "bootstrap: failed to get customer info"))?;
    let Some(customer) = clients.into_iter().next() else {
        return Err(BotError::Bootstrap("no customer data found".to_string()));
    };
    tracing::info!(
        customer_id = %customer.customer_id,
        customer = %customer.name,
        "bootstrap: connected"
    );

    let topics = client
        .get_topics(&customer.customer_id)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "bootstrap: failed to get listening topics"))?;
    if topics.is_empty() {
        return Err(BotError::Bootstrap(format!(
            "no listening topics found for customer {}",
            customer.customer_id
        )));
    }

    tracing::info!(count = topics.len(), "bootstrap: found listening topics");
    for (idx, topic) in topics.iter().take(TOPICS_LOGGED).enumerate() {
        tracing::info!(
            position = idx + 1,
            topic = %topic.name,
            topic_id = %topic.id,
            "bootstrap: topic"
        );
    }

    Ok(Session {
        customer_id: customer.customer_id,
        customer_name: customer.name,
        topics,
    })
}
