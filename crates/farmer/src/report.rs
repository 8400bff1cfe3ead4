use {
    crate::traits::Reporter,
    alloy::primitives::TxHash,
    anyhow::{Context, Result},
    reqwest::Client,
    serde::Serialize,
    url::Url,
};

/// Markdown message announcing a successful stake.
pub fn format_staking_report(symbol: &str, amount: &str, tx_hash: TxHash) -> String {
    format!(
        "🚀🎉 *Staking succeeded!* 🎉🚀\n*Token:* {symbol}\n*Amount:* {amount}\n*TxHash:* `{tx_hash}`"
    )
}

/// Writes reports to the log only.
#[derive(Default)]
pub struct LogReporter;

#[async_trait::async_trait]
impl Reporter for LogReporter {
    async fn report(&self, message: &str) -> Result<()> {
        tracing::info!("sending report:\n{message}");
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

/// Posts reports to a chat webhook (Slack/Discord/Telegram bridge style
/// `{"text": ...}` payload).
pub struct WebhookReporter {
    client: Client,
    url: Url,
}

impl WebhookReporter {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait::async_trait]
impl Reporter for WebhookReporter {
    async fn report(&self, message: &str) -> Result<()> {
        tracing::debug!("posting report to webhook");
        self.client
            .post(self.url.clone())
            .json(&WebhookMessage { text: message })
            .send()
            .await
            .context("webhook request")?
            .error_for_status()
            .context("webhook response")?;
        Ok(())
    }
}
