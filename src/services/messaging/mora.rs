use anyhow::Context;
use async_trait::async_trait;

use super::MessagingProvider;

/// SMS provider backed by the Mora gateway (https://mora-sa.com).
pub struct MoraSmsProvider {
    api_key: String,
    username: String,
    sender: String,
    client: reqwest::Client,
}

impl MoraSmsProvider {
    pub fn new(api_key: String, username: String, sender: String) -> Self {
        Self {
            api_key,
            username,
            sender,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MessagingProvider for MoraSmsProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        self.client
            .post("https://mora-sa.com/api/v1/sendsms")
            .form(&[
                ("api_key", self.api_key.as_str()),
                ("username", self.username.as_str()),
                ("message", body),
                ("sender", self.sender.as_str()),
                ("numbers", to),
                ("return", "json"),
            ])
            .send()
            .await
            .context("failed to send Mora SMS")?
            .error_for_status()
            .context("Mora API returned error")?;

        Ok(())
    }
}
