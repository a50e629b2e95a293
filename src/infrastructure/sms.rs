use crate::domain::otp::CodeDelivery;
use crate::domain::phone::PhoneNumber;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn message_body(code: &str) -> String {
    format!("Your verification code is {}. It expires in 5 minutes.", code)
}

#[derive(Debug, Serialize)]
struct SendSmsRequest<'a> {
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    body: String,
}

/// Delivers codes through an HTTP SMS gateway accepting `{to, from, body}` JSON.
pub struct HttpSmsGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    sender_id: Option<String>,
}

impl HttpSmsGateway {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        sender_id: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build SMS HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            sender_id,
        })
    }
}

#[async_trait]
impl CodeDelivery for HttpSmsGateway {
    #[tracing::instrument(skip(self, code), fields(to = %phone_number))]
    async fn deliver(&self, phone_number: &PhoneNumber, code: &str) -> Result<()> {
        let payload = SendSmsRequest {
            to: phone_number.as_str(),
            from: self.sender_id.as_deref(),
            body: message_body(code),
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.context("SMS gateway unreachable")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("SMS gateway returned {}: {}", status, body);
        }

        tracing::debug!("Verification code handed to SMS gateway");
        Ok(())
    }
}

/// Development stand-in that writes the code to the log instead of sending it.
pub struct ConsoleSmsGateway;

#[async_trait]
impl CodeDelivery for ConsoleSmsGateway {
    async fn deliver(&self, phone_number: &PhoneNumber, code: &str) -> Result<()> {
        tracing::info!(target: "sms", to = %phone_number, "{}", message_body(code));
        Ok(())
    }
}
