use std::time::Duration;

use anyhow::Context as _;
use reqwest::Client;
use serde::Serialize;

use crate::domain::repository::Notifier;

const SUBJECT: &str = "Your verification code";

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

/// Delivers one-time codes through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendNotifier {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendNotifier {
    pub fn new(
        api_url: &str,
        api_key: &str,
        from: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build e-mail http client")?;
        Ok(Self {
            client,
            api_url: api_url.to_owned(),
            api_key: api_key.to_owned(),
            from: from.to_owned(),
        })
    }
}

impl Notifier for ResendNotifier {
    async fn send_one_time_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let body = SendEmailBody {
            from: &self.from,
            to: [to],
            subject: SUBJECT,
            html: one_time_code_html(code),
        };

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("send verification e-mail")?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = resp.text().await.unwrap_or_default();
        anyhow::bail!("e-mail provider returned {status}: {detail}")
    }
}

pub fn one_time_code_html(code: &str) -> String {
    format!(
        "<p>Your verification code is:</p>\
         <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
         <p>This code expires in 10 minutes. If you did not try to sign in, you can ignore this e-mail.</p>"
    )
}
