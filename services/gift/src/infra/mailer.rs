use anyhow::Context as _;
use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::error::GiftServiceError;

/// Mail-delivery collaborator reached over HTTP.
///
/// The endpoint accepts `{to, subject, text}` and delivers best-effort.
/// Callers on notification paths log failures and move on; nothing here
/// ever rolls back the operation that triggered the send.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(
        &self,
        to: &[String],
        subject: &str,
        text: &str,
    ) -> Result<(), GiftServiceError> {
        self.client
            .post(&self.endpoint)
            .json(&SendRequest { to, subject, text })
            .send()
            .await
            .context("send mail request")?
            .error_for_status()
            .context("mailer returned error status")?;
        Ok(())
    }
}
