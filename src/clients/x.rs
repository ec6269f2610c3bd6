use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{parse_body, user_agent, SocialClient};
use crate::config::XConfig;
use crate::error::ToolError;
use crate::oauth::{OAuth1Signer, OAuthCredentials};

/// X API v2 client; every request carries a freshly signed OAuth 1.0a header.
pub struct XClient {
    http: reqwest::Client,
    signer: OAuth1Signer,
    api_base: String,
}

impl XClient {
    pub fn new(config: &XConfig, timeout: Duration) -> Result<Self, ToolError> {
        let credentials = OAuthCredentials::new(
            config.api_key.as_str(),
            config.api_secret.as_str(),
            config.access_token.as_str(),
            config.access_token_secret.as_str(),
        )?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            http,
            signer: OAuth1Signer::new(credentials),
            api_base: config.api_base.clone(),
        })
    }

    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Value, ToolError> {
        let auth = self.signer.authorization_header("GET", url, query)?;
        tracing::debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "X API returned an error status");
        }
        Ok(parse_body(&bytes))
    }
}

#[async_trait]
impl SocialClient for XClient {
    async fn me(&self) -> Result<Value, ToolError> {
        let url = format!("{}/users/me", self.api_base);
        self.get(&url, &[]).await
    }

    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<Value, ToolError> {
        let url = format!("{}/tweets", self.api_base);

        let mut payload = json!({ "text": text });
        if let Some(id) = reply_to {
            payload["reply"] = json!({ "in_reply_to_tweet_id": id });
        }

        // JSON bodies are not part of the signature base string.
        let auth = self.signer.authorization_header("POST", &url, &[])?;
        tracing::debug!(url = %url, reply = reply_to.is_some(), "POST");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "X API returned an error status");
        }
        Ok(parse_body(&bytes))
    }

    async fn home_timeline(&self, user_id: &str, max_results: u32) -> Result<Value, ToolError> {
        let url = format!("{}/users/{user_id}/reverse_chronological_timeline", self.api_base);
        self.get(&url, &[("max_results".to_string(), max_results.to_string())])
            .await
    }

    async fn user_posts(&self, user_id: &str, max_results: u32) -> Result<Value, ToolError> {
        let url = format!("{}/users/{user_id}/tweets", self.api_base);
        self.get(&url, &[("max_results".to_string(), max_results.to_string())])
            .await
    }
}
