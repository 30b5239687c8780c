//! Client for a Gemini-style `generateContent` chat endpoint.
//!
//! The client only turns a prompt into reply text. Counting successful
//! replies toward the stats is the caller's job (see [`crate::App::ask_chat`]),
//! so a failed request can never touch stored state.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::keyring_store;
use crate::error::ChatError;
use crate::storage::ChatConfig;

const API_KEY_ENTRY: &str = "chat_api_key";

/// Prompt text with optional document text appended.
pub fn compose_prompt(prompt: &str, document: Option<&str>) -> String {
    match document {
        Some(doc) => format!("{prompt}\n\nDocument content:\n{doc}"),
        None => prompt.to_string(),
    }
}

/// API key from the configured environment variable, then the OS keyring.
pub fn resolve_api_key(config: &ChatConfig) -> Result<String, ChatError> {
    if let Ok(key) = std::env::var(&config.api_key_env) {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }
    match keyring_store::get(API_KEY_ENTRY) {
        Ok(Some(key)) if !key.trim().is_empty() => return Ok(key),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "keyring lookup failed"),
    }
    Err(ChatError::MissingApiKey {
        env_var: config.api_key_env.clone(),
    })
}

/// Store the API key in the OS keyring.
pub fn store_api_key(key: &str) -> Result<(), ChatError> {
    keyring_store::set(API_KEY_ENTRY, key.trim())?;
    Ok(())
}

/// Remove a stored API key. Missing entries are fine.
pub fn forget_api_key() -> Result<(), ChatError> {
    keyring_store::delete(API_KEY_ENTRY)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_reply(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Parse `endpoint` as a base that [`Url::join`] extends instead of
/// replacing its last path segment.
fn base_url(endpoint: &str) -> Result<Url, ChatError> {
    let mut url = Url::parse(endpoint)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub struct ChatClient {
    http: Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: &ChatConfig, api_key: impl Into<String>) -> Result<Self, ChatError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: base_url(&config.endpoint)?,
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    /// Build a client with the key resolved from env or keyring.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let key = resolve_api_key(config)?;
        Self::new(config, key)
    }

    fn request_url(&self) -> Result<Url, ChatError> {
        let mut url = self
            .endpoint
            .join(&format!("v1beta/models/{}:generateContent", self.model))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Send one prompt and return the reply text.
    pub async fn ask(&self, prompt: &str, document: Option<&str>) -> Result<String, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        let body = json!({
            "contents": [{
                "parts": [{ "text": compose_prompt(prompt, document) }]
            }]
        });

        tracing::debug!(model = %self.model, "sending chat request");
        let resp = self.http.post(self.request_url()?).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            tracing::debug!(error = %e, "unparseable chat reply");
            ChatError::MalformedReply
        })?;
        parsed.into_reply().ok_or(ChatError::MalformedReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_document_is_unchanged() {
        assert_eq!(compose_prompt("summarize", None), "summarize");
    }

    #[test]
    fn document_is_appended_after_prompt() {
        assert_eq!(
            compose_prompt("summarize", Some("line one")),
            "summarize\n\nDocument content:\nline one"
        );
    }

    #[test]
    fn request_url_carries_model_and_key() {
        let config = ChatConfig::default();
        let client = ChatClient::new(&config, "k3y").unwrap();
        let url = client.request_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent?key=k3y"
        );
    }

    #[test]
    fn request_url_keeps_endpoint_path_prefix() {
        for endpoint in ["https://proxy.example/api", "https://proxy.example/api/"] {
            let config = ChatConfig {
                endpoint: endpoint.to_string(),
                ..ChatConfig::default()
            };
            let client = ChatClient::new(&config, "k3y").unwrap();
            assert_eq!(
                client.request_url().unwrap().as_str(),
                "https://proxy.example/api/v1beta/models/gemini-pro:generateContent?key=k3y"
            );
        }
    }

    #[test]
    fn reply_extraction_requires_text() {
        let ok: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"hi"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(ok.into_reply().as_deref(), Some("hi"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.into_reply().is_none());

        let no_parts: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(no_parts.into_reply().is_none());
    }

    #[test]
    fn env_key_takes_precedence() {
        let config = ChatConfig {
            api_key_env: "FOCUSQUEST_TEST_CHAT_KEY_PRECEDENCE".into(),
            ..ChatConfig::default()
        };
        std::env::set_var(&config.api_key_env, "from-env");
        assert_eq!(resolve_api_key(&config).unwrap(), "from-env");
        std::env::remove_var(&config.api_key_env);
    }
}
