//! Minimal Telegram Bot API client.
//!
//! Only what the runner needs: `getMe`, `getUpdates` long polling,
//! `sendMessage`, and `deleteWebhook` for dropping the backlog at startup.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    error::{BotError, Result},
    handler::Reply,
};

/// Incoming update. Only message updates are requested.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Every Bot API response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

/// What the runner needs from a chat service.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    /// Username the bot answers to (`@name` suffixes are matched against it).
    async fn bot_username(&self) -> Result<Option<String>>;

    /// Discard updates queued while the bot was offline.
    async fn drop_pending_updates(&self) -> Result<()>;

    /// Fetch updates with `update_id >= offset`, waiting up to `timeout`.
    async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>>;

    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<()>;
}

/// HTTPS Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

/// Slack added on top of the long-poll timeout before the HTTP request
/// itself gives up.
const HTTP_SLACK: Duration = Duration::from_secs(10);

impl TelegramClient {
    /// Create a client for `token` against `api_url` (normally
    /// `https://api.telegram.org`).
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30) + HTTP_SLACK)
            .build()?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        body: &impl Serialize,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let mut request = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout + HTTP_SLACK);
        }
        let envelope: ApiResponse<T> = request.send().await?.json().await?;
        unwrap_envelope(method, envelope)
    }
}

fn unwrap_envelope<T>(method: &'static str, envelope: ApiResponse<T>) -> Result<T> {
    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse { description, .. } => Err(BotError::Api {
            method,
            description: description.unwrap_or_else(|| "no description".to_string()),
        }),
    }
}

impl ChatTransport for TelegramClient {
    async fn bot_username(&self) -> Result<Option<String>> {
        let me: User = self.call("getMe", &json!({}), None).await?;
        Ok(me.username)
    }

    async fn drop_pending_updates(&self) -> Result<()> {
        let _: bool = self
            .call(
                "deleteWebhook",
                &json!({ "drop_pending_updates": true }),
                None,
            )
            .await?;
        Ok(())
    }

    async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout.as_secs(),
                "allowed_updates": ["message"],
            }),
            Some(timeout),
        )
        .await
    }

    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<()> {
        let body = SendMessage {
            chat_id,
            text: &reply.text,
            parse_mode: reply.markdown.then_some("Markdown"),
        };
        let _: Message = self.call("sendMessage", &body, None).await?;
        Ok(())
    }
}
