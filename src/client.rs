//! Game server collaborator: fetch the day's puzzle and score guesses.
//!
//! The wire types match the server's JSON exactly. [`GameServer`] is the seam the
//! engine and session depend on; [`HttpGameServer`] is the reqwest implementation
//! (behind the default `remote` feature).

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::model::{GameShape, LetterAnswer};

/// Body of `POST /api/srordle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRequest {
    pub tz_offset: i32,
}

/// The day's puzzle. The target word is never sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameSpec {
    pub shape: GameShape,
    pub full_attempts: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /api/guess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    pub guess: String,
    pub tz_offset: i32,
    pub use_full: bool,
    pub guess_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuessResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Vec<LetterAnswer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub won: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Only present when the server chooses to reveal the word after a loss.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_word: Option<String>,
}

impl GuessResponse {
    pub fn is_win(&self) -> bool {
        self.won.unwrap_or(false)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[cfg(feature = "remote")]
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid server url: {0}")]
    Url(String),
}

/// Remote game service. Implementations must not retry on their own; the
/// caller decides what a failure means.
pub trait GameServer {
    fn fetch_game(
        &self,
        request: GameRequest,
    ) -> impl Future<Output = Result<GameResponse, ClientError>> + Send;

    fn submit_guess(
        &self,
        request: GuessRequest,
    ) -> impl Future<Output = Result<GuessResponse, ClientError>> + Send;
}

#[cfg(feature = "remote")]
pub use http::HttpGameServer;

#[cfg(feature = "remote")]
mod http {
    use super::*;
    use crate::config::ServerConfig;
    use log::debug;
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use tokio::time::timeout;

    const GAME_PATH: &str = "/api/srordle";
    const GUESS_PATH: &str = "/api/guess";

    /// JSON-over-HTTP client for the game server.
    #[derive(Debug, Clone)]
    pub struct HttpGameServer {
        base_url: String,
        timeout_seconds: u64,
        client: reqwest::Client,
    }

    impl HttpGameServer {
        pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
            let base_url = config.base_url.trim_end_matches('/').to_string();
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(ClientError::Url(config.base_url.clone()));
            }
            Ok(Self {
                base_url,
                timeout_seconds: config.timeout_seconds,
                client: reqwest::Client::new(),
            })
        }

        pub fn endpoint(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }

        async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ClientError>
        where
            Req: Serialize + Sync,
            Resp: DeserializeOwned,
        {
            let url = self.endpoint(path);
            debug!("POST {}", url);
            let request = self.client.post(&url).json(body);
            let response = timeout(Duration::from_secs(self.timeout_seconds), request.send())
                .await
                .map_err(|_| ClientError::Timeout(self.timeout_seconds))??;

            if !response.status().is_success() {
                return Err(ClientError::Status(response.status().as_u16()));
            }

            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        }
    }

    impl GameServer for HttpGameServer {
        async fn fetch_game(&self, request: GameRequest) -> Result<GameResponse, ClientError> {
            self.post_json(GAME_PATH, &request).await
        }

        async fn submit_guess(&self, request: GuessRequest) -> Result<GuessResponse, ClientError> {
            self.post_json(GUESS_PATH, &request).await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn endpoint_joins_without_double_slash() {
            let cfg = ServerConfig {
                base_url: "https://srordle.example/".into(),
                timeout_seconds: 5,
            };
            let server = HttpGameServer::new(&cfg).unwrap();
            assert_eq!(
                server.endpoint(GUESS_PATH),
                "https://srordle.example/api/guess"
            );
        }

        #[test]
        fn rejects_non_http_base_url() {
            let cfg = ServerConfig {
                base_url: "ftp://nope".into(),
                timeout_seconds: 5,
            };
            assert!(matches!(
                HttpGameServer::new(&cfg),
                Err(ClientError::Url(_))
            ));
        }
    }
}
