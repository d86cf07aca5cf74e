use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use crate::error::TransportError;
use crate::message::Message;

/// Raw reply bytes in arrival order. Fragment boundaries carry no meaning.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Opens the reply stream for a turn.
#[async_trait]
pub trait Dispatcher {
    /// Sends the full history, ending with the new user message, and returns the reply stream.
    async fn open(&self, history: &[Message]) -> Result<ByteStream, TransportError>;
}

/// HTTP dispatcher: one `POST` per turn with the history as a JSON array.
#[derive(Debug, Clone)]
pub struct Client {
    pub api_url: String,
    http: reqwest::Client,
}

impl Client {
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Uses a preconfigured `reqwest` client, e.g. one with custom headers or proxies.
    #[must_use]
    pub fn with_http_client(api_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            api_url: api_url.into(),
            http,
        }
    }
}

#[async_trait]
impl Dispatcher for Client {
    async fn open(&self, history: &[Message]) -> Result<ByteStream, TransportError> {
        log::debug!("url: {}", self.api_url);
        log::debug!("history: {:#?}", history);

        let response = self
            .http
            .post(&self.api_url)
            .json(history)
            .send()
            .await
            .map_err(TransportError::network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        log::info!("stream opened: {}", status);

        Ok(response
            .bytes_stream()
            .map_err(TransportError::network)
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::{Session, Status};
    use crate::transcript::Transcript;
    use mockito::Matcher;
    use std::io::Write;

    fn history() -> Vec<Message> {
        vec![
            Message::assistant("Hi! ..."),
            Message::user("What is CS101?"),
        ]
    }

    #[tokio::test]
    async fn test_open_posts_history_as_json(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!([
                { "role": "assistant", "content": "Hi! ..." },
                { "role": "user", "content": "What is CS101?" },
            ])))
            .with_status(200)
            .with_body("CS101 is a great course.")
            .create_async()
            .await;

        let client = Client::new(format!("{}/api/chat", server.url()));
        let fragments = client
            .open(&history())
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        let body = fragments.concat();
        assert_eq!(body, b"CS101 is a great course.");
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn test_open_fails_on_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = Client::new(format!("{}/api/chat", server.url()));
        let result = client.open(&history()).await;

        match result {
            Err(TransportError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("a 500 response must not open a stream"),
        }
    }

    #[tokio::test]
    async fn test_session_over_http_with_split_character(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"caf\xC3")?;
                w.write_all(b"\xA9 1. ok")
            })
            .create_async()
            .await;

        let client = Client::new(format!("{}/api/chat", server.url()));
        let mut session = Session::new(client, Transcript::new("Hi! ..."));

        let completion = session.submit("Coffee?", |_| {}).await?;

        assert_eq!(completion.content, "café \n1. \n\nok");
        assert_eq!(completion.artifact, None);
        assert_eq!(session.status(), Status::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn test_session_over_http_returns_to_idle_on_error_status(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(502)
            .create_async()
            .await;

        let client = Client::new(format!("{}/api/chat", server.url()));
        let mut session = Session::new(client, Transcript::new("Hi! ..."));

        let result = session.submit("Anyone there?", |_| {}).await;

        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::Status { status: 502, .. }))
        ));
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.transcript().tail(), Some(&Message::assistant("")));

        assert!(session.begin("Anyone?").is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn test_open_fails_when_unreachable() {
        let client = Client::new("http://127.0.0.1:1/api/chat");

        let result = client.open(&history()).await;

        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
