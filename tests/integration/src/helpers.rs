//! Test helpers for integration tests
//!
//! Spawns the real application on an ephemeral port with in-process
//! collaborators: a media token issuer with a fixed test secret and a
//! renderer writing into a temporary directory.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use consult_api::server::{create_app, create_states};
use consult_common::{AppConfig, ExportConfig, MediaConfig, MediaTokenIssuer};
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub const TEST_API_KEY: &str = "devkey";
pub const TEST_API_SECRET: &str = "integration-test-secret";
pub const TEST_MEDIA_URL: &str = "ws://media.test";

/// How long to wait for an expected gateway event
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    export_dir: TempDir,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let export_dir = tempfile::tempdir()?;
        let config = test_config(&export_dir);
        Self::start_with_config(config, export_dir).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig, export_dir: TempDir) -> Result<Self> {
        let (state, gateway) = create_states(config)?;
        let app = create_app(state, gateway);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            export_dir,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Directory the document renderer writes into
    pub fn export_dir(&self) -> &std::path::Path {
        self.export_dir.path()
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).send().await?)
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.put(&url).json(body).send().await?)
    }

    /// Create a room and return its id
    pub async fn create_room(&self, user_id: &str, user_name: &str) -> Result<String> {
        let response = self
            .post(
                "/api/rooms/create",
                &json!({"userId": user_id, "userName": user_name}),
            )
            .await?;
        let body: Value = assert_json(response, StatusCode::OK).await?;
        body["room"]["roomId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("no roomId in {body}"))
    }

    /// Open a gateway connection
    pub async fn connect_gateway(&self) -> Result<GatewayClient> {
        let url = format!("ws://{}/gateway", self.addr);
        let (stream, _) = connect_async(url).await?;
        Ok(GatewayClient { stream })
    }
}

/// Verifier matching the test server's issuer
pub fn test_issuer() -> MediaTokenIssuer {
    MediaTokenIssuer::new(TEST_API_KEY, TEST_API_SECRET)
}

/// Create a test configuration
pub fn test_config(export_dir: &TempDir) -> AppConfig {
    AppConfig {
        media: MediaConfig {
            api_key: TEST_API_KEY.to_string(),
            api_secret: TEST_API_SECRET.to_string(),
            url: TEST_MEDIA_URL.to_string(),
        },
        export: ExportConfig {
            dir: export_dir.path().to_path_buf(),
        },
        ..AppConfig::default()
    }
}

/// A WebSocket client speaking the gateway protocol
pub struct GatewayClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GatewayClient {
    /// Send `{"event": name, "data": data}`
    pub async fn emit(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = json!({"event": event, "data": data}).to_string();
        self.send_raw(Message::Text(frame)).await
    }

    pub async fn send_raw(&mut self, message: Message) -> Result<()> {
        self.stream.send(message).await?;
        Ok(())
    }

    /// Next event frame, skipping transport frames
    pub async fn next_event(&mut self) -> Result<Value> {
        loop {
            let message = tokio::time::timeout(EVENT_TIMEOUT, self.stream.next())
                .await
                .context("timed out waiting for an event")?
                .ok_or_else(|| anyhow!("gateway closed the connection"))??;

            match message {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(frame) => bail!("gateway closed the connection: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Read until an event with `name` arrives, returning its data
    pub async fn expect_event(&mut self, name: &str) -> Result<Value> {
        loop {
            let event = self.next_event().await?;
            if event["event"] == name {
                return Ok(event["data"].clone());
            }
        }
    }

    /// Assert no event named `name` arrives within `window`
    pub async fn expect_no_event(&mut self, name: &str, window: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + window;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            match tokio::time::timeout(remaining, self.next_event()).await {
                Err(_) => return Ok(()),
                Ok(Err(e)) => return Err(e),
                Ok(Ok(event)) if event["event"] == name => {
                    bail!("unexpected {name} event: {event}")
                }
                Ok(Ok(_)) => {}
            }
        }
    }

    /// Close the socket
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Find a user in a roster payload
pub fn roster_entry<'a>(roster: &'a Value, user_id: &str) -> Option<&'a Value> {
    roster
        .as_array()?
        .iter()
        .find(|user| user["id"] == user_id)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
