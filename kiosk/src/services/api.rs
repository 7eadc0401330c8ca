use anyhow::Context;
use async_trait::async_trait;
use log::{debug, error, warn};
use shared::{ApiRequest, ApiResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Single request/response seam to the sheet-backed endpoint.
///
/// Implementations never fail: transport and decoding problems come back as
/// `ApiResponse::transport_failure()` so every caller just checks `success`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn call(&self, endpoint: &str, request: &ApiRequest) -> ApiResponse;
}

/// Gateway that POSTs the JSON action envelope with reqwest
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("attendance-kiosk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("HTTP client build failed")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn call(&self, endpoint: &str, request: &ApiRequest) -> ApiResponse {
        let response = match self.client.post(endpoint).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("API error on {}: {}", request.action(), e);
                return ApiResponse::transport_failure();
            }
        };

        let status = response.status();
        match response.json::<ApiResponse>().await {
            Ok(body) => body.classify(),
            Err(e) => {
                error!(
                    "Failed to parse {} response (HTTP {}): {}",
                    request.action(),
                    status,
                    e
                );
                ApiResponse::transport_failure()
            }
        }
    }
}

/// Shared "a blocking call is in flight" indicator
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicUsize>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    /// Raise the flag until the returned guard is dropped
    pub fn raise(&self) -> LoadingGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(self.clone())
    }
}

pub struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        (self.0).0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// API client for communicating with the backend endpoint
#[derive(Clone)]
pub struct ApiClient {
    gateway: Arc<dyn Gateway>,
    endpoint: Option<String>,
    loading: LoadingFlag,
}

impl ApiClient {
    pub fn new(gateway: Arc<dyn Gateway>, endpoint: Option<String>) -> Self {
        Self {
            gateway,
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
            loading: LoadingFlag::default(),
        }
    }

    pub fn set_endpoint(&mut self, endpoint: Option<String>) {
        self.endpoint = endpoint.filter(|e| !e.trim().is_empty());
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn loading(&self) -> &LoadingFlag {
        &self.loading
    }

    /// Perform one call. With `show_loader` the loading flag stays raised
    /// until the reply (or failure) is in.
    pub async fn call(&self, request: ApiRequest, show_loader: bool) -> ApiResponse {
        let Some(endpoint) = self.endpoint.as_deref() else {
            warn!("No backend URL configured, skipping {}", request.action());
            return ApiResponse::not_configured();
        };

        let _guard = show_loader.then(|| self.loading.raise());
        debug!("📡 Calling {} (loader: {})", request.action(), show_loader);

        let response = self.gateway.call(endpoint, &request).await;
        if !response.success {
            warn!(
                "{} failed: {}",
                request.action(),
                response.message_or("no message")
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockGateway;
    use shared::FailureKind;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Records whether the loading flag was up while the call ran
    struct FlagProbe {
        flag: LoadingFlag,
        seen: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl Gateway for FlagProbe {
        async fn call(&self, _endpoint: &str, _request: &ApiRequest) -> ApiResponse {
            self.seen.lock().unwrap().push(self.flag.is_loading());
            ApiResponse::ok()
        }
    }

    #[tokio::test]
    async fn test_not_configured_skips_gateway() {
        let gateway = MockGateway::new();
        let client = ApiClient::new(gateway.clone(), None);

        let response = client.call(ApiRequest::GetQuickMap, true).await;
        assert_eq!(response.failure, Some(FailureKind::NotConfigured));
        assert!(gateway.calls().is_empty());
        assert!(!client.loading().is_loading());
    }

    #[tokio::test]
    async fn test_loader_raised_only_when_requested() {
        let flag = LoadingFlag::default();
        let probe = Arc::new(FlagProbe {
            flag: flag.clone(),
            seen: Mutex::new(Vec::new()),
        });
        let mut client = ApiClient::new(probe.clone(), Some("http://kiosk.test".to_string()));
        client.loading = flag.clone();

        client.call(ApiRequest::GetSchema, true).await;
        client.call(ApiRequest::GetQuickMap, false).await;

        assert_eq!(*probe.seen.lock().unwrap(), vec![true, false]);
        assert!(!flag.is_loading());
    }

    #[tokio::test]
    async fn test_http_gateway_connection_refused_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpGateway::new().unwrap();
        let response = gateway
            .call(&format!("http://{}", addr), &ApiRequest::GetQuickMap)
            .await;
        assert!(response.is_transport_failure());
        assert!(!response.success);
    }

    /// Minimal one-shot HTTP server answering with `body`
    async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let content_length = text[..split]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= split + 4 + content_length {
                        break;
                    }
                }
            }

            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_http_gateway_posts_action_envelope() {
        let (endpoint, server) =
            serve_once(r#"{"success":false,"message":"시트를 찾을 수 없습니다"}"#).await;

        let gateway = HttpGateway::new().unwrap();
        let response = gateway
            .call(
                &endpoint,
                &ApiRequest::Checkin {
                    id: "A1".to_string(),
                    row: Some(2),
                },
            )
            .await;

        assert!(response.is_rejected());
        assert_eq!(response.message_or(""), "시트를 찾을 수 없습니다");

        let raw_request = server.await.unwrap();
        assert!(raw_request.starts_with("POST"));
        assert!(raw_request.contains(r#""action":"checkin""#));
        assert!(raw_request.contains(r#""id":"A1""#));
    }
}
