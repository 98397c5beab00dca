//! The transport seam. [`HttpClient`] is the reqwest-backed implementation,
//! with a fixed per-request timeout and an optional on-disk response cache.

use crate::remote::error::FetchError;
use bon::bon;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and raw body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RemoteResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs GET requests. Non-success statuses are returned, not raised, so
/// callers can tell "not found" apart from real failures.
#[allow(async_fn_in_trait)]
pub trait RemoteClient {
    async fn get(&self, url: &str) -> Result<RemoteResponse, FetchError>;
}

pub struct HttpClient {
    client: Client,
    cache_dir: Option<PathBuf>,
}

#[bon]
impl HttpClient {
    /// Builds a client. `timeout` defaults to 30 seconds; when `cache_dir` is
    /// set, successful bodies are cached there and served on later requests.
    #[builder]
    pub fn new(timeout: Option<Duration>, cache_dir: Option<PathBuf>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client, cache_dir })
    }

    async fn download(&self, url: &str) -> Result<RemoteResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        if !status.is_success() {
            warn!("HTTP {} for {}", status, url);
        }
        Ok(RemoteResponse::new(status, body.to_vec()))
    }
}

impl RemoteClient for HttpClient {
    async fn get(&self, url: &str) -> Result<RemoteResponse, FetchError> {
        let Some(cache_dir) = &self.cache_dir else {
            return self.download(url).await;
        };

        let cache_path = cache_dir.join(cache_file_name(url));
        if fs::metadata(&cache_path).await.is_ok() {
            debug!("Cache hit for {} at {:?}", url, cache_path);
            let body = fs::read(&cache_path)
                .await
                .map_err(|e| FetchError::CacheRead(cache_path.clone(), e))?;
            return Ok(RemoteResponse::new(StatusCode::OK, body));
        }

        let response = self.download(url).await?;
        if response.status.is_success() {
            store_in_cache(cache_dir, &cache_path, &response.body).await?;
            info!("Cached response for {} to {:?}", url, cache_path);
        }
        Ok(response)
    }
}

async fn store_in_cache(cache_dir: &Path, cache_path: &Path, body: &[u8]) -> Result<(), FetchError> {
    fs::create_dir_all(cache_dir)
        .await
        .map_err(|e| FetchError::CacheDirCreation(cache_dir.to_path_buf(), e))?;
    fs::write(cache_path, body)
        .await
        .map_err(|e| FetchError::CacheWrite(cache_path.to_path_buf(), e))
}

/// A filesystem-safe file name derived from the full URL. Alphanumerics and
/// `-` are kept; every other byte becomes `_XX` (hex), so distinct URLs never
/// share a file.
pub(crate) fn cache_file_name(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let mut escaped = String::with_capacity(without_scheme.len() + 5);
    for byte in without_scheme.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("_{:02X}", byte));
        }
    }
    escaped.push_str(".json");
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_cache_file_name_is_flat_and_unique() {
        let a = cache_file_name("https://example.test/global/globe/land/1/12/1850-2024/data.json");
        let b = cache_file_name("https://example.test/global/globe/ocean/1/12/1850-2024/data.json");
        assert_eq!(
            a,
            "example_2Etest_2Fglobal_2Fglobe_2Fland_2F1_2F12_2F1850-2024_2Fdata_2Ejson.json"
        );
        assert_ne!(a, b);
        assert!(!a.contains('/'));

        // Separators that used to collapse onto one another stay distinct.
        let slash = cache_file_name("http://h/a/b");
        let dot = cache_file_name("http://h/a.b");
        let underscore = cache_file_name("http://h/a_b");
        assert_ne!(slash, dot);
        assert_ne!(slash, underscore);
        assert_ne!(dot, underscore);
    }

    #[tokio::test]
    async fn test_cached_body_is_served_without_network() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        // Unroutable host: only a cache hit can succeed.
        let url = "http://127.0.0.1:9/global/globe/land/1/12/2000-2001/data.json";
        std::fs::write(dir.path().join(cache_file_name(url)), br#"{"data":{}}"#)?;

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(1))
            .cache_dir(dir.path().to_path_buf())
            .build()?;
        let response = client.get(url).await?;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, br#"{"data":{}}"#.to_vec());
        Ok(())
    }

    const SERVED_BODY: &str = r#"{"description":{"title":"Global"},"data":{"2023":{"anomaly":1.18}}}"#;

    /// Answers `/served/...` with a JSON body and every other path with 404.
    async fn serve(listener: TcpListener) {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            while read < buf.len() {
                let n = stream.read(&mut buf[read..]).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                read += n;
                if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let request = String::from_utf8_lossy(&buf[..read]).to_string();
            let path = request.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = if path.starts_with("/served/") {
                ("200 OK", SERVED_BODY)
            } else {
                ("404 Not Found", "")
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_cache_miss_stores_only_successful_bodies() -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(serve(listener));

        let dir = tempfile::tempdir()?;
        let cache_dir = dir.path().join("http_cache");
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .cache_dir(cache_dir.clone())
            .build()?;

        let served = format!("http://{}/served/globe/land/1/12/1850-2024/data.json", addr);
        let response = client.get(&served).await?;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, SERVED_BODY.as_bytes().to_vec());
        let cached = std::fs::read(cache_dir.join(cache_file_name(&served)))?;
        assert_eq!(cached, SERVED_BODY.as_bytes().to_vec());

        let missing = format!("http://{}/missing/asia/ocean/1/12/1850-2024/data.json", addr);
        let response = client.get(&missing).await?;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(!cache_dir.join(cache_file_name(&missing)).exists());
        assert_eq!(std::fs::read_dir(&cache_dir)?.count(), 1);
        Ok(())
    }
}
