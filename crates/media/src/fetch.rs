use async_trait::async_trait;
use reqwest::header::RANGE;
use scrubline_state::config::RetryPolicy;
use scrubline_state::thumbnail::{ByteRange, ThumbnailDescriptor};
use tracing::debug;

use crate::error::ThumbnailError;

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRequest {
    pub uris: Vec<String>,
    pub byte_range: ByteRange,
    pub retry: RetryPolicy,
}

impl SegmentRequest {
    pub fn for_thumbnail(descriptor: &ThumbnailDescriptor, retry: &RetryPolicy) -> Self {
        Self {
            uris: descriptor.uris.clone(),
            byte_range: descriptor.byte_range,
            retry: retry.clone(),
        }
    }
}

/// Byte-range fetch service. Implementations are driven from a spawned task, so
/// dropping the future is how a superseded request is cancelled.
#[async_trait]
pub trait SegmentFetcher: Send + Sync {
    async fn fetch(&self, request: SegmentRequest) -> Result<Vec<u8>, ThumbnailError>;
}

/// Resolves the thumbnail for a track at a presentation time.
#[async_trait]
pub trait ThumbnailResolver: Send + Sync {
    async fn thumbnail(&self, track_id: u32, time: f64) -> Option<ThumbnailDescriptor>;
}

pub struct HttpSegmentFetcher {
    client: reqwest::Client,
}

impl HttpSegmentFetcher {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_once(
        &self,
        uri: &str,
        byte_range: ByteRange,
        retry: &RetryPolicy,
    ) -> Result<Vec<u8>, ThumbnailError> {
        let mut request = self.client.get(uri).timeout(retry.timeout());
        if let Some(range) = byte_range.header_value() {
            request = request.header(RANGE, range);
        }
        let response = request.send().await.map_err(|source| ThumbnailError::Request {
            uri: uri.to_owned(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ThumbnailError::Status {
                uri: uri.to_owned(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(|source| ThumbnailError::Request {
            uri: uri.to_owned(),
            source,
        })?;
        Ok(body.to_vec())
    }
}

impl Default for HttpSegmentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SegmentFetcher for HttpSegmentFetcher {
    async fn fetch(&self, request: SegmentRequest) -> Result<Vec<u8>, ThumbnailError> {
        let mut last_error = ThumbnailError::NoUris;
        let attempts = request.retry.max_attempts.max(1);

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(request.retry.delay_before(attempt - 1)).await;
            }
            for uri in &request.uris {
                if uri.starts_with("offline:") {
                    last_error = ThumbnailError::Offline { uri: uri.clone() };
                    continue;
                }
                match self.fetch_once(uri, request.byte_range, &request.retry).await {
                    Ok(bytes) => return Ok(bytes),
                    Err(err) => {
                        debug!(target: "thumbnails", uri = %uri, attempt, error = %err, "segment fetch failed");
                        last_error = err;
                    }
                }
            }
            if matches!(last_error, ThumbnailError::NoUris | ThumbnailError::Offline { .. }) {
                break;
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use super::*;

    /// A one-connection-per-request HTTP server. `respond` maps a request path
    /// to a status line and body; every request line and `Range` header is logged.
    fn serve(respond: fn(&str) -> (&'static str, &'static [u8])) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut range = String::from("-");
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line.trim().is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("range") {
                            range = value.trim().to_owned();
                        }
                    }
                }
                let path = request_line.split_whitespace().nth(1).unwrap_or("").to_owned();
                log.lock().unwrap().push(format!("{path} {range}"));

                let (status, body) = respond(&path);
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(body);
            }
        });
        (base, seen)
    }

    fn local_fetcher() -> HttpSegmentFetcher {
        HttpSegmentFetcher::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    fn fast_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay_ms: 1,
            backoff_factor: 1.0,
            timeout_ms: 5_000,
        }
    }

    #[tokio::test]
    async fn fails_over_to_next_uri_with_range_header() {
        let (base, seen) = serve(|path| match path {
            "/b" => ("206 Partial Content", &b"abc"[..]),
            _ => ("503 Service Unavailable", &b""[..]),
        });
        let request = SegmentRequest {
            uris: vec![format!("{base}/a"), format!("{base}/b")],
            byte_range: ByteRange::new(100, Some(199)),
            retry: fast_retry(2),
        };

        let bytes = local_fetcher().fetch(request).await.unwrap();
        assert_eq!(bytes, b"abc");
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["/a bytes=100-199".to_owned(), "/b bytes=100-199".to_owned()]
        );
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts_with_last_status() {
        let (base, seen) = serve(|_| ("503 Service Unavailable", &b""[..]));
        let request = SegmentRequest {
            uris: vec![format!("{base}/sheet.jpg")],
            byte_range: ByteRange::new(0, Some(9)),
            retry: fast_retry(3),
        };

        let err = local_fetcher().fetch(request).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::Status { status: 503, .. }));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn whole_resource_is_fetched_without_range() {
        let (base, seen) = serve(|_| ("200 OK", &b"full"[..]));
        let request = SegmentRequest {
            uris: vec![format!("{base}/thumb.png")],
            byte_range: ByteRange::default(),
            retry: fast_retry(1),
        };

        assert_eq!(local_fetcher().fetch(request).await.unwrap(), b"full");
        assert_eq!(*seen.lock().unwrap(), vec!["/thumb.png -".to_owned()]);
    }

    #[tokio::test]
    async fn empty_uri_list_fails_without_network() {
        let fetcher = HttpSegmentFetcher::new();
        let request = SegmentRequest {
            uris: Vec::new(),
            byte_range: ByteRange::default(),
            retry: RetryPolicy::default(),
        };
        assert!(matches!(fetcher.fetch(request).await, Err(ThumbnailError::NoUris)));
    }

    #[tokio::test]
    async fn offline_uris_are_not_sent_over_http() {
        let fetcher = HttpSegmentFetcher::new();
        let request = SegmentRequest {
            uris: vec!["offline:abc/0".to_owned()],
            byte_range: ByteRange::new(0, Some(99)),
            retry: RetryPolicy::default(),
        };
        assert!(matches!(
            fetcher.fetch(request).await,
            Err(ThumbnailError::Offline { .. })
        ));
    }
}
