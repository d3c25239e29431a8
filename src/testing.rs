//! Local HTTP server for exercising the reqwest-backed clients in tests.

use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answers exactly one request with a canned response.
pub struct OneShotServer {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// Bind on an ephemeral port and serve `status` (e.g. `"404 Not Found"`) with `body`.
    pub async fn start(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });

        Self { url, handle }
    }

    /// Wait for the request and return it as received.
    pub async fn request(self) -> ReceivedRequest {
        ReceivedRequest::parse(&self.handle.await.unwrap())
    }
}

/// Request line and headers as the server saw them.
#[derive(Debug)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    headers: Vec<(String, String)>,
}

impl ReceivedRequest {
    fn parse(raw: &str) -> Self {
        let mut lines = raw.split("\r\n");
        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split(' ');
        let method = parts.next().unwrap_or_default().to_string();
        let target = parts.next().unwrap_or_default();

        let parsed = url::Url::parse(&format!("http://localhost{}", target)).unwrap();
        let query = parsed.query_pairs().into_owned().collect();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        Self {
            method,
            path: parsed.path().to_string(),
            query,
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
