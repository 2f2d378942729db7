//! Usage: Canned localhost HTTP endpoints for exercising the wire chain.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One stub endpoint serving a fixed response to every request, recording
/// how often it was hit and what was sent to it.
pub struct StubEndpoint {
    url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubEndpoint {
    /// 200 endpoint with a JSON body.
    pub async fn json(body: &str) -> Self {
        Self::respond(200, "application/json", body).await
    }

    pub async fn respond(status: u16, content_type: &str, body: &str) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("bind stub endpoint");
        let port = listener.local_addr().expect("stub local addr").port();
        let url = format!("http://127.0.0.1:{port}/");
        let hits = Arc::new(AtomicUsize::new(0));
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let response = format!(
            "HTTP/1.1 {status} Stub\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let task_hits = Arc::clone(&hits);
        let task_requests = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                task_hits.fetch_add(1, Ordering::SeqCst);
                let response = response.clone();
                let requests = Arc::clone(&task_requests);
                tokio::spawn(async move {
                    if let Ok(request) = read_request(&mut socket).await {
                        requests.lock().expect("requests lock").push(request);
                    }
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            url,
            hits,
            requests,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw request texts received so far (request line, headers, body).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Body of the only request received; panics if there was not exactly one.
    pub fn single_request_body(&self) -> String {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        let request = &requests[0];
        match request.find("\r\n\r\n") {
            Some(pos) => request[pos + 4..].to_string(),
            None => String::new(),
        }
    }
}

/// Read one HTTP/1.1 request: headers up to the blank line, then
/// `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let size = socket.read(&mut chunk).await?;
        if size == 0 {
            return Ok(String::from_utf8_lossy(&buffer).into_owned());
        }
        buffer.extend_from_slice(&chunk[..size]);
        if let Some(pos) = find_subslice(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
        if buffer.len() > 64 * 1024 {
            return Ok(String::from_utf8_lossy(&buffer).into_owned());
        }
    };

    let content_length = String::from_utf8_lossy(&buffer[..header_end])
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let size = socket.read(&mut chunk).await?;
        if size == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..size]);
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
