//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a simple mock backend that returns a fixed response body.
#[allow(dead_code)]
pub async fn start_mock_backend(addr: SocketAddr, response: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut drain = [0u8; 4096];
                        let _ = socket.read(&mut drain).await;
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock backend that echoes the request line and selected headers
/// back in the response body, for asserting what the gateway forwarded.
///
/// Body format:
/// ```text
/// <METHOD> <path?query> HTTP/1.1
/// accept: <value or ->
/// content-type: <value or ->
/// ```
#[allow(dead_code)]
pub async fn start_echo_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let Some((request_line, accept, content_type, content_length, body_read)) =
                            read_request_head(&mut socket).await
                        else {
                            return;
                        };

                        // drain the body so the client can finish writing
                        let mut remaining = content_length.saturating_sub(body_read);
                        let mut tmp = [0u8; 4096];
                        while remaining > 0 {
                            match socket.read(&mut tmp).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => remaining = remaining.saturating_sub(n),
                            }
                        }

                        let body =
                            format!("{request_line}\naccept: {accept}\ncontent-type: {content_type}");
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Read up to the end of the header block; returns the request line, the
/// Accept and Content-Type values, the declared content length, and how
/// many body bytes were already consumed.
async fn read_request_head(
    socket: &mut tokio::net::TcpStream,
) -> Option<(String, String, String, usize, usize)> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos;
        }
        match socket.read(&mut tmp).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?.to_string();

    let mut accept = String::from("-");
    let mut content_type = String::from("-");
    let mut content_length = 0usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        match name.to_ascii_lowercase().as_str() {
            "accept" => accept = value.trim().to_string(),
            "content-type" => content_type = value.trim().to_string(),
            "content-length" => content_length = value.trim().parse().unwrap_or(0),
            _ => {}
        }
    }

    let body_read = buf.len() - header_end - 4;
    Some((request_line, accept, content_type, content_length, body_read))
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
