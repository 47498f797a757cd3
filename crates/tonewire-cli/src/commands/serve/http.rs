//! Static HTTP responder.
//!
//! Answers every `GET` with a fixed HTML page and closes the connection.
//! Only the request line is interpreted; headers are read and discarded.
//! The head is read as raw bytes, so bytes that are not UTF-8 yield a
//! `400 Bad Request` instead of a dropped connection.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Body served for every `GET`.
pub const HELLO_BODY: &str = "<html><body><h1>Hello, World!</h1></body></html>";

/// Upper bound on the request head we are willing to read.
const MAX_HEAD_BYTES: u64 = 8 * 1024;

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotImplemented,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotImplemented => 501,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotImplemented => "Not Implemented",
        }
    }
}

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub path: String,
}

/// Parses `METHOD SP PATH SP HTTP/x.y`.
pub fn parse_request_line(line: &str) -> Option<RequestLine> {
    let mut parts = line.split_ascii_whitespace();
    let method = parts.next()?;
    let path = parts.next()?;
    let version = parts.next()?;
    if parts.next().is_some() || !is_token(method) || !version.starts_with("HTTP/") {
        return None;
    }
    Some(RequestLine {
        method: method.to_string(),
        path: path.to_string(),
    })
}

/// RFC 9110 `token`: one or more visible ASCII characters minus delimiters.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Decides the status for a request line.
pub fn route(request: Option<&RequestLine>) -> Status {
    match request {
        None => Status::BadRequest,
        Some(r) if r.method == "GET" => Status::Ok,
        Some(_) => Status::NotImplemented,
    }
}

/// Builds a complete `Connection: close` response.
pub fn build_response(status: Status) -> Vec<u8> {
    let body = match status {
        Status::Ok => HELLO_BODY.to_string(),
        other => format!(
            "<html><body><h1>{} {}</h1></body></html>",
            other.code(),
            other.reason()
        ),
    };
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status.code(),
        status.reason(),
        body.len(),
        body
    )
    .into_bytes()
}

/// Reads one request from `stream`, writes the response and returns the
/// status sent along with the parsed request line.
pub async fn respond<S>(stream: &mut S) -> io::Result<(Status, Option<RequestLine>)>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = {
        let mut reader = BufReader::new((&mut *stream).take(MAX_HEAD_BYTES));
        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line).await?;
        let request = parse_request_line(String::from_utf8_lossy(&line).trim_end());

        // Drain headers up to the blank line.
        let mut header = Vec::new();
        loop {
            header.clear();
            let n = reader.read_until(b'\n', &mut header).await?;
            if n == 0 || header == b"\r\n" || header == b"\n" {
                break;
            }
        }
        request
    };

    let status = route(request.as_ref());
    stream.write_all(&build_response(status)).await?;
    stream.flush().await?;
    stream.shutdown().await?;
    Ok((status, request))
}

/// Accepts connections until shutdown, answering each on its own task.
pub async fn serve(listener: TcpListener, mut shutdown_rx: broadcast::Receiver<()>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        tokio::spawn(handle_connection(stream, peer_addr));
                    }
                    Err(e) => {
                        log::warn!("HTTP accept error: {}", e);
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                log::debug!("HTTP responder stopped");
                break;
            }
        }
    }
}

async fn handle_connection(mut stream: tokio::net::TcpStream, peer_addr: SocketAddr) {
    match respond(&mut stream).await {
        Ok((status, Some(request))) => {
            log::info!(
                "{} \"{} {}\" {}",
                peer_addr,
                request.method,
                request.path,
                status.code()
            );
        }
        Ok((status, None)) => {
            log::info!("{} malformed request {}", peer_addr, status.code());
        }
        Err(e) => {
            log::warn!("HTTP error for {}: {}", peer_addr, e);
        }
    }
}
