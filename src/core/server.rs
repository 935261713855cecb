use crate::core::http::{self, BUFFER_SIZE};
use crate::domain::model::HttpResponse;
use crate::domain::ports::SiteFiles;
use crate::utils::error::{Result, SiteError};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

/// Static file server: one request per connection, one task per connection.
pub struct SiteServer<F: SiteFiles + 'static> {
    listener: TcpListener,
    files: Arc<F>,
    index: Arc<str>,
}

impl<F: SiteFiles + 'static> SiteServer<F> {
    pub async fn bind(address: &str, files: F, index: &str) -> Result<Self> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| SiteError::BindError {
                address: address.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            files: Arc::new(files),
            index: Arc::from(index),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until a termination signal arrives.
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    pub async fn run_until<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        tracing::info!("Listening on port: {}", addr.port());
        tracing::info!("Process id: {}", std::process::id());

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, closing listener");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(connection) => connection,
                        Err(e) => {
                            tracing::error!("accept failed: {}", e);
                            continue;
                        }
                    };
                    tracing::debug!("Accepted connection from {}", peer);

                    let files = Arc::clone(&self.files);
                    let index = Arc::clone(&self.index);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, files.as_ref(), &index).await {
                            tracing::warn!("Connection from {} failed: {}", peer, e);
                        }
                    });
                }
            }
        }
    }
}

/// Read one request from `stream`, write one response, then close.
pub async fn handle_connection<S, F>(mut stream: S, files: &F, index: &str) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: SiteFiles + ?Sized,
{
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let bytes_read = stream.read(&mut buffer).await?;
    if bytes_read == 0 {
        tracing::warn!("Connection closed before a request was received");
        return Ok(());
    }

    let raw = &buffer[..bytes_read];
    tracing::debug!("Received request:\n{}", String::from_utf8_lossy(raw));

    let response = respond(files, index, raw).await;
    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Build the response for a raw request.
pub async fn respond<F>(files: &F, index: &str, raw: &[u8]) -> HttpResponse
where
    F: SiteFiles + ?Sized,
{
    match serve(files, index, raw).await {
        Ok(response) => response,
        Err(e) => {
            tracing::info!("{} -> {}", request_summary(raw), e);
            HttpResponse::from_error(&e)
        }
    }
}

async fn serve<F>(files: &F, index: &str, raw: &[u8]) -> Result<HttpResponse>
where
    F: SiteFiles + ?Sized,
{
    let request = http::parse_request(raw)?;
    if request.method != "GET" {
        return Err(SiteError::MethodNotAllowed {
            method: request.method,
        });
    }

    let target = http::resolve_target(&request.path, index)?;
    let body = files.read(&target).await?;
    tracing::info!("GET {} -> 200 ({} bytes)", request.path, body.len());
    Ok(HttpResponse::ok(http::content_type(&target), body))
}

fn request_summary(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.lines().next().unwrap_or_default().to_string()
}

/// Resolves on SIGINT, SIGTERM or SIGQUIT (Ctrl-C elsewhere).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let handlers = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
            signal(SignalKind::quit()),
        );
        let (mut interrupt, mut terminate, mut quit) = match handlers {
            (Ok(interrupt), Ok(terminate), Ok(quit)) => (interrupt, terminate, quit),
            _ => {
                tracing::warn!("Could not install signal handlers, falling back to Ctrl-C");
                ctrl_c().await;
                return;
            }
        };

        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
            _ = quit.recv() => "SIGQUIT",
        };
        tracing::info!("Detected: {} ... closing program normally", name);
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Detected: Ctrl-C ... closing program normally");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixedSite(HashMap<&'static str, &'static [u8]>);

    #[async_trait]
    impl SiteFiles for FixedSite {
        async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
            self.0
                .get(relative_path)
                .map(|body| body.to_vec())
                .ok_or_else(|| SiteError::NotFound {
                    path: relative_path.to_string(),
                })
        }
    }

    struct UnreadableSite;

    #[async_trait]
    impl SiteFiles for UnreadableSite {
        async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
            Err(SiteError::FileReadError {
                path: relative_path.to_string(),
            })
        }
    }

    fn site() -> FixedSite {
        FixedSite(HashMap::from([
            ("index.html", b"<a href=\"/about\">About</a>".as_slice()),
            ("app.js", b"console.log(1)".as_slice()),
        ]))
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let response = respond(&site(), "index.html", b"GET / HTTP/1.1\r\n\r\n").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/html");
        assert_eq!(response.body, b"<a href=\"/about\">About</a>");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let files = site();
        let missing = respond(&files, "index.html", b"GET /nope.png HTTP/1.1\r\n\r\n").await;
        assert_eq!((missing.status, missing.reason.as_str()), (404, "Not Found"));

        let post = respond(&files, "index.html", b"POST / HTTP/1.1\r\n\r\n").await;
        assert_eq!((post.status, post.reason.as_str()), (405, "Method Not Supported"));

        let garbage = respond(&files, "index.html", b"hello there\r\n").await;
        assert_eq!((garbage.status, garbage.reason.as_str()), (400, "Bad HTTP Request"));
    }

    #[tokio::test]
    async fn test_read_failure_is_500() {
        let response = respond(&UnreadableSite, "index.html", b"GET /logo.png HTTP/1.1\r\n\r\n").await;
        assert_eq!(response.status, 500);
        assert_eq!(response.content_type, "text/plain");
        assert_eq!(response.reason, "Internal Error: Failed to get file size");
        assert_eq!(response.body, response.reason.as_bytes());

        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 500 Internal Error: Failed to get file size\r\n"));
    }

    #[tokio::test]
    async fn test_nul_in_path_is_404() {
        let response = respond(&site(), "index.html", b"GET /index.html\0.js HTTP/1.1\r\n\r\n").await;
        assert_eq!((response.status, response.reason.as_str()), (404, "Not Found"));
    }

    #[tokio::test]
    async fn test_handle_connection_writes_full_response() {
        let (mut client, server) = tokio::io::duplex(8192);
        let files = site();
        let handler = tokio::spawn(async move { handle_connection(server, &files, "index.html").await });

        client.write_all(b"GET /app.js HTTP/1.0\r\n\r\n").await.unwrap();
        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        handler.await.unwrap().unwrap();

        let text = String::from_utf8(response).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/javascript\r\n"));
        assert!(text.contains("Content-Length: 14\r\n"));
        assert!(text.ends_with("console.log(1)"));
    }
}
