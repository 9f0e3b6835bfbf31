//! Minimal HTTP liveness probe.
//!
//! Answers any request with the process status and the live room
//! count. It carries no game logic and speaks just enough HTTP for a
//! load balancer or a curl.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use flyhunt_room::Lobby;

/// Serves the probe until the task is dropped.
pub(crate) async fn serve(listener: TcpListener, lobby: Arc<Mutex<Lobby>>) {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "health probe listening");
    }

    loop {
        let (mut stream, _) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::debug!(error = %e, "health accept failed");
                continue;
            }
        };

        let rooms = lobby.lock().await.room_count();

        tokio::spawn(async move {
            // Drain whatever request line arrived; the answer is the
            // same regardless.
            let mut buf = [0u8; 512];
            let _ = stream.read(&mut buf).await;

            let body = format!(r#"{{"status":"ok","rooms":{rooms}}}"#);
            let response = format!(
                "HTTP/1.1 200 OK\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });
    }
}
