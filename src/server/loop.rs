// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run the accept loop.
///
/// Once `state.shutdown_signal` fires the listener is closed and open
/// connections are asked to finish. Returns when none are left, or after
/// `performance.request_timeout` seconds.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Arc::clone(&state.shutdown_signal);
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => break,
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));
    drain_connections(&state, &active_connections).await;
    Ok(())
}

async fn drain_connections(state: &AppState, active_connections: &AtomicUsize) {
    state.begin_drain();

    let grace = Duration::from_secs(state.config.performance.request_timeout);
    let drained = tokio::time::timeout(grace, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    match drained {
        Ok(()) => logger::log_info("All connections closed"),
        Err(_) => logger::log_warning(&format!(
            "{} connections still open after {}s, closing them",
            active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const CLOSE_REQUEST: &[u8] =
        b"GET /api/films/1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";

    #[tokio::test]
    async fn test_serves_request_and_stops_on_shutdown() {
        let state = Arc::new(AppState::new(&test_config()));
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::new(AtomicUsize::new(0)),
                ));

                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                stream.write_all(CLOSE_REQUEST).await.unwrap();
                let mut response = String::new();
                stream.read_to_string(&mut response).await.unwrap();
                assert!(response.starts_with("HTTP/1.1 200 OK"));
                assert!(response.contains("The Social Network"));

                state.shutdown_signal.notify_one();
                assert!(server.await.unwrap().is_ok());
            })
            .await;
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_keep_alive_connection() {
        let state = Arc::new(AppState::new(&test_config()));
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let active = Arc::new(AtomicUsize::new(0));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&active),
                ));

                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                let request = "GET /api/films/2 HTTP/1.1\r\nHost: localhost\r\n\r\n";
                stream.write_all(request.as_bytes()).await.unwrap();

                let mut buf = [0u8; 4096];
                let mut response = Vec::new();
                while !String::from_utf8_lossy(&response).contains("American Psycho") {
                    let n = stream.read(&mut buf).await.unwrap();
                    assert!(n > 0, "connection closed before the response arrived");
                    response.extend_from_slice(&buf[..n]);
                }
                assert_eq!(active.load(Ordering::SeqCst), 1);

                state.shutdown_signal.notify_one();
                let stopped = tokio::time::timeout(Duration::from_secs(5), server).await;
                assert!(stopped.unwrap().unwrap().is_ok());
                assert_eq!(active.load(Ordering::SeqCst), 0);
                assert!(matches!(stream.read(&mut buf).await, Ok(0) | Err(_)));
            })
            .await;
    }
}
