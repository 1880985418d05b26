//! DNS server runner: binds UDP+TCP and serves a request handler.

use hickory_server::server::{RequestHandler, ServerFuture};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::SrvError;

/// TCP connection timeout for DNS queries.
const TCP_TIMEOUT: Duration = Duration::from_secs(30);

/// Serve `handler` on `listen` until `cancel` fires.
///
/// Both UDP and TCP are bound on the same address. Bind failures are
/// returned before any query is served.
pub async fn run<H: RequestHandler>(
    listen: SocketAddr,
    handler: H,
    cancel: CancellationToken,
) -> crate::Result<()> {
    let udp_socket = UdpSocket::bind(listen)
        .await
        .map_err(|e| SrvError::Server(format!("UDP bind {listen}: {e}")))?;
    info!(addr = %listen, "UDP socket bound");

    let tcp_listener = TcpListener::bind(listen)
        .await
        .map_err(|e| SrvError::Server(format!("TCP bind {listen}: {e}")))?;
    info!(addr = %listen, "TCP listener bound");

    serve(udp_socket, tcp_listener, handler, cancel).await
}

/// Serve `handler` on already bound sockets until `cancel` fires.
pub async fn serve<H: RequestHandler>(
    udp_socket: UdpSocket,
    tcp_listener: TcpListener,
    handler: H,
    cancel: CancellationToken,
) -> crate::Result<()> {
    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    server.register_listener(tcp_listener, TCP_TIMEOUT);

    info!("console-dns authoritative server running");

    tokio::select! {
        result = server.block_until_done() => {
            return result.map_err(|e| SrvError::Server(format!("server error: {e}")));
        }
        () = cancel.cancelled() => {}
    }

    info!("shutting down DNS server");
    server
        .shutdown_gracefully()
        .await
        .map_err(|e| SrvError::Server(format!("shutdown error: {e}")))
}
