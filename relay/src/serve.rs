use axum::Router;
use if_addrs::get_if_addrs;
use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, ToSocketAddrs};

/// Serves `router` until Ctrl-C or SIGTERM, exposing peer addresses to the
/// rate limiter through `ConnectInfo`.
pub async fn serve<A: ToSocketAddrs>(addr: A, router: Router) -> std::io::Result<()> {
    let tcp_listener = TcpListener::bind(addr).await?;
    print_listener_urls(&tcp_listener);

    axum::serve(
        tcp_listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

fn print_listener_urls(listener: &TcpListener) {
    let Ok(addr) = listener.local_addr() else {
        log::warn!("Could not determine the address the server is listening on.");
        return;
    };

    let port = addr.port();
    log::info!("Contact relay listening on port {}", port);
    let ips = match addr {
        SocketAddr::V4(addr4) if addr4.ip().is_unspecified() => interface_ips(false),
        SocketAddr::V6(addr6) if addr6.ip().is_unspecified() => interface_ips(true),
        _ => vec![addr.ip()],
    };
    for ip in ips {
        match ip {
            _ if ip.is_loopback() => log::info!("➜  Local:   http://localhost:{}/api/health", port),
            IpAddr::V4(_) => log::info!("➜  Network: http://{}:{}/api/health", ip, port),
            IpAddr::V6(_) => log::info!("➜  Network: http://[{}]:{}/api/health", ip, port),
        }
    }
}

fn interface_ips(ipv6: bool) -> Vec<IpAddr> {
    get_if_addrs()
        .into_iter()
        .flatten()
        .map(|i| i.ip())
        .filter(|ip| ip.is_ipv6() == ipv6)
        .collect()
}

pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("Shutdown signal received, draining connections");
}
