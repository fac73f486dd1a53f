//! Per-address admission control in front of the dispatch route.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

use crate::error::{Error, Result};

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Allows `max` requests per `window` for each remote address.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>>,
    clock: DefaultClock,
    trust_proxy: bool,
}

impl RateLimit {
    pub fn new(max: u32, window: Duration, trust_proxy: bool) -> Self {
        let burst = NonZeroU32::new(max).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / burst.get())
            .map(|q| q.allow_burst(burst))
            .unwrap_or_else(|| Quota::per_second(burst));

        RateLimit {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
            trust_proxy,
        }
    }

    /// Consumes one request from `ip`'s budget.
    pub fn check(&self, ip: IpAddr) -> Result<()> {
        self.limiter.check_key(&ip).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            let retry_after = (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1);
            tracing::warn!(%ip, retry_after, "rate limit exceeded");
            Error::RateLimited { retry_after }
        })
    }

    /// Drops state for addresses whose budget has fully replenished.
    pub fn spawn_pruner(&self) {
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PRUNE_INTERVAL);
            loop {
                interval.tick().await;
                limiter.retain_recent();
                limiter.shrink_to_fit();
                tracing::trace!(tracked = limiter.len(), "pruned rate limiter");
            }
        });
    }

    fn client_ip(&self, req: &Request) -> IpAddr {
        if self.trust_proxy {
            let forwarded = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|v| v.trim().parse().ok());
            if let Some(ip) = forwarded {
                return ip;
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

pub async fn rate_limit(
    State(limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Result<Response> {
    limit.check(limit.client_ip(&req))?;
    Ok(next.run(req).await)
}
