use std::{
    net::{IpAddr, Ipv4Addr},
    time::{Duration, Instant},
};

use dashmap::DashMap;
use rocket::request::{self, FromRequest, Request};
use tracing::{debug, warn};

#[derive(Debug)]
struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
    capacity: u32,
    refill_interval: Duration,
}

impl TokenBucket {
    fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            last_refill: Instant::now(),
            tokens: capacity,
            capacity,
            refill_interval,
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tops the bucket back up to capacity once per elapsed interval.
    fn refill(&mut self) {
        let elapsed = self.last_refill.elapsed();
        let intervals = elapsed.as_millis() / self.refill_interval.as_millis().max(1);

        if intervals > 0 {
            let old_tokens = self.tokens;
            let tokens_to_add = u32::try_from(intervals)
                .unwrap_or(u32::MAX)
                .saturating_mul(self.capacity);
            self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.capacity);
            self.last_refill = Instant::now();
            if self.tokens != old_tokens {
                debug!("Token bucket refilled: {} -> {} tokens", old_tokens, self.tokens);
            }
        }
    }
}

/// Per client IP limit on how many games can be created per interval.
pub struct RateLimiter {
    buckets: DashMap<IpAddr, TokenBucket>,
    capacity: u32,
    refill_interval: Duration,
}

impl RateLimiter {
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_interval,
        }
    }

    pub fn per_minute(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    pub fn check(&self, ip: IpAddr) -> bool {
        let mut bucket = self
            .buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.capacity, self.refill_interval));

        let allowed = bucket.try_consume();
        if !allowed {
            warn!("Rate limit exceeded for {}", ip);
        }
        allowed
    }
}

#[derive(Debug)]
pub struct ClientIp(pub IpAddr);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let ip = req
            .headers()
            .get_one("X-Forwarded-For")
            .and_then(|header| header.split(',').next())
            .and_then(|ip| ip.trim().parse().ok())
            .or_else(|| {
                req.headers()
                    .get_one("X-Real-IP")
                    .and_then(|ip| ip.trim().parse().ok())
            })
            .or_else(|| req.client_ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        request::Outcome::Success(ClientIp(ip))
    }
}
