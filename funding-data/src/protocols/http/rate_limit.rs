use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/*----- */
// Token bucket
/*----- */
/// Client side pacing for venues that throttle per request. Holds up to
/// `capacity` tokens and regains one every `refill_interval`; each request
/// spends one.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: f64,
    refill_interval: Duration,
    bucket: Mutex<Bucket>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            refill_interval,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Wait until a token is available and take it.
    pub async fn acquire(&self) {
        if self.refill_interval.is_zero() {
            return;
        }

        loop {
            let wait = {
                let mut bucket = self.bucket.lock();
                self.refill(&mut bucket);

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }

                self.refill_interval.mul_f64(1.0 - bucket.tokens)
            };

            tokio::time::sleep(wait).await;
        }
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill);
        let earned = elapsed.as_secs_f64() / self.refill_interval.as_secs_f64();

        bucket.tokens = (bucket.tokens + earned).min(self.capacity);
        bucket.last_refill = now;
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_paces_consecutive_calls() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));
        let start = Instant::now();

        for _ in 0..4 {
            limiter.acquire().await;
        }

        // First token is free, the next three wait a full interval each
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_capacity() {
        let limiter = RateLimiter::new(3, Duration::from_millis(100));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(1));

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_bucket() {
        let limiter = Arc::new(RateLimiter::new(1, Duration::from_millis(50)));
        let start = Instant::now();

        let handles = (0..5)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new(1, Duration::ZERO);
        for _ in 0..100 {
            limiter.acquire().await;
        }
    }
}
