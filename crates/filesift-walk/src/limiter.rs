//! Admission gate bounding simultaneous directory listings.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting gate that admits at most `capacity` holders at once.
///
/// Admission order is unspecified. The limiter also keeps a gauge of how
/// many holders are currently admitted and the highest value it reached.
#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    gauge: Arc<Gauge>,
}

#[derive(Debug, Default)]
struct Gauge {
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// One admission slot. Dropping it releases the slot.
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
    gauge: Arc<Gauge>,
}

impl Limiter {
    /// Create a limiter. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            gauge: Arc::new(Gauge::default()),
        }
    }

    /// Wait for a free slot and take it.
    pub async fn acquire(&self) -> LimiterPermit {
        // the semaphore is private and never closed
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("limiter semaphore should not be closed");
        let now = self.gauge.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.gauge.peak.fetch_max(now, Ordering::AcqRel);
        LimiterPermit {
            _permit: permit,
            gauge: Arc::clone(&self.gauge),
        }
    }

    /// Maximum number of simultaneous holders.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Holders admitted right now.
    pub fn active(&self) -> usize {
        self.gauge.active.load(Ordering::Acquire)
    }

    /// Highest number of simultaneous holders observed.
    pub fn peak(&self) -> usize {
        self.gauge.peak.load(Ordering::Acquire)
    }
}

impl Drop for LimiterPermit {
    fn drop(&mut self) {
        // runs before the semaphore permit is returned
        self.gauge.active.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(Limiter::new(0).capacity(), 1);
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let limiter = Limiter::new(2);
        let a = limiter.acquire().await;
        let b = limiter.acquire().await;
        assert_eq!(limiter.active(), 2);

        drop(a);
        assert_eq!(limiter.active(), 1);
        drop(b);
        assert_eq!(limiter.active(), 0);
        assert_eq!(limiter.peak(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_capacity() {
        let limiter = Limiter::new(3);
        let mut handles = Vec::new();
        for _ in 0..32 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await;
                assert!(limiter.active() <= 3);
                tokio::task::yield_now().await;
                tokio::time::sleep(Duration::from_millis(1)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(limiter.peak() <= 3);
        assert!(limiter.peak() >= 1);
        assert_eq!(limiter.active(), 0);
    }

    #[tokio::test]
    async fn test_waiter_admitted_after_release() {
        let limiter = Limiter::new(1);
        let held = limiter.acquire().await;

        let waiter = {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                let _permit = limiter.acquire().await;
                limiter.active()
            })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(held);
        let active = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active, 1);
        assert_eq!(limiter.peak(), 1);
    }
}
