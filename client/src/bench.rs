//! Load harness firing many independent submissions concurrently.

use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use crate::client::SubmissionClient;
use crate::config::RequestOverrides;
use crate::transport::{ContactPayload, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
    /// Sorted per-submission latencies.
    pub latencies: Vec<Duration>,
}

impl BenchReport {
    /// Nearest-rank percentile, `p` in `0.0..=1.0`.
    pub fn percentile(&self, p: f64) -> Option<Duration> {
        if self.latencies.is_empty() {
            return None;
        }
        let rank = ((p.clamp(0.0, 1.0) * self.latencies.len() as f64).ceil() as usize).max(1);
        self.latencies.get(rank - 1).copied()
    }

    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.succeeded + self.failed) as f64 / secs
    }
}

fn payload(i: usize) -> ContactPayload {
    ContactPayload {
        name: Some(format!("Load Test {i}")),
        email: format!("loadtest+{i}@example.com"),
        company: "Load Test Inc".to_string(),
        subject: Some("Load test".to_string()),
        message: Some(format!("Generated submission #{i}")),
    }
}

/// Sends `requests` submissions with at most `concurrency` in flight.
pub async fn run<T: Transport>(
    client: &SubmissionClient<T>,
    requests: usize,
    concurrency: usize,
    overrides: RequestOverrides,
) -> BenchReport {
    let started = Instant::now();

    let results: Vec<(bool, Duration)> = stream::iter(0..requests)
        .map(|i| async move {
            let payload = payload(i);
            let t0 = Instant::now();
            let result = client.submit(&payload, overrides).await;
            if let Err(e) = &result {
                log::debug!("submission {} failed: {}", i, e);
            }
            (result.is_ok(), t0.elapsed())
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let succeeded = results.iter().filter(|(ok, _)| *ok).count();
    let mut latencies: Vec<Duration> = results.into_iter().map(|(_, d)| d).collect();
    latencies.sort();

    BenchReport {
        succeeded,
        failed: latencies.len() - succeeded,
        elapsed: started.elapsed(),
        latencies,
    }
}
