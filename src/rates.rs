// Network throughput from successive counter reads

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::round_to;

/// Cumulative byte counters at one instant.
#[derive(Debug, Clone, Copy)]
pub struct CounterSample {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub captured_at: Instant,
}

/// Throughput in bytes/sec. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateSample {
    pub upload_bytes_per_sec: f64,
    pub download_bytes_per_sec: f64,
}

impl RateSample {
    pub const ZERO: RateSample = RateSample {
        upload_bytes_per_sec: 0.0,
        download_bytes_per_sec: 0.0,
    };

    pub fn upload_mbps(&self) -> f64 {
        round_to(self.upload_bytes_per_sec / (1024.0 * 1024.0), 2)
    }

    pub fn download_mbps(&self) -> f64 {
        round_to(self.download_bytes_per_sec / (1024.0 * 1024.0), 2)
    }

    pub fn upload_kbps(&self) -> f64 {
        round_to(self.upload_bytes_per_sec / 1024.0, 1)
    }

    pub fn download_kbps(&self) -> f64 {
        round_to(self.download_bytes_per_sec / 1024.0, 1)
    }
}

/// Holds the previous counter sample; one per process, shared by all pollers.
#[derive(Debug, Default)]
pub struct RateCalculator {
    previous: Mutex<Option<CounterSample>>,
}

impl RateCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rates since the previous call, then `current` becomes the baseline unless it was
    /// captured before the stored one.
    ///
    /// The first call only records the baseline and returns zero. A non-positive
    /// elapsed time (clock skew, same instant) is treated as one second. Counters
    /// that went backwards (interface reset) count as zero traffic.
    pub fn compute(&self, current: CounterSample) -> RateSample {
        // Read-modify-write under one guard so concurrent pollers never see a torn baseline.
        let mut guard = match self.previous.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let rates = match guard.as_ref() {
            None => RateSample::ZERO,
            Some(prev) => {
                let elapsed = current
                    .captured_at
                    .checked_duration_since(prev.captured_at)
                    .filter(|d| !d.is_zero())
                    .unwrap_or(Duration::from_secs(1))
                    .as_secs_f64();
                RateSample {
                    upload_bytes_per_sec: current.bytes_sent.saturating_sub(prev.bytes_sent)
                        as f64
                        / elapsed,
                    download_bytes_per_sec: current
                        .bytes_received
                        .saturating_sub(prev.bytes_received)
                        as f64
                        / elapsed,
                }
            }
        };
        if guard
            .as_ref()
            .is_none_or(|prev| current.captured_at >= prev.captured_at)
        {
            *guard = Some(current);
        }
        rates
    }

    /// Last recorded sample, if any.
    pub fn baseline(&self) -> Option<CounterSample> {
        match self.previous.lock() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample(sent: u64, recv: u64, at: Instant) -> CounterSample {
        CounterSample {
            bytes_sent: sent,
            bytes_received: recv,
            captured_at: at,
        }
    }

    #[test]
    fn first_call_returns_zero() {
        let calc = RateCalculator::new();
        let rates = calc.compute(sample(1_000_000, 5_000_000, Instant::now()));
        assert_eq!(rates, RateSample::ZERO);
    }

    #[test]
    fn rate_is_delta_over_elapsed() {
        let calc = RateCalculator::new();
        let t1 = Instant::now();
        calc.compute(sample(1_000, 2_000, t1));
        let rates = calc.compute(sample(5_000, 12_000, t1 + Duration::from_secs(2)));
        assert!((rates.upload_bytes_per_sec - 2_000.0).abs() < 1e-9);
        assert!((rates.download_bytes_per_sec - 5_000.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_elapsed_uses_one_second() {
        let calc = RateCalculator::new();
        let t1 = Instant::now() + Duration::from_secs(10);
        calc.compute(sample(0, 0, t1));
        let same = calc.compute(sample(300, 600, t1));
        assert_eq!(same.upload_bytes_per_sec, 300.0);
        assert_eq!(same.download_bytes_per_sec, 600.0);

        let earlier = calc.compute(sample(400, 700, t1 - Duration::from_secs(5)));
        assert_eq!(earlier.upload_bytes_per_sec, 100.0);
        assert_eq!(earlier.download_bytes_per_sec, 100.0);
    }

    #[test]
    fn baseline_moves_forward_each_call() {
        let calc = RateCalculator::new();
        let t = Instant::now();
        calc.compute(sample(0, 0, t));
        calc.compute(sample(1_000, 1_000, t + Duration::from_secs(1)));
        let r = calc.compute(sample(1_500, 3_000, t + Duration::from_secs(2)));
        assert_eq!(r.upload_bytes_per_sec, 500.0);
        assert_eq!(r.download_bytes_per_sec, 2_000.0);
    }

    #[test]
    fn stale_sample_does_not_move_baseline_back() {
        let calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.compute(sample(0, 0, t0));
        let newer = calc.compute(sample(20_000, 20_000, t0 + Duration::from_secs(2)));
        assert_eq!(newer.upload_bytes_per_sec, 10_000.0);

        calc.compute(sample(10_000, 10_000, t0 + Duration::from_secs(1)));
        let baseline = calc.baseline().unwrap();
        assert_eq!(baseline.bytes_sent, 20_000);
        assert_eq!(baseline.captured_at, t0 + Duration::from_secs(2));

        let next = calc.compute(sample(26_000, 23_000, t0 + Duration::from_secs(3)));
        assert_eq!(next.upload_bytes_per_sec, 6_000.0);
        assert_eq!(next.download_bytes_per_sec, 3_000.0);
    }

    #[test]
    fn concurrent_computes_leave_newest_baseline() {
        let calc = Arc::new(RateCalculator::new());
        let t0 = Instant::now();
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let calc = calc.clone();
                std::thread::spawn(move || {
                    for i in 0..50u64 {
                        let n = (i * 8 + t) * 7 % 400;
                        calc.compute(sample(n, n, t0 + Duration::from_millis(n)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let baseline = calc.baseline().unwrap();
        assert_eq!(baseline.bytes_sent, 399);
        assert_eq!(baseline.captured_at, t0 + Duration::from_millis(399));
    }

    #[test]
    fn counter_reset_reads_as_zero_not_negative() {
        let calc = RateCalculator::new();
        let t = Instant::now();
        calc.compute(sample(10_000, 10_000, t));
        let r = calc.compute(sample(100, 50, t + Duration::from_secs(1)));
        assert_eq!(r, RateSample::ZERO);
    }

    #[test]
    fn display_and_chart_scales() {
        let r = RateSample {
            upload_bytes_per_sec: 1_572_864.0,
            download_bytes_per_sec: 1_536.0,
        };
        assert_eq!(r.upload_mbps(), 1.5);
        assert_eq!(r.upload_kbps(), 1536.0);
        assert_eq!(r.download_mbps(), 0.0);
        assert_eq!(r.download_kbps(), 1.5);
    }
}
