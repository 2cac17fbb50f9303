//! End-to-end latency recording.
//!
//! A fixed-range histogram answers percentile queries; a bounded reservoir
//! keeps the first `sample_cap` samples verbatim for CSV export. The
//! reservoir is a prefix of the stream, not a statistical sample - quantiles
//! always come from the full histogram.

/// Histogram upper bound in milliseconds.
pub const MAX_MS: f64 = 5.0;
/// Number of histogram bins.
pub const BINS: usize = 64;
/// Samples retained verbatim for export.
pub const SAMPLE_CAP: usize = 2000;

#[inline]
pub fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / 1e6
}

/// Latency percentile summary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Percentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
    /// p99 / p50, or 0 when p50 is 0.
    pub jitter_ratio: f64,
}

pub struct LatencyRecorder {
    max_ms: f64,
    hist: Vec<u64>,
    samples: Vec<f64>,
    sample_cap: usize,
    max_observed: f64,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self::with_shape(MAX_MS, BINS, SAMPLE_CAP)
    }

    /// All storage is sized here; recording never allocates.
    pub fn with_shape(max_ms: f64, bins: usize, sample_cap: usize) -> Self {
        Self {
            max_ms,
            hist: vec![0; bins],
            samples: Vec::with_capacity(sample_cap),
            sample_cap,
            max_observed: 0.0,
        }
    }

    /// Record one sample in milliseconds. Negative values clamp to zero;
    /// values past the range land in the last bin.
    pub fn record(&mut self, ms: f64) {
        let ms = ms.max(0.0);
        let bins = self.hist.len();
        let idx = ((ms / self.max_ms * bins as f64).floor() as usize).min(bins - 1);
        self.hist[idx] += 1;
        if self.samples.len() < self.sample_cap {
            self.samples.push(ms);
        }
        if ms > self.max_observed {
            self.max_observed = ms;
        }
    }

    pub fn percentiles(&self) -> Percentiles {
        let total: u64 = self.hist.iter().sum();
        if total == 0 {
            return Percentiles::default();
        }
        let p50 = self.kth(0.50, total);
        let p95 = self.kth(0.95, total);
        let p99 = self.kth(0.99, total);
        Percentiles {
            p50,
            p95,
            p99,
            max: self.max_observed.max(p99),
            jitter_ratio: if p50 > 0.0 { p99 / p50 } else { 0.0 },
        }
    }

    /// Midpoint of the first bin whose cumulative count reaches the q-th
    /// rank; the range bound when the walk falls off the end.
    fn kth(&self, q: f64, total: u64) -> f64 {
        let k = (q * total as f64).ceil() as u64;
        let bin_width = self.max_ms / self.hist.len() as f64;
        let mut acc = 0u64;
        for (i, &count) in self.hist.iter().enumerate() {
            acc += count;
            if acc >= k {
                return (i as f64 + 0.5) * bin_width;
            }
        }
        self.max_ms
    }

    /// The retained sample prefix, in arrival order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl Default for LatencyRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_recorder_reports_zeroes() {
        let rec = LatencyRecorder::new();
        let p = rec.percentiles();
        assert_eq!(p, Percentiles::default());
    }

    #[test]
    fn constant_samples_land_in_one_bin() {
        let mut rec = LatencyRecorder::new();
        for _ in 0..1000 {
            rec.record(0.001);
        }
        let p = rec.percentiles();
        let first_bin_mid = 0.5 * (MAX_MS / BINS as f64);
        assert_relative_eq!(p.p50, first_bin_mid);
        assert_relative_eq!(p.p99, first_bin_mid);
        assert_relative_eq!(p.jitter_ratio, 1.0);
    }

    #[test]
    fn negative_samples_clamp_to_zero() {
        let mut rec = LatencyRecorder::new();
        rec.record(-3.0);
        assert_eq!(rec.samples(), &[0.0]);
    }

    #[test]
    fn out_of_range_samples_saturate_the_last_bin() {
        let mut rec = LatencyRecorder::new();
        rec.record(100.0);
        let p = rec.percentiles();
        // p99 sits at the last bin midpoint; max keeps the true observation.
        assert!(p.p99 < MAX_MS);
        assert_relative_eq!(p.max, 100.0);
    }

    #[test]
    fn reservoir_is_a_prefix() {
        let mut rec = LatencyRecorder::with_shape(MAX_MS, BINS, 4);
        for i in 0..10 {
            rec.record(i as f64 * 0.01);
        }
        assert_eq!(rec.samples().len(), 4);
        assert_relative_eq!(rec.samples()[3], 0.03);
    }

    proptest! {
        /// p50 <= p95 <= p99 <= max for any non-empty sample set.
        #[test]
        fn percentiles_are_monotone(samples in prop::collection::vec(0.0f64..10.0, 1..500)) {
            let mut rec = LatencyRecorder::new();
            for s in &samples {
                rec.record(*s);
            }
            let p = rec.percentiles();
            prop_assert!(p.p50 <= p.p95);
            prop_assert!(p.p95 <= p.p99);
            prop_assert!(p.p99 <= p.max);
        }
    }
}
