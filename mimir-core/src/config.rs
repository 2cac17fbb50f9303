//! Runtime configuration for an engine run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Pipeline flavor under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Unbounded mutex FIFO, per-event allocation on the consumer.
    Naive,
    /// Bounded lock-free SPSC ring, allocation-free consumer.
    Optimized,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Naive => "naive",
            Mode::Optimized => "optimized",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(Mode::Naive),
            "optimized" => Ok(Mode::Optimized),
            other => Err(format!("unknown mode '{}', expected naive|optimized", other)),
        }
    }
}

/// Rate-multiplier window: during `[t_s, t_s + dur_s)` the event rate is
/// multiplied by `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub t_s: f64,
    pub dur_s: f64,
    pub x: f64,
}

impl FromStr for Burst {
    type Err = String;

    /// Parses the CLI form `t=<s>,dur=<s>,x=<mult>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut t = None;
        let mut dur = None;
        let mut x = None;
        for part in s.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| format!("expected key=value in burst spec, got '{}'", part))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| format!("invalid number '{}' in burst spec", value))?;
            match key.trim() {
                "t" => t = Some(value),
                "dur" => dur = Some(value),
                "x" => x = Some(value),
                other => return Err(format!("unknown burst field '{}'", other)),
            }
        }
        match (t, dur, x) {
            (Some(t_s), Some(dur_s), Some(x)) => Ok(Burst { t_s, dur_s, x }),
            _ => Err("burst spec must name t, dur and x, e.g. t=10,dur=2,x=5".to_string()),
        }
    }
}

/// Full configuration of one engine run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Run length in seconds.
    pub duration_s: u64,
    /// Base event rate in events/s before burst multipliers.
    pub rate: u32,
    /// Number of synthetic symbols.
    pub symbols: u32,
    /// Rate-multiplier windows.
    pub bursts: Vec<Burst>,
    pub mode: Mode,
    /// Feed PRNG seed; also part of the order-id key.
    pub seed: u64,
    /// CPU core for the best-effort affinity hint.
    pub affinity: Option<usize>,
    /// Directory receiving the report artifacts.
    pub report_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration_s: 20,
            rate: 100_000,
            symbols: 4,
            bursts: Vec::new(),
            mode: Mode::Optimized,
            seed: 7,
            affinity: None,
            report_dir: PathBuf::from("./out/run"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_str() {
        assert_eq!("naive".parse::<Mode>().unwrap(), Mode::Naive);
        assert_eq!("optimized".parse::<Mode>().unwrap(), Mode::Optimized);
        assert_eq!(Mode::Optimized.to_string(), "optimized");
        assert!("turbo".parse::<Mode>().is_err());
    }

    #[test]
    fn burst_parses_cli_form() {
        let b: Burst = "t=10,dur=2,x=5".parse().unwrap();
        assert_eq!(b.t_s, 10.0);
        assert_eq!(b.dur_s, 2.0);
        assert_eq!(b.x, 5.0);
    }

    #[test]
    fn burst_rejects_missing_fields() {
        assert!("t=10,dur=2".parse::<Burst>().is_err());
        assert!("t=10,dur=2,x=abc".parse::<Burst>().is_err());
        assert!("t=10,dur=2,y=5".parse::<Burst>().is_err());
    }
}
