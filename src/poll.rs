//! The bounded polling loop shared by the periodic utilities.
//!
//! Drives repeated sampling at a fixed cadence with an optional total
//! duration cutoff and Ctrl-C handling. A tick is one read, one emit and
//! one fixed-length sleep; the sleep is not adjusted for processing time,
//! so real cadence drifts by per-tick latency.

use crate::error::{Result, UtilError};
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Timing configuration for one polling loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    /// Seconds between ticks, strictly positive
    pub interval_secs: f64,
    /// Optional total run time in seconds, strictly positive when present
    pub duration_secs: Option<f64>,
}

impl LoopConfig {
    pub fn new(interval_secs: f64, duration_secs: Option<f64>) -> Self {
        Self {
            interval_secs,
            duration_secs,
        }
    }

    /// Reject non-positive interval or duration before the loop starts.
    ///
    /// Validation happens exactly once; the loop never revalidates.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs <= 0.0 || !self.interval_secs.is_finite() {
            return Err(UtilError::config("Interval must be a positive number."));
        }
        if let Some(duration) = self.duration_secs {
            if duration <= 0.0 || !duration.is_finite() {
                return Err(UtilError::config("Duration must be a positive number."));
            }
        }
        Ok(())
    }

    fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }
}

/// How a polling loop came to a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The configured duration elapsed; normal termination.
    DurationReached,
    /// The user pressed Ctrl-C; normal termination.
    Interrupted,
}

/// Run the polling loop until the duration elapses, the user interrupts,
/// or `sample` fails fatally.
///
/// `sample` returns `Ok(Some(reading))` for a good tick, `Ok(None)` when
/// this tick produced no data (reported by `emit` and never fatal), and
/// `Err` only for non-recoverable failures, which stop the loop. A single
/// failed tick is never retried. The interrupt is observed during the
/// sleep; a read in progress runs to completion first.
pub async fn run<R, S, E>(config: &LoopConfig, mut sample: S, mut emit: E) -> Result<PollOutcome>
where
    S: FnMut() -> Result<Option<R>>,
    E: FnMut(Option<&R>, DateTime<Local>),
{
    config.validate()?;

    let start = Instant::now();
    let interval = config.interval();

    // One listener for the whole loop: a signal raised while a read is in
    // flight is held by the registration and observed at the next select,
    // instead of being dropped between per-tick listeners.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        if let Some(duration) = config.duration_secs {
            if start.elapsed().as_secs_f64() > duration {
                return Ok(PollOutcome::DurationReached);
            }
        }

        let reading = sample()?;
        emit(reading.as_ref(), Local::now());

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = &mut ctrl_c => {
                return Ok(PollOutcome::Interrupted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_positive_config() {
        assert!(LoopConfig::new(2.0, None).validate().is_ok());
        assert!(LoopConfig::new(0.5, Some(10.0)).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_interval() {
        for interval in [0.0, -1.0, f64::NAN, f64::NEG_INFINITY] {
            let err = LoopConfig::new(interval, None).validate().unwrap_err();
            assert!(err.is_config(), "interval {interval} should be rejected");
        }
    }

    #[test]
    fn test_validate_rejects_bad_duration() {
        let err = LoopConfig::new(1.0, Some(0.0)).validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Duration"));
    }

    #[tokio::test]
    async fn test_invalid_config_samples_nothing() {
        let mut sampled = 0;
        let result = run(
            &LoopConfig::new(-1.0, None),
            || {
                sampled += 1;
                Ok(Some(()))
            },
            |_, _| {},
        )
        .await;
        assert!(result.is_err());
        assert_eq!(sampled, 0);
    }

    #[tokio::test]
    async fn test_duration_cutoff_tick_count() {
        // duration = 3 * interval should come out to 3-4 ticks.
        let mut ticks = 0;
        let outcome = run(
            &LoopConfig::new(0.02, Some(0.06)),
            || Ok(Some(())),
            |_, _| ticks += 1,
        )
        .await
        .unwrap();
        assert_eq!(outcome, PollOutcome::DurationReached);
        assert!(
            (3..=4).contains(&ticks),
            "expected 3-4 ticks, got {ticks}"
        );
    }

    #[tokio::test]
    async fn test_no_data_tick_is_not_fatal() {
        let mut calls = 0;
        let mut no_data_ticks = 0;
        let outcome = run(
            &LoopConfig::new(0.01, Some(0.035)),
            || {
                calls += 1;
                if calls % 2 == 0 {
                    Ok(None)
                } else {
                    Ok(Some(calls))
                }
            },
            |reading: Option<&i32>, _| {
                if reading.is_none() {
                    no_data_ticks += 1;
                }
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome, PollOutcome::DurationReached);
        assert!(no_data_ticks >= 1);
    }

    #[tokio::test]
    async fn test_fatal_sample_error_stops_loop() {
        let mut calls = 0;
        let result = run(
            &LoopConfig::new(0.01, None),
            || {
                calls += 1;
                if calls < 3 {
                    Ok(Some(calls))
                } else {
                    Err(UtilError::read("bus gone"))
                }
            },
            |_, _| {},
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_emit_sees_each_reading() {
        let mut emitted = Vec::new();
        run(
            &LoopConfig::new(0.01, Some(0.025)),
            || Ok(Some(7u8)),
            |reading, _| emitted.push(reading.copied()),
        )
        .await
        .unwrap();
        assert!(!emitted.is_empty());
        assert!(emitted.iter().all(|r| *r == Some(7)));
    }
}
