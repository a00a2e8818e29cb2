//! Rhythm assessment engine
//!
//! Captures exactly one debounced hit per expected beat, echoing each hit on
//! the strummer, then hands the timestamps to the scoring code.
//!
//! The capture loop is a deliberate busy-poll: no sleep between iterations,
//! maximum responsiveness at the cost of CPU. It also has no timeout. The
//! contract is "capture exactly N debounced events before returning", and a
//! user who stops tapping leaves the device waiting. [`AssessParams`] is
//! where a maximum-wait bound would go if one is ever wanted.

use std::time::{Duration, Instant};
use tracing::debug;
use tutor_common::config::DeviceConfig;
use tutor_common::pattern::Pattern;
use tutor_common::ports::{ActuatorPort, SensorPort};
use tutor_common::scoring::Assessment;

/// Capture-loop tuning.
#[derive(Debug, Clone)]
pub struct AssessParams {
    /// Sensor level above which a poll counts as a hit
    pub trigger_threshold: u16,
    /// Minimum gap between two accepted hits
    pub debounce: Duration,
    /// Breathing room after the final hit before scoring
    pub settle: Duration,
}

impl AssessParams {
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            trigger_threshold: config.sensor.trigger_threshold,
            debounce: config.debounce(),
            settle: config.settle(),
        }
    }
}

/// Everything one assessment produces: the scored intervals plus the dense
/// raw sample log used for telemetry.
#[derive(Debug, Clone)]
pub struct Capture {
    pub assessment: Assessment,
    /// One entry per poll iteration, accepted hit or not. Spacing follows
    /// the poll rate, not a fixed clock.
    pub samples: Vec<u16>,
}

/// Seam between the session state machine and the capture loop.
pub trait Assessor {
    /// Block until one hit per expected beat has been captured, then score.
    fn assess(&mut self, pattern: &Pattern, actuator: &mut dyn ActuatorPort) -> Capture;
}

/// Real capture engine polling a sensor port.
pub struct RhythmEngine<S: SensorPort> {
    sensor: S,
    params: AssessParams,
}

impl<S: SensorPort> RhythmEngine<S> {
    pub fn new(sensor: S, params: AssessParams) -> Self {
        Self { sensor, params }
    }
}

impl<S: SensorPort> Assessor for RhythmEngine<S> {
    fn assess(&mut self, pattern: &Pattern, actuator: &mut dyn ActuatorPort) -> Capture {
        let start = Instant::now();
        let threshold = self.params.trigger_threshold;
        let debounce = self.params.debounce.as_secs_f64();

        let mut hits: Vec<f64> = Vec::with_capacity(pattern.len());
        let mut samples: Vec<u16> = Vec::new();
        // Primed so the very first trigger is never rejected by debounce
        let mut last_accepted = -debounce;

        while hits.len() < pattern.len() {
            let now = start.elapsed().as_secs_f64();
            let level = self.sensor.read();
            samples.push(level);

            if level > threshold && now - last_accepted > debounce {
                // Echo the hit back on the strummer before resuming the poll
                actuator.strum();
                debug!(
                    "Hit {}/{} accepted at {:.3}s (level {})",
                    hits.len() + 1,
                    pattern.len(),
                    now,
                    level
                );
                hits.push(now);
                last_accepted = now;
            }
        }

        // Breathing room after the final hit
        std::thread::sleep(self.params.settle);

        Capture {
            assessment: Assessment::from_hits(pattern, &hits),
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH: u16 = 60_000;

    /// Sensor that sleeps a scripted delay before each reading, making hit
    /// timing deterministic to within scheduler jitter. Returns quiet once
    /// the script runs out.
    struct ScriptedSensor {
        steps: std::vec::IntoIter<(u64, u16)>,
    }

    impl ScriptedSensor {
        fn new(steps: Vec<(u64, u16)>) -> Self {
            Self {
                steps: steps.into_iter(),
            }
        }
    }

    impl SensorPort for ScriptedSensor {
        fn read(&mut self) -> u16 {
            match self.steps.next() {
                Some((delay_ms, level)) => {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                    level
                }
                None => 0,
            }
        }
    }

    #[derive(Default)]
    struct CountingActuator {
        strums: usize,
    }

    impl ActuatorPort for CountingActuator {
        fn strum(&mut self) {
            self.strums += 1;
        }
    }

    fn params(threshold: u16, debounce_ms: u64) -> AssessParams {
        AssessParams {
            trigger_threshold: threshold,
            debounce: Duration::from_millis(debounce_ms),
            settle: Duration::ZERO,
        }
    }

    #[test]
    fn test_one_interval_per_expected_beat() {
        let pattern = Pattern::new(vec![0.1, 0.1]).unwrap();
        let sensor = ScriptedSensor::new(vec![
            (0, 0),
            (10, HIGH),
            (10, 0),
            (150, HIGH),
        ]);
        let mut engine = RhythmEngine::new(sensor, params(33_500, 100));
        let mut actuator = CountingActuator::default();

        let capture = engine.assess(&pattern, &mut actuator);

        assert_eq!(capture.assessment.actual_intervals.len(), 2);
        assert_eq!(capture.assessment.ratios.len(), 2);
        // One strum echo per accepted hit
        assert_eq!(actuator.strums, 2);
        // Every poll was logged, hit or not
        assert_eq!(capture.samples.len(), 4);
    }

    #[test]
    fn test_debounce_suppresses_rapid_retrigger() {
        // Readings above threshold at ~0ms, ~100ms, ~400ms with a 300ms
        // window: the middle one must be suppressed.
        let pattern = Pattern::new(vec![0.2, 0.2]).unwrap();
        let sensor = ScriptedSensor::new(vec![
            (0, HIGH),
            (100, HIGH),
            (300, HIGH),
        ]);
        let mut engine = RhythmEngine::new(sensor, params(33_500, 300));
        let mut actuator = CountingActuator::default();

        let capture = engine.assess(&pattern, &mut actuator);

        assert_eq!(actuator.strums, 2);
        // Gap between the two accepted hits exceeds the debounce window
        assert!(
            capture.assessment.actual_intervals[1] > 0.3,
            "accepted hits only {:.3}s apart",
            capture.assessment.actual_intervals[1]
        );
        // The suppressed reading still lands in the raw log
        assert_eq!(capture.samples.len(), 3);
    }

    #[test]
    fn test_continuously_high_signal_respects_debounce() {
        // Signal pinned above threshold: hits must still be spaced by more
        // than the debounce window.
        let pattern = Pattern::new(vec![0.1, 0.1, 0.1]).unwrap();
        let sensor = ScriptedSensor::new(vec![(10, HIGH); 60]);
        let mut engine = RhythmEngine::new(sensor, params(33_500, 100));
        let mut actuator = CountingActuator::default();

        let capture = engine.assess(&pattern, &mut actuator);

        assert_eq!(actuator.strums, 3);
        for gap in &capture.assessment.actual_intervals[1..] {
            assert!(*gap > 0.1, "hits {:.3}s apart inside debounce window", gap);
        }
    }

    #[test]
    fn test_first_trigger_accepted_immediately() {
        // Debounce priming: a hit on the very first poll is accepted.
        let pattern = Pattern::new(vec![0.5]).unwrap();
        let sensor = ScriptedSensor::new(vec![(0, HIGH)]);
        let mut engine = RhythmEngine::new(sensor, params(33_500, 300));
        let mut actuator = CountingActuator::default();

        let capture = engine.assess(&pattern, &mut actuator);

        assert_eq!(actuator.strums, 1);
        assert!(capture.assessment.actual_intervals[0] < 0.1);
    }

    #[test]
    fn test_at_threshold_reading_is_not_a_hit() {
        // Acceptance is strictly greater-than.
        let pattern = Pattern::new(vec![0.1]).unwrap();
        let sensor = ScriptedSensor::new(vec![
            (0, 33_500),
            (10, HIGH),
        ]);
        let mut engine = RhythmEngine::new(sensor, params(33_500, 100));
        let mut actuator = CountingActuator::default();

        let capture = engine.assess(&pattern, &mut actuator);

        assert_eq!(actuator.strums, 1);
        assert_eq!(capture.samples[0], 33_500);
    }
}
