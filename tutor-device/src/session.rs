//! Session/level state machine
//!
//! Drives the whole run: welcome, then for each level a demo → prep →
//! assess → result loop that either advances or replays the level, and a
//! final completion screen. Exactly one phase is active at a time; every
//! transition is the synchronous return of the previous call, so there is
//! nothing to interrupt and nothing to lock.
//!
//! Telemetry, when configured, is emitted once per attempt after the score
//! is shown. A failed send is logged and the session continues.

use std::time::Duration;
use tracing::{info, warn};
use tutor_common::pattern::{Catalog, Level};
use tutor_common::ports::{ActuatorPort, DisplayPort};
use tutor_common::scoring::{displayed_score, GENEROSITY};

use crate::engine::Assessor;
use crate::telemetry::TelemetryClient;

// Prompt hold times as shipped on the device
const WELCOME_HOLD: Duration = Duration::from_secs(2);
const LISTEN_HOLD: Duration = Duration::from_secs(2);
const READY_HOLD: Duration = Duration::from_secs(3);
const GO_HOLD: Duration = Duration::from_secs(1);
const SCORE_HOLD: Duration = Duration::from_secs(4);
const RESULT_HOLD: Duration = Duration::from_secs(2);
const COMPLETE_HOLD: Duration = Duration::from_secs(5);

/// Decision after one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Move to the next level, attempt counter reset
    Advance,
    /// Replay the same level, attempt counter incremented
    Retry,
}

/// A level advances exactly when the displayed (generosity-scaled,
/// truncated) score reaches the pass threshold.
pub fn outcome(displayed: u32, pass_score: u32) -> Outcome {
    if displayed >= pass_score {
        Outcome::Advance
    } else {
        Outcome::Retry
    }
}

/// One attempt's outcome, for logging and the end-of-run summary.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub level: u32,
    pub attempt: u32,
    pub displayed_score: u32,
    pub passed: bool,
}

/// Everything that happened in one complete run.
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub attempts: Vec<AttemptRecord>,
}

/// The session state machine. Owns the display and strummer ports, the
/// assessor, and the optional telemetry client resolved at startup.
pub struct Session<A, D, E> {
    actuator: A,
    display: D,
    assessor: E,
    catalog: Catalog,
    telemetry: Option<TelemetryClient>,
}

impl<A, D, E> Session<A, D, E>
where
    A: ActuatorPort,
    D: DisplayPort,
    E: Assessor,
{
    pub fn new(
        actuator: A,
        display: D,
        assessor: E,
        catalog: Catalog,
        telemetry: Option<TelemetryClient>,
    ) -> Self {
        Self {
            actuator,
            display,
            assessor,
            catalog,
            telemetry,
        }
    }

    /// Run the session to completion and return the per-attempt summary.
    /// Returns once every level has been passed; the caller decides what
    /// "idle" means afterwards.
    pub async fn run(&mut self) -> SessionSummary {
        let mut summary = SessionSummary::default();

        self.display
            .show("Welcome to", Some("Rhythm Tutor!"), WELCOME_HOLD);

        let levels: Vec<Level> = self.catalog.levels().to_vec();
        for level in &levels {
            let mut attempt: u32 = 1;
            loop {
                self.demo(level).await;

                self.display.show("Get Ready...", None, READY_HOLD);
                self.display.show("Go!", None, GO_HOLD);

                let capture = self.assessor.assess(&level.pattern, &mut self.actuator);
                let displayed = displayed_score(capture.assessment.raw_score(), GENEROSITY);
                info!(
                    "Level {} attempt {}: raw {:.1}%, displayed {}%",
                    level.number,
                    attempt,
                    capture.assessment.raw_score(),
                    displayed
                );

                self.display
                    .show(&format!("Score: {}%", displayed), None, SCORE_HOLD);

                self.send_telemetry(level.number, attempt, &capture.samples)
                    .await;

                let passed = outcome(displayed, level.pass_score) == Outcome::Advance;
                summary.attempts.push(AttemptRecord {
                    level: level.number,
                    attempt,
                    displayed_score: displayed,
                    passed,
                });

                if passed {
                    self.display.show("Great job!", Some("Next level..."), RESULT_HOLD);
                    break;
                }
                self.display.show("Try again", Some("Same level"), RESULT_HOLD);
                attempt += 1;
            }
        }

        self.display.show("Congrats!", Some("Rhythm Master!"), COMPLETE_HOLD);
        summary
    }

    /// Pure playback: strum the level's pattern with no scoring.
    async fn demo(&mut self, level: &Level) {
        self.display.show(
            &format!("Level {}", level.number),
            Some("Listen..."),
            LISTEN_HOLD,
        );
        for interval in level.pattern.intervals() {
            self.actuator.strum();
            tokio::time::sleep(Duration::from_secs_f64(*interval)).await;
        }
    }

    /// Best-effort: a failed send never affects progression.
    async fn send_telemetry(&self, level: u32, attempt: u32, samples: &[u16]) {
        if let Some(client) = &self.telemetry {
            match client.send(level, attempt, samples).await {
                Ok(()) => info!("Telemetry sent for level {} attempt {}", level, attempt),
                Err(e) => warn!("Telemetry send failed (continuing): {}", e),
            }
        }
    }
}
