//! Start/pause/resume/finish timer shared by every timed task.
//!
//! A [`Timer`] only stores instants; its [`TimerState`] and duration are
//! derived from them. Resuming shifts the start instant forward by the length
//! of the pause, so `finish - start` is always the working time and paused
//! intervals never count.
//!
//! ```text
//! NotStarted ──start──▶ Running ──pause──▶ Paused
//!                          ▲                 │
//!                          └─────resume──────┘
//!           Running / Paused ──finish──▶ Finished
//! ```

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{
    display::Elapsed,
    error::{Result, WorkflowError},
};

/// State of a timer, derived from which instants are set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    NotStarted,
    Running,
    Paused,
    Finished,
}

impl TimerState {
    /// Label shown to operators.
    pub fn label(&self) -> &'static str {
        match self {
            TimerState::NotStarted => "Non démarré",
            TimerState::Running => "En cours",
            TimerState::Paused => "En pause",
            TimerState::Finished => "Terminé",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TimerState::NotStarted => "not started",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        };
        f.write_str(text)
    }
}

/// The four timer transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimerAction {
    Start,
    Pause,
    Resume,
    Finish,
}

impl fmt::Display for TimerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TimerAction::Start => "start",
            TimerAction::Pause => "pause",
            TimerAction::Resume => "resume",
            TimerAction::Finish => "finish",
        };
        f.write_str(text)
    }
}

impl FromStr for TimerAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(TimerAction::Start),
            "pause" => Ok(TimerAction::Pause),
            "resume" => Ok(TimerAction::Resume),
            "finish" => Ok(TimerAction::Finish),
            _ => Err(format!("Invalid timer action: {s}")),
        }
    }
}

/// Instants recorded for a timed task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timer {
    /// Start instant, shifted forward by every completed pause
    pub started_at: Option<Timestamp>,

    /// Set while paused; kept if the task was finished while paused
    pub paused_at: Option<Timestamp>,

    pub finished_at: Option<Timestamp>,
}

/// Snapshot of a timer for stateless client rendering.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimerStatus {
    pub state: TimerState,
    pub label: &'static str,
    pub can_start: bool,
    pub can_pause: bool,
    pub can_resume: bool,
    pub can_finish: bool,
    /// Working time as `H:MM:SS`, known once finished
    pub duration: Option<String>,
}

impl Timer {
    /// Derive the current state from the recorded instants.
    pub fn state(&self) -> TimerState {
        match (self.started_at, self.paused_at, self.finished_at) {
            (_, _, Some(_)) => TimerState::Finished,
            (None, _, None) => TimerState::NotStarted,
            (Some(_), Some(_), None) => TimerState::Paused,
            (Some(_), None, None) => TimerState::Running,
        }
    }

    /// Working time of a finished timer.
    ///
    /// Finishing while paused counts up to the pause instant, otherwise up to
    /// the finish instant.
    pub fn duration(&self) -> Option<SignedDuration> {
        let start = self.started_at?;
        let end = match (self.paused_at, self.finished_at) {
            (_, None) => return None,
            (Some(paused), Some(_)) => paused,
            (None, Some(finished)) => finished,
        };
        Some(end.duration_since(start))
    }

    /// Working time so far, for a running or paused timer as well.
    pub fn elapsed(&self, now: Timestamp) -> Option<SignedDuration> {
        let start = self.started_at?;
        let end = match self.state() {
            TimerState::Finished => return self.duration(),
            TimerState::Paused => self.paused_at.unwrap_or(now),
            TimerState::Running | TimerState::NotStarted => now,
        };
        Some(end.duration_since(start))
    }

    /// Apply one transition at `now`.
    pub fn apply(&mut self, action: TimerAction, now: Timestamp) -> Result<TimerStatus> {
        match action {
            TimerAction::Start => Ok(self.start(now)),
            TimerAction::Pause => self.pause(now),
            TimerAction::Resume => self.resume(now),
            TimerAction::Finish => self.finish(now),
        }
    }

    /// Record the start instant. Starting an already started timer changes
    /// nothing.
    pub fn start(&mut self, now: Timestamp) -> TimerStatus {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.status()
    }

    /// Pause a running timer.
    pub fn pause(&mut self, now: Timestamp) -> Result<TimerStatus> {
        self.require(TimerAction::Pause, &[TimerState::Running])?;
        self.paused_at = Some(now);
        Ok(self.status())
    }

    /// Resume a paused timer, pushing the start instant forward by the time
    /// spent paused.
    pub fn resume(&mut self, now: Timestamp) -> Result<TimerStatus> {
        self.require(TimerAction::Resume, &[TimerState::Paused])?;
        if let (Some(start), Some(paused)) = (self.started_at, self.paused_at) {
            let shifted = start
                .checked_add(now.duration_since(paused))
                .map_err(|e| {
                    WorkflowError::invalid_value("started_at").with_reason(e.to_string())
                })?;
            self.started_at = Some(shifted);
            self.paused_at = None;
        }
        Ok(self.status())
    }

    /// Stop the timer for good.
    pub fn finish(&mut self, now: Timestamp) -> Result<TimerStatus> {
        self.require(
            TimerAction::Finish,
            &[TimerState::Running, TimerState::Paused],
        )?;
        self.finished_at = Some(now);
        Ok(self.status())
    }

    /// Current state plus the actions a client may offer.
    pub fn status(&self) -> TimerStatus {
        let state = self.state();
        TimerStatus {
            state,
            label: state.label(),
            can_start: state == TimerState::NotStarted,
            can_pause: state == TimerState::Running,
            can_resume: state == TimerState::Paused,
            can_finish: matches!(state, TimerState::Running | TimerState::Paused),
            duration: self.duration().map(|d| Elapsed(&d).to_string()),
        }
    }

    fn require(&self, action: TimerAction, allowed: &[TimerState]) -> Result<()> {
        let from = self.state();
        if allowed.contains(&from) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition { from, action })
        }
    }
}
