//! Frame driver
//!
//! Feeds frame deltas into a [`Level`], handles pause, and reports the final
//! status once the level's grace period has run out. Hosts call
//! [`Runner::frame`] once per rendered frame and read [`Runner::level`] to draw.

use crate::sim::{Keys, Level, LevelEvent, Status};

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Level advanced and is still going
    Running,
    /// Frame ignored while paused
    Paused,
    /// Level finished with this status; further frames are ignored
    Finished(Status),
}

/// Drives one level to completion
pub struct Runner<F: FnOnce(Status)> {
    level: Level,
    paused: bool,
    on_finish: Option<F>,
    outcome: Option<Status>,
    /// Events from the most recent frame
    events: Vec<LevelEvent>,
    frames: u64,
    elapsed: f32,
}

impl<F: FnOnce(Status)> Runner<F> {
    /// `on_finish` is called exactly once with the final status
    pub fn new(level: Level, on_finish: F) -> Self {
        Self {
            level,
            paused: false,
            on_finish: Some(on_finish),
            outcome: None,
            events: Vec::new(),
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// Advance by one frame of `dt` seconds
    ///
    /// The delta is clamped to `Tuning::max_frame_step` so a long stall (tab
    /// switch, debugger) does not turn into one huge step.
    pub fn frame(&mut self, dt: f32, keys: &Keys) -> Frame {
        if let Some(status) = self.outcome {
            return Frame::Finished(status);
        }
        if self.paused {
            return Frame::Paused;
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.level.tuning().max_frame_step)
        } else {
            0.0
        };
        self.level.advance(dt, keys);
        self.frames += 1;
        self.elapsed += dt;

        self.events = self.level.drain_events();
        for event in &self.events {
            log::debug!("Frame {}: {:?}", self.frames, event);
        }

        if self.level.is_finished() {
            if let Some(status) = self.level.status() {
                log::info!(
                    "Level finished: {:?} after {} frames ({:.2}s)",
                    status,
                    self.frames,
                    self.elapsed
                );
                self.outcome = Some(status);
                if let Some(on_finish) = self.on_finish.take() {
                    on_finish(status);
                }
                return Frame::Finished(status);
            }
        }
        Frame::Running
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Resumed");
        }
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Final status once the level is finished
    pub fn outcome(&self) -> Option<Status> {
        self.outcome
    }

    /// Events produced by the most recent frame
    pub fn events(&self) -> &[LevelEvent] {
        &self.events
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds so far (after clamping)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn coin_level() -> Level {
        Level::from_rows(&["x   x", "x@o x", "xxxxx"], Tuning::default(), 3).unwrap()
    }

    #[test]
    fn test_runner_reports_outcome_once() {
        let mut calls = Vec::new();
        {
            let mut runner = Runner::new(coin_level(), |status| calls.push(status));
            let right = Keys {
                right: true,
                ..Default::default()
            };
            let mut finished = None;
            for _ in 0..200 {
                if let Frame::Finished(status) = runner.frame(1.0 / 60.0, &right) {
                    finished = Some(status);
                    break;
                }
            }
            assert_eq!(finished, Some(Status::Won));
            assert_eq!(runner.frame(1.0 / 60.0, &right), Frame::Finished(Status::Won));
            assert_eq!(runner.outcome(), Some(Status::Won));
        }
        assert_eq!(calls, vec![Status::Won]);
    }

    #[test]
    fn test_pause_freezes_level() {
        let mut runner = Runner::new(coin_level(), |_| {});
        runner.pause();
        let right = Keys {
            right: true,
            ..Default::default()
        };
        let before = *runner.level().player().unwrap();
        for _ in 0..10 {
            assert_eq!(runner.frame(0.05, &right), Frame::Paused);
        }
        assert_eq!(*runner.level().player().unwrap(), before);
        assert_eq!(runner.frames(), 0);

        runner.toggle_pause();
        assert!(!runner.is_paused());
        assert_eq!(runner.frame(0.05, &right), Frame::Running);
        assert!(runner.level().player().unwrap().pos.x > before.pos.x);
    }

    #[test]
    fn test_frame_delta_clamped() {
        let mut runner = Runner::new(coin_level(), |_| {});
        runner.frame(5.0, &Keys::default());
        assert!((runner.elapsed() - 0.1).abs() < 1e-6);
        runner.frame(f32::NAN, &Keys::default());
        runner.frame(-1.0, &Keys::default());
        assert!((runner.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_frame_events_exposed() {
        let mut runner = Runner::new(coin_level(), |_| {});
        let right = Keys {
            right: true,
            ..Default::default()
        };
        let mut saw_coin = false;
        for _ in 0..60 {
            runner.frame(1.0 / 60.0, &right);
            saw_coin |= runner
                .events()
                .iter()
                .any(|e| matches!(e, LevelEvent::CoinCollected { .. }));
        }
        assert!(saw_coin);
    }
}
