//! # Exercise Timer Engine
//!
//! Countdown/phase-cycling state machines behind the guided relaxation
//! exercises, independent of rendering. The pure [`ExerciseTimer`] owns the
//! phase arithmetic; [`TickerHandle`] drives one at a second cadence on a
//! cancellable tokio task, so an unmounted screen can never leak ticks.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Seconds a muscle region is held tense, and then released
pub const TENSE_SECONDS: u32 = 6;
pub const RELEASE_SECONDS: u32 = 6;

/// Body regions walked by progressive muscle relaxation, in order
pub const RELAXATION_REGIONS: [&str; 5] = ["Hands", "Shoulders", "Face", "Legs", "Feet"];

/// The five sensory grounding prompts, in order
pub const GROUNDING_STEPS: [&str; 5] = [
    "See 5 things",
    "Touch 4 things",
    "Hear 3 things",
    "Smell 2 things",
    "Taste 1 thing",
];

/// Whether a plan wraps around or terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Wraps from the last phase back to phase 0 indefinitely (breathing)
    Cyclic,
    /// Advances phase-to-phase and stops after the last one
    Finite,
}

/// One named, timed segment of an exercise
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub label: String,
    pub seconds: u32,
}

/// An ordered sequence of phases plus the wrap/stop mode
#[derive(Debug, Clone, PartialEq)]
pub struct ExercisePlan {
    name: String,
    phases: Vec<Phase>,
    mode: TimerMode,
}

impl ExercisePlan {
    /// Build a plan from parallel label/duration sequences
    ///
    /// An empty or mismatched plan is a programming error, not a runtime
    /// fault, so construction asserts.
    pub fn new(name: &str, labels: &[&str], seconds: &[u32], mode: TimerMode) -> Self {
        assert!(!seconds.is_empty(), "an exercise needs at least one phase");
        assert_eq!(
            labels.len(),
            seconds.len(),
            "phase labels and durations must line up"
        );
        assert!(
            seconds.iter().all(|&s| s > 0),
            "every phase needs a positive duration"
        );

        let phases = labels
            .iter()
            .zip(seconds)
            .map(|(label, &seconds)| Phase {
                label: (*label).to_string(),
                seconds,
            })
            .collect();

        Self {
            name: name.to_string(),
            phases,
            mode,
        }
    }

    /// The natural tranquilizer: inhale 4, hold 7, exhale 8, repeating
    pub fn four_seven_eight() -> Self {
        Self::new(
            "4-7-8 Breathing",
            &["Inhale", "Hold", "Exhale"],
            &[4, 7, 8],
            TimerMode::Cyclic,
        )
    }

    /// Four equal sides, repeating
    pub fn box_breathing() -> Self {
        Self::new(
            "Box Breathing",
            &["Inhale", "Hold", "Exhale", "Hold"],
            &[4, 4, 4, 4],
            TimerMode::Cyclic,
        )
    }

    /// Tense/release pair per body region, stopping after the last region
    pub fn progressive_relaxation() -> Self {
        let mut labels = Vec::new();
        let mut seconds = Vec::new();
        for region in RELAXATION_REGIONS {
            labels.push(format!("Tense {}", region));
            seconds.push(TENSE_SECONDS);
            labels.push(format!("Release {}", region));
            seconds.push(RELEASE_SECONDS);
        }
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        Self::new(
            "Progressive Muscle Relaxation",
            &labels,
            &seconds,
            TimerMode::Finite,
        )
    }

    /// Five one-minute movement prompts, then done
    pub fn energy_boost() -> Self {
        Self::new(
            "5-Minute Energy Boost",
            &[
                "Reach tall",
                "Shoulder rolls",
                "Deep breaths",
                "March in place",
                "Shake it out",
            ],
            &[60, 60, 60, 60, 60],
            TimerMode::Finite,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }
}

/// State published after each tick
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub phase_index: usize,
    pub label: String,
    pub remaining: u32,
    pub elapsed: u64,
    pub finished: bool,
}

/// Pure per-second countdown over an [`ExercisePlan`]
///
/// Tick contract: while more than one second remains in the phase, decrement
/// it; the tick that consumes the last second advances to the next phase
/// (wrapping or stopping per mode) and resets the countdown. Elapsed total
/// counts every tick regardless of transitions.
#[derive(Debug, Clone)]
pub struct ExerciseTimer {
    plan: ExercisePlan,
    phase_index: usize,
    remaining: u32,
    elapsed: u64,
    finished: bool,
}

impl ExerciseTimer {
    pub fn new(plan: ExercisePlan) -> Self {
        let remaining = plan.phases[0].seconds;
        Self {
            plan,
            phase_index: 0,
            remaining,
            elapsed: 0,
            finished: false,
        }
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) {
        if self.finished {
            return;
        }

        self.elapsed += 1;
        if self.remaining > 1 {
            self.remaining -= 1;
            return;
        }

        // This tick consumes the phase's last second
        let next = self.phase_index + 1;
        match self.plan.mode {
            TimerMode::Cyclic => {
                self.phase_index = next % self.plan.phases.len();
                self.remaining = self.plan.phases[self.phase_index].seconds;
            }
            TimerMode::Finite => {
                if next >= self.plan.phases.len() {
                    self.finished = true;
                    self.remaining = 0;
                } else {
                    self.phase_index = next;
                    self.remaining = self.plan.phases[next].seconds;
                }
            }
        }
    }

    pub fn plan(&self) -> &ExercisePlan {
        &self.plan
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn label(&self) -> &str {
        &self.plan.phases[self.phase_index].label
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase_index: self.phase_index,
            label: self.label().to_string(),
            remaining: self.remaining,
            elapsed: self.elapsed,
            finished: self.finished,
        }
    }
}

/// Progressive muscle relaxation over the standard region walk
///
/// A thin view over the finite timer: the region only changes once a full
/// tense+release pair has completed.
#[derive(Debug, Clone)]
pub struct MuscleRelaxation {
    timer: ExerciseTimer,
}

impl MuscleRelaxation {
    pub fn new() -> Self {
        Self {
            timer: ExerciseTimer::new(ExercisePlan::progressive_relaxation()),
        }
    }

    pub fn tick(&mut self) {
        self.timer.tick();
    }

    pub fn current_region(&self) -> &'static str {
        RELAXATION_REGIONS[self.timer.phase_index() / 2]
    }

    /// True during the tense half of the pair
    pub fn is_tensing(&self) -> bool {
        self.timer.phase_index() % 2 == 0
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    pub fn timer(&self) -> &ExerciseTimer {
        &self.timer
    }
}

impl Default for MuscleRelaxation {
    fn default() -> Self {
        Self::new()
    }
}

/// What a grounding advance did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundingAdvance {
    /// Moved to the next step
    Moved,
    /// Confirmed the last step; the sequence is complete
    Completed,
}

/// The 5-4-3-2-1 grounding walk
///
/// Steps advance only on explicit user confirmation, never on a timer.
#[derive(Debug, Clone)]
pub struct GroundingSequence {
    steps: Vec<String>,
    index: usize,
    completed: bool,
}

impl GroundingSequence {
    pub fn new() -> Self {
        Self::with_steps(GROUNDING_STEPS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_steps(steps: Vec<String>) -> Self {
        assert!(!steps.is_empty(), "a grounding walk needs at least one step");
        Self {
            steps,
            index: 0,
            completed: false,
        }
    }

    pub fn current_step(&self) -> &str {
        &self.steps[self.index]
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Confirm the current step
    ///
    /// On the last step this reports completion instead of moving past the
    /// list bound; the index stays put.
    pub fn advance(&mut self) -> GroundingAdvance {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            GroundingAdvance::Moved
        } else {
            self.completed = true;
            GroundingAdvance::Completed
        }
    }
}

impl Default for GroundingSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellable once-per-second driver for an [`ExerciseTimer`]
///
/// Owns the periodic trigger; the owning screen keeps the handle and every
/// teardown path (manual close, navigation away, drop) cancels it, so no
/// tick fires after the screen is gone. A finite plan also ends the task on
/// its own once the timer finishes.
pub struct TickerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Spawn the driver; snapshots arrive on `updates` after every tick
    pub fn spawn(timer: ExerciseTimer, updates: mpsc::UnboundedSender<TimerSnapshot>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut timer = timer;
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so
            // the first real tick lands a full second in.
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        timer.tick();
                        let snapshot = timer.snapshot();
                        let finished = snapshot.finished;
                        if updates.send(snapshot).is_err() || finished {
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel, task }
    }

    /// Stop the ticker; no tick will fire after this returns
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether the driver task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
