//! Quiz session state machine.
//!
//! ```text
//!   Menu --start_level--> InProgress --submit_answer--> InProgress (verdict shown)
//!                             ^                               |
//!                             +----------advance--------------+  (< BATCH_SIZE judged)
//!                                                             |
//!                           LevelComplete <-----advance-------+  (BATCH_SIZE judged)
//! ```
//!
//! `return_to_menu` goes back to `Menu` from anywhere, and `start_level` is
//! accepted from any phase. Randomness and the record sink are passed in by
//! the caller, so the session itself owns no I/O.

use anyhow::{bail, Result};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::catalog::{self, BATCH_SIZE};
use crate::domain::{Level, Record, Task};
use crate::generator::generate_for_level;
use crate::judge;
use crate::records::RecordSink;

/// Result of judging one answer, kept until the learner moves on.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
  pub correct: bool,
  pub answer: String,
  pub expected: f64,
}

/// A level being played.
#[derive(Clone, Debug)]
pub struct Round {
  pub level_index: usize,
  pub level: &'static Level,
  pub task: Task,
  pub score: u32,
  pub tasks_completed: u32,
  pub verdict: Option<Verdict>,
}

/// A finished level. `record` is `None` when the store could not be written.
#[derive(Clone, Debug)]
pub struct Summary {
  pub level_index: usize,
  pub level: &'static Level,
  pub score: u32,
  pub total: u32,
  pub record: Option<Record>,
}

#[derive(Clone, Debug, Default)]
pub enum Phase {
  #[default]
  Menu,
  InProgress(Round),
  LevelComplete(Summary),
}

/// User intents, shared by the HTTP and WebSocket front ends.
#[derive(Clone, Debug)]
pub enum Action {
  StartLevel(usize),
  SubmitAnswer(String),
  Advance,
  ReturnToMenu,
}

/// What a transition did; `Ignored` means the state is untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
  Ignored,
  Started,
  Judged { correct: bool },
  NextTask,
  LevelComplete,
  Menu,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
  phase: Phase,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn phase(&self) -> &Phase {
    &self.phase
  }

  pub fn current_task(&self) -> Option<&Task> {
    match &self.phase {
      Phase::InProgress(round) => Some(&round.task),
      _ => None,
    }
  }

  pub fn score(&self) -> u32 {
    match &self.phase {
      Phase::Menu => 0,
      Phase::InProgress(round) => round.score,
      Phase::LevelComplete(summary) => summary.score,
    }
  }

  pub fn tasks_completed(&self) -> u32 {
    match &self.phase {
      Phase::Menu => 0,
      Phase::InProgress(round) => round.tasks_completed,
      Phase::LevelComplete(summary) => summary.total,
    }
  }

  /// True when the next `advance` ends the level and reports a record.
  pub fn finishes_on_advance(&self) -> bool {
    matches!(&self.phase, Phase::InProgress(round) if round.verdict.is_some() && round.tasks_completed >= BATCH_SIZE)
  }

  /// Begin (or restart) a level with fresh counters and a new task.
  pub fn start_level<R: Rng>(&mut self, level_index: usize, rng: &mut R) -> Result<Outcome> {
    let Some(level) = catalog::level(level_index) else {
      bail!("unknown level index {level_index}");
    };
    let task = generate_for_level(level, rng);
    info!(target: "quiz", level = level.id, shape = ?task.shape, "Level started");
    self.phase = Phase::InProgress(Round {
      level_index,
      level,
      task,
      score: 0,
      tasks_completed: 0,
      verdict: None,
    });
    Ok(Outcome::Started)
  }

  /// Judge an answer for the active task. Empty input, or input while a
  /// verdict is still on screen, is ignored.
  pub fn submit_answer(&mut self, text: &str) -> Outcome {
    let Phase::InProgress(round) = &mut self.phase else {
      return Outcome::Ignored;
    };
    if round.verdict.is_some() || text.trim().is_empty() {
      return Outcome::Ignored;
    }

    let correct = judge::check(&round.task, text);
    if correct {
      round.score += 1;
    }
    round.tasks_completed += 1;
    round.verdict = Some(Verdict {
      correct,
      answer: text.trim().to_string(),
      expected: round.task.correct_answer,
    });
    debug!(target: "quiz", %correct, score = round.score, completed = round.tasks_completed, "Answer judged");
    Outcome::Judged { correct }
  }

  /// Move past a shown verdict: next task, or finish the level once the
  /// batch is done and report it to `sink`.
  pub fn advance<R: Rng, S: RecordSink + ?Sized>(&mut self, rng: &mut R, sink: &mut S) -> Outcome {
    let round = match &mut self.phase {
      Phase::InProgress(round) if round.verdict.is_some() => round,
      _ => return Outcome::Ignored,
    };

    if round.tasks_completed < BATCH_SIZE {
      round.task = generate_for_level(round.level, rng);
      round.verdict = None;
      return Outcome::NextTask;
    }

    let (level_index, level, score, total) =
      (round.level_index, round.level, round.score, round.tasks_completed);
    let record = match sink.save(level.id, score, total) {
      Ok(record) => Some(record),
      Err(e) => {
        error!(target: "quiz", level = level.id, error = %e, "Failed to save record");
        None
      }
    };
    info!(target: "quiz", level = level.id, score, total, "Level complete");
    self.phase = Phase::LevelComplete(Summary { level_index, level, score, total, record });
    Outcome::LevelComplete
  }

  pub fn return_to_menu(&mut self) -> Outcome {
    self.phase = Phase::Menu;
    Outcome::Menu
  }

  pub fn dispatch<R: Rng, S: RecordSink + ?Sized>(
    &mut self,
    action: Action,
    rng: &mut R,
    sink: &mut S,
  ) -> Result<Outcome> {
    match action {
      Action::StartLevel(index) => self.start_level(index, rng),
      Action::SubmitAnswer(text) => Ok(self.submit_answer(&text)),
      Action::Advance => Ok(self.advance(rng, sink)),
      Action::ReturnToMenu => Ok(self.return_to_menu()),
    }
  }
}
