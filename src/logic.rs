//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Projecting a `Session` into the `SessionView` DTO
//!   - Feedback texts for verdicts and finished levels
//!   - The level list

use crate::catalog::{shape_name, BATCH_SIZE, LEVELS};
use crate::protocol::{LevelOut, PhaseName, SessionView, ShapeOut, SummaryOut, TaskOut, VerdictOut};
use crate::render::{diagram, side_label};
use crate::session::{Phase, Session, Summary, Verdict};
use crate::domain::Task;

pub fn level_list() -> Vec<LevelOut> {
  LEVELS
    .iter()
    .enumerate()
    .map(|(index, l)| LevelOut {
      index,
      id: l.id,
      name: l.name.to_string(),
      description: l.description.to_string(),
      shapes: l
        .shapes
        .iter()
        .map(|&shape| ShapeOut { shape, name: shape_name(shape).to_string() })
        .collect(),
    })
    .collect()
}

pub fn task_prompt(task: &Task) -> String {
  format!("Вычислите периметр {}а:", shape_name(task.shape).to_lowercase())
}

fn task_out(task: &Task, number: u32) -> TaskOut {
  let d = diagram(task.shape, &task.sides);
  TaskOut {
    number,
    shape: task.shape,
    shape_name: shape_name(task.shape).to_string(),
    sides: task.sides.clone(),
    prompt: task_prompt(task),
    svg: d.to_svg(),
    diagram: d,
  }
}

/// (title, message) shown after an answer is judged.
pub fn verdict_feedback(v: &Verdict) -> (String, String) {
  if v.correct {
    ("Правильно! ✓".into(), format!("Периметр = {}", side_label(v.expected)))
  } else {
    ("Неверно ✗".into(), format!("Правильный ответ: {}", side_label(v.expected)))
  }
}

fn summary_out(s: &Summary) -> SummaryOut {
  SummaryOut {
    title: "Уровень завершён!".into(),
    message: format!("Ваш результат: {} из {}", s.score, s.total),
    record: s.record.clone(),
  }
}

pub fn session_view(session: &Session) -> SessionView {
  let score = session.score();
  let tasks_completed = session.tasks_completed();
  let mut view = SessionView {
    phase: PhaseName::Menu,
    level_index: None,
    level_name: None,
    score,
    tasks_completed,
    batch_size: BATCH_SIZE,
    progress: format!("{tasks_completed}/{BATCH_SIZE}"),
    task: None,
    verdict: None,
    summary: None,
  };

  match session.phase() {
    Phase::Menu => {}
    Phase::InProgress(round) => {
      view.phase = PhaseName::InProgress;
      view.level_index = Some(round.level_index);
      view.level_name = Some(round.level.name.to_string());
      // While a verdict is shown the counter already includes the judged task.
      let number = if round.verdict.is_some() { round.tasks_completed } else { round.tasks_completed + 1 };
      view.task = session.current_task().map(|task| task_out(task, number));
      view.verdict = round.verdict.as_ref().map(|v| {
        let (title, message) = verdict_feedback(v);
        VerdictOut { verdict: v.clone(), title, message }
      });
    }
    Phase::LevelComplete(summary) => {
      view.phase = PhaseName::LevelComplete;
      view.level_index = Some(summary.level_index);
      view.level_name = Some(summary.level.name.to_string());
      view.summary = Some(summary_out(summary));
    }
  }
  view
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::records::{MemoryStore, RecordStore};
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn menu_view_is_empty() {
    let v = session_view(&Session::new());
    assert_eq!(v.phase, PhaseName::Menu);
    assert_eq!(v.progress, "0/5");
    assert!(v.task.is_none() && v.verdict.is_none() && v.summary.is_none());
  }

  #[test]
  fn answer_is_hidden_until_judged() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut s = Session::new();
    s.start_level(0, &mut rng).unwrap();
    let v = session_view(&s);
    assert_eq!(v.phase, PhaseName::InProgress);
    assert_eq!(v.task.as_ref().unwrap().number, 1);
    assert!(v.verdict.is_none());

    s.submit_answer("0");
    let v = session_view(&s);
    let verdict = v.verdict.unwrap();
    assert!(!verdict.verdict.correct);
    assert_eq!(verdict.title, "Неверно ✗");
    assert!(verdict.message.starts_with("Правильный ответ: "));
    assert_eq!(v.progress, "1/5");
  }

  #[test]
  fn finished_level_shows_summary() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut store = RecordStore::new(MemoryStore::default(), "k");
    let mut s = Session::new();
    s.start_level(2, &mut rng).unwrap();
    for _ in 0..BATCH_SIZE {
      let right = s.current_task().unwrap().correct_answer.to_string();
      s.submit_answer(&right);
      s.advance(&mut rng, &mut store);
    }
    let v = session_view(&s);
    assert_eq!(v.phase, PhaseName::LevelComplete);
    let summary = v.summary.unwrap();
    assert_eq!(summary.message, "Ваш результат: 5 из 5");
    assert_eq!(summary.record.unwrap().percentage, 100);
    assert!(v.task.is_none());
  }

  #[test]
  fn prompt_uses_genitive_name() {
    let t = Task::new(crate::domain::Shape::Rhombus, vec![5.0; 4]);
    assert_eq!(task_prompt(&t), "Вычислите периметр ромба:");
  }

  #[test]
  fn level_list_mirrors_catalog() {
    let levels = level_list();
    assert_eq!(levels.len(), LEVELS.len());
    assert_eq!(levels[1].shapes[0].name, "Прямоугольник");
  }
}
