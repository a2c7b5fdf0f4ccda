//! Answer checking.

use crate::domain::Task;

/// Allowed deviation between the submitted value and the perimeter.
pub const TOLERANCE: f64 = 0.01;

/// True when `raw` parses to a number within `TOLERANCE` of the answer.
/// Empty or unparsable input is simply not correct.
pub fn check(task: &Task, raw: &str) -> bool {
  let raw = raw.trim();
  if raw.is_empty() {
    return false;
  }
  match raw.parse::<f64>() {
    // NaN and infinities never compare below the tolerance.
    Ok(value) => (value - task.correct_answer).abs() < TOLERANCE,
    Err(_) => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Shape;
  use crate::generator::generate;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn square(side: f64) -> Task {
    Task::new(Shape::Square, vec![side; 4])
  }

  #[test]
  fn own_answer_is_always_accepted() {
    let mut rng = StdRng::seed_from_u64(1);
    for shape in Shape::ALL {
      for _ in 0..30 {
        let t = generate(shape, &mut rng);
        assert!(check(&t, &t.correct_answer.to_string()), "{t:?}");
      }
    }
  }

  #[test]
  fn tolerance_boundary() {
    let t = square(10.0);
    assert!(check(&t, &(t.correct_answer + 0.009).to_string()));
    assert!(check(&t, &(t.correct_answer - 0.009).to_string()));
    assert!(!check(&t, &(t.correct_answer + 0.011).to_string()));
    assert!(!check(&t, &(t.correct_answer - 0.011).to_string()));
  }

  #[test]
  fn empty_and_garbage_are_wrong() {
    let t = square(10.0);
    assert!(!check(&t, ""));
    assert!(!check(&t, "   "));
    assert!(!check(&t, "сорок"));
    assert!(!check(&t, "NaN"));
    assert!(!check(&t, "inf"));
  }

  #[test]
  fn decimal_and_padded_input() {
    let t = square(10.0);
    assert!(check(&t, "40.0"));
    assert!(check(&t, " 40 "));
    assert!(!check(&t, "41"));
  }
}
