//! Random task generation.
//!
//! Side lengths are whole centimetres sampled from fixed per-shape ranges.
//! The random source is always passed in, so tests can use a seeded `StdRng`.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::{Level, Shape, Task};

const TRIANGLE_SIDE: RangeInclusive<u32> = 5..=14;
const SQUARE_SIDE: RangeInclusive<u32> = 5..=19;
const RECTANGLE_LENGTH: RangeInclusive<u32> = 5..=19;
const RECTANGLE_WIDTH: RangeInclusive<u32> = 3..=12;
const RHOMBUS_SIDE: RangeInclusive<u32> = 5..=16;
const PENTAGON_SIDE: RangeInclusive<u32> = 4..=13;
const HEXAGON_SIDE: RangeInclusive<u32> = 4..=11;

fn sample<R: Rng>(rng: &mut R, range: RangeInclusive<u32>) -> f64 {
  f64::from(rng.gen_range(range))
}

/// Produce a fresh, independent task for `shape`.
pub fn generate<R: Rng>(shape: Shape, rng: &mut R) -> Task {
  let sides: Vec<f64> = match shape {
    Shape::Triangle => (0..3).map(|_| sample(rng, TRIANGLE_SIDE)).collect(),
    Shape::Square => vec![sample(rng, SQUARE_SIDE); 4],
    Shape::Rectangle => {
      let length = sample(rng, RECTANGLE_LENGTH);
      let width = sample(rng, RECTANGLE_WIDTH);
      vec![length, width, length, width]
    }
    Shape::Rhombus => vec![sample(rng, RHOMBUS_SIDE); 4],
    Shape::Pentagon => vec![sample(rng, PENTAGON_SIDE); 5],
    Shape::Hexagon => vec![sample(rng, HEXAGON_SIDE); 6],
  };
  debug_assert_eq!(sides.len(), shape.side_count());
  let task = Task::new(shape, sides);
  debug!(target: "quiz", ?shape, sides = ?task.sides, answer = task.correct_answer, "Generated task");
  task
}

/// Pick a shape uniformly from the level and generate a task for it.
pub fn generate_for_level<R: Rng>(level: &Level, rng: &mut R) -> Task {
  // Level shape lists are static and non-empty.
  let shape = level.shapes.choose(rng).copied().unwrap_or(Shape::Triangle);
  generate(shape, rng)
}
