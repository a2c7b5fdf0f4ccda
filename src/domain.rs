//! Domain models: shapes, levels, tasks and leaderboard records.

use serde::{Deserialize, Serialize};

/// Polygon kinds a task can be built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
  Triangle,
  Square,
  Rectangle,
  Rhombus,
  Pentagon,
  Hexagon,
}

impl Shape {
  #[cfg(test)]
  pub const ALL: [Shape; 6] = [
    Shape::Triangle,
    Shape::Square,
    Shape::Rectangle,
    Shape::Rhombus,
    Shape::Pentagon,
    Shape::Hexagon,
  ];

  /// Number of sides a task for this shape carries.
  pub fn side_count(self) -> usize {
    match self {
      Shape::Triangle => 3,
      Shape::Square | Shape::Rectangle | Shape::Rhombus => 4,
      Shape::Pentagon => 5,
      Shape::Hexagon => 6,
    }
  }
}

/// A themed group of shapes. Static configuration, see `catalog::LEVELS`.
#[derive(Clone, Debug)]
pub struct Level {
  pub id: u32,
  pub name: &'static str,
  pub description: &'static str,
  pub shapes: &'static [Shape],
}

/// One prompt: a shape with its side lengths and the expected perimeter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub shape: Shape,
  pub sides: Vec<f64>,
  pub correct_answer: f64,
}

impl Task {
  /// Build a task from its sides; the answer is always their sum.
  pub fn new(shape: Shape, sides: Vec<f64>) -> Self {
    let correct_answer = sides.iter().sum();
    Self { shape, sides, correct_answer }
  }
}

/// Summary of one completed level attempt, as persisted in the record store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  pub level: u32,
  pub score: u32,
  pub total: u32,
  pub date: String,
  pub percentage: u32,
}
