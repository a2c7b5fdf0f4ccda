//! Static content: the level list and shape display names.

use crate::domain::{Level, Shape};

/// Tasks per level. The progress counter reads `tasksCompleted/BATCH_SIZE`.
pub const BATCH_SIZE: u32 = 5;

pub static LEVELS: [Level; 3] = [
  Level {
    id: 1,
    name: "Уровень 1: Базовые фигуры",
    description: "Треугольники и квадраты",
    shapes: &[Shape::Triangle, Shape::Square],
  },
  Level {
    id: 2,
    name: "Уровень 2: Четырёхугольники",
    description: "Прямоугольники и ромбы",
    shapes: &[Shape::Rectangle, Shape::Rhombus],
  },
  Level {
    id: 3,
    name: "Уровень 3: Многоугольники",
    description: "Пятиугольники и шестиугольники",
    shapes: &[Shape::Pentagon, Shape::Hexagon],
  },
];

pub fn level(index: usize) -> Option<&'static Level> {
  LEVELS.get(index)
}

pub fn shape_name(shape: Shape) -> &'static str {
  match shape {
    Shape::Triangle => "Треугольник",
    Shape::Square => "Квадрат",
    Shape::Rectangle => "Прямоугольник",
    Shape::Rhombus => "Ромб",
    Shape::Pentagon => "Пятиугольник",
    Shape::Hexagon => "Шестиугольник",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn levels_are_numbered_from_one_and_never_empty() {
    for (i, lvl) in LEVELS.iter().enumerate() {
      assert_eq!(lvl.id as usize, i + 1);
      assert!(!lvl.shapes.is_empty());
    }
    assert!(level(LEVELS.len()).is_none());
  }

  #[test]
  fn every_shape_belongs_to_some_level() {
    for shape in Shape::ALL {
      assert!(LEVELS.iter().any(|l| l.shapes.contains(&shape)), "{shape:?} unreachable");
    }
  }
}
