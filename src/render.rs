//! SVG diagrams for tasks.
//!
//! Each shape has a fixed outline; labels carry side lengths in centimetres.
//! Shapes with unequal sides label every distinct length, equal-sided shapes
//! label a single representative side.

use serde::Serialize;

use crate::domain::Shape;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
  Start,
  Middle,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
  pub x: u32,
  pub y: u32,
  pub anchor: Anchor,
  pub text: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
  pub view_box: (u32, u32),
  pub outline: Vec<(u32, u32)>,
  pub labels: Vec<Label>,
}

/// Fixed outline for a shape plus the placement of each side label.
struct Layout {
  view_box: (u32, u32),
  outline: &'static [(u32, u32)],
  /// (x, y, anchor, index into the side list)
  labels: &'static [(u32, u32, Anchor, usize)],
}

const TRIANGLE: Layout = Layout {
  view_box: (200, 180),
  outline: &[(100, 20), (20, 160), (180, 160)],
  labels: &[(100, 15, Anchor::Middle, 0), (40, 175, Anchor::Middle, 1), (190, 100, Anchor::Start, 2)],
};

const SQUARE: Layout = Layout {
  view_box: (200, 200),
  outline: &[(40, 40), (160, 40), (160, 160), (40, 160)],
  labels: &[(100, 30, Anchor::Middle, 0), (170, 105, Anchor::Start, 1)],
};

const RECTANGLE: Layout = Layout {
  view_box: (240, 160),
  outline: &[(30, 40), (210, 40), (210, 120), (30, 120)],
  labels: &[(120, 30, Anchor::Middle, 0), (220, 85, Anchor::Start, 1)],
};

const RHOMBUS: Layout = Layout {
  view_box: (200, 200),
  outline: &[(100, 20), (180, 100), (100, 180), (20, 100)],
  labels: &[(140, 50, Anchor::Middle, 0)],
};

const PENTAGON: Layout = Layout {
  view_box: (200, 200),
  outline: &[(100, 20), (180, 80), (150, 170), (50, 170), (20, 80)],
  labels: &[(140, 40, Anchor::Middle, 0)],
};

const HEXAGON: Layout = Layout {
  view_box: (200, 200),
  outline: &[(100, 20), (170, 60), (170, 140), (100, 180), (30, 140), (30, 60)],
  labels: &[(135, 35, Anchor::Middle, 0)],
};

fn layout(shape: Shape) -> &'static Layout {
  match shape {
    Shape::Triangle => &TRIANGLE,
    Shape::Square => &SQUARE,
    Shape::Rectangle => &RECTANGLE,
    Shape::Rhombus => &RHOMBUS,
    Shape::Pentagon => &PENTAGON,
    Shape::Hexagon => &HEXAGON,
  }
}

pub fn side_label(value: f64) -> String {
  format!("{value} см")
}

/// Lay out the diagram for `shape` with the given side lengths.
pub fn diagram(shape: Shape, sides: &[f64]) -> Diagram {
  let layout = layout(shape);
  let labels = layout
    .labels
    .iter()
    .filter_map(|&(x, y, anchor, idx)| {
      sides.get(idx).map(|&v| Label { x, y, anchor, text: side_label(v) })
    })
    .collect();
  Diagram { view_box: layout.view_box, outline: layout.outline.to_vec(), labels }
}

impl Diagram {
  pub fn to_svg(&self) -> String {
    let (w, h) = self.view_box;
    let points = self
      .outline
      .iter()
      .map(|(x, y)| format!("{x},{y}"))
      .collect::<Vec<_>>()
      .join(" ");
    let mut out = format!(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}">"#);
    out.push_str(&format!(
      r#"<polygon points="{points}" fill="none" stroke="currentColor" stroke-width="2"/>"#
    ));
    for l in &self.labels {
      let anchor = match l.anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
      };
      out.push_str(&format!(
        r#"<text x="{}" y="{}" text-anchor="{anchor}">{}</text>"#,
        l.x, l.y, l.text
      ));
    }
    out.push_str("</svg>");
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::generate;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn every_distinct_side_is_labeled() {
    let mut rng = StdRng::seed_from_u64(17);
    for shape in Shape::ALL {
      for _ in 0..30 {
        let t = generate(shape, &mut rng);
        let d = diagram(t.shape, &t.sides);
        for side in &t.sides {
          let text = side_label(*side);
          assert!(d.labels.iter().any(|l| l.text == text), "{shape:?} misses {text}");
        }
      }
    }
  }

  #[test]
  fn outline_matches_side_count() {
    for shape in Shape::ALL {
      let d = diagram(shape, &vec![5.0; shape.side_count()]);
      assert_eq!(d.outline.len(), shape.side_count());
    }
  }

  #[test]
  fn svg_contains_labels() {
    let svg = diagram(Shape::Rectangle, &[12.0, 7.0, 12.0, 7.0]).to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">12 см<"));
    assert!(svg.contains(">7 см<"));
    assert!(svg.ends_with("</svg>"));
  }
}
