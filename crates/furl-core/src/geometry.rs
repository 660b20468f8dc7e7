//! Minimal geometry for combo placement.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// A box of the given size centered on `center`.
    pub fn around(center: Point, width: f64, height: f64) -> Self {
        Self {
            min: Point::new(center.x - width / 2.0, center.y - height / 2.0),
            max: Point::new(center.x + width / 2.0, center.y + height / 2.0),
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn padded(&self, padding: &Padding) -> Bounds {
        Bounds {
            min: Point::new(self.min.x - padding.left, self.min.y - padding.top),
            max: Point::new(self.max.x + padding.right, self.max.y + padding.bottom),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Per-side spacing around a box.
///
/// Deserializes from a single number or from 1 to 4 numbers in CSS
/// order: `[all]`, `[vertical, horizontal]`, `[top, horizontal, bottom]`
/// or `[top, right, bottom, left]`. Always serializes as four values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PaddingRepr", into = "PaddingRepr")]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PaddingRepr {
    Uniform(f64),
    Sides(Vec<f64>),
}

impl TryFrom<PaddingRepr> for Padding {
    type Error = String;

    fn try_from(repr: PaddingRepr) -> Result<Self, Self::Error> {
        let sides = match repr {
            PaddingRepr::Uniform(v) => return Ok(Padding::uniform(v)),
            PaddingRepr::Sides(sides) => sides,
        };
        let (top, right, bottom, left) = match sides.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => {
                return Err(format!(
                    "padding takes 1 to 4 values, got {}",
                    sides.len()
                ))
            }
        };
        Ok(Padding {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl From<Padding> for PaddingRepr {
    fn from(p: Padding) -> Self {
        PaddingRepr::Sides(vec![p.top, p.right, p.bottom, p.left])
    }
}
