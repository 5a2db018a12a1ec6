use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("cannot compute a bounding box over an empty point set")]
    EmptyPointSet,
}

/// Axis-aligned bounding box over a point set, used to size the map canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl BoundingBox {
    pub fn from_points(points: &[Point]) -> Result<Self, GeometryError> {
        let first = points.first().ok_or(GeometryError::EmptyPointSet)?;
        let mut bounds = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for point in &points[1..] {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.max_y = bounds.max_y.max(point.y);
        }
        Ok(bounds)
    }

    /// Expands the box by `padding` on all four sides.
    ///
    /// Calling this more than once compounds the padding; callers apply it
    /// exactly once after construction.
    pub fn set_padding(&mut self, padding: f32) {
        self.min_x -= padding;
        self.min_y -= padding;
        self.max_x += padding;
        self.max_y += padding;
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.max_x - self.min_x,
            height: self.max_y - self.min_y,
        }
    }
}
