use serde::Serialize;

/// Axis-aligned detector box in pixel coordinates.
///
/// Corners are always stored ordered, so `x2 >= x1` and `y2 >= y1` hold for every value.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl BoundingBox {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Builds a box from raw detector corners.
    ///
    /// Coordinates are truncated toward zero; negative and NaN values clamp to 0.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(Self::to_pixel(x1), Self::to_pixel(y1), Self::to_pixel(x2), Self::to_pixel(y2))
    }

    #[inline(always)]
    fn to_pixel(value: f32) -> u32 {
        // float to int casts saturate, NaN becomes 0
        value.max(0.0) as u32
    }

    pub fn x1(&self) -> u32 {
        self.x1
    }

    pub fn y1(&self) -> u32 {
        self.y1
    }

    pub fn x2(&self) -> u32 {
        self.x2
    }

    pub fn y2(&self) -> u32 {
        self.y2
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}
