use crate::util::range::NumRange;
use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign, Sum,
};
use image::Rgba;
use serde::{Deserialize, Serialize};

/// A 2D point in pixel space. The origin is the top-left of whatever surface
/// the point is relative to (the screen, a world container, or a single
/// texture). Right is positive x, down is positive y.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An RGB color. Values are stored as floats between 0 and 1 (inclusive).
/// This uses f32 because the extra precision from f64 is pointless.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color3 {
    /// The valid range of values for each component in RGB
    const COMPONENT_RANGE: NumRange<f32> = NumRange::normal();

    /// Create a new RGB color from integer components in the [0,255] range.
    pub const fn new_int(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Convert this number to a set of 3 bytes: `(red, green, blue)`
    pub fn to_ints(self) -> (u8, u8, u8) {
        (
            (self.red * 255.0).round() as u8,
            (self.green * 255.0).round() as u8,
            (self.blue * 255.0).round() as u8,
        )
    }

    /// Convert this color to an HTML color code: `#rrggbb`
    pub fn to_html(self) -> String {
        let (r, g, b) = self.to_ints();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Convert to an opaque pixel
    pub fn to_rgba(self) -> Rgba<u8> {
        let (r, g, b) = self.to_ints();
        Rgba([r, g, b, 255])
    }

    /// Blend towards another color. `0.0` is all `self`, `1.0` is all
    /// `other`.
    pub fn mix(self, other: Self, amount: f32) -> Self {
        let amount = Self::COMPONENT_RANGE.clamp(amount);
        let channel = |a: f32, b: f32| a + (b - a) * amount;
        Self {
            red: channel(self.red, other.red),
            green: channel(self.green, other.green),
            blue: channel(self.blue, other.blue),
        }
    }

    /// Blend towards white
    pub fn lighten(self, amount: f32) -> Self {
        self.mix(Self::new_int(255, 255, 255), amount)
    }

    /// Blend towards black
    pub fn darken(self, amount: f32) -> Self {
        self.mix(Self::new_int(0, 0, 0), amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_to_html() {
        assert_eq!(Color3::new_int(0, 128, 255).to_html(), "#0080ff");
    }

    #[test]
    fn test_mix() {
        let black = Color3::new_int(0, 0, 0);
        let white = Color3::new_int(255, 255, 255);
        let gray = black.mix(white, 0.5);
        assert_approx_eq!(gray.red, 0.5);
        // Out-of-range amounts are clamped
        assert_eq!(black.mix(white, 2.0), white);
        assert_eq!(white.darken(1.0), black);
    }

    #[test]
    fn test_point_distance() {
        let a = Point2::new(1.0, 1.0);
        assert_approx_eq!(a.distance_to(Point2::new(4.0, 5.0)), 5.0);
        assert_approx_eq!(a.distance_to(a), 0.0);
    }
}
