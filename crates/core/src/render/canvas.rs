//! A tiny software rasterizer over [RgbaImage]. Tiles are small (tens of
//! pixels) so everything here samples pixel centers with no antialiasing.

use crate::render::{
    autotile::{Corner, CornerFill},
    unit::{Color3, Point2},
};
use image::{Rgba, RgbaImage};

/// A drawing surface. All shape coordinates are in pixels, with `(0, 0)` at
/// the top-left corner of the top-left pixel.
#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// An opaque canvas of a single color
    pub fn filled(width: u32, height: u32, color: Color3) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color.to_rgba()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Blend a color into one pixel. `alpha` is the opacity of the new
    /// color. Out-of-bounds pixels are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color3, alpha: f32) {
        if x < 0
            || y < 0
            || x >= i64::from(self.width())
            || y >= i64::from(self.height())
        {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        *pixel = blend(*pixel, color, alpha);
    }

    /// Fill an axis-aligned rectangle
    pub fn fill_rect(
        &mut self,
        top_left: Point2,
        width: f64,
        height: f64,
        color: Color3,
        alpha: f32,
    ) {
        let bottom_right = top_left + Point2::new(width, height);
        self.fill_where(top_left, bottom_right, color, alpha, |p| {
            p.x >= top_left.x
                && p.x < bottom_right.x
                && p.y >= top_left.y
                && p.y < bottom_right.y
        });
    }

    /// Fill a circle
    pub fn fill_circle(
        &mut self,
        center: Point2,
        radius: f64,
        color: Color3,
        alpha: f32,
    ) {
        let extent = Point2::new(radius, radius);
        self.fill_where(center - extent, center + extent, color, alpha, |p| {
            p.distance_to(center) <= radius
        });
    }

    /// Fill an arbitrary polygon, using the even-odd rule. Fewer than 3
    /// points draws nothing.
    pub fn fill_polygon(
        &mut self,
        points: &[Point2],
        color: Color3,
        alpha: f32,
    ) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = bounds(points);
        self.fill_where(min, max, color, alpha, |p| contains(points, p));
    }

    /// Draw a straight line segment with the given thickness
    pub fn stroke_line(
        &mut self,
        start: Point2,
        end: Point2,
        thickness: f64,
        color: Color3,
        alpha: f32,
    ) {
        let length = start.distance_to(end);
        if length <= f64::EPSILON {
            self.fill_circle(start, thickness / 2.0, color, alpha);
            return;
        }
        // Perpendicular offset to each side of the line
        let normal = Point2::new(-(end.y - start.y), end.x - start.x)
            * (thickness / 2.0 / length);
        self.fill_polygon(
            &[start + normal, end + normal, end - normal, start - normal],
            color,
            alpha,
        );
    }

    /// Paint a rounded-corner overlay: everything in the corner's
    /// `radius × radius` square that falls outside the quarter circle is
    /// filled with the neighbor's color.
    pub fn fill_corner(&mut self, corner: Corner, fill: CornerFill) {
        let radius = fill.radius;
        if radius <= 0.0 {
            return;
        }
        let width = f64::from(self.width());
        let height = f64::from(self.height());
        let (d_row, d_col) = corner.direction();
        // Corner of the canvas, and the center of the arc inset from it
        let (corner_x, arc_x) = if d_col < 0 {
            (0.0, radius)
        } else {
            (width, width - radius)
        };
        let (corner_y, arc_y) = if d_row < 0 {
            (0.0, radius)
        } else {
            (height, height - radius)
        };
        let arc_center = Point2::new(arc_x, arc_y);
        let min = Point2::new(corner_x.min(arc_x), corner_y.min(arc_y));
        let max = Point2::new(corner_x.max(arc_x), corner_y.max(arc_y));
        self.fill_where(min, max, fill.color, 1.0, |p| {
            p.distance_to(arc_center) > radius
        });
    }

    /// Fill every pixel in a bounding box whose center passes a test
    fn fill_where(
        &mut self,
        min: Point2,
        max: Point2,
        color: Color3,
        alpha: f32,
        test: impl Fn(Point2) -> bool,
    ) {
        let x_range = pixel_span(min.x, max.x, self.width());
        let y_range = pixel_span(min.y, max.y, self.height());
        for y in y_range {
            for x in x_range.clone() {
                let center = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
                if test(center) {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }
}

/// Alpha-blend a color over an existing pixel
fn blend(under: Rgba<u8>, color: Color3, alpha: f32) -> Rgba<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let over = color.to_rgba();
    let under_alpha = f32::from(under[3]) / 255.0;
    let out_alpha = alpha + under_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |o: u8, u: u8| {
        let value = (f32::from(o) * alpha
            + f32::from(u) * under_alpha * (1.0 - alpha))
            / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(over[0], under[0]),
        channel(over[1], under[1]),
        channel(over[2], under[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Pixel indices whose centers could fall in `[min, max]`, clipped to the
/// canvas
fn pixel_span(min: f64, max: f64, limit: u32) -> std::ops::Range<i64> {
    let start = (min.floor() as i64).max(0);
    let end = (max.ceil() as i64).min(i64::from(limit));
    start..end.max(start)
}

fn bounds(points: &[Point2]) -> (Point2, Point2) {
    points.iter().fold(
        (
            Point2::new(f64::INFINITY, f64::INFINITY),
            Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

/// Even-odd point-in-polygon test
fn contains(points: &[Point2], p: Point2) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y)
            && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
