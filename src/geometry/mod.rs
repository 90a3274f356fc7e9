//! Geometric primitives for page layout.
//!
//! All coordinates are in pixels with the origin at the top-left corner of the
//! canvas and y growing downwards.

/// A 2D point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its `(x_min, y_min, x_max, y_max)` corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// let center = rect.center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Same rectangle moved by `(dx, dy)`.
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Check if `other` lies entirely inside this rectangle (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::geometry::Rect;
    ///
    /// let page = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(page.contains_rect(&Rect::new(10.0, 10.0, 90.0, 90.0)));
    /// assert!(!page.contains_rect(&Rect::new(50.0, 50.0, 60.0, 10.0)));
    /// ```
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Whether the rectangle has positive width and height.
    pub fn is_proper(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Corners rounded down to whole pixels, as `[x1, y1, x2, y2]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.7, 20.2, 30.9, 40.5);
    /// assert_eq!(rect.floor_corners(), [10, 20, 30, 40]);
    /// ```
    pub fn floor_corners(&self) -> [i64; 4] {
        [
            self.left().floor() as i64,
            self.top().floor() as i64,
            self.right().floor() as i64,
            self.bottom().floor() as i64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
    }

    #[test]
    fn test_rect_from_points() {
        let r = Rect::from_points(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.x, 10.0);
        assert_eq!(r.y, 20.0);
        assert_eq!(r.width, 100.0);
        assert_eq!(r.height, 50.0);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn test_rect_translate() {
        let r = Rect::new(0.0, 0.0, 10.0, 5.0).translate(3.0, 4.0);
        assert_eq!(r, Rect::new(3.0, 4.0, 10.0, 5.0));
    }

    #[test]
    fn test_contains_rect_edges_inclusive() {
        let page = Rect::from_points(10.0, 10.0, 90.0, 90.0);
        assert!(page.contains_rect(&page));
        assert!(!page.contains_rect(&Rect::from_points(9.9, 10.0, 20.0, 20.0)));
        assert!(!page.contains_rect(&Rect::from_points(10.0, 10.0, 20.0, 90.1)));
    }

    #[test]
    fn test_is_proper() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_proper());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_proper());
    }

    #[test]
    fn test_floor_corners_negative() {
        let r = Rect::from_points(-0.5, 0.0, 1.5, 2.0);
        assert_eq!(r.floor_corners(), [-1, 0, 1, 2]);
    }
}
