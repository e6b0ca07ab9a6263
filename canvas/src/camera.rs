#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

/// A point in either client space or scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Mapping between the displayed canvas element and the fixed-size scene.
///
/// The scene has fixed design dimensions (e.g. 800 × 800) but the element
/// showing it may be laid out at any client size. Pointer positions arrive in
/// client pixels relative to the element's top-left corner and are scaled
/// into scene units here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Displayed width of the canvas element, in client pixels.
    pub client_width: f64,
    /// Displayed height of the canvas element, in client pixels.
    pub client_height: f64,
    /// Scene width in scene units.
    pub scene_width: f64,
    /// Scene height in scene units.
    pub scene_height: f64,
}

impl Viewport {
    /// A viewport that displays the scene at its natural size.
    #[must_use]
    pub fn identity(scene_width: f64, scene_height: f64) -> Self {
        Self { client_width: scene_width, client_height: scene_height, scene_width, scene_height }
    }

    fn scale_x(&self) -> f64 {
        if self.client_width > 0.0 { self.scene_width / self.client_width } else { 1.0 }
    }

    fn scale_y(&self) -> f64 {
        if self.client_height > 0.0 { self.scene_height / self.client_height } else { 1.0 }
    }

    /// Convert an element-relative client point to scene coordinates.
    #[must_use]
    pub fn client_to_scene(&self, client: Point) -> Point {
        Point { x: client.x * self.scale_x(), y: client.y * self.scale_y() }
    }

    /// Convert a scene point to element-relative client coordinates.
    #[must_use]
    pub fn scene_to_client(&self, scene: Point) -> Point {
        Point { x: scene.x / self.scale_x(), y: scene.y / self.scale_y() }
    }
}
