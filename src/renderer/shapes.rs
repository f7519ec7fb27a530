//! Shape generation for 2D primitives
//!
//! Everything is drawn as 1px-wide outlines built from triangle quads, in
//! virtual-screen pixel coordinates (origin top-left, y down).

use glam::Vec2;

use super::DrawSurface;
use super::vertex::{Color, Vertex};

/// Two triangles covering an axis-aligned pixel span
fn filled_rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [Vertex; 6] {
    let (x2, y2) = (x + w, y + h);
    [
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Generate vertices for a line through pixel centers
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let half = Vec2::splat(0.5);
    let (p1, p2) = (from + half, to + half);

    // Degenerate lines still cover their pixel
    let dir = (p2 - p1).try_normalize().unwrap_or(Vec2::X);
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let (p1, p2) = (p1 - dir * 0.5, p2 + dir * 0.5);

    let v1a = p1 + perp;
    let v1b = p1 - perp;
    let v2a = p2 + perp;
    let v2b = p2 - perp;
    [
        Vertex::new(v1a.x, v1a.y, color),
        Vertex::new(v1b.x, v1b.y, color),
        Vertex::new(v2a.x, v2a.y, color),
        Vertex::new(v2a.x, v2a.y, color),
        Vertex::new(v1b.x, v1b.y, color),
        Vertex::new(v2b.x, v2b.y, color),
    ]
}

/// Generate vertices for a rectangle outline
pub fn rectangle_outline(x: i32, y: i32, w: i32, h: i32, color: [f32; 4]) -> Vec<Vertex> {
    if w <= 0 || h <= 0 {
        return Vec::new();
    }
    let (x, y, w, h) = (x as f32, y as f32, w as f32, h as f32);

    let mut vertices = Vec::with_capacity(24);
    vertices.extend(filled_rect(x, y, w, 1.0, color));
    if h > 1.0 {
        vertices.extend(filled_rect(x, y + h - 1.0, w, 1.0, color));
    }
    if h > 2.0 {
        vertices.extend(filled_rect(x, y + 1.0, 1.0, h - 2.0, color));
        if w > 1.0 {
            vertices.extend(filled_rect(x + w - 1.0, y + 1.0, 1.0, h - 2.0, color));
        }
    }
    vertices
}

/// Collects draw calls into a vertex list, one frame at a time
#[derive(Debug, Clone)]
pub struct ShapeBatch {
    width: i32,
    height: i32,
    color: Color,
    vertices: Vec<Vertex>,
    /// Last frame finished with `update_screen`
    presented: Vec<Vertex>,
    frames: u64,
}

impl ShapeBatch {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            color: Color::default(),
            vertices: Vec::new(),
            presented: Vec::new(),
            frames: 0,
        }
    }

    /// Vertices of the frame being drawn
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertices of the last presented frame
    pub fn presented(&self) -> &[Vertex] {
        &self.presented
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DrawSurface for ShapeBatch {
    fn clear_screen(&mut self) {
        self.vertices.clear();
    }

    fn set_color(&mut self, argb: u32) {
        self.color = Color::from_argb(argb);
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let from = Vec2::new(x1 as f32, y1 as f32);
        let to = Vec2::new(x2 as f32, y2 as f32);
        self.vertices
            .extend(line(from, to, 1.0, self.color.to_array()));
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.vertices
            .extend(rectangle_outline(x, y, w, h, self.color.to_array()));
    }

    fn draw_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.draw_line(x1, y1, x2, y2);
        self.draw_line(x2, y2, x3, y3);
        self.draw_line(x3, y3, x1, y1);
    }

    fn screen_width(&self) -> i32 {
        self.width
    }

    fn screen_height(&self) -> i32 {
        self.height
    }

    fn update_screen(&mut self) {
        std::mem::swap(&mut self.presented, &mut self.vertices);
        self.vertices.clear();
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_vertex_counts() {
        let mut batch = ShapeBatch::new(320, 240);
        batch.draw_line(0, 0, 10, 10);
        assert_eq!(batch.vertices().len(), 6);
        batch.draw_rectangle(0, 0, 16, 16);
        assert_eq!(batch.vertices().len(), 6 + 24);
        batch.draw_triangle(0, 0, 10, 0, 0, 10);
        assert_eq!(batch.vertices().len(), 6 + 24 + 18);
    }

    #[test]
    fn test_thin_rectangles() {
        assert_eq!(rectangle_outline(0, 0, 16, 1, [1.0; 4]).len(), 6);
        assert_eq!(rectangle_outline(0, 0, 16, 2, [1.0; 4]).len(), 12);
        assert_eq!(rectangle_outline(0, 0, 1, 5, [1.0; 4]).len(), 18);
        assert!(rectangle_outline(0, 0, 0, 5, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_rectangle_covers_its_pixels() {
        let vertices = rectangle_outline(10, 20, 16, 16, [1.0; 4]);
        let min_x = vertices.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let min_y = vertices.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        let max_y = vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!((min_x, max_x), (10.0, 26.0));
        assert_eq!((min_y, max_y), (20.0, 36.0));
    }

    #[test]
    fn test_horizontal_line_spans_endpoints() {
        let vertices = line(Vec2::new(0.0, 5.0), Vec2::new(15.0, 5.0), 1.0, [1.0; 4]);
        for v in &vertices {
            assert!(v.position[0] == 0.0 || v.position[0] == 16.0);
            assert!(v.position[1] == 5.0 || v.position[1] == 6.0);
        }
    }

    #[test]
    fn test_color_applies_to_following_shapes() {
        let mut batch = ShapeBatch::new(320, 240);
        batch.set_color(0x0000ff);
        batch.draw_line(0, 0, 1, 0);
        batch.set_color(0xff0000);
        batch.draw_line(0, 0, 1, 0);
        assert_eq!(batch.vertices()[0].color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(batch.vertices()[6].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_update_screen_presents_frame() {
        let mut batch = ShapeBatch::new(320, 240);
        batch.draw_rectangle(0, 0, 4, 4);
        batch.update_screen();
        assert_eq!(batch.presented().len(), 24);
        assert!(batch.vertices().is_empty());
        assert_eq!(batch.frames(), 1);

        batch.clear_screen();
        batch.update_screen();
        assert!(batch.presented().is_empty());
        assert_eq!(batch.frames(), 2);
    }
}
