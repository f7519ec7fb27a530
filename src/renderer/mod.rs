//! Rendering module
//!
//! Game code draws through the [`DrawSurface`] trait in virtual-screen pixels.
//! [`ShapeBatch`] turns those calls into triangle vertices, and on the web
//! [`RenderState`] uploads them through WebGPU.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::ShapeBatch;
pub use vertex::{Color, Vertex};

/// Immediate-mode 2D drawing target
pub trait DrawSurface {
    fn clear_screen(&mut self);

    /// Set the drawing color from a `0xAARRGGBB` value (see [`Color::from_argb`])
    fn set_color(&mut self, argb: u32);

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Outline of a `w`×`h` pixel rectangle
    fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32);

    /// Outline of a triangle
    fn draw_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32);

    fn screen_width(&self) -> i32;

    fn screen_height(&self) -> i32;

    /// Present the finished frame
    fn update_screen(&mut self);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::DrawSurface;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DrawCall {
        Clear,
        Color(u32),
        Line(i32, i32, i32, i32),
        Rectangle(i32, i32, i32, i32),
        Triangle(i32, i32, i32, i32, i32, i32),
        Present,
    }

    /// Surface that records every call
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        /// Shapes drawn, each with the color active at the time
        pub fn shapes(&self) -> Vec<(u32, DrawCall)> {
            let mut color = 0;
            let mut shapes = Vec::new();
            for call in &self.calls {
                match call {
                    DrawCall::Color(argb) => color = *argb,
                    DrawCall::Line(..) | DrawCall::Rectangle(..) | DrawCall::Triangle(..) => {
                        shapes.push((color, call.clone()))
                    }
                    DrawCall::Clear | DrawCall::Present => {}
                }
            }
            shapes
        }
    }

    impl DrawSurface for RecordingSurface {
        fn clear_screen(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn set_color(&mut self, argb: u32) {
            self.calls.push(DrawCall::Color(argb));
        }

        fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
            self.calls.push(DrawCall::Line(x1, y1, x2, y2));
        }

        fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) {
            self.calls.push(DrawCall::Rectangle(x, y, w, h));
        }

        fn draw_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
            self.calls.push(DrawCall::Triangle(x1, y1, x2, y2, x3, y3));
        }

        fn screen_width(&self) -> i32 {
            crate::consts::SCREEN_WIDTH
        }

        fn screen_height(&self) -> i32 {
            crate::consts::SCREEN_HEIGHT
        }

        fn update_screen(&mut self) {
            self.calls.push(DrawCall::Present);
        }
    }
}
