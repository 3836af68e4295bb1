//! Abstract draw requests issued to the pixel rasterizer.
//!
//! Coordinates are integer screen pixels with `z` the depth in pixels from
//! the eye (larger is farther). Diameters are in pixels.

use glam::IVec3;

use super::color::Colix;
use crate::primitive::EndCaps;

/// Pixel rasterizer collaborator.
pub trait Rasterizer {
    /// Fill a triangle.
    fn fill_triangle(&mut self, vertices: [IVec3; 3], colix: Colix);

    /// Fill a quad given in winding order.
    fn fill_quad(&mut self, corners: [IVec3; 4], colix: Colix);

    /// Fill a cylinder of constant screen diameter between two points.
    fn fill_cylinder(
        &mut self,
        a: IVec3,
        b: IVec3,
        diameter: i32,
        colix: Colix,
        caps: EndCaps,
    );

    /// Stroke only the silhouette of a cylinder.
    fn stroke_cylinder(&mut self, a: IVec3, b: IVec3, diameter: i32, colix: Colix);

    /// Fill a cone from a base disk of `diameter` to a tip.
    fn fill_cone(&mut self, base: IVec3, tip: IVec3, diameter: i32, colix: Colix);

    /// Fill a circle; `screened` selects the blended overlay mode.
    fn fill_circle(
        &mut self,
        center: IVec3,
        diameter: i32,
        colix: Colix,
        screened: bool,
    );

    /// One-pixel line.
    fn draw_line(&mut self, a: IVec3, b: IVec3, colix: Colix);

    /// Dotted line.
    fn draw_dotted_line(&mut self, a: IVec3, b: IVec3, colix: Colix);

    /// Text anchored at its baseline-left corner.
    fn draw_text(&mut self, at: IVec3, text: &str, colix: Colix);
}

/// One recorded draw request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    /// [`Rasterizer::fill_triangle`].
    Triangle {
        /// Vertices.
        vertices: [IVec3; 3],
        /// Color.
        colix: Colix,
    },
    /// [`Rasterizer::fill_quad`].
    Quad {
        /// Corners.
        corners: [IVec3; 4],
        /// Color.
        colix: Colix,
    },
    /// [`Rasterizer::fill_cylinder`].
    Cylinder {
        /// First end.
        a: IVec3,
        /// Second end.
        b: IVec3,
        /// Screen diameter.
        diameter: i32,
        /// Color.
        colix: Colix,
        /// Closed ends.
        caps: EndCaps,
    },
    /// [`Rasterizer::stroke_cylinder`].
    CylinderOutline {
        /// First end.
        a: IVec3,
        /// Second end.
        b: IVec3,
        /// Screen diameter.
        diameter: i32,
        /// Color.
        colix: Colix,
    },
    /// [`Rasterizer::fill_cone`].
    Cone {
        /// Base center.
        base: IVec3,
        /// Tip.
        tip: IVec3,
        /// Base diameter.
        diameter: i32,
        /// Color.
        colix: Colix,
    },
    /// [`Rasterizer::fill_circle`].
    Circle {
        /// Center.
        center: IVec3,
        /// Diameter.
        diameter: i32,
        /// Color.
        colix: Colix,
        /// Blended overlay mode.
        screened: bool,
    },
    /// [`Rasterizer::draw_line`].
    Line {
        /// Start.
        a: IVec3,
        /// End.
        b: IVec3,
        /// Color.
        colix: Colix,
    },
    /// [`Rasterizer::draw_dotted_line`].
    DottedLine {
        /// Start.
        a: IVec3,
        /// End.
        b: IVec3,
        /// Color.
        colix: Colix,
    },
    /// [`Rasterizer::draw_text`].
    Text {
        /// Anchor.
        at: IVec3,
        /// Text.
        text: String,
        /// Color.
        colix: Colix,
    },
}

impl DrawCall {
    /// Whether this call uses the screened overlay mode.
    #[must_use]
    pub fn is_screened(&self) -> bool {
        matches!(self, Self::Circle { screened: true, .. })
    }
}

/// Rasterizer that records every request instead of drawing.
#[derive(Debug, Default, Clone)]
pub struct RecordingRasterizer {
    calls: Vec<DrawCall>,
}

impl RecordingRasterizer {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, in issue order.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the recorder empty.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Rasterizer for RecordingRasterizer {
    fn fill_triangle(&mut self, vertices: [IVec3; 3], colix: Colix) {
        self.calls.push(DrawCall::Triangle { vertices, colix });
    }

    fn fill_quad(&mut self, corners: [IVec3; 4], colix: Colix) {
        self.calls.push(DrawCall::Quad { corners, colix });
    }

    fn fill_cylinder(
        &mut self,
        a: IVec3,
        b: IVec3,
        diameter: i32,
        colix: Colix,
        caps: EndCaps,
    ) {
        self.calls.push(DrawCall::Cylinder {
            a,
            b,
            diameter,
            colix,
            caps,
        });
    }

    fn stroke_cylinder(&mut self, a: IVec3, b: IVec3, diameter: i32, colix: Colix) {
        self.calls.push(DrawCall::CylinderOutline {
            a,
            b,
            diameter,
            colix,
        });
    }

    fn fill_cone(&mut self, base: IVec3, tip: IVec3, diameter: i32, colix: Colix) {
        self.calls.push(DrawCall::Cone {
            base,
            tip,
            diameter,
            colix,
        });
    }

    fn fill_circle(
        &mut self,
        center: IVec3,
        diameter: i32,
        colix: Colix,
        screened: bool,
    ) {
        self.calls.push(DrawCall::Circle {
            center,
            diameter,
            colix,
            screened,
        });
    }

    fn draw_line(&mut self, a: IVec3, b: IVec3, colix: Colix) {
        self.calls.push(DrawCall::Line { a, b, colix });
    }

    fn draw_dotted_line(&mut self, a: IVec3, b: IVec3, colix: Colix) {
        self.calls.push(DrawCall::DottedLine { a, b, colix });
    }

    fn draw_text(&mut self, at: IVec3, text: &str, colix: Colix) {
        self.calls.push(DrawCall::Text {
            at,
            text: text.to_owned(),
            colix,
        });
    }
}
