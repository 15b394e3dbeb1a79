#![forbid(unsafe_code)]

//! Glow shape.
//!
//! The glow is an arc bulging out of the edge. [`GlowGeometry::set_size`]
//! fixes the arc radius and the base vertical scale for an edge of a given
//! size; [`GlowGeometry::path`] then turns a [`GlowSnapshot`] into a closed
//! quadratic-bezier outline a renderer can fill with [`GlowPaint`].
//!
//! Nothing here feeds back into the state machine.

use std::f32::consts::PI;

use crate::edge_effect::GlowSnapshot;

/// Half-angle of the arc subtended by the glow.
const ARC_ANGLE: f32 = PI / 6.0;
/// Fraction of the edge width (and host height) the arc chord spans.
const ARC_SPAN: f32 = 0.75;

/// Axis-aligned rectangle in edge-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlowBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl GlowBounds {
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// One outline command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    Close,
}

/// Closed outline of the glow for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlowPath {
    commands: Vec<PathCommand>,
    apex: (f32, f32),
}

impl GlowPath {
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Furthest point of the bulge from the edge.
    #[must_use]
    pub fn apex(&self) -> (f32, f32) {
        self.apex
    }
}

/// Fill parameters for a glow frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowPaint {
    /// `0xRRGGBB`.
    pub color: u32,
    pub alpha: f32,
}

impl GlowPaint {
    #[must_use]
    pub fn new(color: u32, alpha: f32) -> Self {
        Self {
            color: color & 0x00FF_FFFF,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Packed `0xAARRGGBB`.
    #[must_use]
    pub fn argb(&self) -> u32 {
        let a = (self.alpha * 255.0).round() as u32;
        (a << 24) | self.color
    }
}

/// Edge-size dependent glow geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlowGeometry {
    bounds: GlowBounds,
    radius: f32,
    base_glow_scale: f32,
    horizontal_margin: f32,
}

impl GlowGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inset the glow from both ends of the edge.
    #[must_use]
    pub fn with_horizontal_margin(mut self, margin: f32) -> Self {
        self.horizontal_margin = margin.max(0.0);
        self
    }

    /// Size the glow for an edge `width` wide on a host `height` tall.
    pub fn set_size(&mut self, width: f32, height: f32) {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let (sin, cos) = ARC_ANGLE.sin_cos();

        let r = width * ARC_SPAN / sin;
        let h = r - cos * r;
        let outer = height * ARC_SPAN / sin;
        let outer_h = outer - cos * outer;

        self.radius = r;
        self.base_glow_scale = if h > 0.0 { (outer_h / h).min(1.0) } else { 1.0 };
        self.bounds = GlowBounds {
            left: 0.0,
            top: 0.0,
            width,
            height: height.min(h),
        };
    }

    #[must_use]
    pub fn bounds(&self) -> GlowBounds {
        self.bounds
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[must_use]
    pub fn base_glow_scale(&self) -> f32 {
        self.base_glow_scale
    }

    /// Height the glow reaches at `scale_y`.
    #[must_use]
    pub fn glow_height(&self, scale_y: f32) -> f32 {
        self.bounds.height * scale_y.max(0.0) * self.base_glow_scale
    }

    /// Outline for `snapshot`. Empty when nothing would be visible.
    #[must_use]
    pub fn path(&self, snapshot: &GlowSnapshot) -> GlowPath {
        let height = self.glow_height(snapshot.scale_y);
        let left = self.bounds.left + self.horizontal_margin;
        let right = self.bounds.right() - self.horizontal_margin;
        if !snapshot.state.is_visible() || height <= 0.0 || right <= left {
            return GlowPath::default();
        }

        let width = right - left;
        let shift = snapshot.displacement.clamp(0.0, 1.0) - 0.5;
        let apex_x = self.bounds.center_x() + width * shift / 2.0;
        let top = self.bounds.top;

        // A quadratic control point at twice the height puts the curve's
        // extremum at `height` for a centered apex.
        GlowPath {
            commands: vec![
                PathCommand::MoveTo { x: left, y: top },
                PathCommand::QuadTo {
                    cx: apex_x,
                    cy: top + 2.0 * height,
                    x: right,
                    y: top,
                },
                PathCommand::Close,
            ],
            apex: (apex_x, top + height),
        }
    }

    /// Paint for `snapshot` in `color` (`0xRRGGBB`).
    #[must_use]
    pub fn paint(&self, snapshot: &GlowSnapshot, color: u32) -> GlowPaint {
        GlowPaint::new(color, snapshot.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EdgeState;

    fn snapshot(scale_y: f32, displacement: f32) -> GlowSnapshot {
        GlowSnapshot {
            state: EdgeState::Keep,
            alpha: 0.05,
            scale_y,
            displacement,
            pull_distance: 0.0,
        }
    }

    #[test]
    fn set_size_derives_radius_and_bounds() {
        let mut geometry = GlowGeometry::new();
        geometry.set_size(400.0, 800.0);
        assert!((geometry.radius() - 600.0).abs() < 1e-3);
        let expected_h = 600.0 - 600.0 * (PI / 6.0).cos();
        assert!((geometry.bounds().height - expected_h).abs() < 1e-3);
        assert_eq!(geometry.base_glow_scale(), 1.0);
    }

    #[test]
    fn short_host_reduces_base_scale() {
        let mut geometry = GlowGeometry::new();
        geometry.set_size(400.0, 100.0);
        assert!((geometry.base_glow_scale() - 0.25).abs() < 1e-4);
        assert!((geometry.bounds().height - 80.384_76).abs() < 1e-2);
    }

    #[test]
    fn zero_width_is_degenerate_but_safe() {
        let mut geometry = GlowGeometry::new();
        geometry.set_size(0.0, 500.0);
        assert_eq!(geometry.base_glow_scale(), 1.0);
        assert!(geometry.path(&snapshot(1.0, 0.5)).is_empty());
    }

    #[test]
    fn centered_path_apex() {
        let mut geometry = GlowGeometry::new();
        geometry.set_size(400.0, 800.0);
        let path = geometry.path(&snapshot(1.0, 0.5));
        assert_eq!(path.commands().len(), 3);
        let (x, y) = path.apex();
        assert!((x - 200.0).abs() < 1e-3);
        assert!((y - geometry.glow_height(1.0)).abs() < 1e-3);
    }

    #[test]
    fn displacement_shifts_apex() {
        let mut geometry = GlowGeometry::new();
        geometry.set_size(400.0, 800.0);
        let (x, _) = geometry.path(&snapshot(1.0, 1.0)).apex();
        assert!((x - 300.0).abs() < 1e-3);
        let (x, _) = geometry.path(&snapshot(1.0, -3.0)).apex();
        assert!((x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn margins_inset_endpoints() {
        let mut geometry = GlowGeometry::new().with_horizontal_margin(20.0);
        geometry.set_size(400.0, 800.0);
        let path = geometry.path(&snapshot(0.5, 0.5));
        assert_eq!(path.commands()[0], PathCommand::MoveTo { x: 20.0, y: 0.0 });
        match path.commands()[1] {
            PathCommand::QuadTo { x, .. } => assert!((x - 380.0).abs() < 1e-3),
            other => panic!("expected quad, got {other:?}"),
        }
    }

    #[test]
    fn margins_keep_centered_apex_on_bounds_center() {
        let mut geometry = GlowGeometry::new().with_horizontal_margin(35.0);
        geometry.set_size(400.0, 800.0);
        let (x, _) = geometry.path(&snapshot(1.0, 0.5)).apex();
        assert!((x - geometry.bounds().center_x()).abs() < 1e-3);
        let (x, _) = geometry.path(&snapshot(1.0, 1.0)).apex();
        assert!((x - (geometry.bounds().center_x() + 82.5)).abs() < 1e-3);
    }

    #[test]
    fn idle_or_flat_glow_has_no_path() {
        let mut geometry = GlowGeometry::new();
        geometry.set_size(400.0, 800.0);
        assert!(geometry.path(&snapshot(0.0, 0.5)).is_empty());
        let idle = GlowSnapshot {
            state: EdgeState::Idle,
            ..snapshot(1.0, 0.5)
        };
        assert!(geometry.path(&idle).is_empty());
    }

    #[test]
    fn paint_packs_alpha() {
        let paint = GlowPaint::new(0xFF12_3456, 1.0);
        assert_eq!(paint.argb(), 0xFF12_3456);
        let faint = GlowPaint::new(0x0000_0000, 0.08);
        assert_eq!(faint.argb() >> 24, 20);
        assert_eq!(GlowPaint::new(0, 4.0).alpha, 1.0);
    }
}
