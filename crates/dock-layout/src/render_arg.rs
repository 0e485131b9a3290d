#![forbid(unsafe_code)]

//! Per-icon render arguments and hit testing.

use dock_core::{Point, Point3};
use dock_model::IconId;

/// Everything a renderer needs to draw one icon tile for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderArg {
    pub icon: IconId,
    /// Where the tile is drawn, including glide and autohide offsets.
    pub render_center: Point3,
    /// Where the tile sits in the layout; used for hit testing.
    pub logical_center: Point3,
    /// Rotation in radians around each axis.
    pub rotation: Point3,
    pub alpha: f32,
    pub saturation: f32,
    pub backlight_intensity: f32,
    pub glow_intensity: f32,
    pub shimmer_progress: f32,
    pub progress: f32,
    pub progress_bias: f32,
    pub running_arrow: bool,
    pub active_arrow: bool,
    pub keyboard_nav_hl: bool,
    pub system_item: bool,
    pub shortcut_label: Option<char>,
    /// Not drawn in the strip (dragged or fully hidden).
    pub skip: bool,
    /// Half the drawn tile height after folding.
    pub half_extent: f32,
}

impl RenderArg {
    pub fn new(icon: IconId) -> Self {
        Self {
            icon,
            render_center: Point3::default(),
            logical_center: Point3::default(),
            rotation: Point3::default(),
            alpha: 1.0,
            saturation: 1.0,
            backlight_intensity: 0.0,
            glow_intensity: 0.0,
            shimmer_progress: 0.0,
            progress: 0.0,
            progress_bias: 0.0,
            running_arrow: false,
            active_arrow: false,
            keyboard_nav_hl: false,
            system_item: false,
            shortcut_label: None,
            skip: false,
            half_extent: 0.0,
        }
    }

    /// Whether `point` falls inside this tile's logical slot.
    pub fn contains(&self, point: Point, icon_size: f32) -> bool {
        let half_w = icon_size / 2.0;
        let half_h = self.half_extent.max(1.0);
        let c = self.logical_center;
        (point.x - c.x).abs() <= half_w && (point.y - c.y).abs() <= half_h
    }
}

/// Icon under `point` in a previously sampled frame.
///
/// Skipped arguments never match, so the icon being dragged is invisible to
/// its own hit test. Results are one frame stale by construction.
pub fn hit_test(args: &[RenderArg], point: Point, icon_size: f32) -> Option<IconId> {
    args.iter()
        .filter(|arg| !arg.skip)
        .find(|arg| arg.contains(point, icon_size))
        .map(|arg| arg.icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(id: u64, y: f32) -> RenderArg {
        let mut a = RenderArg::new(IconId(id));
        a.logical_center = Point3::new(32.0, y, 0.0);
        a.half_extent = 24.0;
        a
    }

    #[test]
    fn hit_test_finds_slot() {
        let args = vec![arg(1, 30.0), arg(2, 84.0)];
        assert_eq!(hit_test(&args, Point::new(32.0, 20.0), 48.0), Some(IconId(1)));
        assert_eq!(hit_test(&args, Point::new(40.0, 90.0), 48.0), Some(IconId(2)));
        assert_eq!(hit_test(&args, Point::new(200.0, 90.0), 48.0), None);
        assert_eq!(hit_test(&args, Point::new(32.0, 400.0), 48.0), None);
    }

    #[test]
    fn skipped_args_are_transparent() {
        let mut a = arg(1, 30.0);
        a.skip = true;
        assert_eq!(hit_test(&[a], Point::new(32.0, 30.0), 48.0), None);
    }
}
