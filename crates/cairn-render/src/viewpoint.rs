//! The six canonical orthogonal viewpoints.

use cairn_math::Vec3;

/// One of the six axis-aligned viewpoints swept for a report.
///
/// The camera sits outside the model on the viewpoint's outward axis and
/// looks back at the model center along [`Viewpoint::view_vector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viewpoint {
    /// Camera on +Z looking toward -Z.
    Front,
    /// Camera on -X looking toward +X.
    Left,
    /// Camera on +X looking toward -X.
    Right,
    /// Camera on +Y looking toward -Y.
    Top,
    /// Camera on -Y looking toward +Y.
    Bottom,
    /// Camera on -Z looking toward +Z.
    Back,
}

impl Viewpoint {
    /// All viewpoints in sweep order.
    pub const ALL: [Viewpoint; 6] = [
        Viewpoint::Front,
        Viewpoint::Left,
        Viewpoint::Right,
        Viewpoint::Top,
        Viewpoint::Bottom,
        Viewpoint::Back,
    ];

    /// Direction the camera looks, from the camera toward the model.
    pub fn view_vector(&self) -> Vec3 {
        match self {
            Viewpoint::Front => Vec3::new(0.0, 0.0, -1.0),
            Viewpoint::Left => Vec3::new(1.0, 0.0, 0.0),
            Viewpoint::Right => Vec3::new(-1.0, 0.0, 0.0),
            Viewpoint::Top => Vec3::new(0.0, -1.0, 0.0),
            Viewpoint::Bottom => Vec3::new(0.0, 1.0, 0.0),
            Viewpoint::Back => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Axis pointing from the model toward the camera.
    pub fn outward_axis(&self) -> Vec3 {
        -self.view_vector()
    }

    /// World-space up direction for this viewpoint.
    ///
    /// Top and bottom look along the world up axis, so their view up is
    /// taken along Z instead.
    pub fn up_vector(&self) -> Vec3 {
        match self {
            Viewpoint::Top => Vec3::new(0.0, 0.0, 1.0),
            Viewpoint::Bottom => Vec3::new(0.0, 0.0, -1.0),
            _ => Vec3::new(0.0, 1.0, 0.0),
        }
    }

    /// Lower-case name used in screenshot file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Viewpoint::Front => "front",
            Viewpoint::Left => "left",
            Viewpoint::Right => "right",
            Viewpoint::Top => "top",
            Viewpoint::Bottom => "bottom",
            Viewpoint::Back => "back",
        }
    }
}

impl std::fmt::Display for Viewpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}
