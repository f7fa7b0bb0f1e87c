//! Logo overlay styling on top of a product photo.

use serde::{Deserialize, Serialize};

use crate::Bounded;

/// How the logo blends with the photo underneath. Names match CSS `mix-blend-mode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Multiply,
    Overlay,
    Screen,
    Normal,
    Darken,
    SoftLight,
}

impl BlendMode {
    pub const ALL: [BlendMode; 6] = [
        BlendMode::Multiply,
        BlendMode::Overlay,
        BlendMode::Screen,
        BlendMode::Normal,
        BlendMode::Darken,
        BlendMode::SoftLight,
    ];

    pub fn css_name(&self) -> &'static str {
        match self {
            BlendMode::Multiply => "multiply",
            BlendMode::Overlay => "overlay",
            BlendMode::Screen => "screen",
            BlendMode::Normal => "normal",
            BlendMode::Darken => "darken",
            BlendMode::SoftLight => "soft-light",
        }
    }
}

/// Per-preview logo styling. All values are clamped into range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Logo opacity.
    pub opacity: Bounded, // [0.0, 1.0]
    /// In-plane rotation, degrees.
    pub rotate_z: Bounded, // [-180, 180]
    /// Tilt towards or away from the viewer, degrees.
    pub rotate_x: Bounded, // [-60, 60]
    /// Turn left or right, degrees.
    pub rotate_y: Bounded, // [-60, 60]
    pub blend: BlendMode,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            opacity: Bounded {
                value: 0.9,
                min: 0.0,
                max: 1.0,
            },
            rotate_z: Bounded {
                value: 0.0,
                min: -180.0,
                max: 180.0,
            },
            rotate_x: Bounded {
                value: 0.0,
                min: -60.0,
                max: 60.0,
            },
            rotate_y: Bounded {
                value: 0.0,
                min: -60.0,
                max: 60.0,
            },
            blend: BlendMode::default(),
        }
    }
}

impl OverlayStyle {
    pub fn set_opacity(&mut self, value: f32) {
        self.opacity.set(value);
    }

    pub fn set_rotation(&mut self, z: f32, x: f32, y: f32) {
        self.rotate_z.set(z);
        self.rotate_x.set(x);
        self.rotate_y.set(y);
        tracing::trace!(
            z = self.rotate_z.value,
            x = self.rotate_x.value,
            y = self.rotate_y.value,
            "overlay rotation updated"
        );
    }

    /// Rotation as a CSS `transform` value.
    pub fn css_transform(&self) -> String {
        format!(
            "rotateZ({}deg) rotateX({}deg) rotateY({}deg)",
            self.rotate_z.value, self.rotate_x.value, self.rotate_y.value
        )
    }

    /// Opacity as a whole percentage, for display next to the slider.
    pub fn opacity_percent(&self) -> u8 {
        (self.opacity.value * 100.0).round() as u8
    }
}
