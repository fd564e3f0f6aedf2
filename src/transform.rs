//! Placement transform for laid-out text blocks.

use crate::units::*;

/// Where and how a wrapped text block is placed: a translation in backend
/// pixels followed by a rotation in degrees about the translated origin.
///
/// During a write the rotation is one of the four supported block
/// rotations plus the configured shear angle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: (Px, Px),
    pub rotate: f32,
}

impl Transform {
    /// Identity transform (no translation, no rotation)
    pub fn identity() -> Self {
        Transform {
            translate: (Px::ZERO, Px::ZERO),
            rotate: 0.0,
        }
    }

    /// Create a pure translation transform
    pub fn translate(x: Px, y: Px) -> Self {
        Transform {
            translate: (x, y),
            rotate: 0.0,
        }
    }

    /// Add a rotation (in degrees) to this transform
    pub fn with_rotate(self, degrees: f32) -> Self {
        Transform {
            rotate: self.rotate + degrees,
            ..self
        }
    }
}
