use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, MulAssign, Sub, Sum};

/// A length in backend pixels.
///
/// All measurements flowing between rulers, wrappers, and pens use this
/// unit; what a "pixel" physically is belongs to the rendering backend
/// (CSS pixels for markup, device pixels for rasterizers).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    Sum,
    From,
    Into,
    Display,
    Deref,
    DerefMut,
    MulAssign,
)]
pub struct Px(pub f32);

impl Px {
    pub const ZERO: Px = Px(0.0);

    /// An unbounded budget; useful as a height for wrap calls that should
    /// never truncate vertically.
    pub const INFINITY: Px = Px(f32::INFINITY);

    pub fn min(self, other: Px) -> Px {
        Px(self.0.min(other.0))
    }

    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }

    pub fn abs(self) -> Px {
        Px(self.0.abs())
    }
}

impl std::ops::Mul<f32> for Px {
    type Output = Px;

    fn mul(self, rhs: f32) -> Px {
        Px(self.0 * rhs)
    }
}

impl std::ops::Div<f32> for Px {
    type Output = Px;

    fn div(self, rhs: f32) -> Px {
        Px(self.0 / rhs)
    }
}

/// Dividing two lengths yields a unitless ratio.
impl std::ops::Div<Px> for Px {
    type Output = f32;

    fn div(self, rhs: Px) -> f32 {
        self.0 / rhs.0
    }
}

impl std::ops::Neg for Px {
    type Output = Px;

    fn neg(self) -> Px {
        Px(-self.0)
    }
}
