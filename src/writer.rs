use crate::contexts::{Pen, TypesetterContext};
use crate::error::TypesetError;
use crate::measurer::Measurer;
use crate::transform::Transform;
use crate::units::Px;
use crate::wrap::Wrapper;

/// Horizontal placement of lines inside the wrapped block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl XAlign {
    /// Fraction of the available width offsetting the anchor.
    pub fn factor(self) -> f32 {
        match self {
            XAlign::Left => 0.0,
            XAlign::Center => 0.5,
            XAlign::Right => 1.0,
        }
    }
}

/// Vertical placement of the block inside the available height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl YAlign {
    /// Fraction of the leftover height offsetting the block.
    pub fn factor(self) -> f32 {
        match self {
            YAlign::Top => 0.0,
            YAlign::Center => 0.5,
            YAlign::Bottom => 1.0,
        }
    }
}

/// Block rotations `write` accepts, in degrees.
pub const SUPPORTED_ROTATIONS: [f32; 4] = [-90.0, 0.0, 90.0, 180.0];

/// Caller-controlled configuration for [`Writer::write`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteOptions {
    /// Rotation of the whole block in degrees; must be one of
    /// [`SUPPORTED_ROTATIONS`].
    pub rotation: f32,
    /// Skew of the block in degrees; must lie within [-80, 80].
    pub shear: f32,
    pub x_align: XAlign,
    pub y_align: YAlign,
}

impl Default for WriteOptions {
    fn default() -> WriteOptions {
        WriteOptions {
            rotation: 0.0,
            shear: 0.0,
            x_align: XAlign::Left,
            y_align: YAlign::Top,
        }
    }
}

/// Translates a `(text, width, height, options)` request into a placement
/// transform and a sequence of line writes dispatched to the context's
/// [`Pen`].
///
/// The writer owns the measurer (built from the context's ruler) and an
/// optional [`Wrapper`]; with no wrapper installed, normalized text is
/// written as-is.
pub struct Writer<C: TypesetterContext> {
    measurer: Measurer<C::Ruler>,
    wrapper: Option<Wrapper>,
    context: C,
}

impl<C: TypesetterContext> Writer<C> {
    pub fn new(context: C) -> Writer<C> {
        let measurer = Measurer::new(context.create_ruler());
        Writer {
            measurer,
            wrapper: Some(Wrapper::new()),
            context,
        }
    }

    /// Replace the wrapper configuration used by subsequent writes.
    pub fn set_wrapper(&mut self, wrapper: Wrapper) {
        self.wrapper = Some(wrapper);
    }

    /// Write text without wrapping it first.
    pub fn clear_wrapper(&mut self) {
        self.wrapper = None;
    }

    pub fn measurer_mut(&mut self) -> &mut Measurer<C::Ruler> {
        &mut self.measurer
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Wrap `text` into the box and emit each produced line through a pen
    /// acquired from the context.
    ///
    /// Rotation and shear are validated before any pen is acquired.
    /// Wrapping runs against shear-corrected dimensions so the sheared
    /// rendered block, not the unsheared one, fits the caller's box.
    pub fn write(
        &mut self,
        text: &str,
        width: Px,
        height: Px,
        options: &WriteOptions,
    ) -> Result<(), TypesetError> {
        if !SUPPORTED_ROTATIONS.contains(&options.rotation) {
            return Err(TypesetError::UnsupportedRotation(options.rotation));
        }
        if !(-80.0..=80.0).contains(&options.shear) {
            return Err(TypesetError::UnsupportedShear(options.shear));
        }

        // rotations within 45 degrees of +/-90 lay out along the vertical axis
        let orient_horizontally = (options.rotation.abs() - 90.0).abs() > 45.0;
        let (primary, secondary) = if orient_horizontally {
            (width, height)
        } else {
            (height, width)
        };

        let shear_radians = options.shear.to_radians();
        let line_height = self.measurer.line_height();
        let shear_shift = line_height * shear_radians.tan();
        // shear grows the primary axis and shrinks the secondary one; wrap
        // against the corrected box so the sheared block fits the real one
        let corrected_primary = primary / shear_radians.cos() - shear_shift.abs();
        let corrected_secondary = secondary * shear_radians.cos();

        let normalized = combine_whitespace(text);
        let wrapped = match &self.wrapper {
            Some(wrapper) => {
                wrapper
                    .wrap(
                        &normalized,
                        &mut self.measurer,
                        corrected_primary,
                        corrected_secondary,
                    )
                    .wrapped_text
            }
            None => normalized,
        };
        let lines: Vec<&str> = wrapped.split('\n').collect();

        let x_offset = corrected_primary * (options.x_align.factor() * shear_radians.sin());
        let y_offset = (corrected_secondary - line_height * lines.len() as f32)
            * options.y_align.factor();
        let shear_correction = x_offset - y_offset;

        let rotate = options.rotation + options.shear;
        let translate = if options.rotation == 90.0 {
            (width + shear_correction, Px::ZERO)
        } else if options.rotation == -90.0 {
            (-shear_correction, height)
        } else if options.rotation == 180.0 {
            (width, height + shear_correction)
        } else {
            (Px::ZERO, -shear_correction)
        };
        let transform = Transform { translate, rotate };
        log::debug!(
            "writing {} line(s), translate ({}, {}), rotate {}",
            lines.len(),
            translate.0,
            translate.1,
            rotate
        );

        // the pen is scoped to this call; dropping it releases the backend
        let mut pen = self.context.create_pen(text, &transform);
        for (i, line) in lines.iter().enumerate() {
            let x_shear_offset = if shear_shift > Px::ZERO {
                shear_shift * (i + 1) as f32
            } else {
                shear_shift * i as f32
            };
            pen.write_line(
                line,
                corrected_primary,
                options.x_align,
                x_shear_offset,
                line_height * (i + 1) as f32,
                i,
            );
        }
        Ok(())
    }
}

/// Treat all runs of spaces and tabs as a single space.
fn combine_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_blank = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_blank {
                out.push(' ');
            }
            in_blank = true;
        } else {
            out.push(c);
            in_blank = false;
        }
    }
    out
}
