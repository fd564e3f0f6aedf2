use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum TypesetError {
    /// A write was requested with a rotation other than the four the
    /// writer can place
    #[error("unsupported rotation {0}; supported rotations are -90, 0, 90, 180")]
    UnsupportedRotation(f32),

    /// A write was requested with a shear angle outside of [-80, 80] degrees
    #[error("unsupported shear angle {0}; must be between -80 and 80")]
    UnsupportedShear(f32),

    /// Single-line wrapping was attempted on text containing line breaks
    #[error("single-line wrapping requires input without line breaks")]
    MultiLineInput,

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),
}
