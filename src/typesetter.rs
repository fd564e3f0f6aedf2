use crate::contexts::{Font, SvgContext, TypesetterContext};
use crate::error::TypesetError;
use crate::units::Px;
use crate::wrap::Wrapper;
use crate::writer::{WriteOptions, Writer};

/// A convenience facade for typesetting strings with the default
/// measurer/wrapper/writer stack over a rendering context.
pub struct Typesetter<C: TypesetterContext> {
    writer: Writer<C>,
}

impl<C: TypesetterContext> Typesetter<C> {
    pub fn new(context: C) -> Typesetter<C> {
        Typesetter {
            writer: Writer::new(context),
        }
    }

    /// Wrap the given string into the width/height and write it through
    /// the context.
    pub fn write(
        &mut self,
        text: &str,
        width: Px,
        height: Px,
        options: &WriteOptions,
    ) -> Result<(), TypesetError> {
        self.writer.write(text, width, height, options)
    }

    /// Replace the wrapper configuration used by subsequent writes.
    pub fn set_wrapper(&mut self, wrapper: Wrapper) {
        self.writer.set_wrapper(wrapper);
    }

    /// Forget every cached measurement.
    ///
    /// Call this whenever the context's rendering style (font, size)
    /// changes; cached measurements are stale from then on.
    pub fn clear_measurer_cache(&mut self) {
        self.writer.measurer_mut().reset();
    }

    pub fn context(&self) -> &C {
        self.writer.context()
    }

    pub fn context_mut(&mut self) -> &mut C {
        self.writer.context_mut()
    }

    pub fn into_context(self) -> C {
        self.writer.into_context()
    }
}

impl Typesetter<SvgContext> {
    /// A typesetter emitting SVG markup, measuring through the given
    /// font's metrics.
    pub fn svg(font: Font, size: Px) -> Typesetter<SvgContext> {
        Typesetter::new(SvgContext::new(font, size))
    }
}
