use crate::cache::MeasureCache;
use crate::dimensions::Dimensions;
use crate::units::Px;

/// A string spanning the full ascender/descender range of western text.
///
/// Used both as the reference text for line-height measurement and as the
/// guard wrapped around measured characters. Backends rendering non-western
/// alphabets may want to measure with a different reference string.
pub const HEIGHT_TEXT: &str = "bdpql";

/// A measurement backend: reports the rendered extent of a string.
///
/// Implementations must be deterministic for a fixed rendering style. Any
/// closure `Fn(&str) -> Dimensions` is a ruler.
pub trait Ruler {
    fn measure(&self, text: &str) -> Dimensions;
}

impl<F> Ruler for F
where
    F: Fn(&str) -> Dimensions,
{
    fn measure(&self, text: &str) -> Dimensions {
        self(text)
    }
}

/// Measures text through a [`Ruler`], normalizing backend quirks.
///
/// Multi-line text is decomposed on newlines (heights sum, widths take the
/// maximum), and each line is measured character-additively: glyph-atlas
/// style backends cannot measure partial strings, so a line's width is the
/// sum of its character widths and its height the maximum character height.
/// Character measurements are wrapped in guard text where needed (see
/// [`HEIGHT_TEXT`]) so whitespace measures a real width and a stable height.
///
/// Two memoizing caches sit above the ruler: one keyed by character, one
/// keyed by whole string. Call [`reset`](Measurer::reset) whenever the
/// backend's rendering style (font, size) changes, since every cached
/// measurement is stale from then on. The caches are not synchronized;
/// share a measurer between threads by giving each its own instance.
pub struct Measurer<R: Ruler> {
    ruler: R,
    use_guards: bool,
    guard_width: Option<Px>,
    char_cache: MeasureCache,
    string_cache: MeasureCache,
}

impl<R: Ruler> Measurer<R> {
    pub fn new(ruler: R) -> Measurer<R> {
        Measurer {
            ruler,
            use_guards: false,
            guard_width: None,
            char_cache: MeasureCache::new(),
            string_cache: MeasureCache::new(),
        }
    }

    /// Wrap every measured character in guard text, not just whitespace.
    ///
    /// Useful for backends whose glyph metrics carry leading/trailing
    /// bearing artifacts on ordinary characters too.
    pub fn with_guards(mut self, use_guards: bool) -> Measurer<R> {
        self.use_guards = use_guards;
        self
    }

    /// Measure the full extent of `text`.
    ///
    /// Input that trims to nothing measures zero without consulting the
    /// backend. Multi-line input measures as the sum of per-line heights
    /// and the maximum per-line width.
    pub fn measure(&mut self, text: &str) -> Dimensions {
        if text.trim().is_empty() {
            return Dimensions::ZERO;
        }
        if let Some(dimensions) = self.string_cache.get(text) {
            return dimensions;
        }

        let mut dimensions = Dimensions::ZERO;
        for line in text.trim().split('\n') {
            let line_dimensions = self.measure_line(line);
            dimensions.height += line_dimensions.height;
            dimensions.width = dimensions.width.max(line_dimensions.width);
        }

        self.string_cache.insert(text, dimensions);
        dimensions
    }

    /// The height of a single line of text in the backend's current style.
    pub fn line_height(&mut self) -> Px {
        self.measure(HEIGHT_TEXT).height
    }

    /// Forget every cached measurement.
    ///
    /// Must be called whenever the backend's rendering style changes.
    pub fn reset(&mut self) {
        self.char_cache.clear();
        self.string_cache.clear();
    }

    fn measure_line(&mut self, line: &str) -> Dimensions {
        let mut dimensions = Dimensions::ZERO;
        for c in line.chars() {
            let char_dimensions = self.measure_character(c);
            dimensions.width += char_dimensions.width;
            dimensions.height = dimensions.height.max(char_dimensions.height);
        }
        dimensions
    }

    fn measure_character(&mut self, c: char) -> Dimensions {
        let mut buffer = [0u8; 4];
        let key = c.encode_utf8(&mut buffer);
        if let Some(dimensions) = self.char_cache.get(key) {
            return dimensions;
        }
        let dimensions = self.measure_guarded(c);
        self.char_cache.insert(key, dimensions);
        dimensions
    }

    // Guards assure a real width for whitespace and the same line height
    // everywhere; a ruler given a bare space may report zero or garbage.
    fn measure_guarded(&mut self, c: char) -> Dimensions {
        let use_guards = self.use_guards || c == ' ' || c == '\t';
        if !use_guards {
            let mut buffer = [0u8; 4];
            return self.ruler.measure(c.encode_utf8(&mut buffer));
        }

        let guard_width = self.guard_width();
        let guarded = format!("{HEIGHT_TEXT}{c}{HEIGHT_TEXT}");
        let mut dimensions = self.ruler.measure(&guarded);
        dimensions.width = (dimensions.width - guard_width * 2.0).max(Px::ZERO);
        dimensions
    }

    // The guard's own width, measured once through the raw ruler and kept
    // for the lifetime of the instance.
    fn guard_width(&mut self) -> Px {
        if let Some(width) = self.guard_width {
            return width;
        }
        let width = self.ruler.measure(HEIGHT_TEXT).width;
        self.guard_width = Some(width);
        width
    }
}
