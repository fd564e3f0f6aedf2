//! An SVG markup backend: measures through font metrics and accumulates
//! `<text>` elements in an SVG fragment.

use std::rc::Rc;

use id_arena::{Arena, Id};
use owned_ttf_parser::{AsFaceRef, OwnedFace};

use crate::dimensions::Dimensions;
use crate::error::TypesetError;
use crate::measurer::Ruler;
use crate::transform::Transform;
use crate::units::Px;
use crate::writer::XAlign;

use super::{Pen, TypesetterContext};

/// A parsed font face. Fonts can be TTF or OTF fonts. Cloning is cheap;
/// the face data is shared.
#[derive(Clone)]
pub struct Font {
    face: Rc<OwnedFace>,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error
    /// if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, TypesetError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font {
            face: Rc::new(face),
        })
    }

    fn scaling(&self, size: Px) -> f32 {
        *size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the
    /// font) for the given font size
    pub fn ascent(&self, size: Px) -> Px {
        Px(self.face.as_face_ref().ascender() as f32 * self.scaling(size))
    }

    /// Calculate the descent (distance from the baseline to the bottom of
    /// the font) for the given font size. Note: this is usually negative
    pub fn descent(&self, size: Px) -> Px {
        Px(self.face.as_face_ref().descender() as f32 * self.scaling(size))
    }

    /// Calculate the leading (extra space between lines) for the given
    /// font size
    pub fn leading(&self, size: Px) -> Px {
        Px(self.face.as_face_ref().line_gap() as f32 * self.scaling(size))
    }

    /// Calculate the default line height of the font for the given size.
    /// The returned value is how much to vertically offset a second row of
    /// text below a first row of text.
    pub fn line_height(&self, size: Px) -> Px {
        self.leading(size) + self.ascent(size) - self.descent(size)
    }

    /// Calculate the advance width of a string of text at the given size,
    /// summed over glyph advances
    pub fn width_of_text(&self, text: &str, size: Px) -> Px {
        let face = self.face.as_face_ref();
        let scaling = self.scaling(size);
        let width: f32 = text
            .chars()
            .filter_map(|ch| self.glyph_index(ch))
            .map(|gid| face.glyph_hor_advance(gid).unwrap_or_default() as f32 * scaling)
            .sum();
        Px(width)
    }

    // missing glyphs fall back to the replacement character, then '?'
    fn glyph_index(&self, ch: char) -> Option<owned_ttf_parser::GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }
}

/// The active font and size used for measurement and output.
#[derive(Clone, Copy)]
pub struct FontStyle {
    pub id: Id<Font>,
    pub size: Px,
}

/// A [`Ruler`] over a font face: width from summed glyph advances, height
/// from the face's line metrics.
pub struct SvgRuler {
    font: Font,
    size: Px,
}

impl Ruler for SvgRuler {
    fn measure(&self, text: &str) -> Dimensions {
        Dimensions {
            width: self.font.width_of_text(text, self.size),
            height: self.font.line_height(self.size),
        }
    }
}

/// A typesetter backend that renders text blocks as SVG markup.
///
/// Written blocks accumulate in an internal buffer; [`svg`](SvgContext::svg)
/// wraps the accumulated markup in an `<svg>` document. Fonts are stored
/// in an arena and selected through a [`FontStyle`]; after switching
/// styles, measurement caches built against the old style are stale and
/// must be reset.
pub struct SvgContext {
    fonts: Arena<Font>,
    style: FontStyle,
    class_name: Option<String>,
    add_title: bool,
    body: String,
}

impl SvgContext {
    /// Create a context with an initial font and size
    pub fn new(font: Font, size: Px) -> SvgContext {
        let mut fonts = Arena::new();
        let id = fonts.alloc(font);
        SvgContext {
            fonts,
            style: FontStyle { id, size },
            class_name: None,
            add_title: false,
            body: String::new(),
        }
    }

    /// Add a CSS class to every generated text block
    pub fn with_class_name<S: Into<String>>(mut self, class_name: S) -> SvgContext {
        self.class_name = Some(class_name.into());
        self
    }

    /// Attach a `<title>` element carrying the original text to every
    /// generated text block
    pub fn with_title_element(mut self, add_title: bool) -> SvgContext {
        self.add_title = add_title;
        self
    }

    /// Register an additional font for later use with
    /// [`set_style`](SvgContext::set_style)
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Switch the active font and size.
    ///
    /// Measurements made under the previous style are stale afterwards;
    /// reset the measurer cache (see
    /// [`Typesetter::clear_measurer_cache`](crate::Typesetter::clear_measurer_cache)).
    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    pub fn font(&self, id: Id<Font>) -> &Font {
        &self.fonts[id]
    }

    /// The accumulated markup, without the `<svg>` wrapper
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The accumulated markup wrapped in an `<svg>` document of the given
    /// size
    pub fn svg(&self, width: Px, height: Px) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">{}</svg>"#,
            self.body
        )
    }
}

impl TypesetterContext for SvgContext {
    type Ruler = SvgRuler;
    type Pen<'a> = SvgPen<'a>;

    fn create_ruler(&self) -> SvgRuler {
        SvgRuler {
            font: self.fonts[self.style.id].clone(),
            size: self.style.size,
        }
    }

    fn create_pen(&mut self, text: &str, transform: &Transform) -> SvgPen<'_> {
        let font = &self.fonts[self.style.id];
        let ascent = font.ascent(self.style.size);
        let line_height = font.line_height(self.style.size);

        self.body.push_str("<g class=\"text-container");
        if let Some(class_name) = &self.class_name {
            self.body.push(' ');
            self.body.push_str(&xml_escape(class_name));
        }
        self.body.push_str("\">");
        if self.add_title {
            self.body.push_str("<title>");
            self.body.push_str(&xml_escape(text));
            self.body.push_str("</title>");
        }
        self.body.push_str(&format!(
            r#"<g class="text-area" transform="translate({},{}) rotate({})">"#,
            transform.translate.0, transform.translate.1, transform.rotate
        ));

        SvgPen {
            out: &mut self.body,
            ascent,
            line_height,
        }
    }
}

/// A [`Pen`] writing `<text>` lines into an SVG text block. The block's
/// group tags are closed when the pen is dropped.
pub struct SvgPen<'a> {
    out: &'a mut String,
    ascent: Px,
    line_height: Px,
}

impl Pen for SvgPen<'_> {
    fn write_line(
        &mut self,
        line: &str,
        width: Px,
        x_align: XAlign,
        x_offset: Px,
        y_offset: Px,
        _line_index: usize,
    ) {
        let anchor = match x_align {
            XAlign::Left => "start",
            XAlign::Center => "middle",
            XAlign::Right => "end",
        };
        let x = x_offset + width * x_align.factor();
        // y_offset is the bottom edge of the line's slot; the glyph
        // baseline sits one ascent below the slot's top edge
        let y = y_offset - self.line_height + self.ascent;
        self.out.push_str(&format!(
            r#"<text class="text-line" text-anchor="{anchor}" transform="translate({x},{y})">{}</text>"#,
            xml_escape(line)
        ));
    }
}

impl Drop for SvgPen<'_> {
    fn drop(&mut self) {
        self.out.push_str("</g></g>");
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
