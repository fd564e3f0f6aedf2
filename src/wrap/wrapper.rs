use crate::measurer::{Measurer, Ruler};
use crate::tokenizer::tokenize;
use crate::units::Px;

/// What to do with text that cannot fit in the available space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTrimming {
    /// Replace overflowing text with a terminal `...` marker.
    #[default]
    Ellipsis,
    /// Keep overflowing lines verbatim; the caller accepts the overflow.
    None,
}

/// The outcome of wrapping a piece of text into a width/height budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapResult {
    /// The text handed to `wrap`, untouched.
    pub original_text: String,
    /// The lines that fit, joined with `\n`.
    pub wrapped_text: String,
    /// Everything that did not fit.
    pub truncated_text: String,
    /// Number of committed output lines.
    pub line_count: usize,
    /// Number of tokens that were split mid-word with a break character.
    pub broken_word_count: usize,
}

struct WrapState {
    available_lines: usize,
    available_width: Px,
    can_fit_text: bool,
    current_line: String,
    result: WrapResult,
}

struct BrokenToken {
    /// The current line with as much of the token as fits appended.
    line: String,
    /// `None` when the token was fully absorbed; otherwise what still has
    /// to be placed (empty for whitespace dropped at the wrap point).
    remaining: Option<String>,
    broke_word: bool,
}

struct TruncatedLine {
    wrapped: String,
    remaining: String,
}

/// Greedily packs tokens into lines bounded by a width and a line budget.
///
/// Tokens are appended to the current line while the measured concatenation
/// fits the available width; measurement is always performed on the whole
/// candidate line, never by summing token widths, so line-level corrections
/// (kerning, guards) are respected. A token that does not fit rolls to the
/// next line; whitespace at a wrap point is dropped. When the line budget
/// runs out the last permitted line is ellipsis-trimmed and the rest of the
/// input is reported as truncated.
#[derive(Debug, Clone)]
pub struct Wrapper {
    max_lines: usize,
    trimming: TextTrimming,
    allow_breaking_words: bool,
    breaking_character: char,
}

impl Default for Wrapper {
    fn default() -> Wrapper {
        Wrapper::new()
    }
}

impl Wrapper {
    pub fn new() -> Wrapper {
        Wrapper {
            max_lines: usize::MAX,
            trimming: TextTrimming::Ellipsis,
            allow_breaking_words: false,
            breaking_character: '-',
        }
    }

    /// Cap the number of output lines regardless of the height budget.
    pub fn with_max_lines(mut self, max_lines: usize) -> Wrapper {
        self.max_lines = max_lines;
        self
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn with_trimming(mut self, trimming: TextTrimming) -> Wrapper {
        self.trimming = trimming;
        self
    }

    pub fn trimming(&self) -> TextTrimming {
        self.trimming
    }

    /// Permit splitting a word mid-token (inserting the break character)
    /// even when deferring the whole word to the next line would work.
    /// Words wider than the whole line are split regardless.
    pub fn with_breaking_words(mut self, allow: bool) -> Wrapper {
        self.allow_breaking_words = allow;
        self
    }

    pub fn breaking_words(&self) -> bool {
        self.allow_breaking_words
    }

    /// Wrap `text` into a box `width` wide and `height` tall.
    ///
    /// The number of available lines is `height` divided by the measurer's
    /// line height, capped by the configured maximum. Pass
    /// [`Px::INFINITY`] as the height to never truncate vertically.
    ///
    /// ```
    /// use typeset::{Dimensions, Measurer, Px, Wrapper};
    ///
    /// let ruler = |text: &str| {
    ///     Dimensions::new(Px(10.0 * text.chars().count() as f32), Px(10.0))
    /// };
    /// let mut measurer = Measurer::new(ruler);
    ///
    /// let result = Wrapper::new().wrap("hello world", &mut measurer, Px(60.0), Px(20.0));
    /// assert_eq!(result.wrapped_text, "hello\nworld");
    /// assert_eq!(result.line_count, 2);
    /// ```
    pub fn wrap<R: Ruler>(
        &self,
        text: &str,
        measurer: &mut Measurer<R>,
        width: Px,
        height: Px,
    ) -> WrapResult {
        let line_height = measurer.line_height();
        let available_lines = if line_height > Px::ZERO {
            // saturates to usize::MAX for an unbounded height
            ((height / line_height).floor() as usize).min(self.max_lines)
        } else {
            self.max_lines
        };

        let mut state = WrapState {
            available_lines,
            available_width: width,
            can_fit_text: true,
            current_line: String::new(),
            result: WrapResult {
                original_text: text.to_string(),
                wrapped_text: String::new(),
                truncated_text: String::new(),
                line_count: 0,
                broken_word_count: 0,
            },
        };

        let lines: Vec<&str> = text.split('\n').collect();
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            self.break_line_to_fit_width(&mut state, line, i != last, measurer);
        }

        log::trace!(
            "wrapped into {} line(s), {} broken word(s), {} truncated byte(s)",
            state.result.line_count,
            state.result.broken_word_count,
            state.result.truncated_text.len()
        );
        state.result
    }

    fn break_line_to_fit_width<R: Ruler>(
        &self,
        state: &mut WrapState,
        line: &str,
        has_next_line: bool,
        measurer: &mut Measurer<R>,
    ) {
        if !state.can_fit_text && !state.result.truncated_text.is_empty() {
            state.result.truncated_text.push('\n');
        }

        for token in tokenize(line) {
            self.wrap_next_token(token, state, measurer);
        }

        let wrapped = state.current_line.trim_end().to_string();
        if !wrapped.is_empty() {
            state.result.line_count += 1;
        }
        if state.result.line_count == state.available_lines
            && self.trimming != TextTrimming::None
            && has_next_line
        {
            // any needed ellipses were already added when the budget ran
            // out mid-token
            state.can_fit_text = false;
        } else {
            state.result.wrapped_text.push_str(&wrapped);
        }
        // the line separator for the next committed line; trimmed away
        // again if nothing follows
        state.current_line = "\n".to_string();
    }

    fn wrap_next_token<R: Ruler>(
        &self,
        token: &str,
        state: &mut WrapState,
        measurer: &mut Measurer<R>,
    ) {
        if !state.can_fit_text
            || state.available_lines == state.result.line_count
            || !self.can_fit_token(token, state.available_width, measurer)
        {
            self.finish_wrapping(token, state, measurer);
            return;
        }

        let mut remaining = token.to_string();
        loop {
            let broken = self.break_token_to_fit_in_width(
                &remaining,
                &state.current_line,
                state.available_width,
                measurer,
            );
            state.current_line = broken.line;
            let Some(rest) = broken.remaining else {
                // token fully absorbed into the current line
                break;
            };

            state.result.broken_word_count += broken.broke_word as usize;
            state.result.line_count += 1;
            if state.available_lines == state.result.line_count {
                let truncated =
                    self.add_ellipsis(&state.current_line, state.available_width, measurer);
                state.result.wrapped_text.push_str(&truncated.wrapped);
                state.result.truncated_text.push_str(&truncated.remaining);
                state.result.truncated_text.push_str(&rest);
                state.current_line = "\n".to_string();
                return;
            }

            state
                .result
                .wrapped_text
                .push_str(state.current_line.trim_end());
            state.current_line = "\n".to_string();

            if rest.is_empty() {
                // whitespace dropped at the wrap point
                break;
            }
            remaining = rest;
        }
    }

    /// The token cannot be placed at all; keep whatever part of it still
    /// fits on the last line (under ellipsis trimming) and mark the rest
    /// of the input as truncated.
    fn finish_wrapping<R: Ruler>(
        &self,
        token: &str,
        state: &mut WrapState,
        measurer: &mut Measurer<R>,
    ) {
        if state.can_fit_text
            && state.available_lines != state.result.line_count
            && self.trimming != TextTrimming::None
        {
            let candidate = format!("{}{}", state.current_line, token);
            let truncated = self.add_ellipsis(&candidate, state.available_width, measurer);
            state.result.broken_word_count +=
                (truncated.remaining.chars().count() < token.chars().count()) as usize;
            state.result.line_count += (!truncated.wrapped.is_empty()) as usize;
            state.result.wrapped_text.push_str(&truncated.wrapped);
            state.result.truncated_text.push_str(&truncated.remaining);
            state.current_line = String::new();
        } else {
            state.result.truncated_text.push_str(token);
        }
        state.can_fit_text = false;
    }

    /// Whether `token` can be placed on some line at all: either whole, or
    /// character by character with the break character appended.
    fn can_fit_token<R: Ruler>(&self, token: &str, width: Px, measurer: &mut Measurer<R>) -> bool {
        if measurer.measure(token).width <= width {
            return true;
        }
        let count = token.chars().count();
        token.chars().enumerate().all(|(i, c)| {
            let probe = if i != count - 1 {
                format!("{c}{}", self.breaking_character)
            } else {
                c.to_string()
            };
            measurer.measure(&probe).width <= width
        })
    }

    /// Trim `line` until it fits `width` with an ellipsis appended.
    ///
    /// With trimming disabled the line is kept verbatim. When not even the
    /// ellipsis fits, degrade to however many period characters do.
    fn add_ellipsis<R: Ruler>(
        &self,
        line: &str,
        width: Px,
        measurer: &mut Measurer<R>,
    ) -> TruncatedLine {
        if self.trimming == TextTrimming::None {
            return TruncatedLine {
                wrapped: line.to_string(),
                remaining: String::new(),
            };
        }

        let mut truncated = line.trim().to_string();
        let mut line_width = measurer.measure(&truncated).width;
        let ellipsis_width = measurer.measure("...").width;
        let prefix = if line.starts_with('\n') { "\n" } else { "" };

        if width <= ellipsis_width {
            let period_width = ellipsis_width / 3.0;
            let periods = if period_width > Px::ZERO {
                ((width / period_width).floor() as usize).min(3)
            } else {
                3
            };
            return TruncatedLine {
                wrapped: format!("{prefix}{}", &"..."[..periods]),
                remaining: line.to_string(),
            };
        }

        while line_width + ellipsis_width > width {
            truncated.pop();
            let trimmed_len = truncated.trim_end().len();
            truncated.truncate(trimmed_len);
            line_width = measurer.measure(&truncated).width;
        }

        let kept = truncated.chars().count();
        let remaining: String = line.trim().chars().skip(kept).collect();
        let remaining = remaining
            .trim_end_matches(|c: char| c == self.breaking_character || c.is_whitespace())
            .trim()
            .to_string();
        TruncatedLine {
            wrapped: format!("{prefix}{truncated}..."),
            remaining,
        }
    }

    /// Fit as much of `token` onto `line` as the width allows.
    ///
    /// Whitespace that does not fit is dropped rather than carried over.
    /// A word is only split when breaking is allowed or the line is still
    /// empty (the word alone can't fit anywhere); an unbroken fit is
    /// always preferred over a hyphenated one.
    fn break_token_to_fit_in_width<R: Ruler>(
        &self,
        token: &str,
        line: &str,
        available_width: Px,
        measurer: &mut Measurer<R>,
    ) -> BrokenToken {
        let candidate = format!("{line}{token}");
        if measurer.measure(&candidate).width <= available_width {
            return BrokenToken {
                line: candidate,
                remaining: None,
                broke_word: false,
            };
        }

        if token.trim().is_empty() {
            return BrokenToken {
                line: line.to_string(),
                remaining: Some(String::new()),
                broke_word: false,
            };
        }

        if !self.allow_breaking_words && !line.trim().is_empty() {
            return BrokenToken {
                line: line.to_string(),
                remaining: Some(token.to_string()),
                broke_word: false,
            };
        }

        let chars: Vec<char> = token.chars().collect();
        let mut fit_len = 0;
        while fit_len < chars.len() {
            let prefix: String = chars[..fit_len + 1].iter().collect();
            let probe = format!("{line}{prefix}{}", self.breaking_character);
            if measurer.measure(&probe).width <= available_width {
                fit_len += 1;
            } else {
                break;
            }
        }

        let mut fitted: String = chars[..fit_len].iter().collect();
        if fit_len > 0 {
            fitted.push(self.breaking_character);
        }
        BrokenToken {
            line: format!("{line}{fitted}"),
            remaining: Some(chars[fit_len..].iter().collect()),
            broke_word: fit_len > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::Dimensions;

    fn fixed_ruler() -> impl Fn(&str) -> Dimensions {
        |text: &str| Dimensions::new(Px(10.0 * text.chars().count() as f32), Px(10.0))
    }

    fn measurer() -> Measurer<impl Fn(&str) -> Dimensions> {
        Measurer::new(fixed_ruler())
    }

    #[test]
    fn fits_on_a_single_line() {
        let result = Wrapper::new().wrap("hello", &mut measurer(), Px(50.0), Px(10.0));
        assert_eq!(result.wrapped_text, "hello");
        assert_eq!(result.truncated_text, "");
        assert_eq!(result.line_count, 1);
        assert_eq!(result.broken_word_count, 0);
    }

    #[test]
    fn exact_width_is_inclusive() {
        let result = Wrapper::new().wrap("sixsix", &mut measurer(), Px(60.0), Px(10.0));
        assert_eq!(result.wrapped_text, "sixsix");
        assert_eq!(result.truncated_text, "");
    }

    #[test]
    fn wraps_at_token_boundaries() {
        let result = Wrapper::new().wrap("hello world", &mut measurer(), Px(60.0), Px(20.0));
        assert_eq!(result.wrapped_text, "hello\nworld");
        assert_eq!(result.truncated_text, "");
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn truncates_with_ellipsis_when_lines_run_out() {
        let result = Wrapper::new().wrap("hello world", &mut measurer(), Px(60.0), Px(10.0));
        assert_eq!(result.wrapped_text, "hel...");
        assert!(result.wrapped_text.ends_with("..."));
        assert!(result.truncated_text.contains("world"));
        assert_eq!(result.line_count, 1);
    }

    #[test]
    fn breaks_long_words_when_allowed() {
        let result = Wrapper::new().with_breaking_words(true).wrap(
            "superlongwordthatdoesnotfit",
            &mut measurer(),
            Px(100.0),
            Px(30.0),
        );
        assert_eq!(result.wrapped_text, "superlong-\nwordthatd-\noesnotfit");
        assert_eq!(result.broken_word_count, 2);
        assert_eq!(result.line_count, 3);
        assert_eq!(result.truncated_text, "");
    }

    #[test]
    fn defers_unbroken_words_by_default() {
        // "bb" would fit after "a" if split, but word breaking is off
        let result = Wrapper::new().wrap("a bb", &mut measurer(), Px(30.0), Px(20.0));
        assert_eq!(result.wrapped_text, "a\nbb");
        assert_eq!(result.broken_word_count, 0);
    }

    #[test]
    fn word_wider_than_any_line_truncates() {
        // one character fits, but no character plus the break character does
        let result = Wrapper::new().wrap("hello", &mut measurer(), Px(15.0), Px(10.0));
        assert_eq!(result.wrapped_text, ".");
        assert_eq!(result.truncated_text, "hello");
        assert_eq!(result.line_count, 1);
    }

    #[test]
    fn zero_height_truncates_everything() {
        let result = Wrapper::new().wrap("hello world", &mut measurer(), Px(100.0), Px(0.0));
        assert_eq!(result.wrapped_text, "");
        assert_eq!(result.truncated_text, "hello world");
        assert_eq!(result.line_count, 0);
    }

    #[test]
    fn whitespace_only_input_collapses_to_nothing() {
        let result = Wrapper::new().wrap("   ", &mut measurer(), Px(100.0), Px::INFINITY);
        assert_eq!(result.wrapped_text, "");
        assert_eq!(result.truncated_text, "");
        assert_eq!(result.line_count, 0);
    }

    #[test]
    fn trimming_none_keeps_overflow_verbatim() {
        let result = Wrapper::new().with_trimming(TextTrimming::None).wrap(
            "hello world",
            &mut measurer(),
            Px(60.0),
            Px(10.0),
        );
        assert_eq!(result.wrapped_text, "hello ");
        assert_eq!(result.truncated_text, "world");
        assert_eq!(result.line_count, 1);
    }

    #[test]
    fn max_lines_caps_the_height_budget() {
        let result = Wrapper::new().with_max_lines(2).wrap(
            "aa bb cc dd",
            &mut measurer(),
            Px(20.0),
            Px::INFINITY,
        );
        assert_eq!(result.line_count, 2);
        assert!(result.wrapped_text.lines().count() <= 2);
        assert!(result.truncated_text.contains("cc"));
    }

    #[test]
    fn input_newlines_are_respected() {
        let result = Wrapper::new().wrap("ab\ncd", &mut measurer(), Px(100.0), Px::INFINITY);
        assert_eq!(result.wrapped_text, "ab\ncd");
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn empty_input_lines_do_not_produce_output_lines() {
        let result = Wrapper::new().wrap("a\n\nb", &mut measurer(), Px(100.0), Px::INFINITY);
        assert_eq!(result.wrapped_text, "a\nb");
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn truncated_input_lines_are_newline_separated() {
        let result = Wrapper::new().wrap("aaaa bbbb\ncccc", &mut measurer(), Px(40.0), Px(10.0));
        assert_eq!(result.wrapped_text, "a...");
        assert_eq!(result.truncated_text, "aaabbbb\ncccc");
        assert_eq!(result.line_count, 1);
    }

    #[test]
    fn trailing_whitespace_is_trimmed_at_wrap_points() {
        let result = Wrapper::new().wrap("aaaa  bbbb", &mut measurer(), Px(40.0), Px::INFINITY);
        assert_eq!(result.wrapped_text, "aaaa\nbbbb");
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn ellipsis_shrinks_with_the_available_width() {
        // decreasing width never keeps more text
        let mut previous_kept = usize::MAX;
        for width in [110.0, 100.0, 90.0, 70.0, 60.0, 50.0, 40.0] {
            let result =
                Wrapper::new().wrap("hello world", &mut measurer(), Px(width), Px(10.0));
            let kept = result.wrapped_text.trim_end_matches('.').len();
            assert!(
                kept <= previous_kept,
                "width {width} kept more text than a wider box"
            );
            previous_kept = kept;
        }
    }
}
