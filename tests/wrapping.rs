use std::cell::RefCell;
use std::rc::Rc;

use typeset::{
    Dimensions, Measurer, Pen, Px, SingleLineWrapper, TextTrimming, Transform, Typesetter,
    TypesetterContext, WriteOptions, Wrapper, XAlign,
};

/// 10 px per character, 10 px line height; makes every expectation exactly
/// computable.
fn fixed_ruler() -> impl Fn(&str) -> Dimensions {
    |text: &str| Dimensions::new(Px(10.0 * text.chars().count() as f32), Px(10.0))
}

fn measurer() -> Measurer<impl Fn(&str) -> Dimensions> {
    Measurer::new(fixed_ruler())
}

#[test]
fn line_budget_is_always_respected() {
    let text = lipsum::lipsum(100);
    for (width, height) in [(150.0, 50.0), (80.0, 30.0), (300.0, 120.0), (50.0, 10.0)] {
        let result = Wrapper::new().wrap(&text, &mut measurer(), Px(width), Px(height));
        let budget = (height / 10.0).floor() as usize;
        assert!(
            result.line_count <= budget,
            "{}x{height} produced {} lines for a budget of {budget}",
            width,
            result.line_count
        );
        assert!(result.wrapped_text.lines().count() <= budget);
    }
}

#[test]
fn max_lines_bounds_output_even_with_unbounded_height() {
    let text = lipsum::lipsum(100);
    let result = Wrapper::new().with_max_lines(3).wrap(
        &text,
        &mut measurer(),
        Px(120.0),
        Px::INFINITY,
    );
    assert!(result.line_count <= 3);
}

#[test]
fn every_wrapped_line_fits_the_width() {
    let text = lipsum::lipsum(80);
    for width in [60.0, 110.0, 250.0] {
        let result = Wrapper::new().wrap(&text, &mut measurer(), Px(width), Px(200.0));
        for line in result.wrapped_text.lines() {
            let line_width = 10.0 * line.chars().count() as f32;
            assert!(
                line_width <= width,
                "line {line:?} measures {line_width} in a {width} budget"
            );
        }
    }
}

#[test]
fn nothing_is_lost_when_everything_fits() {
    let text = lipsum::lipsum(60);
    let result = Wrapper::new().wrap(&text, &mut measurer(), Px(250.0), Px::INFINITY);

    assert_eq!(result.truncated_text, "");
    let original_words: Vec<&str> = text.split_whitespace().collect();
    let wrapped_words: Vec<&str> = result.wrapped_text.split_whitespace().collect();
    assert_eq!(original_words, wrapped_words);
}

#[test]
fn wrapping_hello_world_into_two_lines() {
    let result = Wrapper::new().wrap("hello world", &mut measurer(), Px(60.0), Px(20.0));
    assert_eq!(result.wrapped_text, "hello\nworld");
    assert_eq!(result.line_count, 2);
    assert_eq!(result.truncated_text, "");
}

#[test]
fn truncating_hello_world_to_one_line() {
    let result = Wrapper::new().wrap("hello world", &mut measurer(), Px(60.0), Px(10.0));
    assert!(result.wrapped_text.ends_with("..."));
    assert!(10.0 * result.wrapped_text.chars().count() as f32 <= 60.0);
    assert!(result.truncated_text.contains("world"));
}

#[test]
fn breaking_an_overlong_word_inserts_break_characters() {
    let result = Wrapper::new().with_breaking_words(true).wrap(
        "superlongwordthatdoesnotfit",
        &mut measurer(),
        Px(100.0),
        Px::INFINITY,
    );
    assert!(result.wrapped_text.contains("-\n"));
    assert!(result.broken_word_count >= 1);
}

#[test]
fn trimming_none_never_truncates_the_kept_line() {
    let text = lipsum::lipsum(30);
    let result = Wrapper::new().with_trimming(TextTrimming::None).wrap(
        &text,
        &mut measurer(),
        Px(120.0),
        Px(30.0),
    );
    assert!(!result.wrapped_text.contains("..."));
}

#[test]
fn single_line_wrapper_guarantees_one_line() {
    let text = "the quick brown fox jumps over the lazy dog";
    let wrapper = SingleLineWrapper::default();
    for width in [30.0, 75.0, 140.0, 220.0, 500.0] {
        let result = wrapper
            .wrap(text, &mut measurer(), Px(width), Px::INFINITY)
            .unwrap();
        assert!(result.line_count <= 1, "width {width}");
        assert!(!result.wrapped_text.contains('\n'));
    }
}

#[test]
fn single_line_wrapper_rejects_multi_line_input() {
    let wrapper = SingleLineWrapper::default();
    assert!(wrapper
        .wrap("a\nb", &mut measurer(), Px(100.0), Px::INFINITY)
        .is_err());
}

/// A context recording pen calls, for end-to-end write assertions.
struct RecordingContext {
    lines: Rc<RefCell<Vec<(String, Px)>>>,
}

struct RecordingPen {
    lines: Rc<RefCell<Vec<(String, Px)>>>,
}

impl Pen for RecordingPen {
    fn write_line(
        &mut self,
        line: &str,
        _width: Px,
        _x_align: XAlign,
        _x_offset: Px,
        y_offset: Px,
        _line_index: usize,
    ) {
        self.lines.borrow_mut().push((line.to_string(), y_offset));
    }
}

impl TypesetterContext for RecordingContext {
    type Ruler = fn(&str) -> Dimensions;
    type Pen<'a> = RecordingPen;

    fn create_ruler(&self) -> Self::Ruler {
        |text: &str| Dimensions::new(Px(10.0 * text.chars().count() as f32), Px(10.0))
    }

    fn create_pen(&mut self, _text: &str, _transform: &Transform) -> RecordingPen {
        RecordingPen {
            lines: self.lines.clone(),
        }
    }
}

#[test]
fn writing_runs_the_full_pipeline() {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let mut typesetter = Typesetter::new(RecordingContext {
        lines: lines.clone(),
    });

    typesetter
        .write("hello world", Px(60.0), Px(20.0), &WriteOptions::default())
        .unwrap();

    let lines = lines.borrow();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], ("hello".to_string(), Px(10.0)));
    assert_eq!(lines[1], ("world".to_string(), Px(20.0)));
}

#[test]
fn writing_with_expanded_whitespace_matches_the_normalized_text() {
    let collect = |text: &str| {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let mut typesetter = Typesetter::new(RecordingContext {
            lines: lines.clone(),
        });
        typesetter
            .write(text, Px(110.0), Px(60.0), &WriteOptions::default())
            .unwrap();
        let collected: Vec<String> = lines.borrow().iter().map(|(l, _)| l.clone()).collect();
        collected
    };

    assert_eq!(
        collect("the  quick \t brown   fox"),
        collect("the quick brown fox")
    );
}

#[test]
fn invalid_rotation_fails_before_any_output() {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let mut typesetter = Typesetter::new(RecordingContext {
        lines: lines.clone(),
    });

    let options = WriteOptions {
        rotation: 45.0,
        ..WriteOptions::default()
    };
    assert!(typesetter
        .write("hello", Px(100.0), Px(100.0), &options)
        .is_err());
    assert!(lines.borrow().is_empty());
}

#[test]
fn long_prose_truncates_cleanly() {
    let text = lipsum::lipsum(200);
    let result = Wrapper::new().wrap(&text, &mut measurer(), Px(200.0), Px(40.0));

    assert_eq!(result.line_count, 4);
    assert!(result.wrapped_text.ends_with("..."));
    assert!(!result.truncated_text.is_empty());
}
