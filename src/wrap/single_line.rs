use crate::error::TypesetError;
use crate::measurer::{Measurer, Ruler};
use crate::units::Px;

use super::wrapper::{WrapResult, Wrapper};

/// Forces wrapping to produce at most one line, searching for the widest
/// truncation that still fits.
///
/// Line breaking is not a smooth function of width: a token may refuse to
/// break across many nearby widths and then suddenly break, so the best
/// single-line truncation cannot be computed in closed form. Instead of an
/// exhaustive search, a fixed number of binary probes narrows the width,
/// trading exactness for bounded latency.
#[derive(Debug, Clone, Default)]
pub struct SingleLineWrapper {
    wrapper: Wrapper,
}

impl SingleLineWrapper {
    /// Number of width-refinement probes.
    const NO_WRAP_ITERATIONS: usize = 5;

    pub fn new(wrapper: Wrapper) -> SingleLineWrapper {
        SingleLineWrapper { wrapper }
    }

    /// Wrap `text` into a single line.
    ///
    /// Input containing a line break is a caller contract violation and
    /// returns [`TypesetError::MultiLineInput`]. If the text naturally
    /// wraps to at most one line it is returned unchanged; otherwise the
    /// wrap is re-run with the height clamped to a single line's worth
    /// while a binary search narrows toward the smallest width that still
    /// produces an equivalent single-line outcome.
    pub fn wrap<R: Ruler>(
        &self,
        text: &str,
        measurer: &mut Measurer<R>,
        width: Px,
        height: Px,
    ) -> Result<WrapResult, TypesetError> {
        if text.contains('\n') {
            return Err(TypesetError::MultiLineInput);
        }

        let result = self.wrapper.wrap(text, measurer, width, height);
        if result.line_count < 2 {
            return Ok(result);
        }

        let probe_height = height.min(measurer.line_height());
        let mut best = self.wrapper.wrap(text, measurer, width, probe_height);
        let mut left = Px::ZERO;
        let mut right = width;
        for _ in 0..Self::NO_WRAP_ITERATIONS {
            if right <= left {
                break;
            }
            let middle = (left + right) / 2.0;
            let probe = self.wrapper.wrap(text, measurer, middle, probe_height);
            if same_results(&best, &probe) {
                right = middle;
                best = probe;
            } else {
                left = middle;
            }
        }
        Ok(best)
    }
}

fn same_results(one: &WrapResult, two: &WrapResult) -> bool {
    one.line_count == two.line_count && one.truncated_text == two.truncated_text
}
