//! Brace-delimited sequence rendering shared by every container's `Display`.
//!
//! Sequences render as `{ e0, e1, ..., en }`. An empty sequence keeps both
//! delimiters and their padding: `{  }`.

use std::fmt;

/// Write `items` to `f` as `{ a, b, c }`.
pub fn fmt_sequence<I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    f.write_str("{ ")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt::Display::fmt(&item, f)?;
    }
    f.write_str(" }")
}

/// Adapter rendering any re-iterable sequence with [`fmt_sequence`].
///
/// ```
/// use corral_core::Sequence;
///
/// assert_eq!(Sequence(&[1, 2, 3]).to_string(), "{ 1, 2, 3 }");
/// assert_eq!(Sequence(&[] as &[u8]).to_string(), "{  }");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Sequence<I>(pub I);

impl<I> fmt::Display for Sequence<I>
where
    I: IntoIterator + Clone,
    I::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_sequence(f, self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_element_has_no_separator() {
        assert_eq!(Sequence(["solo"]).to_string(), "{ solo }");
    }

    #[test]
    fn elements_are_comma_space_separated() {
        assert_eq!(Sequence(vec![302, 2, 3, 99]).to_string(), "{ 302, 2, 3, 99 }");
    }

    #[test]
    fn empty_keeps_padding() {
        assert_eq!(Sequence(Vec::<i32>::new()).to_string(), "{  }");
    }

    #[test]
    fn element_formatting_flags_are_forwarded() {
        assert_eq!(format!("{:.1}", Sequence([1.26f64, 2.0])), "{ 1.3, 2.0 }");
    }
}
