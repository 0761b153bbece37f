//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern matching any word of the input fuzzily.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Builds a new [`FuzzPattern`] out of the provided `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "({})",
            input.split_ascii_whitespace().format_with("|", |word, f| {
                f(&format_args!(
                    "%{}%",
                    word.replace('\\', r"\\")
                        .replace('%', r"\%")
                        .replace('|', r"\|")
                        .replace('*', r"\*")
                        .replace('+', r"\+")
                        .replace('?', r"\?")
                        .replace('{', r"\{")
                        .replace('}', r"\}")
                        .replace('(', r"\(")
                        .replace(')', r"\)")
                        .replace('[', r"\[")
                        .replace(']', r"\]")
                        .replace('_', r"\_")
                ))
            }),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn alternates_whitespace_separated_words() {
        assert_eq!(
            FuzzPattern::new("cozy loft").to_string(),
            "(%cozy%|%loft%)",
        );
    }

    #[test]
    fn escapes_pattern_metacharacters() {
        assert_eq!(FuzzPattern::new("50%_off").to_string(), r"(%50\%\_off%)");
        assert_eq!(
            FuzzPattern::new("a|b (c)").to_string(),
            r"(%a\|b%|%\(c\)%)",
        );
    }
}
