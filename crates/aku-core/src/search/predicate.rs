//! Acceptable values for the corrupted byte.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Matcher over the byte value a corruption writes.
///
/// Built once per search. Ordering comparisons are unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ValuePredicate {
    Any,
    EqualToOneOf(BTreeSet<u8>),
    GreaterThan(u8),
    GreaterOrEqual(u8),
    LessThan(u8),
    LessOrEqual(u8),
}

/// Comparison kind, used to build a predicate from a parsed operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    Any,
    Equal,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ValuePredicate {
    /// Build a predicate checking the number of reference values:
    /// none for `Any`, at least one for `Equal`, exactly one otherwise.
    pub fn new(kind: PredicateKind, values: &[u8]) -> Result<Self> {
        let single = || match values {
            [value] => Ok(*value),
            _ => Err(Error::InvalidPredicate(format!(
                "{:?} needs exactly one value, got {}",
                kind,
                values.len()
            ))),
        };

        Ok(match kind {
            PredicateKind::Any => {
                if !values.is_empty() {
                    return Err(Error::InvalidPredicate(format!(
                        "Any takes no values, got {}",
                        values.len()
                    )));
                }
                Self::Any
            }
            PredicateKind::Equal => Self::equal_to_one_of(values.iter().copied())?,
            PredicateKind::GreaterThan => Self::GreaterThan(single()?),
            PredicateKind::GreaterOrEqual => Self::GreaterOrEqual(single()?),
            PredicateKind::LessThan => Self::LessThan(single()?),
            PredicateKind::LessOrEqual => Self::LessOrEqual(single()?),
        })
    }

    pub fn equal_to_one_of<I: IntoIterator<Item = u8>>(values: I) -> Result<Self> {
        let values: BTreeSet<u8> = values.into_iter().collect();
        if values.is_empty() {
            return Err(Error::InvalidPredicate(
                "equality needs at least one value".to_string(),
            ));
        }
        Ok(Self::EqualToOneOf(values))
    }

    pub fn matches(&self, value: u8) -> bool {
        match self {
            Self::Any => true,
            Self::EqualToOneOf(values) => values.contains(&value),
            Self::GreaterThan(v) => value > *v,
            Self::GreaterOrEqual(v) => value >= *v,
            Self::LessThan(v) => value < *v,
            Self::LessOrEqual(v) => value <= *v,
        }
    }

    /// Every byte value this predicate accepts, ascending
    pub fn accepted_values(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |v| self.matches(*v))
    }
}

impl fmt::Display for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::EqualToOneOf(values) => {
                let values: Vec<String> = values.iter().map(|v| format!("${:02X}", v)).collect();
                write!(f, "== {}", values.join(", "))
            }
            Self::GreaterThan(v) => write!(f, "> ${:02X}", v),
            Self::GreaterOrEqual(v) => write!(f, ">= ${:02X}", v),
            Self::LessThan(v) => write!(f, "< ${:02X}", v),
            Self::LessOrEqual(v) => write!(f, "<= ${:02X}", v),
        }
    }
}
