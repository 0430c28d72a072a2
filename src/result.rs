//! # Result Carrier
//!
//! The accumulating success/warning/failure carrier described in spec §4.G.
//! Named `Outcome` rather than `Result` to avoid shadowing [`std::result::Result`]
//! — every fallible function in this crate still returns a plain `std::result`
//! for `?`-propagation; `Outcome` is the *accumulating* sibling used by phases
//! that must keep going after a recoverable problem (spec §7: "phases 2-8
//! accumulate").

use crate::error::{CompileError, Phase};
use std::fmt;

/// A single reported problem: the error kind, which phase raised it, and an
/// optional source position (populated only for parse errors).
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub error: CompileError,
    pub phase: Option<Phase>,
}

impl Problem {
    pub fn new(error: CompileError) -> Self {
        Problem { error, phase: None }
    }

    pub fn at_phase(error: CompileError, phase: Phase) -> Self {
        Problem {
            error,
            phase: Some(phase),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "[{phase}] {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl From<CompileError> for Problem {
    fn from(error: CompileError) -> Self {
        Problem::new(error)
    }
}

/// Non-empty, first-occurrence-ordered list of problems.
pub type Problems = Vec<Problem>;

/// `Outcome<T> ∈ { Success(T), Warning(Problems, T), Failure(Problems) }`.
///
/// Applicative composition ([`Outcome::combine2`], [`Outcome::traverse`])
/// accumulates problems from every operand. Monadic composition
/// ([`Outcome::and_then`]) short-circuits on the first `Failure`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Warning(Problems, T),
    Failure(Problems),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    pub fn failure_one(problem: impl Into<Problem>) -> Self {
        Outcome::Failure(vec![problem.into()])
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The problems accumulated so far, regardless of variant.
    pub fn problems(&self) -> &[Problem] {
        match self {
            Outcome::Success(_) => &[],
            Outcome::Warning(problems, _) => problems,
            Outcome::Failure(problems) => problems,
        }
    }

    /// The value, if one was produced (`Success` or `Warning`).
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(v) | Outcome::Warning(_, v) => Some(v),
            Outcome::Failure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success(v) | Outcome::Warning(_, v) => Some(v),
            Outcome::Failure(_) => None,
        }
    }

    /// Converts to a plain `Result`, discarding warnings (keeping the value).
    pub fn into_result(self) -> Result<T, Problems> {
        match self {
            Outcome::Success(v) | Outcome::Warning(_, v) => Ok(v),
            Outcome::Failure(problems) => Err(problems),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Warning(problems, v) => Outcome::Warning(problems, f(v)),
            Outcome::Failure(problems) => Outcome::Failure(problems),
        }
    }

    /// Monadic bind: short-circuits on `Failure`, otherwise threads
    /// accumulated warnings from `self` into the continuation's outcome.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Success(v) => f(v),
            Outcome::Warning(mut problems, v) => match f(v) {
                Outcome::Success(u) => Outcome::Warning(problems, u),
                Outcome::Warning(more, u) => {
                    problems.extend(more);
                    Outcome::Warning(problems, u)
                }
                Outcome::Failure(more) => {
                    problems.extend(more);
                    Outcome::Failure(problems)
                }
            },
            Outcome::Failure(problems) => Outcome::Failure(problems),
        }
    }

    /// Applicative combination of two independent outcomes: both sides are
    /// evaluated and their problems accumulated even if one already failed.
    pub fn combine2<U, R>(self, other: Outcome<U>, f: impl FnOnce(T, U) -> R) -> Outcome<R> {
        match (self, other) {
            (Outcome::Failure(mut a), b) => {
                a.extend(b.problems().iter().cloned());
                Outcome::Failure(a)
            }
            (a, Outcome::Failure(b)) => {
                let mut problems = a.problems().to_vec();
                problems.extend(b);
                Outcome::Failure(problems)
            }
            (Outcome::Success(v1), Outcome::Success(v2)) => Outcome::Success(f(v1, v2)),
            (a, b) => {
                let mut problems = a.problems().to_vec();
                problems.extend(b.problems().iter().cloned());
                let v1 = a.into_value().expect("non-failure outcome has a value");
                let v2 = b.into_value().expect("non-failure outcome has a value");
                Outcome::Warning(problems, f(v1, v2))
            }
        }
    }

    /// Applicative traversal: runs `f` over every item, accumulating all
    /// problems from every item rather than stopping at the first failure.
    pub fn traverse<I, U>(items: I, mut f: impl FnMut(I::Item) -> Outcome<U>) -> Outcome<Vec<U>>
    where
        I: IntoIterator,
    {
        let mut values = Vec::new();
        let mut problems = Vec::new();
        let mut failed = false;

        for item in items {
            match f(item) {
                Outcome::Success(v) => values.push(v),
                Outcome::Warning(more, v) => {
                    problems.extend(more);
                    values.push(v);
                }
                Outcome::Failure(more) => {
                    problems.extend(more);
                    failed = true;
                }
            }
        }

        if failed {
            Outcome::Failure(problems)
        } else if problems.is_empty() {
            Outcome::Success(values)
        } else {
            Outcome::Warning(problems, values)
        }
    }

    /// Replaces a `Failure` with `alternative`; leaves `Success`/`Warning` untouched.
    pub fn or_else(self, alternative: impl FnOnce(Problems) -> Outcome<T>) -> Outcome<T> {
        match self {
            Outcome::Failure(problems) => alternative(problems),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err() -> Problem {
        Problem::new(CompileError::unknown_field("Query", "x"))
    }

    #[test]
    fn and_then_short_circuits_on_failure() {
        let outcome: Outcome<i32> = Outcome::Failure(vec![err()]);
        let result = outcome.and_then(|v| Outcome::Success(v + 1));
        assert!(result.is_failure());
    }

    #[test]
    fn and_then_threads_warnings() {
        let outcome = Outcome::Warning(vec![err()], 1);
        let result = outcome.and_then(|v| Outcome::Success(v + 1));
        assert_eq!(result.value(), Some(&2));
        assert_eq!(result.problems().len(), 1);
    }

    #[test]
    fn traverse_accumulates_every_failure() {
        let outcome: Outcome<Vec<i32>> = Outcome::<()>::traverse(0..3, |i| {
            if i == 1 {
                Outcome::Failure(vec![err()])
            } else {
                Outcome::Success(i)
            }
        });
        assert!(outcome.is_failure());
        // only one item actually fails, but traversal does not stop early
        assert_eq!(outcome.problems().len(), 1);
    }

    #[test]
    fn combine2_accumulates_both_failures() {
        let a: Outcome<i32> = Outcome::Failure(vec![err()]);
        let b: Outcome<i32> = Outcome::Failure(vec![err()]);
        let combined = a.combine2(b, |x, y| x + y);
        assert_eq!(combined.problems().len(), 2);
    }
}
