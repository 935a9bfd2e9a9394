//! Error type for captured evaluation failures.
//!
//! `Eval` itself never catches anything: a panicking thunk or continuation
//! unwinds straight out of [`Eval::value`](super::Eval::value). Callers that
//! prefer a `Result` use [`Eval::try_value`](super::Eval::try_value), which
//! reports the panic as an [`EvalError`].

use std::any::Any;

/// A failure captured while forcing an `Eval`.
///
/// # Examples
///
/// ```rust
/// use eval_trampoline::control::{Eval, EvalError};
///
/// let failing: Eval<i32> = Eval::raise("disk on fire");
/// assert_eq!(
///     failing.try_value(),
///     Err(EvalError::Panicked { message: "disk on fire".to_string() })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A user supplied thunk or continuation panicked.
    #[error("evaluation panicked: {message}")]
    Panicked {
        /// The panic message, when the payload was a string.
        message: String,
    },
}

impl EvalError {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => payload.downcast::<&'static str>().map_or_else(
                |_| "non-string panic payload".to_string(),
                |message| (*message).to_string(),
            ),
        };
        Self::Panicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Box::new("static message") as Box<dyn Any + Send>, "static message")]
    #[case(Box::new("owned message".to_string()) as Box<dyn Any + Send>, "owned message")]
    #[case(Box::new(42_u8) as Box<dyn Any + Send>, "non-string panic payload")]
    fn test_from_panic_extracts_message(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        assert_eq!(
            EvalError::from_panic(payload),
            EvalError::Panicked {
                message: expected.to_string()
            }
        );
    }

    #[rstest]
    fn test_display() {
        let error = EvalError::Panicked {
            message: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "evaluation panicked: boom");
    }
}
