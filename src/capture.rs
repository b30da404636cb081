use std::{
    any::Any,
    fmt::Display,
    panic::{catch_unwind, AssertUnwindSafe},
};

use anyhow::{Error, Result};

/// A decorator applied to a failure before [`capture_with`] returns it.
pub type Annotation = Box<dyn FnOnce(Error) -> Error>;

/// Creates an [`Annotation`] that prefixes a failure with `context`.
///
/// The failure it decorates is preserved as the cause, so `downcast_ref` and
/// `root_cause` still reach the original error.
pub fn annotate<C>(context: C) -> Annotation
where
    C: Display + Send + Sync + 'static,
{
    Box::new(move |err| err.context(context))
}

/// Runs `body`, converting a raised failure into an ordinary [`Err`].
///
/// If `body` returns normally, its value is passed through untouched. If it
/// raises, the unwind stops here and the payload is converted into an
/// [`Error`]:
///
/// - a failure raised by [`raise`](crate::raise()) or
///   [`check`](crate::check()) is used as-is;
/// - a `panic!` message becomes an error carrying that message;
/// - any other payload becomes a generic error.
///
/// No payload is ever dropped, and `capture` itself never raises.
pub fn capture<T, F>(body: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(body)).map_err(failure_from_payload)
}

/// Like [`capture`], but decorates the failure with an ordered chain of
/// `annotations` before returning it.
///
/// Annotations are applied in submission order: with `[a, b]` and failure
/// `v`, the returned failure is `b(a(v))`. If `body` does not raise, the
/// annotations are not applied.
pub fn capture_with<T, F, A>(annotations: A, body: F) -> Result<T>
where
    F: FnOnce() -> T,
    A: IntoIterator<Item = Annotation>,
{
    capture(body).map_err(|mut err| {
        for annotation in annotations {
            err = annotation(err);
        }
        err
    })
}

fn failure_from_payload(payload: Box<dyn Any + Send>) -> Error {
    let payload = match payload.downcast::<Error>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<String>() {
        Ok(msg) => return Error::msg(*msg),
        Err(payload) => payload,
    };
    match payload.downcast::<&'static str>() {
        Ok(msg) => Error::msg(*msg),
        Err(_) => Error::msg("unit of work panicked with a non-string payload"),
    }
}

#[cfg(test)]
mod tests {
    use std::panic::resume_unwind;

    use anyhow::Error;

    use crate::{check, raise};

    use super::*;

    fn silent_panic(payload: String) {
        resume_unwind(Box::new(payload));
    }

    #[test]
    fn no_failure_passes_the_value_through() {
        assert_eq!(capture(|| 42).unwrap(), 42);
    }

    #[test]
    fn raised_failure_is_returned_as_is() {
        let err = capture(|| raise(Error::msg("disk full"))).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn text_payload_keeps_its_text() {
        let err = capture(|| silent_panic("disk full".into())).unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn static_text_payload_keeps_its_text() {
        let err = capture(|| resume_unwind(Box::new("out of cheese"))).unwrap_err();
        assert_eq!(err.to_string(), "out of cheese");
    }

    #[test]
    fn opaque_payload_becomes_a_generic_failure() {
        let err = capture(|| resume_unwind(Box::new(42u32))).unwrap_err();
        assert!(err.to_string().contains("panicked"));
    }

    #[test]
    fn annotations_apply_in_submission_order() {
        let err = capture_with([annotate("inner"), annotate("outer")], || {
            raise(Error::msg("root"))
        })
        .unwrap_err();
        assert_eq!(format!("{err:#}"), "outer: inner: root");
    }

    #[test]
    fn annotations_preserve_the_cause() {
        let err = capture_with([annotate("parsing")], || {
            check("nope".parse::<u32>());
        })
        .unwrap_err();
        assert!(err.downcast_ref::<std::num::ParseIntError>().is_some());
    }

    #[test]
    fn annotations_are_skipped_on_success() {
        let value = capture_with([annotate("unused")], || 7).unwrap();
        assert_eq!(value, 7);
    }
}
