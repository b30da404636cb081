//! Utilities related to destructors and drop.

/// Drop guard returned by [`defer`].
#[must_use = "`Defer` should be assigned to a variable, or it will be dropped immediately"]
pub struct Defer<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for Defer<F> {
    fn drop(&mut self) {
        (self.0.take().unwrap())();
    }
}

/// Returns a value that runs `cb` when dropped.
///
/// The callback runs when the guard goes out of scope, whether the scope is
/// left normally or by a raised failure.
pub fn defer<F: FnOnce()>(cb: F) -> Defer<F> {
    Defer(Some(cb))
}

/// Runs `body` with mutable access to `resource`, then releases the resource.
///
/// The resource is dropped as soon as `body` completes, whether it returns
/// normally or raises. Use this to pin the release point of values whose
/// `Drop` impl performs the release, such as files and sockets.
pub fn with<R, T, F>(mut resource: R, body: F) -> T
where
    F: FnOnce(&mut R) -> T,
{
    let value = body(&mut resource);
    drop(resource);
    value
}
