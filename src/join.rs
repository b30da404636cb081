use std::thread;

use anyhow::Error;

use crate::{capture::capture, check::raise, drop::defer};

/// A builder object that can be used to configure and run a [`join`](join()).
#[derive(Clone, Default)]
pub struct JoinBuilder {
    name: Option<String>,
}

impl JoinBuilder {
    /// Creates a new [`JoinBuilder`] with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base name of the unit threads.
    ///
    /// Each thread spawned will be named according to this base name and the
    /// unit's position in the submitted sequence, and will log its start and
    /// exit.
    pub fn name<N: Into<String>>(self, name: N) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Runs every unit in `units` on its own thread and waits for all of
    /// them to finish.
    ///
    /// See [`join`](join()) for the full semantics.
    pub fn run<I, F>(self, units: I)
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() + Send,
    {
        let first_failure = thread::scope(|scope| {
            let (report, outcomes) = crossbeam_channel::unbounded();
            for (index, unit) in units.into_iter().enumerate() {
                let report = report.clone();
                let name = self.name.as_ref().map(|base| format!("{base}-{index}"));
                let mut builder = thread::Builder::new();
                if let Some(name) = &name {
                    builder = builder.name(name.clone());
                }
                let reporter = report.clone();
                let spawned = builder.spawn_scoped(scope, move || {
                    let _guard;
                    if let Some(name) = name {
                        log::trace!("unit '{name}' starting");
                        _guard = defer(move || log::trace!("unit '{name}' exiting"));
                    }
                    reporter.send(capture(unit).err()).ok();
                });
                if let Err(err) = spawned {
                    report
                        .send(Some(Error::new(err).context("spawning unit thread")))
                        .ok();
                }
            }
            drop(report);

            // Every wrapper reports exactly once, and the channel disconnects
            // once all of them have. The first failure received wins.
            let mut first = None;
            for failure in outcomes.into_iter().flatten() {
                if first.is_none() {
                    first = Some(failure);
                } else {
                    log::debug!("discarding additional unit failure: {failure:#}");
                }
            }
            first
        });

        if let Some(failure) = first_failure {
            raise(failure);
        }
    }
}

/// Runs every unit of work in `units` on its own thread, waits for all of
/// them to finish, and raises the first failure reported, if any.
///
/// Each unit runs under [`capture`], so a failure raised inside one unit
/// becomes that unit's outcome instead of tearing down the process, and never
/// terminates its siblings: all units always run to completion. Once every
/// unit has finished, the first failure reported is raised in the caller's
/// context, where an enclosing [`capture`] turns it back into an ordinary
/// [`Err`]. If no unit failed, `join` returns normally. At most one failure
/// is raised per call; when several units fail, which failure wins depends on
/// the order their threads finish. Submitting zero units is a valid no-op.
///
/// Every unit gets a dedicated OS thread. There is no pooling and no limit,
/// which makes `join` unsuitable for unbounded unit counts without an
/// external limiter.
///
/// If a unit's thread cannot be spawned, the spawn error is reported as that
/// unit's failure; the remaining units are still launched.
///
/// # Examples
///
/// ```
/// use must::{capture, check, join};
///
/// let outcome = capture(|| {
///     join(["Cargo.toml", "src/lib.rs"].map(|path| {
///         move || {
///             check(std::fs::metadata(path));
///         }
///     }));
/// });
/// assert!(outcome.is_ok());
/// ```
pub fn join<I, F>(units: I)
where
    I: IntoIterator<Item = F>,
    F: FnOnce() + Send,
{
    JoinBuilder::new().run(units);
}

/// Variadic form of [`join`](join()) for units of different closure types.
///
/// # Examples
///
/// ```
/// use must::{capture, join, raise, Error};
///
/// let failure = capture(|| {
///     join!(
///         || println!("side A"),
///         || raise(Error::msg("disk full")),
///     )
/// })
/// .unwrap_err();
/// assert_eq!(failure.to_string(), "disk full");
/// ```
#[macro_export]
macro_rules! join {
    () => {
        $crate::join(::std::iter::empty::<fn()>())
    };
    ($($unit:expr),+ $(,)?) => {
        $crate::join([$(
            ::std::boxed::Box::new($unit)
                as ::std::boxed::Box<dyn ::std::ops::FnOnce() + ::std::marker::Send + '_>
        ),+])
    };
}
