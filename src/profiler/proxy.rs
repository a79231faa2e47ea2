//! Timing decorator around a capability implementation

use crate::clock::Clock;
use crate::profiler::capability::Capability;
use crate::profiler::state::ProfilingState;
use chrono::{DateTime, Utc};
use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// A value of type `T` whose `C` operations are timed
///
/// `Profiled` implements the same capability trait as the value it wraps (see
/// the `impl` blocks next to each capability trait), forwarding every call to
/// the delegate through [`Profiled::time`] or [`Profiled::time_async`]. Only
/// operations declared timed by `C` are recorded. Results, including errors,
/// are returned untouched.
///
/// Equality is forwarded to the delegate and never timed.
pub struct Profiled<C: Capability, T> {
    delegate: T,
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
    _capability: PhantomData<fn() -> C>,
}

impl<C: Capability, T> Profiled<C, T> {
    pub(crate) fn new(delegate: T, clock: Arc<dyn Clock>, state: Arc<ProfilingState>) -> Self {
        Self {
            delegate,
            clock,
            state,
            _capability: PhantomData,
        }
    }

    /// Calls a synchronous operation on the delegate
    pub fn time<R>(&self, signature: &'static str, call: impl FnOnce(&T) -> R) -> R {
        let _timing = self.start(signature);
        call(&self.delegate)
    }

    /// Calls an asynchronous operation on the delegate
    ///
    /// The clock is read before the future is created and again when it
    /// completes, fails, or is dropped.
    pub async fn time_async<'a, F, Fut>(&'a self, signature: &'static str, call: F) -> Fut::Output
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future,
    {
        let _timing = self.start(signature);
        call(&self.delegate).await
    }

    fn start(&self, signature: &'static str) -> Timing<'_> {
        debug_assert!(
            C::declares(signature),
            "capability {} does not declare operation `{}`",
            C::NAME,
            signature
        );
        Timing {
            clock: self.clock.as_ref(),
            state: &self.state,
            implementation: concrete_type_name::<T>(),
            operation: signature,
            timed: C::is_timed(signature),
            started_at: self.clock.now(),
        }
    }
}

/// Pointer types looked through when naming the wrapped implementation
const SMART_POINTERS: &[&str] = &["alloc::sync::Arc<", "alloc::boxed::Box<", "alloc::rc::Rc<"];

/// Type name of `T` with references and smart pointers peeled off
///
/// A parser shared as `Arc<HttpPageParser>` is reported as `HttpPageParser`.
fn concrete_type_name<T: ?Sized>() -> &'static str {
    let mut name = type_name::<T>();
    loop {
        if let Some(inner) = name.strip_prefix('&') {
            name = inner.trim_start_matches("mut ");
            continue;
        }
        let unwrapped = SMART_POINTERS
            .iter()
            .find_map(|pointer| name.strip_prefix(pointer)?.strip_suffix('>'));
        match unwrapped {
            Some(inner) => name = inner.strip_suffix(", alloc::alloc::Global").unwrap_or(inner),
            None => return name,
        }
    }
}

/// Records elapsed time on drop, so unwinding calls are timed too
struct Timing<'a> {
    clock: &'a dyn Clock,
    state: &'a ProfilingState,
    implementation: &'static str,
    operation: &'static str,
    timed: bool,
    started_at: DateTime<Utc>,
}

impl Drop for Timing<'_> {
    fn drop(&mut self) {
        if !self.timed {
            return;
        }
        // A clock that moved backwards counts as zero elapsed time
        let elapsed = (self.clock.now() - self.started_at)
            .to_std()
            .unwrap_or_default();
        self.state
            .record(self.implementation, self.operation, elapsed);
    }
}

impl<C: Capability, T: PartialEq> PartialEq<T> for Profiled<C, T> {
    fn eq(&self, other: &T) -> bool {
        self.delegate == *other
    }
}

impl<C: Capability, T: PartialEq> PartialEq for Profiled<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.delegate == other.delegate
    }
}

impl<C: Capability, T: fmt::Debug> fmt::Debug for Profiled<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiled")
            .field("capability", &C::NAME)
            .field("delegate", &self.delegate)
            .finish()
    }
}
