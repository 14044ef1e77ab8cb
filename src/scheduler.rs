//! Cancellable deferred tasks
//!
//! Simulated work (task completion, cooldowns) is modelled as a delay followed
//! by a state mutation. A [`TaskScope`] ties those deferred mutations to the
//! lifecycle of the widgets that own them: once [`TaskScope::teardown`]
//! returns, no deferred callback will run.
//!
//! Callbacks run while the scope's lock is held, and teardown takes the same
//! lock, so a callback either finishes before teardown or never starts.
//! Callbacks receive a [`ScopeContext`] to schedule follow-up work without
//! re-entering the lock.
//!
//! Lock order is always scope first, then widget state. Code that needs both
//! must enter through [`TaskScope::with`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
struct ScopeState {
    closed: bool,
    handles: Vec<JoinHandle<()>>,
}

/// Owner of a set of deferred callbacks
#[derive(Clone, Default)]
pub struct TaskScope {
    inner: Arc<Mutex<ScopeState>>,
}

/// Access to an open scope while its lock is held
pub struct ScopeContext<'a> {
    inner: &'a Arc<Mutex<ScopeState>>,
    state: &'a mut ScopeState,
}

fn lock(inner: &Mutex<ScopeState>) -> MutexGuard<'_, ScopeState> {
    // A panicking callback must not wedge teardown
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` after `delay`, unless the scope is torn down first
    ///
    /// Returns `false` (and drops `f`) when the scope is already closed.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, f: F) -> bool
    where
        F: FnOnce(&mut ScopeContext<'_>) + Send + 'static,
    {
        self.with(|ctx| ctx.schedule(delay, f)).is_some()
    }

    /// Run `f` immediately with the scope lock held, `None` if closed
    pub fn with<R>(&self, f: impl FnOnce(&mut ScopeContext<'_>) -> R) -> Option<R> {
        let mut guard = lock(&self.inner);
        if guard.closed {
            return None;
        }
        let mut ctx = ScopeContext {
            inner: &self.inner,
            state: &mut *guard,
        };
        Some(f(&mut ctx))
    }

    /// Close the scope and abort every pending callback
    pub fn teardown(&self) {
        let mut guard = lock(&self.inner);
        if guard.closed {
            return;
        }
        guard.closed = true;

        let handles = std::mem::take(&mut guard.handles);
        let pending = handles.iter().filter(|h| !h.is_finished()).count();
        for handle in handles {
            handle.abort();
        }

        tracing::debug!(aborted = pending, "Task scope torn down");
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }

    /// Number of callbacks still waiting to run
    pub fn pending(&self) -> usize {
        lock(&self.inner)
            .handles
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }
}

impl ScopeContext<'_> {
    /// Schedule a follow-up callback on the same scope
    pub fn schedule<F>(&mut self, delay: Duration, f: F)
    where
        F: FnOnce(&mut ScopeContext<'_>) + Send + 'static,
    {
        self.state.handles.retain(|h| !h.is_finished());

        let shared = Arc::clone(self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            run_deferred(&shared, f);
        });

        self.state.handles.push(handle);
    }
}

fn run_deferred<F>(inner: &Arc<Mutex<ScopeState>>, f: F)
where
    F: FnOnce(&mut ScopeContext<'_>),
{
    let mut guard = lock(inner);
    if guard.closed {
        return;
    }
    let mut ctx = ScopeContext {
        inner,
        state: &mut *guard,
    };
    f(&mut ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_callback_runs_after_delay() {
        let scope = TaskScope::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        assert!(scope.schedule(Duration::from_secs(2), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_up_scheduling() {
        let scope = TaskScope::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        scope.schedule(Duration::from_secs(1), move |ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            let again = Arc::clone(&counter);
            ctx.schedule(Duration::from_secs(1), move |_| {
                again.fetch_add(10, Ordering::SeqCst);
            });
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_prevents_mutation() {
        let scope = TaskScope::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        scope.schedule(Duration::from_secs(3), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(scope.pending(), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        scope.teardown();
        assert!(scope.is_closed());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(scope.pending(), 0);
    }

    #[tokio::test]
    async fn test_closed_scope_rejects_work() {
        let scope = TaskScope::new();
        scope.teardown();

        assert!(!scope.schedule(Duration::from_millis(1), |_| {}));
        assert!(scope.with(|_| ()).is_none());
    }
}
