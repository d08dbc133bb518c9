//! Named threads and bounded waits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::Result;

/// Spawns a thread with the given name.
pub fn spawn_named<F, T>(name: impl Into<String>, task: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(thread::Builder::new().name(name.into()).spawn(task)?)
}

/// Runs `task` on a named thread and waits up to `timeout` for it.
///
/// Returns `true` if the task finished in time. A task that overruns keeps
/// running in the background; a task that panics counts as not finished.
///
/// ```
/// use std::time::Duration;
/// use latalisa_core::thread::execute_with_timeout;
///
/// assert!(execute_with_timeout("quick", Duration::from_secs(5), || {}).unwrap());
/// ```
pub fn execute_with_timeout<F>(name: &str, timeout: Duration, task: F) -> Result<bool>
where
    F: FnOnce() + Send + 'static,
{
    let (done, finished) = mpsc::channel();
    spawn_named(name, move || {
        task();
        let _ = done.send(());
    })?;

    match finished.recv_timeout(timeout) {
        Ok(()) => Ok(true),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(thread = name, ?timeout, "task did not finish in time");
            Ok(false)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::warn!(thread = name, "task ended without completing");
            Ok(false)
        }
    }
}

/// Spawns threads named `<prefix>-<n>` with an increasing counter.
#[derive(Debug)]
pub struct ThreadFactory {
    prefix: String,
    counter: AtomicUsize,
}

impl ThreadFactory {
    pub fn new(prefix: impl Into<String>) -> Self {
        ThreadFactory {
            prefix: prefix.into(),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn spawn<F, T>(&self, task: F) -> Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        spawn_named(format!("{}-{n}", self.prefix), task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_thread() {
        let handle = spawn_named("worker", || thread::current().name().map(str::to_string)).unwrap();
        assert_eq!(handle.join().unwrap().as_deref(), Some("worker"));
    }

    #[test]
    fn finishes_within_timeout() {
        let finished = execute_with_timeout("fast", Duration::from_secs(5), || {
            thread::sleep(Duration::from_millis(10));
        })
        .unwrap();
        assert!(finished);
    }

    #[test]
    fn reports_timeout() {
        let finished = execute_with_timeout("slow", Duration::from_millis(20), || {
            thread::sleep(Duration::from_millis(500));
        })
        .unwrap();
        assert!(!finished);
    }

    #[test]
    fn panicking_task_is_not_finished() {
        let finished =
            execute_with_timeout("boom", Duration::from_secs(5), || panic!("boom")).unwrap();
        assert!(!finished);
    }

    #[test]
    fn factory_numbers_threads() {
        let factory = ThreadFactory::new("pool");
        let first = factory.spawn(|| thread::current().name().map(str::to_string)).unwrap();
        let second = factory.spawn(|| thread::current().name().map(str::to_string)).unwrap();
        assert_eq!(first.join().unwrap().as_deref(), Some("pool-1"));
        assert_eq!(second.join().unwrap().as_deref(), Some("pool-2"));
    }
}
