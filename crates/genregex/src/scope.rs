//! # Generation Scope
//!
//! Every resource tied to one configuration generation registers a cleanup
//! here; the cleanups run once, together, when the generation is retired.

use parking_lot::Mutex;

type Cleanup = Box<dyn FnOnce() + Send>;

/// The resource scope of one configuration generation.
///
/// Dropping the scope tears it down.
pub struct GenerationScope {
    generation: u64,
    cleanups: Mutex<Option<Vec<Cleanup>>>,
}

impl core::fmt::Debug for GenerationScope {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("GenerationScope")
            .field("generation", &self.generation)
            .field("is_torn_down", &self.is_torn_down())
            .finish()
    }
}

impl GenerationScope {
    /// Open the scope for the given generation number.
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            cleanups: Mutex::new(Some(Vec::new())),
        }
    }

    /// The generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Register a cleanup to run at teardown.
    ///
    /// ## Returns
    /// `false` if the scope is already torn down; the cleanup then runs
    /// immediately.
    pub fn add_cleanup<F>(
        &self,
        cleanup: F,
    ) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut guard = self.cleanups.lock();
        match guard.as_mut() {
            Some(cleanups) => {
                cleanups.push(Box::new(cleanup));
                true
            }
            None => {
                drop(guard);
                cleanup();
                false
            }
        }
    }

    /// Has [`teardown`](Self::teardown) run?
    pub fn is_torn_down(&self) -> bool {
        self.cleanups.lock().is_none()
    }

    /// Run every cleanup, most recent first.
    ///
    /// Later calls do nothing.
    pub fn teardown(&self) {
        let Some(cleanups) = self.cleanups.lock().take() else {
            log::debug!("generation {} already torn down", self.generation);
            return;
        };

        log::debug!(
            "tearing down generation {} ({} cleanups)",
            self.generation,
            cleanups.len()
        );
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }
    }
}

impl Drop for GenerationScope {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn test_teardown_once_in_reverse() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let scope = GenerationScope::new(7);
        assert_eq!(scope.generation(), 7);

        for i in 0..3 {
            let order = order.clone();
            assert!(scope.add_cleanup(move || order.lock().push(i)));
        }

        scope.teardown();
        scope.teardown();
        assert!(scope.is_torn_down());
        assert_eq!(*order.lock(), vec![2, 1, 0]);
    }

    #[test]
    fn test_late_cleanup_runs_now() {
        let count = Arc::new(AtomicUsize::new(0));
        let scope = GenerationScope::new(1);
        scope.teardown();

        let c = count.clone();
        assert!(!scope.add_cleanup(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_tears_down() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let scope = GenerationScope::new(2);
            let c = count.clone();
            scope.add_cleanup(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
            assert_eq!(count.load(Ordering::SeqCst), 0);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
