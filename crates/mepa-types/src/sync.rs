//! Lock aliases for state shared between the timer task and user triggers.
//!
//! parking_lot locks do not poison, and `try_lock` returns `None` instead
//! of blocking when the lock is held.

pub use parking_lot::{Mutex, MutexGuard};
pub use std::sync::Arc;

/// State reached both by run-loop ticks and by user triggers
pub type Shared<T> = Arc<Mutex<T>>;

/// Wrap `value` for sharing with the run-loop task
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_try_lock_rejects_while_held() {
        let state = shared(0u32);
        let guard = state.lock();
        assert!(state.try_lock().is_none());
        drop(guard);
        assert!(state.try_lock().is_some());
    }
}
