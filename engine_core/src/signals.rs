use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::TimestepResult;

/// Cooperative stop request shared between a host and its run loop.
///
/// Typical use is as the `should_continue` callback: `move || !flag.is_set()`.
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn should_continue(&self) -> bool {
        !self.is_set()
    }

    /// Route Ctrl+C into this flag. Only one handler may exist per process.
    pub fn install_ctrlc(&self) -> TimestepResult<()> {
        let flag = self.flag.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::Relaxed);
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = ShutdownFlag::new();
        let b = a.clone();
        assert!(a.should_continue());

        b.set();
        assert!(a.is_set());
        assert!(!a.should_continue());
    }

    #[test]
    fn set_from_another_thread() {
        let flag = ShutdownFlag::new();
        let remote = flag.clone();
        std::thread::spawn(move || remote.set()).join().unwrap();
        assert!(flag.is_set());
    }
}
