//! Cooperative shutdown signal shared by both loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trigger side, handed to whatever decides the bridge should stop
/// (signal handler, embedding application, test).
#[derive(Clone, Debug)]
pub struct ShutdownTrigger {
    flag: Arc<AtomicBool>,
}

impl ShutdownTrigger {
    /// Ask every listener to stop. Safe to call more than once.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// The underlying flag, for registering with signal handlers that set
    /// an `AtomicBool` directly.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Listener side, polled by the loops between blocking calls.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    /// Create a linked trigger/listener pair.
    pub fn new() -> (ShutdownTrigger, Shutdown) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            ShutdownTrigger {
                flag: Arc::clone(&flag),
            },
            Shutdown { flag },
        )
    }

    /// A listener with no trigger. The loops then stop only on transport
    /// or bus failure.
    pub fn never() -> Shutdown {
        Shutdown::default()
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
