//! # agenr-lifecycle
//!
//! Process-wide shutdown lifecycle: one object with `install`, `request`,
//! `on_shutdown`, `run_shutdown_handlers`, `reset`, folding what would
//! otherwise be scattered shutdown globals into a single process-global
//! [`Lifecycle`] handle, since signal delivery is inherently process-wide.
//!
//! First termination signal: flips `shutdown_requested`, records which
//! signal arrived, invokes the optional wake callback, logs once, returns.
//! Second termination signal: logs a forced-shutdown line and exits with
//! code 1 — the watcher thread never returns control past that point.

use std::process;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};
use std::thread;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;

/// Errors raised installing the process-wide signal watcher.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to register signal handlers: {0}")]
    RegisterFailed(#[from] std::io::Error),
}

/// Which termination signal triggered shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            SIGINT => Some(Signal::Interrupt),
            SIGTERM => Some(Signal::Terminate),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
        }
    }
}

type ShutdownHandler = Box<dyn FnMut() -> Result<(), String> + Send>;
type WakeCallback = Box<dyn Fn() + Send + Sync>;

struct State {
    installed: AtomicBool,
    shutdown_requested: AtomicBool,
    signal_count: AtomicU8,
    received: Mutex<Option<Signal>>,
    handlers: Mutex<Vec<ShutdownHandler>>,
    wake: Mutex<Option<WakeCallback>>,
}

impl State {
    fn new() -> Self {
        Self {
            installed: AtomicBool::new(false),
            shutdown_requested: AtomicBool::new(false),
            signal_count: AtomicU8::new(0),
            received: Mutex::new(None),
            handlers: Mutex::new(Vec::new()),
            wake: Mutex::new(None),
        }
    }
}

fn state() -> &'static State {
    static STATE: OnceLock<State> = OnceLock::new();
    STATE.get_or_init(State::new)
}

/// The process's single shutdown-lifecycle handle.
///
/// `Lifecycle` carries no fields of its own — all state lives behind the
/// process-global [`state`] so that the signal-handler thread and callers
/// on any other thread observe the same shutdown flag.
pub struct Lifecycle;

impl Lifecycle {
    /// Register handlers for SIGINT and SIGTERM. Idempotent: a second call
    /// is a no-op, since `signal_hook` can only register a signal set once.
    pub fn install() -> Result<(), LifecycleError> {
        let st = state();
        if st.installed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        thread::spawn(move || {
            for raw in signals.forever() {
                let Some(sig) = Signal::from_raw(raw) else { continue };
                Lifecycle::handle_signal(sig);
            }
        });

        Ok(())
    }

    fn handle_signal(sig: Signal) {
        let st = state();
        let count = st.signal_count.fetch_add(1, Ordering::SeqCst);

        if count == 0 {
            st.shutdown_requested.store(true, Ordering::SeqCst);
            *st.received.lock().unwrap() = Some(sig);
            if let Some(wake) = st.wake.lock().unwrap().as_ref() {
                wake();
            }
            tracing::info!(signal = sig.name(), "shutdown requested, draining current work");
        } else {
            tracing::warn!(signal = sig.name(), "second termination signal, forcing exit");
            process::exit(1);
        }
    }

    /// Simulate receipt of a termination signal without an actual OS
    /// signal. Used by tests and by callers that want to trigger shutdown
    /// programmatically (e.g. an admin command).
    pub fn request(sig: Signal) {
        Lifecycle::handle_signal(sig);
    }

    pub fn shutdown_requested() -> bool {
        state().shutdown_requested.load(Ordering::SeqCst)
    }

    pub fn received_signal() -> Option<Signal> {
        *state().received.lock().unwrap()
    }

    /// Append a shutdown handler. `run_shutdown_handlers` invokes these in
    /// LIFO order, so the most recently registered resource is torn down
    /// first.
    pub fn on_shutdown(handler: impl FnMut() -> Result<(), String> + Send + 'static) {
        state().handlers.lock().unwrap().push(Box::new(handler));
    }

    /// Run all registered shutdown handlers in LIFO order. A handler
    /// returning `Err` is logged and does not stop the remaining handlers
    /// from running.
    pub fn run_shutdown_handlers() {
        let mut handlers = state().handlers.lock().unwrap();
        while let Some(mut handler) = handlers.pop() {
            if let Err(reason) = handler() {
                tracing::warn!(reason, "shutdown handler failed, continuing");
            }
        }
    }

    /// Set (or clear, with `None`) the callback invoked when the first
    /// termination signal arrives — typically used to wake a sleeping
    /// watcher thread blocked on a condvar or channel recv.
    pub fn on_wake(cb: Option<impl Fn() + Send + Sync + 'static>) {
        *state().wake.lock().unwrap() = cb.map(|f| Box::new(f) as WakeCallback);
    }

    /// Reset mutable state for tests. Does not un-register the OS signal
    /// handlers themselves (the underlying `signal_hook` registration is
    /// permanent for the process) — only the flags, recorded signal,
    /// handler list and wake callback are cleared.
    pub fn reset() {
        let st = state();
        st.shutdown_requested.store(false, Ordering::SeqCst);
        st.signal_count.store(0, Ordering::SeqCst);
        *st.received.lock().unwrap() = None;
        st.handlers.lock().unwrap().clear();
        *st.wake.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    #[test]
    fn first_signal_sets_requested_and_records_it() {
        Lifecycle::reset();
        assert!(!Lifecycle::shutdown_requested());

        Lifecycle::request(Signal::Interrupt);

        assert!(Lifecycle::shutdown_requested());
        assert_eq!(Lifecycle::received_signal(), Some(Signal::Interrupt));
        Lifecycle::reset();
    }

    #[test]
    fn wake_callback_fires_on_first_signal() {
        Lifecycle::reset();
        let woken = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&woken);
        Lifecycle::on_wake(Some(move || flag.store(true, Ordering::SeqCst)));

        Lifecycle::request(Signal::Terminate);

        assert!(woken.load(Ordering::SeqCst));
        Lifecycle::reset();
    }

    #[test]
    fn shutdown_handlers_run_in_lifo_order() {
        Lifecycle::reset();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = Arc::clone(&order);
        Lifecycle::on_shutdown(move || {
            o1.lock().unwrap().push(1);
            Ok(())
        });
        let o2 = Arc::clone(&order);
        Lifecycle::on_shutdown(move || {
            o2.lock().unwrap().push(2);
            Ok(())
        });
        let o3 = Arc::clone(&order);
        Lifecycle::on_shutdown(move || {
            o3.lock().unwrap().push(3);
            Ok(())
        });

        Lifecycle::run_shutdown_handlers();

        assert_eq!(*order.lock().unwrap(), vec![3, 2, 1]);
        Lifecycle::reset();
    }

    #[test]
    fn a_failing_handler_does_not_block_the_rest() {
        Lifecycle::reset();
        let ran = Arc::new(AtomicU32::new(0));

        let r1 = Arc::clone(&ran);
        Lifecycle::on_shutdown(move || {
            r1.fetch_add(1, Ordering::SeqCst);
            Err("boom".to_string())
        });
        let r2 = Arc::clone(&ran);
        Lifecycle::on_shutdown(move || {
            r2.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        Lifecycle::run_shutdown_handlers();

        assert_eq!(ran.load(Ordering::SeqCst), 2);
        Lifecycle::reset();
    }

    #[test]
    fn reset_clears_handlers_and_wake_callback() {
        Lifecycle::reset();
        Lifecycle::on_shutdown(|| Ok(()));
        Lifecycle::on_wake(Some(|| {}));
        Lifecycle::request(Signal::Interrupt);

        Lifecycle::reset();

        assert!(!Lifecycle::shutdown_requested());
        assert_eq!(Lifecycle::received_signal(), None);
    }
}
