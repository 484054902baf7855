//! Real-time symbol delivery at the WSPR 683 ms cadence (§4.3).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::constants::{WSPR_SYMBOL_COUNT, WSPR_SYMBOL_PERIOD};

/// Drives a 162-symbol WSPR transmission with absolute-deadline sleeping so
/// cumulative drift is bounded by the timer's jitter alone, never by
/// accumulated scheduling overhead.
pub struct SymbolModulator {
    current_index: Arc<AtomicUsize>,
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl Default for SymbolModulator {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolModulator {
    pub fn new() -> Self {
        SymbolModulator {
            current_index: Arc::new(AtomicUsize::new(usize::MAX)),
            running: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Deliver all 162 symbols, invoking `on_symbol(i, symbols[i])` for each
    /// one, starting immediately and then every `WSPR_SYMBOL_PERIOD`
    /// thereafter measured from the first invocation's instant.
    pub fn start<F>(&mut self, symbols: [u8; WSPR_SYMBOL_COUNT], mut on_symbol: F)
    where
        F: FnMut(usize, u8) + Send + 'static,
    {
        self.stop();
        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let current_index = self.current_index.clone();

        let task = tokio::spawn(async move {
            let mut next_wake = Instant::now();
            for (i, &symbol) in symbols.iter().enumerate() {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                if i > 0 {
                    next_wake += WSPR_SYMBOL_PERIOD;
                    sleep_until(next_wake).await;
                }
                current_index.store(i, Ordering::SeqCst);
                on_symbol(i, symbol);
            }
            running.store(false, Ordering::SeqCst);
            current_index.store(usize::MAX, Ordering::SeqCst);
        });
        self.task = Some(task);
    }

    /// Cancel the worker. Idempotent; a no-op if no transmission is active.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.current_index.store(usize::MAX, Ordering::SeqCst);
    }

    pub fn current_symbol_index(&self) -> Option<usize> {
        match self.current_index.load(Ordering::SeqCst) {
            usize::MAX => None,
            i => Some(i),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
