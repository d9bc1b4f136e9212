// Background persistence: layouts are handed to a worker thread over a
// channel so saving never blocks the interaction thread. Results come back
// over a second channel and are drained with `poll`.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gridboard_core::{LayoutStore, PersistedLayout, StoreError};

pub struct PersistWorker {
    tx: Option<mpsc::Sender<PersistedLayout>>,
    results: mpsc::Receiver<Result<(), StoreError>>,
    handle: Option<JoinHandle<()>>,
    /// Saves submitted whose result has not been drained yet.
    in_flight: usize,
}

impl PersistWorker {
    pub fn spawn(store: Box<dyn LayoutStore>) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<PersistedLayout>();
        let (result_tx, results) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("gridboard-persist".into())
            .spawn(move || {
                let mut store = store;
                for layout in rx {
                    let result = store.save(&layout);
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            results,
            handle: Some(handle),
            in_flight: 0,
        })
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Queue a save. Returns false if the worker has gone away.
    pub fn submit(&mut self, layout: PersistedLayout) -> bool {
        let Some(tx) = self.tx.as_ref() else {
            return false;
        };
        if tx.send(layout).is_err() {
            log::error!("persistence worker is gone; layout not queued");
            return false;
        }
        self.in_flight += 1;
        true
    }

    /// Results that are ready now, without blocking.
    pub fn poll(&mut self) -> Vec<Result<(), StoreError>> {
        let mut out = Vec::new();
        while let Ok(result) = self.results.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            out.push(result);
        }
        out
    }

    /// Block until every submitted save has reported back or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Vec<Result<(), StoreError>> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.results.recv_timeout(remaining) {
                Ok(result) => {
                    self.in_flight -= 1;
                    out.push(result);
                }
                Err(_) => break,
            }
        }
        out
    }
}

impl Drop for PersistWorker {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish queued saves and exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("persistence worker panicked");
            }
        }
    }
}
