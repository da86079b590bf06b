use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::Settings;
use crate::error::Result;
use crate::router::Route;
use crate::source::DataSource;
use crate::views::{self, View};

/// A finished background load, tagged with the navigation that asked for it
pub struct Loaded {
    pub generation: u64,
    pub route: Route,
    pub result: Result<View>,
}

/// Runs view builders off the UI thread and hands results back over a channel
pub struct Loader {
    source: Arc<dyn DataSource>,
    settings: Arc<Settings>,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
}

impl Loader {
    pub fn new(source: Arc<dyn DataSource>, settings: Settings) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            settings: Arc::new(settings),
            tx,
            rx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build `route` on its own thread. Loads block on the network, so they
    /// stay off the rayon pool; the builders still fan out on it.
    pub fn spawn(&self, generation: u64, route: Route) {
        let source = Arc::clone(&self.source);
        let settings = Arc::clone(&self.settings);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("load-{generation}"))
            .spawn(move || {
                let started = Instant::now();
                let result = views::build(source.as_ref(), &route, &settings);
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match &result {
                    Ok(_) => info!(generation, %route, elapsed_ms, "view loaded"),
                    Err(e) => error!(generation, %route, elapsed_ms, error = %e, "view failed"),
                }
                // The receiver is gone once the app has shut down
                let _ = tx.send(Loaded {
                    generation,
                    route,
                    result,
                });
            });
        if let Err(e) = spawned {
            error!(generation, error = %e, "failed to start load thread");
        }
    }

    pub fn try_recv(&self) -> Option<Loaded> {
        self.rx.try_recv().ok()
    }

    /// Block for the next result
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Loaded> {
        match self.rx.recv_timeout(timeout) {
            Ok(loaded) => Some(loaded),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
