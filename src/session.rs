//! Run generations
//!
//! Every submission takes a [`RunTicket`] from the caller's [`RunCoordinator`].
//! Taking a new ticket supersedes all earlier ones, which lets an in-flight run
//! notice that its results are stale and drop them instead of reporting.

use tokio::sync::watch;

/// Hands out run tickets for one caller (a CLI session, a web client, ...)
#[derive(Debug)]
pub struct RunCoordinator {
    latest: watch::Sender<u64>,
}

impl Default for RunCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RunCoordinator {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(0);
        Self { latest }
    }

    /// Start a new run, superseding every ticket issued before
    pub fn begin(&self) -> RunTicket {
        let mut generation = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            generation = *latest;
        });
        log::debug!("Starting run generation {}", generation);

        RunTicket {
            generation,
            latest: self.latest.subscribe(),
        }
    }

    /// Generation of the most recently started run
    pub fn current(&self) -> u64 {
        *self.latest.borrow()
    }
}

/// Identifies one run; becomes stale once a newer run starts
#[derive(Debug, Clone)]
pub struct RunTicket {
    generation: u64,
    latest: watch::Receiver<u64>,
}

impl RunTicket {
    /// A ticket that can never be superseded
    pub fn detached() -> Self {
        let (_, latest) = watch::channel(0);
        Self {
            generation: 0,
            latest,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        *self.latest.borrow() == self.generation
    }

    /// Completes once a newer run has started
    pub async fn superseded(&mut self) {
        loop {
            if *self.latest.borrow_and_update() != self.generation {
                return;
            }
            if self.latest.changed().await.is_err() {
                // Coordinator is gone, nothing can supersede this run anymore
                std::future::pending::<()>().await;
            }
        }
    }
}
