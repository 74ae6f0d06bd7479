use flume::{Receiver, Sender, TrySendError};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

const MAX_WORKERS: usize = 4;
const QUEUE_DEPTH: usize = 4;

/// Fixed set of background threads running cache writes.
///
/// Submission never blocks. When the queue is full the oldest pending job is
/// discarded to make room and counted in [`dropped`](Self::dropped).
pub struct WritePool {
    sender: Sender<Job>,
    // Second handle on the queue, used only to discard the oldest job.
    evictor: Receiver<Job>,
    dropped: AtomicU64,
    workers: usize,
    capacity: usize,
}

impl WritePool {
    /// Process-wide pool: `min(available_parallelism / 4 + 1, 4)` workers and a
    /// queue of depth 4.
    pub fn global() -> &'static WritePool {
        static POOL: OnceLock<WritePool> = OnceLock::new();
        POOL.get_or_init(|| WritePool::with_workers(default_workers(), QUEUE_DEPTH))
    }

    pub fn with_workers(workers: usize, capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded::<Job>(capacity.max(1));
        let mut spawned = 0;
        for n in 0..workers.max(1) {
            let receiver = receiver.clone();
            let result = thread::Builder::new()
                .name(format!("qforge-cache-{}", n + 1))
                .spawn(move || run_worker(receiver));
            match result {
                Ok(_) => spawned += 1,
                Err(e) => {
                    tracing::error!(target: "qforge.cache", error = %e, "failed to spawn cache worker");
                }
            }
        }
        tracing::debug!(target: "qforge.cache", workers = spawned, capacity, "cache write pool started");
        Self {
            sender,
            evictor: receiver,
            dropped: AtomicU64::new(0),
            workers: spawned,
            capacity: capacity.max(1),
        }
    }

    /// Queue `job`, discarding the oldest pending job if the queue is full.
    ///
    /// Returns `false` if the queue has been closed.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut job: Job = Box::new(job);
        loop {
            match self.sender.try_send(job) {
                Ok(()) => return true,
                Err(TrySendError::Full(rejected)) => {
                    job = rejected;
                    if self.evictor.try_recv().is_ok() {
                        let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        tracing::debug!(target: "qforge.cache", dropped, "discarded oldest cache write");
                    }
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }

    /// Jobs discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Jobs waiting for a worker.
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

impl std::fmt::Debug for WritePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritePool")
            .field("workers", &self.workers)
            .field("capacity", &self.capacity)
            .field("pending", &self.pending())
            .field("dropped", &self.dropped())
            .finish()
    }
}

fn run_worker(receiver: Receiver<Job>) {
    while let Ok(job) = receiver.recv() {
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!(target: "qforge.cache", "cache write panicked");
        }
    }
}

pub(crate) fn default_workers() -> usize {
    let cpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    (cpus / 4 + 1).min(MAX_WORKERS)
}
