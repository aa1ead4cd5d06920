//! scheduler/queue.rs
//! Named FIFO queues drained by a fixed pool of worker threads.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::constants::queue_names::{DECRYPTION_QUEUE, ENCRYPTION_QUEUE};
use crate::crypto::CipherKey;
use crate::scheduler::completion::{Completion, JobResult};
use crate::scheduler::job::CipherJob;
use crate::stream::{InputSource, OutputSink, PipelineConfig};
use crate::types::{CipherError, Direction};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Queue configuration
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub name: String,
    pub workers: usize,
    pub pipeline: PipelineConfig,
}

impl QueueConfig {
    /// One worker: jobs run strictly in submission order.
    pub fn serial(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workers: 1,
            pipeline: PipelineConfig::default(),
        }
    }

    /// Size the pool from the machine, leaving one core free.
    pub fn dynamic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workers: num_cpus::get().saturating_sub(1).max(1),
            pipeline: PipelineConfig::default(),
        }
    }
}

pub struct CipherQueue {
    name: String,
    pipeline: PipelineConfig,
    tx: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl CipherQueue {
    pub fn new(config: QueueConfig) -> io::Result<Self> {
        let (tx, rx) = unbounded::<Task>();
        let worker_count = config.workers.max(1);

        let mut workers = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let rx: Receiver<Task> = rx.clone();
            let handle = thread::Builder::new()
                .name(format!("{}-{i}", config.name))
                .spawn(move || {
                    while let Ok(task) = rx.recv() {
                        task();
                    }
                })?;
            workers.push(handle);
        }
        debug!(queue = %config.name, workers = worker_count, "[QUEUE] started");

        Ok(Self {
            name: config.name,
            pipeline: config.pipeline,
            tx: Some(tx),
            workers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue `job`; the returned completion resolves exactly once.
    pub fn submit(&self, job: CipherJob) -> Completion {
        let (tx, completion) = Completion::channel();
        self.submit_with(job, move |result| {
            // The caller may have dropped its completion; nothing to deliver then.
            let _ = tx.send(result);
        });
        completion
    }

    /// Queue `job` and hand its result to `callback` on the worker thread.
    pub fn submit_with<F>(&self, job: CipherJob, callback: F)
    where
        F: FnOnce(JobResult) + Send + 'static,
    {
        let queue = self.name.clone();
        let pipeline = self.pipeline;
        let label = job.label();

        let task: Task = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| job.run(&pipeline)))
                .unwrap_or_else(|_| {
                    Err(CipherError::TransformFailed(format!("{label} job panicked")))
                });
            match &result {
                Ok(snap) => debug!(%queue, job = label, bytes = snap.bytes_written, "[QUEUE] job done"),
                Err(e) => warn!(%queue, job = label, kind = %e.kind(), "[QUEUE] job failed: {e}"),
            }
            // callback panics stay inside this task; the worker keeps draining
            if panic::catch_unwind(AssertUnwindSafe(|| callback(result))).is_err() {
                warn!(%queue, job = label, "[QUEUE] completion callback panicked");
            }
        });

        if let Some(tx) = &self.tx {
            if tx.send(task).is_err() {
                warn!(queue = %self.name, job = label, "[QUEUE] closed, job dropped");
            }
        }
    }
}

impl Drop for CipherQueue {
    /// Close the queue, let workers drain what was already submitted, join them.
    fn drop(&mut self) {
        drop(self.tx.take());
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!(queue = %self.name, "[QUEUE] worker exited by panic");
            }
        }
        debug!(queue = %self.name, "[QUEUE] stopped");
    }
}

/// The conventional pair: encryption jobs on one queue, decryption on the other.
pub struct CipherQueues {
    pub encryption: CipherQueue,
    pub decryption: CipherQueue,
}

impl CipherQueues {
    pub fn new() -> io::Result<Self> {
        Self::with_configs(
            QueueConfig::dynamic(ENCRYPTION_QUEUE),
            QueueConfig::dynamic(DECRYPTION_QUEUE),
        )
    }

    pub fn with_configs(encryption: QueueConfig, decryption: QueueConfig) -> io::Result<Self> {
        Ok(Self {
            encryption: CipherQueue::new(encryption)?,
            decryption: CipherQueue::new(decryption)?,
        })
    }

    /// Route by direction.
    pub fn submit(&self, job: CipherJob) -> Completion {
        match job.direction() {
            Direction::Encrypt => self.encryption.submit(job),
            Direction::Decrypt => self.decryption.submit(job),
        }
    }

    pub fn encrypt_file(
        &self,
        plain_path: impl Into<PathBuf>,
        encrypted_path: impl Into<PathBuf>,
        key: CipherKey,
        iv: Vec<u8>,
    ) -> Completion {
        self.submit(CipherJob::Encrypt {
            input: InputSource::File(plain_path.into()),
            output: OutputSink::File(encrypted_path.into()),
            key,
            iv,
        })
    }

    pub fn decrypt_file(
        &self,
        encrypted_path: impl Into<PathBuf>,
        plain_path: impl Into<PathBuf>,
        key: CipherKey,
        iv: Vec<u8>,
    ) -> Completion {
        self.submit(CipherJob::Decrypt {
            input: InputSource::File(encrypted_path.into()),
            output: OutputSink::File(plain_path.into()),
            key,
            iv,
        })
    }

    pub fn encrypt_file_to_chunks(
        &self,
        plain_path: impl Into<PathBuf>,
        chunk_paths: Vec<PathBuf>,
        key: CipherKey,
        iv: Vec<u8>,
        chunk_size: i64,
    ) -> Completion {
        self.submit(CipherJob::EncryptToChunks {
            input: InputSource::File(plain_path.into()),
            outputs: chunk_paths.into_iter().map(OutputSink::File).collect(),
            key,
            iv,
            chunk_size,
        })
    }
}
