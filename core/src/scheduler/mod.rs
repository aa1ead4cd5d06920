//! scheduler: named worker queues that run cipher jobs off the caller's thread.
//!
//! Each job owns its transform, buffer and chunk state; workers share nothing
//! but the job channel. Results come back exactly once through a `Completion`.

pub mod job;
pub mod completion;
pub mod queue;

pub use job::CipherJob;
pub use completion::Completion;
pub use queue::{CipherQueue, CipherQueues, QueueConfig};
