//! Asynchronous job execution for Monte Carlo and economics runs
//!
//! `submit` returns immediately with a `Queued` record; a dispatcher task
//! receives the work order over a channel and spawns one task per job. Job
//! state lives in a shared registry, not in any JoinHandle, so callers poll
//! `get_status` by id and nothing is lost if the submit-side handle is
//! dropped.

pub mod runner;

pub use runner::{JobError, JobPayload, JobRunner};
