//! In-memory keyed job store.

use std::collections::HashMap;

use crate::message::JobId;

use super::job::{Job, JobUpdate};

/// Keyed, mergeable state for in-flight jobs.
///
/// Owned by a single consumer (the live client loop); every mutation runs to
/// completion before the returned snapshot is handed out.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: HashMap<JobId, Job>,
    next_seq: u64,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_mut(&mut self, id: &str) -> &mut Job {
        let seq = self.next_seq;
        let job = self
            .jobs
            .entry(id.to_string())
            .or_insert_with(|| Job::new(id.to_string(), seq));
        if job.seq == seq {
            self.next_seq += 1;
        }
        job
    }

    /// Merge `update` into the job `id`, creating it with defaults if unseen.
    /// Returns the full job after the merge.
    pub fn upsert(&mut self, id: &str, update: JobUpdate) -> Job {
        let job = self.entry_mut(id);
        job.apply(update);
        job.clone()
    }

    /// Put `text` at the front of the job's status log (newest first).
    pub fn append_status(&mut self, id: &str, text: impl Into<String>) -> Job {
        let job = self.entry_mut(id);
        job.status_log.push_front(text.into());
        job.last_updated = std::time::SystemTime::now();
        job.clone()
    }

    /// Delete a job. Removing an unknown id is a no-op; returns whether a job
    /// was actually removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.jobs.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Snapshot of all jobs in first-seen order.
    pub fn all(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.values().cloned().collect();
        jobs.sort_by_key(|j| j.seq);
        jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
