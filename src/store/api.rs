use std::sync::Arc;

use crate::{
    foundation::error::MockpressResult,
    geometry::normalize::NormalizedRect,
    store::model::{
        Design, DesignId, Job, JobId, JobStatus, Mockup, MockupId, TaskId, TaskStatus,
    },
};

/// Persistence for mockups and their design areas.
///
/// Area writes are last-write-wins; there is no version check.
pub trait MockupStore: Send + Sync {
    fn insert_mockup(&self, mockup: Mockup) -> MockpressResult<()>;

    /// Fails with `NotFound` for unknown ids.
    fn get_mockup(&self, id: MockupId) -> MockpressResult<Mockup>;

    /// All mockups, newest first.
    fn list_mockups(&self) -> MockpressResult<Vec<Mockup>>;

    fn update_area(&self, id: MockupId, area: NormalizedRect) -> MockpressResult<Mockup>;

    /// Assign the identical `area` to every id in one logical operation.
    ///
    /// Either every mockup is updated or, when any id is unknown, none is. Returns the
    /// number of mockups updated.
    fn batch_update_area(&self, ids: &[MockupId], area: NormalizedRect) -> MockpressResult<usize>;
}

pub trait DesignStore: Send + Sync {
    fn insert_design(&self, design: Design) -> MockpressResult<()>;

    fn get_design(&self, id: DesignId) -> MockpressResult<Design>;

    /// All designs, newest first.
    fn list_designs(&self) -> MockpressResult<Vec<Design>>;
}

pub trait JobStore: Send + Sync {
    /// Persist a pending job with one pending task per (mockup, design) pair.
    fn create_job(&self, mockup_ids: &[MockupId], design_ids: &[DesignId]) -> MockpressResult<Job>;

    fn get_job(&self, id: JobId) -> MockpressResult<Job>;

    fn list_jobs(&self) -> MockpressResult<Vec<Job>>;

    /// Record a task transition. `output_url` and `error` replace the stored values.
    fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        output_url: Option<String>,
        error: Option<String>,
    ) -> MockpressResult<()>;

    fn update_job_status(&self, id: JobId, status: JobStatus) -> MockpressResult<()>;
}

/// The store handles a [`JobRunner`](crate::JobRunner) works against.
#[derive(Clone)]
pub struct Stores {
    pub mockups: Arc<dyn MockupStore>,
    pub designs: Arc<dyn DesignStore>,
    pub jobs: Arc<dyn JobStore>,
}

impl Stores {
    /// Use one backend for all three concerns.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: MockupStore + DesignStore + JobStore + 'static,
    {
        Self {
            mockups: store.clone(),
            designs: store.clone(),
            jobs: store,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
