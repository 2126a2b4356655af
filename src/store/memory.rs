use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use anyhow::Context;
use chrono::Utc;

use crate::{
    foundation::error::{MockpressError, MockpressResult},
    geometry::normalize::NormalizedRect,
    store::{
        api::{DesignStore, JobStore, MockupStore},
        model::{
            Design, DesignId, Job, JobId, JobStatus, Mockup, MockupId, TaskId, TaskStatus,
        },
    },
};

/// In-process persistence handle implementing every store trait.
///
/// Constructed explicitly and shut down with [`MemoryStore::close`]. With a snapshot path
/// the full state is loaded from JSON on [`open`](MemoryStore::open) and written back by
/// [`flush`](MemoryStore::flush) and `close`.
#[derive(Debug)]
pub struct MemoryStore {
    snapshot_path: Option<PathBuf>,
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    closed: bool,
    mockups: HashMap<MockupId, Mockup>,
    designs: HashMap<DesignId, Design>,
    jobs: HashMap<JobId, Job>,
    task_jobs: HashMap<TaskId, JobId>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct Snapshot {
    #[serde(default)]
    mockups: Vec<Mockup>,
    #[serde(default)]
    designs: Vec<Design>,
    #[serde(default)]
    jobs: Vec<Job>,
}

impl State {
    fn from_snapshot(s: Snapshot) -> Self {
        let mut state = Self::default();
        for m in s.mockups {
            state.mockups.insert(m.id, m);
        }
        for d in s.designs {
            state.designs.insert(d.id, d);
        }
        for j in s.jobs {
            state.insert_job(j);
        }
        state
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            mockups: newest_first(self.mockups.values().cloned().collect(), |m: &Mockup| m.created_at),
            designs: newest_first(self.designs.values().cloned().collect(), |d: &Design| d.created_at),
            jobs: newest_first(self.jobs.values().cloned().collect(), |j: &Job| j.created_at),
        }
    }

    fn insert_job(&mut self, job: Job) {
        for t in &job.tasks {
            self.task_jobs.insert(t.id, job.id);
        }
        self.jobs.insert(job.id, job);
    }

    fn job_mut(&mut self, id: JobId) -> MockpressResult<&mut Job> {
        self.jobs
            .get_mut(&id)
            .ok_or_else(|| MockpressError::not_found(format!("job {id}")))
    }
}

fn newest_first<T>(mut items: Vec<T>, key: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}

impl MemoryStore {
    /// Volatile store with no snapshot file.
    pub fn in_memory() -> Self {
        Self {
            snapshot_path: None,
            state: RwLock::new(State::default()),
        }
    }

    /// Open a store persisted at `snapshot_path`, loading it when the file exists.
    pub fn open(snapshot_path: impl Into<PathBuf>) -> MockpressResult<Self> {
        let path = snapshot_path.into();
        let state = if path.is_file() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read store snapshot '{}'", path.display()))?;
            let snapshot: Snapshot = serde_json::from_str(&text)?;
            State::from_snapshot(snapshot)
        } else {
            State::default()
        };
        tracing::debug!(
            path = %path.display(),
            mockups = state.mockups.len(),
            designs = state.designs.len(),
            jobs = state.jobs.len(),
            "opened store"
        );
        Ok(Self {
            snapshot_path: Some(path),
            state: RwLock::new(state),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Write the current state to the snapshot file, if any.
    pub fn flush(&self) -> MockpressResult<()> {
        let state = self.read()?;
        self.write_snapshot(&state)
    }

    /// Flush and shut the handle down; every later call fails with a store error.
    pub fn close(&self) -> MockpressResult<()> {
        let mut state = self.write()?;
        self.write_snapshot(&state)?;
        state.closed = true;
        tracing::debug!("closed store");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().map(|s| s.closed).unwrap_or(true)
    }

    fn write_snapshot(&self, state: &State) -> MockpressResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(&state.to_snapshot())?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json).with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("replace store snapshot '{}'", path.display()))?;
        Ok(())
    }

    fn read(&self) -> MockpressResult<RwLockReadGuard<'_, State>> {
        let guard = self
            .state
            .read()
            .map_err(|_| MockpressError::store("store state lock poisoned"))?;
        if guard.closed {
            return Err(MockpressError::store("store is closed"));
        }
        Ok(guard)
    }

    fn write(&self) -> MockpressResult<RwLockWriteGuard<'_, State>> {
        let guard = self
            .state
            .write()
            .map_err(|_| MockpressError::store("store state lock poisoned"))?;
        if guard.closed {
            return Err(MockpressError::store("store is closed"));
        }
        Ok(guard)
    }
}

impl MockupStore for MemoryStore {
    fn insert_mockup(&self, mockup: Mockup) -> MockpressResult<()> {
        self.write()?.mockups.insert(mockup.id, mockup);
        Ok(())
    }

    fn get_mockup(&self, id: MockupId) -> MockpressResult<Mockup> {
        self.read()?
            .mockups
            .get(&id)
            .cloned()
            .ok_or_else(|| MockpressError::not_found(format!("mockup {id}")))
    }

    fn list_mockups(&self) -> MockpressResult<Vec<Mockup>> {
        let state = self.read()?;
        Ok(newest_first(state.mockups.values().cloned().collect(), |m: &Mockup| m.created_at))
    }

    fn update_area(&self, id: MockupId, area: NormalizedRect) -> MockpressResult<Mockup> {
        let mut state = self.write()?;
        let mockup = state
            .mockups
            .get_mut(&id)
            .ok_or_else(|| MockpressError::not_found(format!("mockup {id}")))?;
        mockup.design_area = area;
        Ok(mockup.clone())
    }

    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    fn batch_update_area(&self, ids: &[MockupId], area: NormalizedRect) -> MockpressResult<usize> {
        if ids.is_empty() {
            return Err(MockpressError::validation("at least one mockup id is required"));
        }
        let mut state = self.write()?;
        if let Some(missing) = ids.iter().find(|id| !state.mockups.contains_key(*id)) {
            return Err(MockpressError::not_found(format!("mockup {missing}")));
        }
        let mut updated = 0;
        for id in ids {
            if let Some(m) = state.mockups.get_mut(id) {
                m.design_area = area;
                updated += 1;
            }
        }
        tracing::debug!(updated, "applied design area");
        Ok(updated)
    }
}

impl DesignStore for MemoryStore {
    fn insert_design(&self, design: Design) -> MockpressResult<()> {
        self.write()?.designs.insert(design.id, design);
        Ok(())
    }

    fn get_design(&self, id: DesignId) -> MockpressResult<Design> {
        self.read()?
            .designs
            .get(&id)
            .cloned()
            .ok_or_else(|| MockpressError::not_found(format!("design {id}")))
    }

    fn list_designs(&self) -> MockpressResult<Vec<Design>> {
        let state = self.read()?;
        Ok(newest_first(state.designs.values().cloned().collect(), |d: &Design| d.created_at))
    }
}

impl JobStore for MemoryStore {
    fn create_job(&self, mockup_ids: &[MockupId], design_ids: &[DesignId]) -> MockpressResult<Job> {
        let job = Job::new(mockup_ids, design_ids);
        self.write()?.insert_job(job.clone());
        Ok(job)
    }

    fn get_job(&self, id: JobId) -> MockpressResult<Job> {
        self.read()?
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| MockpressError::not_found(format!("job {id}")))
    }

    fn list_jobs(&self) -> MockpressResult<Vec<Job>> {
        let state = self.read()?;
        Ok(newest_first(state.jobs.values().cloned().collect(), |j: &Job| j.created_at))
    }

    fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        output_url: Option<String>,
        error: Option<String>,
    ) -> MockpressResult<()> {
        let mut state = self.write()?;
        let job_id = *state
            .task_jobs
            .get(&task_id)
            .ok_or_else(|| MockpressError::not_found(format!("task {task_id}")))?;
        let job = state.job_mut(job_id)?;
        let task = job
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| MockpressError::store(format!("task {task_id} missing from job {job_id}")))?;
        task.status = status;
        task.output_url = output_url;
        task.error = error;
        job.updated_at = Utc::now();
        Ok(())
    }

    fn update_job_status(&self, id: JobId, status: JobStatus) -> MockpressResult<()> {
        let mut state = self.write()?;
        let job = state.job_mut(id)?;
        job.status = status;
        job.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/memory.rs"]
mod tests;
