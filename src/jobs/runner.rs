use std::{sync::Arc, thread::JoinHandle};

use anyhow::Context;

use crate::{
    assets::{
        decode::{output_extension, output_format, sniff_format},
        store::AssetStore,
    },
    composite::engine::{CompositeOptions, composite},
    config::Config,
    foundation::error::{MockpressError, MockpressResult},
    naming::output_file_name,
    store::{
        api::Stores,
        model::{CompositeTask, DesignId, Job, JobId, JobStatus, MockupId, TaskStatus},
    },
};

/// Where outputs go and how they are rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct RunnerSettings {
    /// Output directory relative to the asset root; each job writes into `{outputs_dir}/{job_id}/`.
    pub outputs_dir: String,
    pub composite: CompositeOptions,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            outputs_dir: "outputs".to_owned(),
            composite: CompositeOptions::default(),
        }
    }
}

impl From<&Config> for RunnerSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            outputs_dir: cfg.outputs_dir.clone(),
            composite: cfg.composite_options(),
        }
    }
}

/// Expands (mockups x designs) into composite tasks and processes them.
///
/// Cloning is cheap; clones share the same stores.
#[derive(Clone)]
pub struct JobRunner {
    inner: Arc<Inner>,
}

struct Inner {
    stores: Stores,
    assets: Arc<dyn AssetStore>,
    settings: RunnerSettings,
}

/// A job processing on its own thread.
#[derive(Debug)]
pub struct JobHandle {
    job_id: JobId,
    thread: JoinHandle<MockpressResult<Job>>,
}

impl JobHandle {
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until processing ends and return the final job record.
    pub fn wait(self) -> MockpressResult<Job> {
        let job_id = self.job_id;
        self.thread
            .join()
            .map_err(|_| MockpressError::store(format!("worker for job {job_id} panicked")))?
    }
}

impl JobRunner {
    pub fn new(stores: Stores, assets: Arc<dyn AssetStore>, settings: RunnerSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                stores,
                assets,
                settings,
            }),
        }
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.inner.settings
    }

    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Create a pending job for every (mockup, design) pair and start it in the background.
    ///
    /// Empty id lists and unknown ids are rejected before anything is created.
    pub fn create_job(
        &self,
        mockup_ids: &[MockupId],
        design_ids: &[DesignId],
    ) -> MockpressResult<JobHandle> {
        let job = self.create_pending(mockup_ids, design_ids)?;
        let job_id = job.id;

        let runner = self.clone();
        let thread = std::thread::Builder::new()
            .name(format!("mockpress-job-{job_id}"))
            .spawn(move || runner.process_job(job_id))
            .context("spawn job worker thread")?;
        Ok(JobHandle { job_id, thread })
    }

    /// Validate ids and persist the pending job without processing it.
    pub fn create_pending(
        &self,
        mockup_ids: &[MockupId],
        design_ids: &[DesignId],
    ) -> MockpressResult<Job> {
        if mockup_ids.is_empty() {
            return Err(MockpressError::validation("at least one mockup id is required"));
        }
        if design_ids.is_empty() {
            return Err(MockpressError::validation("at least one design id is required"));
        }
        let stores = &self.inner.stores;
        for id in mockup_ids {
            stores.mockups.get_mockup(*id)?;
        }
        for id in design_ids {
            stores.designs.get_design(*id)?;
        }

        let job = stores.jobs.create_job(mockup_ids, design_ids)?;
        tracing::info!(job = %job.id, tasks = job.tasks.len(), "created job");
        Ok(job)
    }

    /// Run every task of `job_id` in order and return the final job record.
    ///
    /// Task failures are recorded on the task and never abort the job. Errors from the
    /// stores themselves mark the job `failed` and are returned.
    #[tracing::instrument(skip(self))]
    pub fn process_job(&self, job_id: JobId) -> MockpressResult<Job> {
        let jobs = &self.inner.stores.jobs;
        let job = jobs.get_job(job_id)?;
        jobs.update_job_status(job_id, JobStatus::Processing)?;

        if let Err(e) = self.run_tasks(&job) {
            tracing::error!(error = %e, "job failed");
            if let Err(mark) = jobs.update_job_status(job_id, JobStatus::Failed) {
                tracing::warn!(error = %mark, "could not mark job failed");
            }
            return Err(e);
        }

        let done = jobs.get_job(job_id)?;
        if done.all_tasks_terminal() {
            jobs.update_job_status(job_id, JobStatus::Completed)?;
        }
        let done = jobs.get_job(job_id)?;
        tracing::info!(
            status = ?done.status,
            completed = done.count(TaskStatus::Completed),
            failed = done.count(TaskStatus::Failed),
            "job finished"
        );
        Ok(done)
    }

    fn run_tasks(&self, job: &Job) -> MockpressResult<()> {
        let jobs = &self.inner.stores.jobs;
        for task in &job.tasks {
            jobs.update_task_status(task.id, TaskStatus::Processing, None, None)?;
            match self.run_task(job.id, task) {
                Ok(url) => {
                    tracing::debug!(task = %task.id, %url, "task completed");
                    jobs.update_task_status(task.id, TaskStatus::Completed, Some(url), None)?;
                }
                Err(e) => {
                    tracing::warn!(task = %task.id, error = %e, "task failed");
                    jobs.update_task_status(task.id, TaskStatus::Failed, None, Some(e.to_string()))?;
                }
            }
        }
        Ok(())
    }

    fn run_task(&self, job_id: JobId, task: &CompositeTask) -> MockpressResult<String> {
        let Inner {
            stores,
            assets,
            settings,
        } = &*self.inner;

        let mockup = stores.mockups.get_mockup(task.mockup_id)?;
        let design = stores.designs.get_design(task.design_id)?;
        let mockup_path = assets.resolve(&mockup.image_url)?;
        let design_path = assets.resolve(&design.image_url)?;
        for (role, path) in [("mockup", &mockup_path), ("design", &design_path)] {
            if !assets.exists(path) {
                return Err(MockpressError::not_found(format!(
                    "{role} file not found: {}",
                    path.display()
                )));
            }
        }

        let format = output_format(sniff_format(&assets.read(&mockup_path)?));
        let file = output_file_name(
            &mockup.name,
            &design.name,
            &task.id.to_string(),
            output_extension(format),
        );
        let url = assets.url_for(&format!("{}/{job_id}/{file}", settings.outputs_dir))?;
        let out_path = assets.resolve(&url)?;

        composite(
            &**assets,
            &mockup_path,
            &design_path,
            &mockup.design_area,
            &out_path,
            &settings.composite,
        )?;
        Ok(url)
    }
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/runner.rs"]
mod tests;
