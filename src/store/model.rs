use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    foundation::error::{MockpressError, MockpressResult},
    geometry::normalize::NormalizedRect,
};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random (v4) id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = MockpressError;

            fn from_str(s: &str) -> MockpressResult<Self> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|e| {
                    MockpressError::validation(format!(
                        "invalid {} '{s}': {e}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Mockup`].
    MockupId
);
entity_id!(
    /// Identifies a [`Design`].
    DesignId
);
entity_id!(
    /// Identifies a [`Job`].
    JobId
);
entity_id!(
    /// Identifies a [`CompositeTask`] within its job.
    TaskId
);

/// Base image with its persisted design area.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mockup {
    pub id: MockupId,
    pub name: String,
    pub image_url: String,
    pub design_area: NormalizedRect,
    pub created_at: DateTime<Utc>,
}

impl Mockup {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: MockupId::new(),
            name: name.into(),
            image_url: image_url.into(),
            design_area: NormalizedRect::DEFAULT,
            created_at: Utc::now(),
        }
    }
}

/// Artwork placed onto mockups. Immutable once uploaded.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Design {
    pub id: DesignId,
    pub name: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Design {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: DesignId::new(),
            name: name.into(),
            image_url: image_url.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    /// Job-level infrastructure failure; individual task failures never set this.
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One (mockup, design) pair of a job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositeTask {
    pub id: TaskId,
    pub mockup_id: MockupId,
    pub design_id: DesignId,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    /// Failure reason of a `failed` task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompositeTask {
    pub fn new(mockup_id: MockupId, design_id: DesignId) -> Self {
        Self {
            id: TaskId::new(),
            mockup_id,
            design_id,
            status: TaskStatus::Pending,
            output_url: None,
            error: None,
        }
    }
}

/// Ordered set of composite tasks created together.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub tasks: Vec<CompositeTask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Pending job holding one pending task per (mockup, design) pair, mockup-major.
    pub fn new(mockup_ids: &[MockupId], design_ids: &[DesignId]) -> Self {
        let tasks = mockup_ids
            .iter()
            .flat_map(|&m| design_ids.iter().map(move |&d| CompositeTask::new(m, d)))
            .collect();
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            tasks,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// `true` once every task reached `completed` or `failed`.
    pub fn all_tasks_terminal(&self) -> bool {
        self.tasks.iter().all(|t| t.status.is_terminal())
    }

    pub fn task(&self, id: TaskId) -> Option<&CompositeTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Output urls of completed tasks, in task order.
    pub fn completed_outputs(&self) -> impl Iterator<Item = &str> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .filter_map(|t| t.output_url.as_deref())
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/model.rs"]
mod tests;
