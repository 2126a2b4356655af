//! mockpress places artwork ("designs") onto product photos ("mockups").
//!
//! A mockup carries one rotatable design area stored as fractions of the image size, so
//! the placement drawn in an on-screen editor reproduces exactly at full resolution.
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: an on-screen [`PixelRect`] becomes a [`NormalizedRect`] ([`to_normalized`])
//! 2. **Edit**: [`AreaEditor`] drives drag/resize/rotate gestures and throttled commits
//! 3. **Composite**: [`composite`] fits the design into the area (contain), rotates it and
//!    blends it over the mockup
//! 4. **Batch**: [`JobRunner`] runs every (mockup, design) pair of a job with per-task
//!    failure isolation
//!
//! Pixels are premultiplied RGBA8 while resizing, rotating and blending, and straight
//! RGBA8 at the encode/decode boundary.
#![forbid(unsafe_code)]

mod assets;
mod composite;
mod config;
mod editor;
mod foundation;
mod geometry;
mod jobs;
mod store;

/// Upload and output file naming.
pub mod naming;

pub use assets::PreparedImage;
pub use assets::decode::{
    decode_image, encode_image, output_extension, output_format, probe_dimensions, sniff_format,
};
pub use assets::store::{AssetStore, FsAssetStore, normalize_rel_path};
pub use composite::blend::{PremulRgba8, over, over_image_at};
pub use composite::engine::{CompositeOptions, composite, composite_images};
pub use composite::transform::{ResizeFilter, resize_contain, rotate_expand};
pub use config::{CompositingConfig, Config, EditorConfig};
pub use editor::area_editor::{
    AreaCommit, AreaEditor, AreaField, AreaSink, Corner, DisplayValues, EditorMode,
    EditorSettings, Handle,
};
pub use editor::throttle::Throttle;
pub use foundation::core::{Affine, ImageSize, PixelRect, Point, Vec2};
pub use foundation::error::{MockpressError, MockpressResult};
pub use geometry::fit::{Placement, fit_contain};
pub use geometry::normalize::{
    AreaPayload, NormalizedRect, normalize_degrees, to_normalized, to_pixels,
};
pub use jobs::ingest::{ingest_design, ingest_mockup};
pub use jobs::runner::{JobHandle, JobRunner, RunnerSettings};
pub use store::api::{DesignStore, JobStore, MockupStore, Stores};
pub use store::memory::MemoryStore;
pub use store::model::{
    CompositeTask, Design, DesignId, Job, JobId, JobStatus, Mockup, MockupId, TaskId, TaskStatus,
};
