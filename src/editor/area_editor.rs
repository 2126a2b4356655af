use std::time::{Duration, Instant};

use crate::{
    editor::throttle::Throttle,
    foundation::core::{ImageSize, PixelRect, Point},
    geometry::normalize::{NormalizedRect, normalize_degrees, to_normalized, to_pixels},
};

/// Corner handles of the design-area overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    /// The corner that stays fixed while this one is dragged.
    pub fn opposite(self) -> Self {
        match self {
            Self::Nw => Self::Se,
            Self::Ne => Self::Sw,
            Self::Sw => Self::Ne,
            Self::Se => Self::Nw,
        }
    }
}

/// What the pointer went down on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    Body,
    Corner(Corner),
    Rotate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Dragging,
    Resizing(Corner),
    Rotating,
}

/// Numeric entry fields next to the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaField {
    X,
    Y,
    Width,
    Height,
    Rotation,
}

/// Rounded values shown in the numeric entry fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayValues {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub rotation: i64,
}

/// Tunables for pointer interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorSettings {
    /// Smallest width/height a corner drag may produce, in display pixels.
    pub min_size_px: f64,
    /// Minimum wall-clock spacing between commits during a gesture.
    pub commit_interval: Duration,
    /// Pick radius around corner and rotation handles.
    pub handle_radius_px: f64,
    /// Distance of the rotation handle above the top edge center.
    pub rotation_handle_offset_px: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            min_size_px: 50.0,
            commit_interval: Duration::from_millis(50),
            handle_radius_px: 8.0,
            rotation_handle_offset_px: 32.0,
        }
    }
}

/// Value handed to the owning application whenever the area should be persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaCommit {
    pub area: NormalizedRect,
    pub pixels: PixelRect,
    pub image_size: ImageSize,
}

/// Receiver of committed design areas (typically a store update round-trip).
pub trait AreaSink {
    fn commit(&mut self, commit: &AreaCommit);
}

impl<F: FnMut(&AreaCommit)> AreaSink for F {
    fn commit(&mut self, commit: &AreaCommit) {
        self(commit)
    }
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    pointer: Point,
    start: PixelRect,
    start_angle: f64,
}

/// Pointer-driven editor for one mockup's design area.
///
/// The overlay rectangle (`pixels`) is recomputed synchronously on every pointer move;
/// commits to the sink are throttled to `commit_interval`, and pointer-up always
/// delivers the final state. Until the rendered image size is known every operation
/// is a no-op and the normalized area is kept as loaded.
pub struct AreaEditor<S: AreaSink> {
    settings: EditorSettings,
    image_size: ImageSize,
    area: NormalizedRect,
    pixels: Option<PixelRect>,
    mode: EditorMode,
    gesture: Option<Gesture>,
    throttle: Throttle<AreaCommit>,
    sink: S,
}

impl<S: AreaSink> AreaEditor<S> {
    pub fn new(area: NormalizedRect, settings: EditorSettings, sink: S) -> Self {
        Self {
            settings,
            image_size: ImageSize::UNKNOWN,
            area,
            pixels: None,
            mode: EditorMode::Idle,
            gesture: None,
            throttle: Throttle::new(settings.commit_interval),
            sink,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Latest normalized area (the draft while a gesture is in progress).
    pub fn area(&self) -> NormalizedRect {
        self.area
    }

    /// Overlay rectangle in display pixels, once the image size is known.
    pub fn pixels(&self) -> Option<PixelRect> {
        self.pixels
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The rendered image size changed (first load or layout change).
    ///
    /// Pixels are re-derived from the normalized area. A gesture in progress ends here
    /// and its buffered state is committed.
    pub fn set_image_size(&mut self, size: ImageSize) {
        if self.mode != EditorMode::Idle {
            self.finish_gesture(Instant::now());
        }
        self.image_size = size;
        self.pixels = to_pixels(&self.area, size);
    }

    /// Replace the area with a value coming from outside (reload, batch apply).
    ///
    /// Ignored while a gesture is in progress; returns whether the value was taken.
    pub fn load(&mut self, area: NormalizedRect) -> bool {
        if self.mode != EditorMode::Idle {
            return false;
        }
        self.area = area;
        self.pixels = to_pixels(&area, self.image_size);
        true
    }

    /// Which handle, if any, sits under `point` (display pixels).
    pub fn hit_test(&self, point: Point) -> Option<Handle> {
        let px = self.pixels?;
        let local = px.to_local() * point;
        let r = self.settings.handle_radius_px;
        let near = |x: f64, y: f64| (local - Point::new(x, y)).hypot() <= r;

        if near(px.width / 2.0, -self.settings.rotation_handle_offset_px) {
            return Some(Handle::Rotate);
        }
        let corners = [
            (0.0, 0.0, Corner::Nw),
            (px.width, 0.0, Corner::Ne),
            (0.0, px.height, Corner::Sw),
            (px.width, px.height, Corner::Se),
        ];
        for (x, y, corner) in corners {
            if near(x, y) {
                return Some(Handle::Corner(corner));
            }
        }
        let inside = (0.0..=px.width).contains(&local.x) && (0.0..=px.height).contains(&local.y);
        inside.then_some(Handle::Body)
    }

    /// Hit-test `point` and start the matching gesture.
    pub fn pointer_down_at(&mut self, point: Point, now: Instant) -> Option<Handle> {
        let handle = self.hit_test(point)?;
        self.pointer_down(handle, point, now).then_some(handle)
    }

    /// Start a gesture on `handle`. Returns `false` when nothing started (image size
    /// unknown or another gesture already active).
    pub fn pointer_down(&mut self, handle: Handle, point: Point, _now: Instant) -> bool {
        if self.mode != EditorMode::Idle || !self.image_size.is_known() {
            return false;
        }
        let Some(start) = self.pixels else {
            return false;
        };

        let c = start.center();
        self.gesture = Some(Gesture {
            pointer: point,
            start,
            start_angle: (point.y - c.y).atan2(point.x - c.x),
        });
        self.mode = match handle {
            Handle::Body => EditorMode::Dragging,
            Handle::Corner(corner) => EditorMode::Resizing(corner),
            Handle::Rotate => EditorMode::Rotating,
        };
        tracing::trace!(mode = ?self.mode, "gesture started");
        true
    }

    /// Recompute the overlay for the pointer at `point`. Returns the new rectangle, or
    /// `None` when no gesture is active.
    pub fn pointer_move(&mut self, point: Point, now: Instant) -> Option<PixelRect> {
        let g = self.gesture?;
        let size = self.image_size;
        let next = match self.mode {
            EditorMode::Idle => return None,
            EditorMode::Dragging => drag(&g, point, size),
            EditorMode::Resizing(corner) => resize(&g, corner, point, size, self.settings.min_size_px),
            EditorMode::Rotating => rotate(&g, point),
        };
        self.set_pixels(next);

        if let Some(commit) = self.throttle.offer(self.snapshot(next), now) {
            self.sink.commit(&commit);
        }
        Some(next)
    }

    /// End the current gesture, delivering the final state if it was still buffered.
    pub fn pointer_up(&mut self, now: Instant) {
        if self.mode == EditorMode::Idle {
            return;
        }
        self.finish_gesture(now);
    }

    /// Apply a value typed into one of the numeric fields.
    ///
    /// Returns `None` (and changes nothing) when the image size is unknown, a gesture is
    /// active, or `raw` is not a number; the caller then re-displays
    /// [`AreaEditor::display_values`]. Accepted values are clamped and committed at once.
    pub fn apply_field(&mut self, field: AreaField, raw: &str) -> Option<PixelRect> {
        if self.mode != EditorMode::Idle {
            return None;
        }
        let cur = self.pixels?;
        let v = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let size = self.image_size;
        let min = self.settings.min_size_px;

        let mut next = cur;
        match field {
            AreaField::X => next.x = v.min(size.width - cur.width).max(0.0),
            AreaField::Y => next.y = v.min(size.height - cur.height).max(0.0),
            AreaField::Width => next.width = v.min(size.width - cur.x).max(min),
            AreaField::Height => next.height = v.min(size.height - cur.y).max(min),
            AreaField::Rotation => next.rotation = normalize_degrees(v),
        }
        self.set_pixels(next);
        let commit = self.snapshot(next);
        self.sink.commit(&commit);
        Some(next)
    }

    pub fn display_values(&self) -> Option<DisplayValues> {
        let [x, y, width, height, rotation] = self.pixels?.rounded();
        Some(DisplayValues {
            x,
            y,
            width,
            height,
            rotation,
        })
    }

    fn set_pixels(&mut self, next: PixelRect) {
        self.pixels = Some(next);
        if let Some(area) = to_normalized(&next, self.image_size) {
            self.area = area;
        }
    }

    fn snapshot(&self, pixels: PixelRect) -> AreaCommit {
        AreaCommit {
            area: self.area,
            pixels,
            image_size: self.image_size,
        }
    }

    fn finish_gesture(&mut self, now: Instant) {
        if let Some(commit) = self.throttle.flush(now) {
            self.sink.commit(&commit);
        }
        tracing::trace!(mode = ?self.mode, "gesture finished");
        self.mode = EditorMode::Idle;
        self.gesture = None;
    }
}

fn drag(g: &Gesture, p: Point, size: ImageSize) -> PixelRect {
    let s = g.start;
    PixelRect {
        x: (p.x - g.pointer.x + s.x).min(size.width - s.width).max(0.0),
        y: (p.y - g.pointer.y + s.y).min(size.height - s.height).max(0.0),
        ..s
    }
}

fn resize(g: &Gesture, corner: Corner, p: Point, size: ImageSize, min: f64) -> PixelRect {
    let s = g.start;
    let dx = p.x - g.pointer.x;
    let dy = p.y - g.pointer.y;
    let mut out = s;

    // Edges touching the grabbed corner move; the opposite corner stays put.
    match corner {
        Corner::Ne | Corner::Se => {
            out.width = (s.width + dx).min(size.width - s.x).max(min);
        }
        Corner::Nw | Corner::Sw => {
            out.width = (s.width - dx).min(s.x + s.width).max(min);
            out.x = (s.x + s.width - out.width).max(0.0);
        }
    }
    match corner {
        Corner::Sw | Corner::Se => {
            out.height = (s.height + dy).min(size.height - s.y).max(min);
        }
        Corner::Nw | Corner::Ne => {
            out.height = (s.height - dy).min(s.y + s.height).max(min);
            out.y = (s.y + s.height - out.height).max(0.0);
        }
    }
    out
}

fn rotate(g: &Gesture, p: Point) -> PixelRect {
    let s = g.start;
    let c = s.center();
    let angle = (p.y - c.y).atan2(p.x - c.x);
    PixelRect {
        rotation: normalize_degrees(s.rotation + (angle - g.start_angle).to_degrees()),
        ..s
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/area_editor.rs"]
mod tests;
