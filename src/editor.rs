pub mod area_editor;
pub mod throttle;
