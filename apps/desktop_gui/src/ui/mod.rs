//! UI layer: app shell, per-view panels, and modal forms.

pub mod app;

pub use app::TrainTrackApp;
