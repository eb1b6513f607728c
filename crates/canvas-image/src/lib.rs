//! Pan and zoom of one raster image on one display surface, driven by pointer
//! drags, two-contact pinches and wheel steps.
//!
//! Everything here runs on the thread that delivers the input events; the
//! renderer asks [`GestureEngine::current_frame`] once per frame.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod pointer;
pub mod viewport;
pub mod zoom;

pub use config::{ResizePolicy, ViewportConfig};
pub use engine::{GestureEngine, GestureState, InputEvent};
pub use geometry::{Point, Rect, Size};
pub use pointer::{ContactId, GestureDelta, Pinch, PointerContact, PointerSessionTracker};
pub use viewport::{Frame, ViewportState};
pub use zoom::{ZoomController, ZoomOutcome};
