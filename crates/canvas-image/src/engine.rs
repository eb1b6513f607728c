//! The composition root: routes surface events to the contact tracker and the
//! viewport, and answers the renderer's per-frame query.

use crate::{
    config::{ResizePolicy, ViewportConfig},
    geometry::{Point, Size},
    pointer::{ContactId, PointerSessionTracker},
    viewport::{Frame, ViewportState},
    zoom::ZoomController,
};

/// Normalized input of one surface, positions are surface-local.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ContactStart { id: ContactId, pos: Point },
    ContactMove { id: ContactId, pos: Point },
    ContactEnd { id: ContactId },
    ContactCancel { id: ContactId },
    ContactLeave { id: ContactId },
    /// `delta_y < 0` scrolls up, which zooms in
    Wheel { delta_y: f64, pos: Point },
    Resize(Size),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Panning,
    Pinching,
}

pub struct GestureEngine {
    config: ViewportConfig,
    tracker: PointerSessionTracker,
    zoom: ZoomController,
    viewport: ViewportState,
    source: Option<Size>,
    /// `None` until the surface got its first usable size
    surface: Option<Size>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl GestureEngine {
    pub fn new(config: ViewportConfig) -> Self {
        let config = config.sanitized();
        Self {
            tracker: PointerSessionTracker::new(config.divide_pan_by_contacts),
            zoom: ZoomController::new(&config),
            viewport: ViewportState::new(&config),
            source: None,
            surface: None,
            config,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn tracker(&self) -> &PointerSessionTracker {
        &self.tracker
    }

    pub fn source(&self) -> Option<Size> {
        self.source
    }

    pub fn surface(&self) -> Option<Size> {
        self.surface
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn gesture_state(&self) -> GestureState {
        match self.tracker.len() {
            0 => GestureState::Idle,
            2 => GestureState::Pinching,
            _ => GestureState::Panning,
        }
    }

    /// Swaps the configuration. Zoom bounds are recomputed for the current
    /// pairing while the current zoom and pan are kept where possible.
    pub fn set_config(&mut self, config: ViewportConfig) {
        let config = config.sanitized();
        self.tracker
            .set_divide_pan_by_contacts(config.divide_pan_by_contacts);
        self.zoom = ZoomController::new(&config);
        self.viewport.apply_config(&config);
        self.config = config;

        if let Some(surface) = self.surface {
            self.viewport.rescale_for(surface);
        }
    }

    /// Applies one event; returns whether the view changed.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::ContactStart { id, pos } => {
                self.contact_start(id, pos);
                false
            }
            InputEvent::ContactMove { id, pos } => self.contact_move(id, pos),
            InputEvent::ContactEnd { id }
            | InputEvent::ContactCancel { id }
            | InputEvent::ContactLeave { id } => {
                self.contact_end(id);
                false
            }
            InputEvent::Wheel { delta_y, pos } => self.wheel(delta_y, pos),
            InputEvent::Resize(size) => self.resize(size),
        }
    }

    pub fn contact_start(&mut self, id: ContactId, pos: Point) {
        self.tracker.contact_start(id, pos);
    }

    /// Pan and pinch zoom (when two contacts are down) of one move, applied
    /// before the next event is looked at.
    ///
    /// Panning first carries the image point under the old pinch midpoint to
    /// the new midpoint, the zoom around the new midpoint then keeps it there.
    pub fn contact_move(&mut self, id: ContactId, pos: Point) -> bool {
        let Some(delta) = self.tracker.contact_move(id, pos) else {
            return false;
        };

        // the tracker reports how far the pointer went back, the image follows the pointer
        let mut changed = self.viewport.pan_by(-delta.pan_x, -delta.pan_y);
        if let Some(pinch) = delta.pinch {
            changed |= self.viewport.zoom_around(pinch.center, pinch.ratio);
        }
        changed
    }

    pub fn contact_end(&mut self, id: ContactId) -> bool {
        self.tracker.contact_end(id)
    }

    pub fn wheel(&mut self, delta_y: f64, pos: Point) -> bool {
        match self.zoom.wheel_ratio(delta_y) {
            Some(ratio) => self.viewport.zoom_around(pos, ratio),
            None => false,
        }
    }

    /// Programmatic zoom around a surface point, same path as wheel and pinch.
    pub fn zoom_by(&mut self, ratio: f64, anchor: Point) -> bool {
        self.viewport.zoom_around(anchor, ratio)
    }

    pub fn resize(&mut self, size: Size) -> bool {
        if size.is_degenerate() {
            log::debug!("resize to {size:?} ignored");
            return false;
        }
        if self.surface == Some(size) {
            return false;
        }

        let first_sizing = self.surface.is_none();
        self.surface = Some(size);

        let Some(source) = self.source else {
            return false;
        };

        if first_sizing || self.config.resize_policy == ResizePolicy::Recenter {
            self.viewport.recenter_for(source, size)
        } else {
            log::debug!("surface resized to {size:?}, re-clamping");
            self.viewport.rescale_for(size)
        }
    }

    /// Called by the image source when an image finished loading (`Some`) or
    /// was dropped/failed (`None`). A new image is recentered once, here.
    pub fn set_source(&mut self, source: Option<Size>) -> bool {
        let source = source.filter(|size| {
            let usable = !size.is_degenerate();
            if !usable {
                log::warn!("image with unusable size {size:?} ignored");
            }
            usable
        });

        self.source = source;
        match (source, self.surface) {
            (Some(source), Some(surface)) => self.viewport.recenter_for(source, surface),
            (Some(_), None) => false,
            (None, _) => {
                log::info!("image source cleared");
                self.viewport.clear_source();
                true
            }
        }
    }

    /// Back to the fitted, centered view of the current image.
    pub fn reset_view(&mut self) -> bool {
        match (self.source, self.surface) {
            (Some(source), Some(surface)) => self.viewport.recenter_for(source, surface),
            _ => false,
        }
    }

    pub fn surface_to_image(&self, point: Point) -> Option<Point> {
        self.viewport.surface_to_image(point)
    }

    /// What to draw this frame, `None` while there is nothing to draw.
    pub fn current_frame(&self) -> Option<Frame> {
        self.viewport.current_frame()
    }
}
