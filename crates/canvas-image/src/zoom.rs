use crate::{
    config::ViewportConfig,
    geometry::{Point, between},
    viewport::ViewportState,
};

/// Result of an anchored zoom, applied by [`ViewportState`] in one mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomOutcome {
    pub zoom: f64,
    pub pan_correction_x: f64,
    pub pan_correction_y: f64,
}

#[derive(Debug, Clone)]
pub struct ZoomController {
    wheel_zoom_in: f64,
    wheel_zoom_out: f64,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}

impl ZoomController {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            wheel_zoom_in: config.wheel_zoom_in,
            wheel_zoom_out: config.wheel_zoom_out,
        }
    }

    /// Maps a wheel delta (negative = scroll up) to a zoom ratio.
    /// A zero or NaN delta has no direction and yields `None`.
    pub fn wheel_ratio(&self, delta_y: f64) -> Option<f64> {
        if delta_y < 0.0 {
            Some(self.wheel_zoom_in)
        } else if delta_y > 0.0 {
            Some(self.wheel_zoom_out)
        } else {
            None
        }
    }

    /// Computes the zoom factor for `ratio` and the offset change that keeps the
    /// image point under `anchor` on the same surface point.
    ///
    /// Returns `None` when there is nothing to zoom: no image, an empty display
    /// size or a ratio that is not a positive number.
    pub fn apply_zoom(viewport: &ViewportState, ratio: f64, anchor: Point) -> Option<ZoomOutcome> {
        if !(ratio.is_finite() && ratio > 0.0) {
            log::debug!("zoom ratio {ratio} ignored");
            return None;
        }

        let source = viewport.source()?;
        let current = viewport.display_size();
        if current.is_degenerate() {
            log::debug!("zoom ignored, display size is {current:?}");
            return None;
        }

        let zoom = between(
            viewport.zoom() * ratio,
            viewport.min_zoom(),
            viewport.max_zoom(),
        );
        let next = source.scaled(zoom);

        // fraction of the displayed image that lies left of / above the anchor
        let offset = viewport.offset();
        let fraction_x = (anchor.x - offset.x) / current.width;
        let fraction_y = (anchor.y - offset.y) / current.height;

        Some(ZoomOutcome {
            zoom,
            pan_correction_x: -(next.width - current.width) * fraction_x,
            pan_correction_y: -(next.height - current.height) * fraction_y,
        })
    }
}
