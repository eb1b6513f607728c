use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum ResizePolicy {
    /// Refit and center the image on every resize, discarding the user's pan and zoom
    Recenter,

    /// Recompute the zoom bounds for the new surface, keep the current zoom
    /// (clamped into the new bounds) and re-clamp the offsets
    #[default]
    Reclamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// pixels of the image that always stay reachable on each axis
    pub margin: f64,

    /// applied to the fit scale to get the minimum zoom
    pub fit_slack: f64,

    pub max_zoom: f64,

    /// ratio used when the wheel scrolls up (`delta_y < 0`)
    pub wheel_zoom_in: f64,

    /// ratio used when the wheel scrolls down (`delta_y > 0`)
    pub wheel_zoom_out: f64,

    /// divide the pan delta by the number of active contacts, so that a
    /// two-finger drag pans as fast as a one-finger drag
    pub divide_pan_by_contacts: bool,

    pub resize_policy: ResizePolicy,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            margin: 10.0,
            fit_slack: 0.9,
            max_zoom: 10.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            divide_pan_by_contacts: true,
            resize_policy: ResizePolicy::default(),
        }
    }
}

impl ViewportConfig {
    /// Replaces values that would break the zoom/offset invariants with their defaults.
    pub fn sanitized(mut self) -> Self {
        let default = Self::default();
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !(self.margin.is_finite() && self.margin >= 0.0) {
            self.margin = default.margin;
        }
        if !positive(self.fit_slack) {
            self.fit_slack = default.fit_slack;
        }
        if !positive(self.max_zoom) {
            self.max_zoom = default.max_zoom;
        }
        if !positive(self.wheel_zoom_in) {
            self.wheel_zoom_in = default.wheel_zoom_in;
        }
        if !positive(self.wheel_zoom_out) {
            self.wheel_zoom_out = default.wheel_zoom_out;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_keeps_valid_values() {
        let config = ViewportConfig {
            margin: 0.0,
            max_zoom: 4.0,
            ..Default::default()
        };
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn sanitized_replaces_broken_values() {
        let config = ViewportConfig {
            margin: -3.0,
            fit_slack: 0.0,
            max_zoom: f64::NAN,
            wheel_zoom_in: f64::INFINITY,
            wheel_zoom_out: -0.5,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config, ViewportConfig::default());
    }
}
