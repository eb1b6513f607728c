use crate::{
    config::ViewportConfig,
    geometry::{Point, Rect, Size, between},
    zoom::ZoomController,
};

/// What the renderer blits: the whole `source` rect of the image, scaled into
/// `dest` on the surface. `dest` may extend past the surface edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub source: Rect,
    pub dest: Rect,
}

/// Pan and zoom of one image on one surface.
///
/// After every mutation `min_zoom <= zoom <= max_zoom` holds and the offsets
/// stay inside [`ViewportState::offset_bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    offset: Point,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    source: Option<Size>,
    surface: Size,

    margin: f64,
    fit_slack: f64,
    zoom_cap: f64,
}

impl ViewportState {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            offset: Point::default(),
            zoom: 1.0,
            min_zoom: 1.0,
            max_zoom: 1.0,
            source: None,
            surface: Size::default(),
            margin: config.margin,
            fit_slack: config.fit_slack,
            zoom_cap: config.max_zoom,
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn source(&self) -> Option<Size> {
        self.source
    }

    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Size of the image on the surface, zero while no image is set.
    pub fn display_size(&self) -> Size {
        self.source
            .map(|source| source.scaled(self.zoom))
            .unwrap_or_default()
    }

    /// Takes new margin/zoom limits. The limits only matter from the next
    /// recenter or rescale on.
    pub fn apply_config(&mut self, config: &ViewportConfig) {
        self.margin = config.margin;
        self.fit_slack = config.fit_slack;
        self.zoom_cap = config.max_zoom;
    }

    /// `(min, max)` zoom for a pairing; `None` when either size is degenerate.
    fn zoom_bounds(&self, source: Size, surface: Size) -> Option<(f64, f64)> {
        if source.is_degenerate() || surface.is_degenerate() {
            return None;
        }
        let fit_scale = (surface.width / source.width).min(surface.height / source.height);
        let min_zoom = fit_scale * self.fit_slack;
        // a tiny image on a huge surface may already fit beyond the cap
        Some((min_zoom, self.zoom_cap.max(min_zoom)))
    }

    /// Fits the image into the surface (with slack) and centers it.
    /// Returns `false`, leaving the state untouched, for degenerate sizes.
    pub fn recenter_for(&mut self, source: Size, surface: Size) -> bool {
        let Some((min_zoom, max_zoom)) = self.zoom_bounds(source, surface) else {
            log::debug!("recenter skipped for source {source:?} on surface {surface:?}");
            return false;
        };

        self.source = Some(source);
        self.surface = surface;
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = min_zoom;

        let display = self.display_size();
        self.offset = Point::new(
            surface.width / 2.0 - display.width / 2.0,
            surface.height / 2.0 - display.height / 2.0,
        );

        log::info!(
            "recentered {}x{} on {}x{} at zoom {:.4}",
            source.width,
            source.height,
            surface.width,
            surface.height,
            self.zoom
        );
        true
    }

    /// Moves to a new surface size keeping the current zoom (clamped into the
    /// recomputed bounds) and pan (re-clamped).
    pub fn rescale_for(&mut self, surface: Size) -> bool {
        let Some(source) = self.source else {
            return false;
        };
        let Some((min_zoom, max_zoom)) = self.zoom_bounds(source, surface) else {
            log::debug!("rescale skipped for surface {surface:?}");
            return false;
        };

        self.surface = surface;
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = between(self.zoom, min_zoom, max_zoom);
        self.clamp_offset();
        true
    }

    /// Forgets the image; pan and zoom requests become no-ops until the next recenter.
    pub fn clear_source(&mut self) {
        self.source = None;
    }

    /// Allowed offset range: at least `margin` pixels of the image stay on the
    /// surface on each axis.
    pub fn offset_bounds(&self) -> (Point, Point) {
        let display = self.display_size();
        (
            Point::new(-display.width + self.margin, -display.height + self.margin),
            Point::new(
                self.surface.width - self.margin,
                self.surface.height - self.margin,
            ),
        )
    }

    fn clamp_offset(&mut self) {
        let (min, max) = self.offset_bounds();
        self.offset.x = between(self.offset.x, min.x, max.x);
        self.offset.y = between(self.offset.y, min.y, max.y);
    }

    fn can_move(&self) -> bool {
        self.source.is_some() && !self.surface.is_degenerate()
    }

    /// Translates the image by `(dx, dy)` surface pixels, then clamps.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !self.can_move() || !(dx.is_finite() && dy.is_finite()) {
            return false;
        }
        self.offset.x += dx;
        self.offset.y += dy;
        self.clamp_offset();
        true
    }

    /// Zooms by `ratio` keeping the image point under `anchor` in place.
    /// Zoom and offset change together, so no frame ever sees one without the other.
    pub fn zoom_around(&mut self, anchor: Point, ratio: f64) -> bool {
        if !self.can_move() {
            return false;
        }
        let Some(outcome) = ZoomController::apply_zoom(self, ratio, anchor) else {
            return false;
        };

        self.zoom = outcome.zoom;
        self.offset.x += outcome.pan_correction_x;
        self.offset.y += outcome.pan_correction_y;
        self.clamp_offset();
        true
    }

    /// Maps a surface point to source pixels.
    pub fn surface_to_image(&self, point: Point) -> Option<Point> {
        self.source?;
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return None;
        }
        Some(Point::new(
            (point.x - self.offset.x) / self.zoom,
            (point.y - self.offset.y) / self.zoom,
        ))
    }

    pub fn current_frame(&self) -> Option<Frame> {
        let source = self.source?;
        let display = self.display_size();
        if display.is_degenerate() || self.surface.is_degenerate() {
            return None;
        }
        Some(Frame {
            source: Rect::from_size(source),
            dest: Rect::new(self.offset, display),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn scenario() -> ViewportState {
        let mut viewport = ViewportState::new(&ViewportConfig::default());
        assert!(viewport.recenter_for(Size::new(1000.0, 500.0), Size::new(500.0, 500.0)));
        viewport
    }

    fn assert_within_bounds(viewport: &ViewportState) {
        let (min, max) = viewport.offset_bounds();
        let offset = viewport.offset();
        assert!(offset.x >= min.x - EPSILON && offset.x <= max.x + EPSILON, "{offset:?}");
        assert!(offset.y >= min.y - EPSILON && offset.y <= max.y + EPSILON, "{offset:?}");
        assert!(viewport.zoom() >= viewport.min_zoom());
        assert!(viewport.zoom() <= viewport.max_zoom());
    }

    #[test]
    fn recenter_scenario() {
        let viewport = scenario();

        assert!(approx_eq(viewport.min_zoom(), 0.45));
        assert!(approx_eq(viewport.zoom(), 0.45));
        assert_eq!(viewport.max_zoom(), 10.0);
        let display = viewport.display_size();
        assert!(approx_eq(display.width, 450.0));
        assert!(approx_eq(display.height, 225.0));
        assert!(approx_eq(viewport.offset().x, 25.0));
        assert!(approx_eq(viewport.offset().y, 137.5));
    }

    #[test]
    fn recenter_is_idempotent() {
        let mut viewport = scenario();
        viewport.pan_by(40.0, -12.0);
        viewport.zoom_around(Point::new(100.0, 100.0), 1.7);

        let mut again = viewport.clone();
        viewport.recenter_for(Size::new(1000.0, 500.0), Size::new(500.0, 500.0));
        again.recenter_for(Size::new(1000.0, 500.0), Size::new(500.0, 500.0));
        again.recenter_for(Size::new(1000.0, 500.0), Size::new(500.0, 500.0));
        assert_eq!(viewport, again);
        assert_eq!(viewport, scenario());
    }

    #[test]
    fn recenter_degenerate_is_noop() {
        let mut viewport = scenario();
        let before = viewport.clone();

        assert!(!viewport.recenter_for(Size::new(0.0, 500.0), Size::new(500.0, 500.0)));
        assert!(!viewport.recenter_for(Size::new(1000.0, 500.0), Size::new(500.0, 0.0)));
        assert_eq!(viewport, before);
    }

    #[test]
    fn max_zoom_never_below_min_zoom() {
        let mut viewport = ViewportState::new(&ViewportConfig::default());
        viewport.recenter_for(Size::new(4.0, 4.0), Size::new(1000.0, 1000.0));

        assert!(approx_eq(viewport.min_zoom(), 225.0));
        assert_eq!(viewport.max_zoom(), viewport.min_zoom());
        assert!(viewport.zoom_around(Point::new(500.0, 500.0), 1.1));
        assert!(approx_eq(viewport.zoom(), 225.0));
    }

    #[test]
    fn pan_stays_within_margin_bounds() {
        let mut viewport = scenario();
        let steps = [
            (1e6, 0.0),
            (-3e6, 7.0),
            (13.0, -1e5),
            (250.0, 250.0),
            (-0.5, 1e9),
            (-480.0, -480.0),
        ];
        for (dx, dy) in steps.iter().cycle().take(60) {
            viewport.pan_by(*dx, *dy);
            assert_within_bounds(&viewport);
        }
    }

    #[test]
    fn pan_reaches_both_edges() {
        let mut viewport = scenario();

        viewport.pan_by(-1e6, -1e6);
        assert!(approx_eq(viewport.offset().x, -450.0 + 10.0));
        assert!(approx_eq(viewport.offset().y, -225.0 + 10.0));

        viewport.pan_by(1e6, 1e6);
        assert!(approx_eq(viewport.offset().x, 490.0));
        assert!(approx_eq(viewport.offset().y, 490.0));
    }

    #[test]
    fn pan_without_image_is_noop() {
        let mut viewport = ViewportState::new(&ViewportConfig::default());
        let before = viewport.clone();

        assert!(!viewport.pan_by(10.0, 10.0));
        assert!(!viewport.zoom_around(Point::new(1.0, 1.0), 2.0));
        assert_eq!(viewport, before);
        assert!(viewport.current_frame().is_none());
    }

    #[test]
    fn pan_rejects_nan() {
        let mut viewport = scenario();
        let before = viewport.clone();
        assert!(!viewport.pan_by(f64::NAN, 1.0));
        assert_eq!(viewport, before);
    }

    #[test]
    fn zoom_keeps_anchor_point() {
        let mut viewport = scenario();
        let anchors = [
            Point::new(250.0, 250.0),
            Point::new(60.0, 200.0),
            Point::new(400.0, 300.0),
        ];
        for anchor in anchors {
            for ratio in [1.1, 0.95, 1.5, 1.02] {
                let before = viewport.surface_to_image(anchor).unwrap();
                assert!(viewport.zoom_around(anchor, ratio));
                let after = viewport.surface_to_image(anchor).unwrap();

                let tolerance = 1e-6 * before.x.abs().max(before.y.abs()).max(1.0);
                assert!((before.x - after.x).abs() < tolerance, "{before:?} {after:?}");
                assert!((before.y - after.y).abs() < tolerance, "{before:?} {after:?}");
                assert_within_bounds(&viewport);
            }
        }
    }

    #[test]
    fn wheel_scenario_step() {
        let mut viewport = scenario();
        assert!(viewport.zoom_around(Point::new(250.0, 250.0), 1.1));

        assert!(approx_eq(viewport.zoom(), 0.495));
        assert!(approx_eq(viewport.offset().x, 2.5));
        assert!(approx_eq(viewport.offset().y, 126.25));
        let image = viewport.surface_to_image(Point::new(250.0, 250.0)).unwrap();
        assert!((image.x - 500.0).abs() < 1e-6);
        assert!((image.y - 250.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_out_stops_at_min_zoom() {
        let mut viewport = scenario();
        for _ in 0..20 {
            viewport.zoom_around(Point::new(10.0, 490.0), 0.5);
            assert_within_bounds(&viewport);
        }
        assert_eq!(viewport.zoom(), viewport.min_zoom());
    }

    #[test]
    fn rescale_keeps_zoom_and_reclamps() {
        let mut viewport = scenario();
        viewport.zoom_around(Point::new(250.0, 250.0), 2.0);
        viewport.pan_by(300.0, 300.0);
        let zoom = viewport.zoom();

        assert!(viewport.rescale_for(Size::new(200.0, 200.0)));
        assert_eq!(viewport.zoom(), zoom);
        assert!(approx_eq(viewport.min_zoom(), 0.18));
        assert_within_bounds(&viewport);
        assert!(approx_eq(viewport.offset().x, 100.0));
        assert!(approx_eq(viewport.offset().y, 190.0));
    }

    #[test]
    fn rescale_lifts_zoom_to_new_minimum() {
        let mut viewport = scenario();
        assert!(viewport.rescale_for(Size::new(2000.0, 2000.0)));

        assert!(approx_eq(viewport.min_zoom(), 1.8));
        assert!(approx_eq(viewport.zoom(), 1.8));
        assert_within_bounds(&viewport);
    }

    #[test]
    fn rescale_without_image_is_noop() {
        let mut viewport = ViewportState::new(&ViewportConfig::default());
        assert!(!viewport.rescale_for(Size::new(100.0, 100.0)));
        assert_eq!(viewport.surface(), Size::default());
    }

    #[test]
    fn frame_maps_full_source_to_display_rect() {
        let viewport = scenario();
        let frame = viewport.current_frame().unwrap();

        assert_eq!(frame.source, Rect::from_size(Size::new(1000.0, 500.0)));
        assert!(approx_eq(frame.dest.min.x, 25.0));
        assert!(approx_eq(frame.dest.min.y, 137.5));
        assert!(approx_eq(frame.dest.size.width, 450.0));
        assert!(approx_eq(frame.dest.size.height, 225.0));
    }

    #[test]
    fn cleared_source_has_no_frame() {
        let mut viewport = scenario();
        viewport.clear_source();
        assert!(viewport.current_frame().is_none());
        assert!(viewport.surface_to_image(Point::default()).is_none());
        assert!(!viewport.pan_by(1.0, 1.0));
    }
}
