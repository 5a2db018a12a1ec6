pub const SCALE_FACTOR_MIN: f32 = 0.1;
pub const SCALE_FACTOR_MAX: f32 = 1.0;
pub const ZOOM_STEP: f32 = 1.2;

/// Current camera transform as reported by the pan/zoom capability. `a` is
/// the scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub a: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            a: SCALE_FACTOR_MAX,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

/// The externally supplied pan/zoom widget. The capability owns min/max
/// clamping of the scale factor.
pub trait PanZoom {
    fn fit_to_viewport(&mut self);
    fn zoom_at_center(&mut self, factor: f32);
    fn transform(&self) -> ViewTransform;
}

/// Wraps the pan/zoom capability with zoom-step actions, a normalized zoom
/// level for the UI indicator, and the startup readiness gate.
#[derive(Debug)]
pub struct ViewportController<P: PanZoom> {
    panzoom: P,
    scale_factor_min: f32,
    scale_factor_max: f32,
    ready: bool,
}

impl<P: PanZoom> ViewportController<P> {
    pub fn new(panzoom: P) -> Self {
        Self::with_scale_bounds(panzoom, SCALE_FACTOR_MIN, SCALE_FACTOR_MAX)
    }

    pub fn with_scale_bounds(panzoom: P, scale_factor_min: f32, scale_factor_max: f32) -> Self {
        Self {
            panzoom,
            scale_factor_min,
            scale_factor_max,
            ready: false,
        }
    }

    /// The canvas is presented only once a first fit has happened against a
    /// real viewport size.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Feeds a viewport measurement in. Zero in either dimension is a
    /// transient startup state and is ignored; the first non-zero
    /// measurement triggers a single automatic fit. Redundant or stale
    /// measurements re-derive the same outcome.
    pub fn observe_size(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        if !self.ready {
            self.ready = true;
            self.panzoom.fit_to_viewport();
            tracing::debug!(width, height, "viewport ready, fitted to first measurement");
        }
    }

    pub fn zoom_in(&mut self) {
        self.panzoom.zoom_at_center(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.panzoom.zoom_at_center(1.0 / ZOOM_STEP);
    }

    pub fn fit(&mut self) {
        self.panzoom.fit_to_viewport();
    }

    /// Normalized zoom level in [0, 1] for the zoom indicator.
    pub fn level(&self) -> f32 {
        let scale = self.panzoom.transform().a;
        let span = self.scale_factor_max - self.scale_factor_min;
        ((scale - self.scale_factor_min) / span).clamp(0.0, 1.0)
    }

    pub fn panzoom(&self) -> &P {
        &self.panzoom
    }
}
