//! Linear data-to-pixel mapping shared by the time (x) and value (y) axes.

const MIN_SPAN: f64 = 1e-12;

/// Maps `domain` linearly onto the pixel `range`. The range may be inverted
/// (`(bottom, top)` for y axes).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    /// A zero-width domain is widened to one unit so mapping never divides by zero.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        let (d0, mut d1) = domain;
        let d0 = if d0.is_finite() { d0 } else { 0.0 };
        if !d1.is_finite() || (d1 - d0).abs() < MIN_SPAN {
            d1 = d0 + 1.0;
        }
        Self {
            domain: (d0, d1),
            range,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    #[inline]
    pub fn map(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = (v - d0) / (d1 - d0);
        (r0 as f64 + t * (r1 - r0) as f64) as f32
    }

    #[inline]
    pub fn invert(&self, px: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span_px = (r1 - r0) as f64;
        if span_px.abs() < MIN_SPAN {
            return d0;
        }
        d0 + ((px - r0) as f64 / span_px) * (d1 - d0)
    }
}
