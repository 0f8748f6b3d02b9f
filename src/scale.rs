//! Scale functions mapping data domains onto visual ranges.
//!
//! Each chart recomputes its scales from the current projection's value range
//! on every update, so a scale never outlives the projection it was built for.
//! The scales are plain value types with no rendering dependencies, which
//! keeps them testable without a terminal.

/// Continuous linear mapping from a data domain onto a visual range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Map a value into the range.
    ///
    /// A degenerate domain (min == max, which happens when every country has
    /// the same value for an indicator) maps everything to the range midpoint
    /// instead of dividing by zero.
    pub fn scale(&self, v: f64) -> f64 {
        let span = self.domain[1] - self.domain[0];
        if span == 0.0 || !span.is_finite() {
            return (self.range[0] + self.range[1]) / 2.0;
        }
        let t = (v - self.domain[0]) / span;
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }
}

/// Square-root mapping, used for the scatter radius encoding so that marker
/// *area* tracks the data value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl SqrtScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, v: f64) -> f64 {
        let d0 = self.domain[0].max(0.0).sqrt();
        let d1 = self.domain[1].max(0.0).sqrt();
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (self.range[0] + self.range[1]) / 2.0;
        }
        let t = (v.max(0.0).sqrt() - d0) / span;
        self.range[0] + t * (self.range[1] - self.range[0])
    }
}

/// Ordinal band scale for the bar chart: each label gets an equal-width band
/// with inner padding, in label order.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    range: [f64; 2],
    padding: f64,
}

impl BandScale {
    pub fn new(labels: Vec<String>, range: [f64; 2], padding: f64) -> Self {
        Self {
            labels,
            range,
            padding: padding.clamp(0.0, 1.0),
        }
    }

    fn step(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        (self.range[1] - self.range[0]) / self.labels.len() as f64
    }

    /// Width of one band (step minus padding).
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Left edge of the band for `label`, or `None` for unknown labels.
    pub fn position(&self, label: &str) -> Option<f64> {
        let idx = self.labels.iter().position(|l| l == label)?;
        let step = self.step();
        Some(self.range[0] + idx as f64 * step + step * self.padding / 2.0)
    }
}

/// Stable categorical color assignment, in first-seen label order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalColor {
    labels: Vec<String>,
}

/// Default region palette (red, teal, orange, purple).
pub const REGION_PALETTE: [(u8, u8, u8); 4] = [
    (0xDD, 0x49, 0x49),
    (0x39, 0xCD, 0xA1),
    (0xFD, 0x71, 0x0C),
    (0xA1, 0x4B, 0xE5),
];

impl OrdinalColor {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// RGB color for a label; unknown labels fall back to the first palette
    /// entry, and the palette wraps when there are more labels than colors.
    pub fn color(&self, label: &str) -> (u8, u8, u8) {
        let idx = self
            .labels
            .iter()
            .position(|l| l == label)
            .unwrap_or(0);
        REGION_PALETTE[idx % REGION_PALETTE.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_endpoints_and_midpoint() {
        let s = LinearScale::new([0.0, 10.0], [100.0, 200.0]);
        assert_eq!(s.scale(0.0), 100.0);
        assert_eq!(s.scale(10.0), 200.0);
        assert_eq!(s.scale(5.0), 150.0);
    }

    #[test]
    fn linear_inverted_range_for_screen_y() {
        // Screen y grows downward, so chart scales invert the range.
        let s = LinearScale::new([0.0, 100.0], [470.0, 30.0]);
        assert_eq!(s.scale(0.0), 470.0);
        assert_eq!(s.scale(100.0), 30.0);
    }

    #[test]
    fn linear_degenerate_domain_does_not_divide_by_zero() {
        let s = LinearScale::new([7.0, 7.0], [0.0, 100.0]);
        let v = s.scale(7.0);
        assert!(v.is_finite());
        assert_eq!(v, 50.0);
    }

    #[test]
    fn sqrt_scale_is_monotone_and_hits_endpoints() {
        let s = SqrtScale::new([0.0, 100.0], [10.0, 30.0]);
        assert_eq!(s.scale(0.0), 10.0);
        assert_eq!(s.scale(100.0), 30.0);
        let quarter = s.scale(25.0);
        // sqrt(25)/sqrt(100) = 0.5 of the way through the range.
        assert!((quarter - 20.0).abs() < 1e-9);
    }

    #[test]
    fn sqrt_degenerate_domain_is_safe() {
        let s = SqrtScale::new([4.0, 4.0], [10.0, 30.0]);
        assert_eq!(s.scale(4.0), 20.0);
    }

    #[test]
    fn band_scale_positions_and_bandwidth() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let s = BandScale::new(labels, [0.0, 100.0], 0.1);
        assert!((s.bandwidth() - 45.0).abs() < 1e-9);
        let a = s.position("a").unwrap();
        let b = s.position("b").unwrap();
        assert!((a - 2.5).abs() < 1e-9);
        assert!((b - 52.5).abs() < 1e-9);
        assert_eq!(s.position("c"), None);
    }

    #[test]
    fn band_scale_empty_labels() {
        let s = BandScale::new(Vec::new(), [0.0, 100.0], 0.1);
        assert_eq!(s.bandwidth(), 0.0);
        assert_eq!(s.position("a"), None);
    }

    #[test]
    fn ordinal_color_is_stable_and_wraps() {
        let labels: Vec<String> = ["r1", "r2", "r3", "r4", "r5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let c = OrdinalColor::new(labels);
        assert_eq!(c.color("r1"), REGION_PALETTE[0]);
        assert_eq!(c.color("r4"), REGION_PALETTE[3]);
        // Fifth label wraps back to the first palette entry.
        assert_eq!(c.color("r5"), REGION_PALETTE[0]);
        // Unknown labels fall back rather than panic.
        assert_eq!(c.color("nope"), REGION_PALETTE[0]);
    }
}
