//! Scales used by the map and charts: threshold classification, band and
//! linear. Ranges are plain `f64`s; charts work in a unit box where `0.0`
//! is the bottom/left edge and `1.0` the top/right edge.

/// Maps a continuous value to one of `breakpoints.len() + 1` buckets.
#[derive(Debug, Clone)]
pub struct ThresholdScale<T> {
    breakpoints: Vec<f64>,
    range: Vec<T>,
}

impl<T: Clone> ThresholdScale<T> {
    /// `range` must hold exactly one more entry than `breakpoints`.
    pub fn new(breakpoints: Vec<f64>, range: Vec<T>) -> Self {
        debug_assert_eq!(breakpoints.len() + 1, range.len());
        Self { breakpoints, range }
    }

    /// Bucket index: the number of breakpoints `<= value`.
    pub fn bucket(&self, value: f64) -> usize {
        self.breakpoints.partition_point(|&b| b <= value)
    }

    pub fn classify(&self, value: f64) -> T {
        self.range[self.bucket(value).min(self.range.len() - 1)].clone()
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn range(&self) -> &[T] {
        &self.range
    }
}

/// Evenly spaced, padded bands for discrete categories.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Inner and outer padding are both `padding`, bands are centred.
    pub fn new<S: AsRef<str>>(domain: &[S], range: (f64, f64), padding: f64) -> Self {
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self {
            domain: domain.iter().map(|s| s.as_ref().to_string()).collect(),
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn position(&self, key: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|d| d == key)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// Continuous linear mapping from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Extend the domain outward to round tick steps (10 ticks).
    pub fn nice(mut self) -> Self {
        let (mut d0, mut d1) = self.domain;
        let mut prev = None;
        for _ in 0..10 {
            let step = TickStep::new(d0, d1, 10);
            if step.is_zero() || prev == Some(step) {
                break;
            }
            d0 = step.floor(d0);
            d1 = step.ceil(d1);
            prev = Some(step);
        }
        self.domain = (d0, d1);
        self
    }

    /// Roughly `count` round tick values within the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let step = TickStep::new(d0, d1, count);
        if step.is_zero() {
            return vec![d0];
        }
        let first = step.index_ceil(d0);
        let last = step.index_floor(d1);
        (first..=last).map(|i| step.value(i)).collect()
    }

    /// Step between the ticks returned by [`LinearScale::ticks`].
    pub fn tick_step(&self, count: usize) -> f64 {
        TickStep::new(self.domain.0, self.domain.1, count).size()
    }
}

/// Round tick step (1, 2 or 5 times a power of ten). Fractional steps are
/// kept as their inverse so tick values stay exact (0.6 rather than
/// 0.6000000000000001).
#[derive(Debug, Clone, Copy, PartialEq)]
enum TickStep {
    Whole(f64),
    Fraction(f64),
}

impl TickStep {
    fn new(start: f64, stop: f64, count: usize) -> Self {
        let span = (stop - start).abs();
        if span == 0.0 || count == 0 || !span.is_finite() {
            return TickStep::Whole(0.0);
        }
        let raw = span / count as f64;
        let power = raw.log10().floor();
        let error = raw / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };
        if power < 0.0 {
            TickStep::Fraction(10f64.powf(-power) / factor)
        } else {
            TickStep::Whole(factor * 10f64.powf(power))
        }
    }

    fn is_zero(&self) -> bool {
        matches!(self, TickStep::Whole(s) if *s == 0.0)
    }

    fn size(&self) -> f64 {
        match *self {
            TickStep::Whole(s) => s,
            TickStep::Fraction(inv) => 1.0 / inv,
        }
    }

    fn index_ceil(&self, v: f64) -> i64 {
        match *self {
            TickStep::Whole(s) => (v / s).ceil() as i64,
            TickStep::Fraction(inv) => (v * inv).ceil() as i64,
        }
    }

    fn index_floor(&self, v: f64) -> i64 {
        match *self {
            TickStep::Whole(s) => (v / s).floor() as i64,
            TickStep::Fraction(inv) => (v * inv).floor() as i64,
        }
    }

    fn value(&self, i: i64) -> f64 {
        match *self {
            TickStep::Whole(s) => i as f64 * s,
            TickStep::Fraction(inv) => i as f64 / inv,
        }
    }

    fn floor(&self, v: f64) -> f64 {
        self.value(self.index_floor(v))
    }

    fn ceil(&self, v: f64) -> f64 {
        self.value(self.index_ceil(v))
    }
}
