use geo::Rect;

/// Running bounding box over a stream of features.
/// Seeded at +inf/-inf and monotonically widened; stays at the seed (and
/// renders as `None`) if no feature ever contributes a valid box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl Bounds {
    pub fn new() -> Self { Self::default() }

    /// Widen to cover `rect`.
    pub fn widen(&mut self, rect: &Rect<f64>) {
        self.min_x = self.min_x.min(rect.min().x);
        self.min_y = self.min_y.min(rect.min().y);
        self.max_x = self.max_x.max(rect.max().x);
        self.max_y = self.max_y.max(rect.max().y);
    }

    /// Union of two partial bounds. Commutative and associative, so partial
    /// unions may be merged in any order.
    pub fn merge(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// `[min_x, min_y, max_x, max_y]` when at least one box contributed,
    /// `None` while still at the seed value.
    pub fn to_array(&self) -> Option<[f64; 4]> {
        let arr = [self.min_x, self.min_y, self.max_x, self.max_y];
        arr.iter().all(|v| v.is_finite()).then_some(arr)
    }
}
