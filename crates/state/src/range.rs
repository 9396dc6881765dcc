#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRange {
    pub start: f64,
    pub end: f64,
}

impl Default for SeekRange {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
        }
    }
}

impl SeekRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Width usable as a divisor, or `None` when the range is empty or not finite.
    pub fn usable_width(&self) -> Option<f64> {
        let width = self.width();
        (width.is_finite() && width > 0.0).then_some(width)
    }

    /// Clamps `value` into `[ceil(start), floor(end)]`, preferring the lower bound
    /// when the range is narrower than one whole second.
    pub fn clamp_whole_seconds(&self, value: f64) -> f64 {
        self.start.ceil().max(self.end.floor().min(value))
    }

    /// Value under a pixel on a track of `track_width` pixels, rounded to whole seconds.
    pub fn value_at_pixel(&self, pixel: f32, track_width: f32) -> f64 {
        if track_width <= 0.0 {
            return self.start;
        }
        let scale = self.width() / track_width as f64;
        (self.start + scale * pixel as f64).round()
    }

    pub fn pixel_at_value(&self, value: f64, track_width: f32) -> f32 {
        match self.usable_width() {
            Some(width) => ((value - self.start) / width * track_width as f64) as f32,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_whole_seconds_rounds_bounds_inward() {
        let range = SeekRange::new(10.4, 99.6);
        assert_eq!(range.clamp_whole_seconds(3.0), 11.0);
        assert_eq!(range.clamp_whole_seconds(120.0), 99.0);
        assert_eq!(range.clamp_whole_seconds(50.0), 50.0);
    }

    #[test]
    fn value_at_pixel_maps_track_to_range() {
        let range = SeekRange::new(0.0, 200.0);
        assert_eq!(range.value_at_pixel(0.0, 400.0), 0.0);
        assert_eq!(range.value_at_pixel(200.0, 400.0), 100.0);
        assert_eq!(range.value_at_pixel(401.0, 400.0), 201.0);
        assert_eq!(range.value_at_pixel(10.0, 0.0), 0.0);
    }

    #[test]
    fn usable_width_rejects_degenerate_ranges() {
        assert_eq!(SeekRange::new(5.0, 5.0).usable_width(), None);
        assert_eq!(SeekRange::new(0.0, f64::INFINITY).usable_width(), None);
        assert_eq!(SeekRange::new(f64::NAN, 3.0).usable_width(), None);
        assert_eq!(SeekRange::new(2.0, 6.0).usable_width(), Some(4.0));
    }
}
