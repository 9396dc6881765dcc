use egui::Color32;

use crate::cue::CuePoint;
use crate::range::SeekRange;

/// Width of a marker for cue points that carry no end time.
pub const MARKER_WIDTH: f64 = 0.01;
/// Where the post-roll band begins on the track.
pub const POST_ROLL_BAND_START: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Color32,
    pub fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdBand {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdGradient {
    /// No cue points at all: the overlay is transparent.
    #[default]
    Cleared,
    Bands {
        stops: Vec<GradientStop>,
        bands: Vec<AdBand>,
    },
}

impl AdGradient {
    pub fn is_cleared(&self) -> bool {
        matches!(self, AdGradient::Cleared)
    }

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            AdGradient::Cleared => &[],
            AdGradient::Bands { stops, .. } => stops,
        }
    }

    pub fn bands(&self) -> &[AdBand] {
        match self {
            AdGradient::Cleared => &[],
            AdGradient::Bands { bands, .. } => bands,
        }
    }
}

fn fraction(distance: f64, width: Option<f64>) -> f64 {
    let Some(width) = width else {
        return 0.0;
    };
    let frac = distance / width;
    if frac.is_finite() {
        frac.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn in_range(point: &CuePoint, range: &SeekRange) -> bool {
    match point.end {
        Some(end) => end > range.start,
        None => point.start >= range.start,
    }
}

/// Maps cue points to sorted track fractions, plus whether a post-roll sentinel
/// was present. Out-of-range and malformed points are dropped.
pub fn ad_bands(cue_points: &[CuePoint], range: &SeekRange, marker_width: f64) -> (Vec<AdBand>, bool) {
    let width = range.usable_width();
    let mut has_post_roll = false;
    let mut bands = Vec::with_capacity(cue_points.len());

    for point in cue_points {
        if point.is_post_roll() {
            has_post_roll = true;
            continue;
        }
        if point.is_malformed() || !in_range(point, range) {
            continue;
        }
        let start = fraction(point.start.max(range.start) - range.start, width);
        let end = match point.end {
            Some(end) => fraction(end - range.start, width),
            None => (start + marker_width).min(1.0),
        };
        bands.push(AdBand { start, end });
    }

    bands.sort_by(|a, b| a.start.total_cmp(&b.start));
    (bands, has_post_roll)
}

pub fn ad_break_gradient(
    cue_points: &[CuePoint],
    range: &SeekRange,
    marker_width: f64,
    color: Color32,
) -> AdGradient {
    if cue_points.is_empty() {
        return AdGradient::Cleared;
    }

    let (mut bands, has_post_roll) = ad_bands(cue_points, range, marker_width);
    if has_post_roll {
        bands.push(AdBand {
            start: POST_ROLL_BAND_START,
            end: 1.0,
        });
    }

    let mut stops = Vec::with_capacity(bands.len() * 4);
    for band in &bands {
        stops.push(GradientStop {
            color: Color32::TRANSPARENT,
            fraction: band.start,
        });
        stops.push(GradientStop {
            color,
            fraction: band.start,
        });
        stops.push(GradientStop {
            color,
            fraction: band.end,
        });
        stops.push(GradientStop {
            color: Color32::TRANSPARENT,
            fraction: band.end,
        });
    }

    AdGradient::Bands { stops, bands }
}
