/// Horizontal gap between consecutive chapter segments, in percent of the track.
pub const CHAPTER_GAP_PERCENT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub start_time: f64,
    pub end_time: f64,
    pub title: String,
}

impl Chapter {
    pub fn new(start_time: f64, end_time: f64, title: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            title: title.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start_time.is_finite() && self.end_time.is_finite() && self.end_time > self.start_time
    }

    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start_time && seconds <= self.end_time
    }
}

/// A chapter positioned on the track, in percent of track width.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterSegment {
    pub index: usize,
    pub left: f64,
    pub width: f64,
    pub title: String,
}

impl ChapterSegment {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn contains_percent(&self, percent: f64) -> bool {
        percent >= self.left && percent <= self.right()
    }
}

pub fn chapter_at(chapters: &[Chapter], seconds: f64) -> Option<&Chapter> {
    chapters
        .iter()
        .filter(|c| c.is_valid())
        .find(|c| c.contains(seconds))
}

/// Lays chapters out left to right, leaving `gap_percent` between neighbours.
/// Widths are scaled so widths plus gaps never exceed the track.
pub fn layout_chapters(chapters: &[Chapter], duration: f64, gap_percent: f64) -> Vec<ChapterSegment> {
    if !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }

    let mut valid: Vec<(usize, &Chapter)> = chapters
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_valid())
        .collect();
    valid.sort_by(|a, b| a.1.start_time.total_cmp(&b.1.start_time));
    if valid.is_empty() {
        return Vec::new();
    }

    let fractions: Vec<f64> = valid
        .iter()
        .map(|(_, c)| {
            let start = c.start_time.clamp(0.0, duration);
            let end = c.end_time.clamp(0.0, duration);
            (end - start) / duration
        })
        .collect();
    let total: f64 = fractions.iter().sum();
    let norm = if total > 1.0 { total } else { 1.0 };

    let gaps = (valid.len() - 1) as f64;
    let mut gap = gap_percent.max(0.0);
    if gap * gaps >= 100.0 {
        gap = 0.0;
    }
    let available = 100.0 - gap * gaps;

    let mut segments = Vec::with_capacity(valid.len());
    let mut offset = 0.0;
    for ((index, chapter), fraction) in valid.into_iter().zip(fractions) {
        let width = fraction / norm * available;
        segments.push(ChapterSegment {
            index,
            left: offset,
            width,
            title: chapter.title.clone(),
        });
        offset += width + gap;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapters() -> Vec<Chapter> {
        vec![
            Chapter::new(0.0, 30.0, "Intro"),
            Chapter::new(30.0, 90.0, "Middle"),
            Chapter::new(90.0, 120.0, "Credits"),
        ]
    }

    #[test]
    fn segments_accumulate_offsets_with_gaps() {
        let segs = layout_chapters(&chapters(), 120.0, 1.0);
        assert_eq!(segs.len(), 3);
        assert!((segs[0].width - 24.5).abs() < 1e-9);
        assert!((segs[1].left - 25.5).abs() < 1e-9);
        assert!((segs[1].width - 49.0).abs() < 1e-9);
        assert!((segs[2].left - 75.5).abs() < 1e-9);
        assert!((segs[2].right() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn widths_and_gaps_never_exceed_track() {
        let overlapping = vec![
            Chapter::new(0.0, 80.0, "A"),
            Chapter::new(40.0, 120.0, "B"),
            Chapter::new(100.0, 500.0, "C"),
        ];
        let segs = layout_chapters(&overlapping, 120.0, 1.0);
        let last = segs.last().unwrap();
        assert!(last.right() <= 100.0 + 1e-9);
        for pair in segs.windows(2) {
            assert!(pair[0].right() <= pair[1].left);
        }
    }

    #[test]
    fn malformed_chapters_are_skipped() {
        let list = vec![
            Chapter::new(10.0, 10.0, "Empty"),
            Chapter::new(0.0, 60.0, "Only"),
            Chapter::new(f64::NAN, 5.0, "Broken"),
        ];
        let segs = layout_chapters(&list, 60.0, 1.0);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].index, 1);
        assert!((segs[0].width - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_duration_yields_no_segments() {
        assert!(layout_chapters(&chapters(), f64::INFINITY, 1.0).is_empty());
        assert!(layout_chapters(&chapters(), 0.0, 1.0).is_empty());
    }

    #[test]
    fn chapter_at_finds_inclusive_bounds() {
        let list = chapters();
        assert_eq!(chapter_at(&list, 30.0).map(|c| c.title.as_str()), Some("Intro"));
        assert_eq!(chapter_at(&list, 95.0).map(|c| c.title.as_str()), Some("Credits"));
        assert!(chapter_at(&list, 121.0).is_none());
    }
}
