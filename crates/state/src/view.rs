use crate::ad_markers::AdGradient;
use crate::chapter::ChapterSegment;
use crate::range::SeekRange;
use crate::thumbnail::ThumbnailLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeTooltip {
    pub text: String,
    pub pixel: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterTooltip {
    pub title: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub caption: String,
    pub layout: ThumbnailLayout,
    pub has_image: bool,
}

/// Everything the widget needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeekBarView {
    pub visible: bool,
    pub live: bool,
    pub value: f64,
    pub range: SeekRange,
    pub ad_gradient: AdGradient,
    pub chapters: Vec<ChapterSegment>,
    pub time_tooltip: Option<TimeTooltip>,
    pub chapter_tooltip: Option<ChapterTooltip>,
    pub preview: Option<PreviewView>,
    pub aria_label: String,
}
