use scrubline_media::ImageTrack;
use scrubline_state::chapter::Chapter;
use scrubline_state::cue::CuePoint;
use scrubline_state::range::SeekRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdInfo {
    pub linear: bool,
}

pub trait MediaEngine {
    fn seek_range(&self) -> SeekRange;
    fn is_live(&self) -> bool;
    fn is_fully_loaded(&self) -> bool;
    fn current_time(&self) -> f64;
    /// `NaN` until metadata is known, infinite for live streams.
    fn duration(&self) -> f64;
    fn is_paused(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
}

pub trait AdManager {
    fn current_ad(&self) -> Option<AdInfo>;
    fn cue_points(&self) -> Vec<CuePoint>;
}

pub trait ChapterSource {
    fn chapters(&self, language: &str) -> Vec<Chapter>;
}

pub trait ImageCatalogue {
    fn image_tracks(&self) -> Vec<ImageTrack>;
    /// Bits per second.
    fn estimated_bandwidth(&self) -> f64;
}

/// Everything the seek bar reads from or drives on the host player.
pub trait Player: MediaEngine + AdManager + ChapterSource + ImageCatalogue {}

impl<T: MediaEngine + AdManager + ChapterSource + ImageCatalogue + ?Sized> Player for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocaleId {
    Seek,
    Live,
}

pub trait Localization: Send + Sync {
    fn resolve(&self, id: LocaleId) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishLocale;

impl Localization for EnglishLocale {
    fn resolve(&self, id: LocaleId) -> String {
        match id {
            LocaleId::Seek => "Seek".to_owned(),
            LocaleId::Live => "LIVE".to_owned(),
        }
    }
}
