use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use scrubline_media::{ImageTrack, SegmentFetcher, SegmentRequest, ThumbnailError, ThumbnailResolver};
use scrubline_state::chapter::Chapter;
use scrubline_state::cue::CuePoint;
use scrubline_state::range::SeekRange;
use scrubline_state::thumbnail::{ByteRange, ThumbnailDescriptor};
use tracing::info;

use crate::host::{AdInfo, AdManager, ChapterSource, ImageCatalogue, MediaEngine};
use crate::notify::{Notification, NotificationBus, Subscription};

pub const LIVE_WINDOW_SECS: f64 = 120.0;
const LIVE_START_SECS: f64 = 3600.0;

/// A clock-driven stand-in for a real player, VOD or live.
pub struct SimulatedPlayer {
    bus: NotificationBus,
    live: bool,
    duration: f64,
    position: f64,
    live_edge: f64,
    paused: bool,
    loaded: bool,
    last_now: Option<f64>,
    ad: Option<AdInfo>,
    cue_points: Vec<CuePoint>,
    chapters: Vec<Chapter>,
    tracks: Vec<ImageTrack>,
}

impl SimulatedPlayer {
    pub fn vod(duration: f64) -> Self {
        let duration = duration.max(1.0);
        let quarter = duration / 4.0;
        let chapters = ["Opening", "Setup", "Turn", "Finale"]
            .iter()
            .enumerate()
            .map(|(i, title)| Chapter::new(quarter * i as f64, quarter * (i + 1) as f64, *title))
            .collect();
        let cue_points = vec![
            CuePoint::new(duration * 0.3, Some(duration * 0.3 + 15.0)),
            CuePoint::marker(duration * 0.65),
            CuePoint::post_roll(),
        ];
        Self::new(false, duration, 0.0, cue_points, chapters)
    }

    pub fn live() -> Self {
        let edge = LIVE_START_SECS;
        let cue_points = vec![
            CuePoint::new(edge - 300.0, Some(edge - 240.0)),
            CuePoint::new(edge - 80.0, Some(edge - 50.0)),
            CuePoint::marker(edge + 30.0),
        ];
        Self::new(true, f64::INFINITY, edge, cue_points, Vec::new())
    }

    fn new(
        live: bool,
        duration: f64,
        position: f64,
        cue_points: Vec<CuePoint>,
        chapters: Vec<Chapter>,
    ) -> Self {
        Self {
            bus: NotificationBus::new(),
            live,
            duration,
            position,
            live_edge: LIVE_START_SECS,
            paused: false,
            loaded: false,
            last_now: None,
            ad: None,
            cue_points,
            chapters,
            tracks: vec![ImageTrack::new(1, "image/png", "", 20_000)],
        }
    }

    pub fn subscribe(&mut self) -> Subscription {
        self.bus.subscribe()
    }

    /// Moves the clock forward. The first call finishes loading.
    pub fn advance(&mut self, now: f64) {
        let Some(last) = self.last_now.replace(now) else {
            self.loaded = true;
            info!(live = self.live, "simulated media loaded");
            self.bus.publish(Notification::Loaded);
            self.bus
                .publish(Notification::CuePointsChanged(self.cue_points.clone()));
            return;
        };
        let dt = (now - last).max(0.0);

        if self.live {
            self.live_edge += dt;
        }
        if !self.paused && self.ad.is_none() {
            self.position += dt;
        }
        let range = self.seek_range();
        if !self.live && self.position >= range.end {
            self.paused = true;
        }
        self.position = self.position.clamp(range.start, range.end);
        self.bus.publish(Notification::TimeUpdate);
    }

    pub fn toggle_linear_ad(&mut self) {
        match self.ad.take() {
            Some(_) => {
                info!("linear ad stopped");
                self.bus.publish(Notification::AdStopped);
            }
            None => {
                let ad = AdInfo { linear: true };
                self.ad = Some(ad);
                info!("linear ad started");
                self.bus.publish(Notification::AdStarted(ad));
            }
        }
    }

    pub fn toggle_play(&mut self) {
        if self.paused {
            self.play();
        } else {
            self.pause();
        }
    }

    pub fn is_ad_playing(&self) -> bool {
        self.ad.is_some()
    }

    /// Whether the position or the live window moves on its own.
    pub fn is_clock_running(&self) -> bool {
        self.live || (!self.paused && self.ad.is_none())
    }
}

impl MediaEngine for SimulatedPlayer {
    fn seek_range(&self) -> SeekRange {
        if self.live {
            SeekRange::new((self.live_edge - LIVE_WINDOW_SECS).max(0.0), self.live_edge)
        } else {
            SeekRange::new(0.0, self.duration)
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn is_fully_loaded(&self) -> bool {
        self.loaded
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        if self.loaded {
            self.duration
        } else {
            f64::NAN
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        if !self.live && self.position >= self.duration {
            self.position = 0.0;
        }
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn seek(&mut self, time: f64) {
        let range = self.seek_range();
        self.position = time.clamp(range.start, range.end);
    }
}

impl AdManager for SimulatedPlayer {
    fn current_ad(&self) -> Option<AdInfo> {
        self.ad
    }

    fn cue_points(&self) -> Vec<CuePoint> {
        self.cue_points.clone()
    }
}

impl ChapterSource for SimulatedPlayer {
    fn chapters(&self, _language: &str) -> Vec<Chapter> {
        self.chapters.clone()
    }
}

impl ImageCatalogue for SimulatedPlayer {
    fn image_tracks(&self) -> Vec<ImageTrack> {
        self.tracks.clone()
    }

    fn estimated_bandwidth(&self) -> f64 {
        5_000_000.0
    }
}

const TILE_W: u32 = 160;
const TILE_H: u32 = 90;
const COLUMNS: u32 = 5;
const ROWS: u32 = 5;
const SECS_PER_TILE: f64 = 2.0;
const SHEET_BYTES: u64 = 1 << 20;

/// Offline sprite sheets rendered on demand, one tile per two seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticThumbnails;

fn hue_color(index: u64) -> Rgba<u8> {
    let hue = (index * 37 % 360) as f32 / 60.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let channel = |v: f32| (60.0 + v * 140.0) as u8;
    Rgba([channel(r), channel(g), channel(b), 255])
}

fn render_sheet(sheet: u64) -> RgbaImage {
    let tiles_per_sheet = (COLUMNS * ROWS) as u64;
    RgbaImage::from_fn(TILE_W * COLUMNS, TILE_H * ROWS, |x, y| {
        let (col, row) = (x / TILE_W, y / TILE_H);
        let (tx, ty) = (x % TILE_W, y % TILE_H);
        let index = sheet * tiles_per_sheet + (row * COLUMNS + col) as u64;
        let progress = TILE_W * ((index % 10) as u32 + 1) / 10;
        if tx == 0 || ty == 0 {
            Rgba([20, 20, 20, 255])
        } else if ty > TILE_H - 10 && tx < progress {
            Rgba([240, 240, 240, 255])
        } else {
            hue_color(index)
        }
    })
}

#[async_trait]
impl ThumbnailResolver for SyntheticThumbnails {
    async fn thumbnail(&self, _track_id: u32, time: f64) -> Option<ThumbnailDescriptor> {
        if !time.is_finite() || time < 0.0 {
            return None;
        }
        let index = (time / SECS_PER_TILE).floor() as u64;
        let tiles_per_sheet = (COLUMNS * ROWS) as u64;
        let (sheet, cell) = (index / tiles_per_sheet, (index % tiles_per_sheet) as u32);
        let (x, y) = ((cell % COLUMNS) * TILE_W, (cell / COLUMNS) * TILE_H);
        Some(ThumbnailDescriptor {
            uris: vec![format!(
                "offline:synthetic/sheet-{sheet}.png#xywh={x},{y},{TILE_W},{TILE_H}"
            )],
            width: TILE_W as f64,
            height: TILE_H as f64,
            position_x: x as f64,
            position_y: y as f64,
            image_width: None,
            image_height: None,
            sprite: true,
            byte_range: ByteRange::new(sheet * SHEET_BYTES, Some((sheet + 1) * SHEET_BYTES - 1)),
            codec_hint: String::new(),
        })
    }
}

#[async_trait]
impl SegmentFetcher for SyntheticThumbnails {
    async fn fetch(&self, request: SegmentRequest) -> Result<Vec<u8>, ThumbnailError> {
        if request.uris.is_empty() {
            return Err(ThumbnailError::NoUris);
        }
        // Pretend to be a storage round trip so supersession is visible.
        tokio::time::sleep(Duration::from_millis(60)).await;
        let sheet = request.byte_range.start / SHEET_BYTES;
        let mut bytes = Vec::new();
        render_sheet(sheet).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubline_media::ThumbnailImage;

    #[tokio::test]
    async fn synthetic_tiles_share_a_sheet_key() {
        let thumbs = SyntheticThumbnails;
        let a = thumbs.thumbnail(1, 0.0).await.unwrap();
        let b = thumbs.thumbnail(1, 7.0).await.unwrap();
        let c = thumbs.thumbnail(1, 60.0).await.unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!((b.position_x, b.position_y), (480.0, 0.0));
        assert!(a.key().unwrap().is_offline());
    }

    #[tokio::test]
    async fn synthetic_sheet_decodes_as_png() {
        let thumbs = SyntheticThumbnails;
        let descriptor = thumbs.thumbnail(1, 3.0).await.unwrap();
        let request = SegmentRequest::for_thumbnail(&descriptor, &Default::default());
        let bytes = thumbs.fetch(request).await.unwrap();
        let image = scrubline_media::decode::decode_segment(&bytes, "image/png", false).unwrap();
        let shown = ThumbnailImage::Decoded(std::sync::Arc::new(image));
        assert_eq!(shown.size(), Some((TILE_W * COLUMNS, TILE_H * ROWS)));
    }

    #[test]
    fn live_player_window_slides_with_the_clock() {
        let mut player = SimulatedPlayer::live();
        let _sub = player.subscribe();
        player.advance(0.0);
        let before = player.seek_range();
        player.advance(10.0);
        let after = player.seek_range();
        assert_eq!(after.end - before.end, 10.0);
        assert_eq!(after.width(), LIVE_WINDOW_SECS);
    }

    #[test]
    fn clock_stops_for_pause_and_ads_but_not_live() {
        let mut vod = SimulatedPlayer::vod(60.0);
        assert!(vod.is_clock_running());
        vod.pause();
        assert!(!vod.is_clock_running());
        vod.play();
        vod.toggle_linear_ad();
        assert!(!vod.is_clock_running());

        let mut live = SimulatedPlayer::live();
        live.pause();
        assert!(live.is_clock_running());
    }

    #[test]
    fn vod_player_pauses_at_end() {
        let mut player = SimulatedPlayer::vod(30.0);
        player.advance(0.0);
        player.advance(45.0);
        assert!(player.is_paused());
        assert_eq!(player.current_time(), 30.0);
    }
}
