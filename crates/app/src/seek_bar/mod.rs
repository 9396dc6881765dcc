mod ad_breaks;
mod interaction;
mod preview;

use std::sync::{mpsc, Arc};

use scrubline_media::{ThumbnailError, ThumbnailImage, ThumbnailPipeline};
use scrubline_state::ad_markers::AdGradient;
use scrubline_state::chapter::{layout_chapters, Chapter, ChapterSegment};
use scrubline_state::config::ScrubConfig;
use scrubline_state::cue::CuePoint;
use scrubline_state::range::SeekRange;
use scrubline_state::view::{ChapterTooltip, PreviewView, SeekBarView, TimeTooltip};
use scrubline_state::visibility::should_display;
use tracing::debug;

use crate::host::{AdInfo, LocaleId, Localization, Player};
use crate::notify::{Notification, Subscription};
use crate::timer::Timer;

pub use interaction::InteractionState;

/// Scrub/preview coordinator behind the seek bar widget.
///
/// Single-threaded and polled: the host forwards widget input to `handle` and
/// calls `tick` every frame with the frame clock. Thumbnail work runs on the
/// pipeline's runtime and lands during `tick`.
pub struct SeekBar {
    config: ScrubConfig,
    localization: Arc<dyn Localization>,
    pipeline: ThumbnailPipeline,
    subscription: Option<Subscription>,
    diagnostics: Option<mpsc::Sender<ThumbnailError>>,

    seek_timer: Timer,
    hide_preview_timer: Timer,
    ad_poll_timer: Timer,

    interaction: Option<InteractionState>,
    pending_seek: Option<f64>,
    value: f64,
    range: SeekRange,
    live: bool,
    duration: f64,
    visible: bool,
    track_width: f32,

    ad: Option<AdInfo>,
    cue_points: Vec<CuePoint>,
    ad_markers_wait_for_load: bool,
    ad_gradient: AdGradient,

    chapters: Vec<Chapter>,
    chapter_segments: Vec<ChapterSegment>,
    chapter_tooltip: Option<ChapterTooltip>,

    time_tooltip: Option<TimeTooltip>,
    preview_target: Option<preview::PreviewTarget>,
    preview: Option<PreviewView>,
    image_generation: u64,

    aria_label: String,
    released: bool,
}

impl SeekBar {
    pub fn new(
        config: ScrubConfig,
        pipeline: ThumbnailPipeline,
        localization: Arc<dyn Localization>,
        subscription: Subscription,
        player: &dyn Player,
        now: f64,
    ) -> Self {
        let chapters = player.chapters(&config.chapter_language);
        let aria_label = localization.resolve(LocaleId::Seek);
        let mut bar = Self {
            config,
            localization,
            pipeline,
            subscription: Some(subscription),
            diagnostics: None,
            seek_timer: Timer::new(),
            hide_preview_timer: Timer::new(),
            ad_poll_timer: Timer::new(),
            interaction: None,
            pending_seek: None,
            value: player.current_time(),
            range: SeekRange::default(),
            live: false,
            duration: f64::NAN,
            visible: false,
            track_width: 0.0,
            ad: player.current_ad(),
            cue_points: Vec::new(),
            ad_markers_wait_for_load: false,
            ad_gradient: AdGradient::Cleared,
            chapters,
            chapter_segments: Vec::new(),
            chapter_tooltip: None,
            time_tooltip: None,
            preview_target: None,
            preview: None,
            image_generation: 0,
            aria_label,
            released: false,
        };
        bar.update(player);

        let cue_points = player.cue_points();
        if !cue_points.is_empty() {
            bar.set_cue_points(player, cue_points, now);
        }
        bar
    }

    /// Reports thumbnail failures other than supersession.
    pub fn with_diagnostics(mut self, tx: mpsc::Sender<ThumbnailError>) -> Self {
        self.diagnostics = Some(tx);
        self
    }

    /// Re-reads range, duration and visibility from the player. Outside an
    /// interaction the displayed value follows the playhead.
    pub fn update(&mut self, player: &dyn Player) {
        if self.released {
            return;
        }
        self.range = player.seek_range();
        self.live = player.is_live();
        self.duration = player.duration();
        if self.interaction.is_none() {
            self.value = player.current_time();
        }
        self.chapter_segments =
            layout_chapters(&self.chapters, self.duration, self.config.chapter_gap_percent);
        self.refresh_visibility();
    }

    fn refresh_visibility(&mut self) {
        let linear_ad = self.ad.is_some_and(|ad| ad.linear);
        let visible = should_display(
            &self.range,
            self.live,
            linear_ad,
            self.config.min_seek_window_secs,
        );
        if visible != self.visible {
            debug!(target: "seek_bar", visible, "seek bar visibility changed");
        }
        self.visible = visible;
    }

    /// Drains notifications, fires due timers and applies finished thumbnail work.
    pub fn tick(&mut self, player: &mut dyn Player, now: f64) {
        if self.released {
            return;
        }

        let notifications = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();
        for notification in notifications {
            self.on_notification(&*player, notification, now);
        }

        if self.seek_timer.poll(now) {
            self.commit_seek(player);
        }
        if self.hide_preview_timer.poll(now) {
            self.hide_thumbnail();
        }
        if self.ad_poll_timer.poll(now) {
            self.mark_ad_breaks(&*player);
        }

        for update in self.pipeline.poll() {
            self.apply_preview_update(update);
        }
    }

    fn on_notification(&mut self, player: &dyn Player, notification: Notification, now: f64) {
        match notification {
            Notification::AdStarted(ad) => {
                self.ad = Some(ad);
                self.update(player);
            }
            Notification::AdStopped => {
                self.ad = None;
                self.update(player);
            }
            Notification::CuePointsChanged(cue_points) => {
                self.set_cue_points(player, cue_points, now);
            }
            Notification::Loaded => {
                self.chapters = player.chapters(&self.config.chapter_language);
                if self.ad_markers_wait_for_load {
                    self.ad_markers_wait_for_load = false;
                    self.refresh_ad_markers(player, now);
                }
                self.update(player);
            }
            Notification::Unloading => self.unload(),
            Notification::LocaleChanged => {
                self.aria_label = self.localization.resolve(LocaleId::Seek);
            }
            Notification::TimeUpdate => self.update(player),
        }
    }

    fn unload(&mut self) {
        self.cue_points.clear();
        self.clear_ad_markers();
        self.hide_thumbnail();
        self.time_tooltip = None;
    }

    /// Stops every timer, aborts thumbnail work and deregisters from the bus.
    /// Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.seek_timer.stop();
        self.hide_preview_timer.stop();
        self.ad_poll_timer.stop();
        self.pipeline.clear();
        self.subscription = None;
        self.interaction = None;
        self.pending_seek = None;
        self.preview_target = None;
        self.preview = None;
        self.time_tooltip = None;
        self.chapter_tooltip = None;
        debug!(target: "seek_bar", "seek bar released");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn view(&self) -> SeekBarView {
        let has_image = self.pipeline.displayed().is_some();
        SeekBarView {
            visible: self.visible,
            live: self.live,
            value: self.value,
            range: self.range,
            ad_gradient: self.ad_gradient.clone(),
            chapters: self.chapter_segments.clone(),
            time_tooltip: self.time_tooltip.clone(),
            chapter_tooltip: self.chapter_tooltip.clone(),
            preview: self.preview.clone().map(|preview| PreviewView {
                has_image,
                ..preview
            }),
            aria_label: self.aria_label.clone(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_some()
    }

    pub fn ad_gradient(&self) -> &AdGradient {
        &self.ad_gradient
    }

    pub fn is_polling_ad_breaks(&self) -> bool {
        self.ad_poll_timer.is_armed()
    }

    pub fn aria_label(&self) -> &str {
        &self.aria_label
    }

    pub fn displayed_image(&self) -> Option<&ThumbnailImage> {
        self.pipeline.displayed()
    }

    /// Bumped whenever the displayed image is replaced or cleared.
    pub fn image_generation(&self) -> u64 {
        self.image_generation
    }

    pub fn thumbnail_fetches(&self) -> u64 {
        self.pipeline.fetches_started()
    }

    /// Earliest pending timer deadline, for scheduling the next repaint.
    pub fn next_deadline(&self) -> Option<f64> {
        [
            self.seek_timer.deadline(),
            self.hide_preview_timer.deadline(),
            self.ad_poll_timer.deadline(),
        ]
        .into_iter()
        .flatten()
        .reduce(f64::min)
    }

    pub fn is_fetching_thumbnail(&self) -> bool {
        self.pipeline.is_fetching()
    }

    /// Thumbnail work that will land on a later tick.
    pub fn has_pending_thumbnail(&self) -> bool {
        self.pipeline.has_pending_work()
    }
}
