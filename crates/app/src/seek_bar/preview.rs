use scrubline_media::{select_image_track, PreviewUpdate};
use scrubline_state::chapter::chapter_at;
use scrubline_state::thumbnail::{layout_thumbnail, ThumbnailDescriptor};
use scrubline_state::time_format::format_clock;
use scrubline_state::view::{PreviewView, TimeTooltip};
use tracing::debug;

use super::SeekBar;
use crate::host::{LocaleId, Player};

/// Where the pointer was when the pending thumbnail was requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PreviewTarget {
    pub pixel: f32,
    pub value: f64,
}

impl SeekBar {
    pub(super) fn show_thumbnail(&mut self, player: &dyn Player, pixel: f32, value: f64) {
        let tracks = player.image_tracks();
        let Some(track) = select_image_track(
            &tracks,
            player.estimated_bandwidth(),
            &self.config.thumbnails,
        ) else {
            self.hide_thumbnail();
            return;
        };

        self.hide_preview_timer.stop();
        let value = value.max(0.0);
        let time = self.range.clamp_whole_seconds(value);
        self.preview_target = Some(PreviewTarget { pixel, value });
        self.pipeline.request(track, time);
    }

    /// Hides the preview and drops the cached thumbnail along with any fetch.
    pub(super) fn hide_thumbnail(&mut self) {
        let had_image = self.pipeline.displayed().is_some();
        self.preview_target = None;
        self.preview = None;
        self.pipeline.clear();
        if had_image {
            self.image_generation += 1;
        }
    }

    pub(super) fn show_time(&mut self, pixel: f32, value: f64) {
        let text = if self.live {
            self.live_offset_text(self.range.end - value)
        } else {
            format_clock(value - self.range.start)
        };
        self.time_tooltip = Some(TimeTooltip { text, pixel });
    }

    fn live_offset_text(&self, behind_edge: f64) -> String {
        if behind_edge < 1.0 {
            self.localization.resolve(LocaleId::Live)
        } else {
            format!("-{}", format_clock(behind_edge))
        }
    }

    fn preview_caption(&self, value: f64) -> String {
        let total_seconds = if self.live {
            self.range.end - value
        } else {
            value - self.range.start
        };
        if let Some(chapter) = chapter_at(&self.chapters, total_seconds) {
            return chapter.title.clone();
        }
        if self.live {
            self.live_offset_text(total_seconds)
        } else {
            format_clock(value)
        }
    }

    fn lay_out_preview(&mut self, descriptor: &ThumbnailDescriptor) {
        let Some(target) = self.preview_target else {
            return;
        };
        let layout = layout_thumbnail(
            descriptor,
            self.config.preview_width,
            self.config.preview_offset_top,
            target.pixel,
            self.track_width,
        );
        self.preview = Some(PreviewView {
            caption: self.preview_caption(target.value),
            layout,
            has_image: false,
        });
    }

    pub(super) fn apply_preview_update(&mut self, update: PreviewUpdate) {
        match update {
            PreviewUpdate::Show(descriptor) => self.lay_out_preview(&descriptor),
            PreviewUpdate::Hide => self.hide_thumbnail(),
            PreviewUpdate::ImageChanged => self.image_generation += 1,
            PreviewUpdate::Failed(err) => {
                self.image_generation += 1;
                if let Some(tx) = &self.diagnostics {
                    if tx.send(err).is_err() {
                        debug!(target: "thumbnails", "diagnostics receiver dropped");
                        self.diagnostics = None;
                    }
                }
            }
        }
    }

    /// Waits for the next thumbnail result and applies it.
    pub async fn wait_for_preview(&mut self) -> bool {
        match self.pipeline.next_update().await {
            Some(update) => {
                self.apply_preview_update(update);
                true
            }
            None => false,
        }
    }
}
