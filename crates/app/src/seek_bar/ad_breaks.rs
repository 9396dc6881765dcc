use scrubline_state::ad_markers::{ad_break_gradient, AdGradient};
use scrubline_state::cue::CuePoint;
use tracing::debug;

use super::SeekBar;
use crate::host::Player;

impl SeekBar {
    /// Replaces the cue list and redraws the markers, deferring the first
    /// computation until the media has loaded.
    pub(super) fn set_cue_points(&mut self, player: &dyn Player, cue_points: Vec<CuePoint>, now: f64) {
        self.cue_points = cue_points;
        if player.is_fully_loaded() {
            self.refresh_ad_markers(player, now);
        } else {
            debug!(target: "ad_markers", "deferring ad markers until loaded");
            self.ad_markers_wait_for_load = true;
        }
    }

    pub(super) fn refresh_ad_markers(&mut self, player: &dyn Player, now: f64) {
        self.mark_ad_breaks(player);
        if self.cue_points.is_empty() {
            return;
        }
        let width = player.seek_range().width();
        // A live window slides, so cues outside it now may enter it later.
        if player.is_live() && width > self.config.min_seek_window_secs {
            self.ad_poll_timer
                .tick_every(now, self.config.ad_poll_interval_secs);
        }
    }

    pub(super) fn mark_ad_breaks(&mut self, player: &dyn Player) {
        if self.cue_points.is_empty() {
            self.clear_ad_markers();
            return;
        }

        let range = player.seek_range();
        self.ad_gradient = ad_break_gradient(
            &self.cue_points,
            &range,
            self.config.marker_width,
            self.config.ad_break_color(),
        );

        let window_too_small = !range
            .usable_width()
            .is_some_and(|width| width > self.config.min_seek_window_secs);
        if self.ad_poll_timer.is_armed() && window_too_small {
            debug!(target: "ad_markers", width = range.width(), "live window too small, ad polling stopped");
            self.ad_poll_timer.stop();
        }
    }

    pub(super) fn clear_ad_markers(&mut self) {
        self.ad_gradient = AdGradient::Cleared;
        self.ad_markers_wait_for_load = false;
        if self.ad_poll_timer.is_armed() {
            debug!(target: "ad_markers", "no cue points left, ad polling stopped");
        }
        self.ad_poll_timer.stop();
    }
}
