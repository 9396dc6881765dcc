use scrubline_state::input::{InputKind, ScrubInput};
use scrubline_state::view::ChapterTooltip;
use tracing::debug;

use super::SeekBar;
use crate::host::Player;

/// Lives from interaction start to interaction end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionState {
    pub input: InputKind,
    pub was_playing_before_drag: bool,
}

impl InteractionState {
    fn should_resume(&self) -> bool {
        self.input.always_resumes() || self.was_playing_before_drag
    }
}

impl SeekBar {
    pub fn handle(&mut self, player: &mut dyn Player, input: ScrubInput, now: f64) {
        if self.released {
            return;
        }
        match input {
            ScrubInput::ChangeStart(kind) => self.on_change_start(player, kind),
            ScrubInput::Change(value) => self.on_change(&*player, value, now),
            ScrubInput::ChangeEnd => self.on_change_end(player, now),
            ScrubInput::PointerMove { x } => self.on_pointer_move(&*player, x),
            ScrubInput::PointerLeave => {
                self.time_tooltip = None;
                self.hide_preview_timer
                    .tick_after(now, self.config.hide_preview_delay_secs);
            }
            ScrubInput::ChapterEnter { index, x, y } => {
                self.chapter_tooltip = self
                    .chapter_segments
                    .iter()
                    .find(|segment| segment.index == index)
                    .map(|segment| ChapterTooltip {
                        title: segment.title.clone(),
                        x: x + 10.0,
                        y: y - 30.0,
                    });
            }
            ScrubInput::ChapterLeave => self.chapter_tooltip = None,
            ScrubInput::TrackResized { width } => self.track_width = width,
        }
    }

    fn on_change_start(&mut self, player: &mut dyn Player, input: InputKind) {
        if self.interaction.is_some() {
            return;
        }
        let was_playing_before_drag = !player.is_paused();
        player.pause();
        self.interaction = Some(InteractionState {
            input,
            was_playing_before_drag,
        });
        debug!(target: "seek_bar", ?input, was_playing_before_drag, "scrub started");
    }

    fn on_change(&mut self, player: &dyn Player, value: f64, now: f64) {
        let duration = player.duration();
        if duration.is_nan() || duration == 0.0 {
            debug!(target: "seek_bar", "change ignored, duration unknown");
            return;
        }

        self.pending_seek = Some(value);
        self.update(player);
        self.value = value;
        self.seek_timer.tick_after(now, self.config.seek_debounce_secs);

        if player.image_tracks().is_empty() {
            self.hide_thumbnail();
            return;
        }
        let value = value.round();
        let pixel = self.range.pixel_at_value(value, self.track_width);
        self.show_thumbnail(player, pixel, value);
    }

    fn on_change_end(&mut self, player: &mut dyn Player, now: f64) {
        self.seek_timer.stop();
        self.commit_seek(player);

        if let Some(interaction) = self.interaction.take() {
            if interaction.should_resume() {
                player.play();
            }
            debug!(
                target: "seek_bar",
                input = ?interaction.input,
                resumed = interaction.should_resume(),
                "scrub ended"
            );
        }

        self.hide_preview_timer
            .tick_after(now, self.config.hide_preview_delay_secs);
        self.update(&*player);
    }

    pub(super) fn commit_seek(&mut self, player: &mut dyn Player) {
        let Some(mut target) = self.pending_seek.take() else {
            return;
        };
        // Some engines treat landing exactly on the end as end of stream.
        if !player.is_live() && target == player.duration() {
            target -= self.config.end_epsilon_secs;
        }
        player.seek(target);
        debug!(target: "seek_bar", value = target, "seek committed");
    }

    fn on_pointer_move(&mut self, player: &dyn Player, x: f32) {
        let value = self.range.value_at_pixel(x, self.track_width);
        if player.image_tracks().is_empty() {
            self.hide_thumbnail();
            self.show_time(x, value);
            return;
        }
        self.time_tooltip = None;
        self.show_thumbnail(player, x, value);
    }
}
