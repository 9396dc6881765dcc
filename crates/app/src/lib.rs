pub mod demo;
pub mod host;
pub mod notify;
pub mod seek_bar;
pub mod texture_cache;
pub mod timer;

use std::sync::{mpsc, Arc};
use std::time::Duration;

use scrubline_media::{ThumbnailError, ThumbnailPipeline};
use scrubline_state::config::ScrubConfig;
use scrubline_state::time_format::format_clock;
use scrubline_ui::seek_bar::SeekBarState;
use tracing::warn;

use crate::demo::{SimulatedPlayer, SyntheticThumbnails};
use crate::host::{EnglishLocale, MediaEngine};
use crate::seek_bar::SeekBar;
use crate::texture_cache::TextureCache;

pub struct ScrubApp {
    _runtime: tokio::runtime::Runtime,
    player: SimulatedPlayer,
    seek_bar: SeekBar,
    widget: SeekBarState,
    textures: TextureCache,
    diagnostics_rx: mpsc::Receiver<ThumbnailError>,
    last_error: Option<String>,
}

impl ScrubApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        config: ScrubConfig,
        live: bool,
        duration: f64,
    ) -> Self {
        scrubline_ui::theme::apply_theme(&cc.egui_ctx);
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut player = if live {
            SimulatedPlayer::live()
        } else {
            SimulatedPlayer::vod(duration)
        };
        let thumbnails = Arc::new(SyntheticThumbnails);
        let pipeline = ThumbnailPipeline::new(
            runtime.handle().clone(),
            thumbnails.clone(),
            thumbnails,
            config.thumbnails.clone(),
        );
        let (diagnostics_tx, diagnostics_rx) = mpsc::channel();
        let subscription = player.subscribe();
        let now = cc.egui_ctx.input(|i| i.time);
        let seek_bar = SeekBar::new(
            config,
            pipeline,
            Arc::new(EnglishLocale),
            subscription,
            &player,
            now,
        )
        .with_diagnostics(diagnostics_tx);

        Self {
            _runtime: runtime,
            player,
            seek_bar,
            widget: SeekBarState::default(),
            textures: TextureCache::default(),
            diagnostics_rx,
            last_error: None,
        }
    }

    fn poll_diagnostics(&mut self) {
        while let Ok(err) = self.diagnostics_rx.try_recv() {
            warn!(error = %err, "thumbnail diagnostics");
            self.last_error = Some(err.to_string());
        }
    }

    fn status_text(&self) -> String {
        let range = self.player.seek_range();
        let position = if self.player.is_live() {
            let behind = range.end - self.player.current_time();
            if behind < 1.0 {
                "LIVE".to_owned()
            } else {
                format!("-{}", format_clock(behind))
            }
        } else {
            format!(
                "{} / {}",
                format_clock(self.player.current_time()),
                format_clock(range.end)
            )
        };
        let state = if self.player.is_ad_playing() {
            "ad"
        } else if self.player.is_paused() {
            "paused"
        } else {
            "playing"
        };
        format!("{position}  ({state})")
    }
}

impl eframe::App for ScrubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.player.advance(now);
        handle_keyboard(ctx, &mut self.player);

        self.seek_bar.tick(&mut self.player, now);
        self.poll_diagnostics();
        let status = self.status_text();

        egui::TopBottomPanel::bottom("seek_bar_panel")
            .exact_height(64.0)
            .show(ctx, |ui| {
                ui.add_space(12.0);
                let view = self.seek_bar.view();
                let inputs =
                    scrubline_ui::seek_bar::seek_bar(ui, &view, &self.textures, &mut self.widget);
                for input in inputs {
                    self.seek_bar.handle(&mut self.player, input, now);
                }
                ui.horizontal(|ui| {
                    ui.label(&status);
                    if !self.seek_bar.is_visible() {
                        ui.label(egui::RichText::new("seek bar hidden").color(scrubline_ui::theme::TEXT_DIM));
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.35);
                ui.heading(&status);
                ui.label(
                    egui::RichText::new("Space: play/pause   A: toggle linear ad   ←/→: step when focused")
                        .color(scrubline_ui::theme::TEXT_DIM),
                );
                if let Some(err) = &self.last_error {
                    ui.label(egui::RichText::new(err).color(scrubline_ui::theme::ACCENT));
                }
            });
        });

        self.textures.sync_preview(
            ctx,
            self.seek_bar.image_generation(),
            self.seek_bar.displayed_image(),
        );

        let delay = repaint_delay(
            self.player.is_clock_running(),
            self.seek_bar.has_pending_thumbnail(),
            self.seek_bar.next_deadline(),
            now,
        );
        if let Some(delay) = delay {
            ctx.request_repaint_after(delay);
        }
    }
}

/// When the next frame is due without input. A moving clock or thumbnail work
/// in flight needs every frame; otherwise the earliest seek bar timer decides.
fn repaint_delay(
    clock_running: bool,
    pending_thumbnail: bool,
    next_deadline: Option<f64>,
    now: f64,
) -> Option<Duration> {
    if clock_running || pending_thumbnail {
        return Some(Duration::ZERO);
    }
    next_deadline.map(|deadline| Duration::from_secs_f64((deadline - now).max(0.0)))
}

impl Drop for ScrubApp {
    fn drop(&mut self) {
        self.seek_bar.release();
    }
}

fn handle_keyboard(ctx: &egui::Context, player: &mut SimulatedPlayer) {
    ctx.input(|i| {
        if i.key_pressed(egui::Key::Space) {
            player.toggle_play();
        }
        if i.key_pressed(egui::Key::A) {
            player.toggle_linear_ad();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_app_sleeps_until_the_next_timer() {
        assert_eq!(repaint_delay(false, false, None, 3.0), None);
        assert_eq!(
            repaint_delay(false, false, Some(3.25), 3.0),
            Some(Duration::from_millis(250))
        );
        assert_eq!(repaint_delay(false, false, Some(2.0), 3.0), Some(Duration::ZERO));
    }

    #[test]
    fn moving_clock_or_thumbnail_work_repaints_immediately() {
        assert_eq!(repaint_delay(true, false, None, 0.0), Some(Duration::ZERO));
        assert_eq!(repaint_delay(false, true, Some(9.0), 0.0), Some(Duration::ZERO));
    }
}
