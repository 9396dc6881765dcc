use egui::{Color32, CornerRadius, FontId, Stroke, TextStyle, Visuals};

use crate::constants::HIT_HEIGHT;

pub const BG_DARK: Color32 = Color32::from_rgb(18, 18, 24);
pub const BG_PANEL: Color32 = Color32::from_rgb(24, 24, 32);
pub const ACCENT: Color32 = Color32::from_rgb(233, 69, 96);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 230, 230);
pub const TEXT_DIM: Color32 = Color32::from_rgb(140, 140, 160);
pub const TRACK_BG: Color32 = Color32::from_rgba_premultiplied(70, 70, 80, 200);
pub const CHAPTER_FILL: Color32 = Color32::from_rgba_premultiplied(147, 146, 146, 163);
pub const KNOB_COLOR: Color32 = Color32::WHITE;
pub const TOOLTIP_BG: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 200);
pub const PREVIEW_BORDER: Color32 = Color32::from_rgb(230, 230, 230);

pub const ROUNDING: CornerRadius = CornerRadius::same(4);
pub const ROUNDING_SM: CornerRadius = CornerRadius::same(3);

/// Caption, tooltip and chapter labels all use the `Small` text style.
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const FOCUS_RING_WIDTH: f32 = 1.5;

/// Dark player chrome. The seek bar reads its focus ring from
/// `selection.stroke` and its label font from `TextStyle::Small`.
pub fn apply_theme(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        style.visuals = Visuals::dark();
        style.visuals.panel_fill = BG_PANEL;
        style.visuals.window_fill = BG_DARK;
        style.visuals.extreme_bg_color = BG_DARK;
        style.visuals.override_text_color = Some(TEXT_PRIMARY);
        style.visuals.selection.bg_fill = ACCENT.gamma_multiply(0.4);
        style.visuals.selection.stroke = Stroke::new(FOCUS_RING_WIDTH, ACCENT);

        style
            .text_styles
            .insert(TextStyle::Small, FontId::proportional(LABEL_FONT_SIZE));
        // Keep the hit area of the bar reachable for touch.
        style.spacing.interact_size.y = style.spacing.interact_size.y.max(HIT_HEIGHT);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_sets_focus_ring_and_label_font() {
        let ctx = egui::Context::default();
        apply_theme(&ctx);
        let style = ctx.style();
        assert_eq!(style.visuals.selection.stroke, Stroke::new(FOCUS_RING_WIDTH, ACCENT));
        assert_eq!(
            style.text_styles.get(&TextStyle::Small),
            Some(&FontId::proportional(LABEL_FONT_SIZE))
        );
        assert!(style.spacing.interact_size.y >= HIT_HEIGHT);
        assert_eq!(style.visuals.panel_fill, BG_PANEL);
    }
}
