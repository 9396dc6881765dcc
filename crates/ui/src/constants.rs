use egui::vec2;

pub const TRACK_HEIGHT: f32 = 6.0;
pub const HIT_HEIGHT: f32 = 22.0;
pub const KNOB_RADIUS: f32 = 7.0;
pub const TOOLTIP_HEIGHT: f32 = 20.0;
pub const TOOLTIP_PADDING: egui::Vec2 = vec2(6.0, 3.0);
pub const CAPTION_HEIGHT: f32 = 18.0;
pub const KEYBOARD_STEP_SECS: f64 = 5.0;
pub const TOOLTIP_OFFSET_TOP: f32 = -10.0;
