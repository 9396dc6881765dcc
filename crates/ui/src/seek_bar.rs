use egui::load::{SizedTexture, TexturePoll};
use egui::{pos2, vec2, Align2, Color32, CornerRadius, FontId, Pos2, Rect, Sense, TextStyle};
use scrubline_state::input::{InputKind, ScrubInput};
use scrubline_state::thumbnail::{popup_left, ImageExtent};
use scrubline_state::view::{PreviewView, SeekBarView};

use crate::constants::*;
use crate::theme;
use crate::TextureLookup;

/// Widget memory that egui does not keep for us.
#[derive(Debug, Default)]
pub struct SeekBarState {
    track_width: f32,
    hovering: bool,
    dragging: bool,
    hovered_chapter: Option<usize>,
    last_pointer_x: Option<f32>,
}

fn value_at(view: &SeekBarView, track: Rect, x: f32) -> f64 {
    if track.width() <= 0.0 {
        return view.range.start;
    }
    let fraction = ((x - track.left()) / track.width()).clamp(0.0, 1.0) as f64;
    view.range.start + view.range.width() * fraction
}

fn x_at_fraction(track: Rect, fraction: f64) -> f32 {
    track.left() + track.width() * fraction.clamp(0.0, 1.0) as f32
}

/// Paints the seek bar and reports what the user did this frame.
pub fn seek_bar(
    ui: &mut egui::Ui,
    view: &SeekBarView,
    textures: &dyn TextureLookup,
    state: &mut SeekBarState,
) -> Vec<ScrubInput> {
    let mut events = Vec::new();
    let (rect, response) =
        ui.allocate_exact_size(vec2(ui.available_width(), HIT_HEIGHT), Sense::click_and_drag());
    response.widget_info(|| {
        egui::WidgetInfo::labeled(egui::WidgetType::Slider, ui.is_enabled(), &view.aria_label)
    });

    if rect.width() != state.track_width {
        state.track_width = rect.width();
        events.push(ScrubInput::TrackResized { width: rect.width() });
    }

    if !view.visible {
        if state.dragging {
            state.dragging = false;
            events.push(ScrubInput::ChangeEnd);
        }
        leave(state, &mut events);
        return events;
    }

    let track = Rect::from_center_size(rect.center(), vec2(rect.width(), TRACK_HEIGHT));
    draw_track(ui.painter(), track, view, state.hovering || state.dragging);

    handle_pointer(ui, &response, view, track, state, &mut events);
    handle_keys(ui, &response, view, &mut events);
    if response.has_focus() {
        ui.painter().rect_stroke(
            rect,
            theme::ROUNDING_SM,
            ui.visuals().selection.stroke,
            egui::StrokeKind::Outside,
        );
    }

    let font = TextStyle::Small.resolve(ui.style());

    let overlay = ui.ctx().layer_painter(egui::LayerId::new(
        egui::Order::Tooltip,
        egui::Id::new("seek_bar_overlay"),
    ));
    if let Some(tooltip) = &view.time_tooltip {
        let galley = overlay.layout_no_wrap(tooltip.text.clone(), font.clone(), theme::TEXT_PRIMARY);
        let width = galley.size().x + TOOLTIP_PADDING.x * 2.0;
        let left = popup_left(tooltip.pixel, width, track.width());
        let bubble = Rect::from_min_size(
            pos2(track.left() + left, rect.top() - (TOOLTIP_HEIGHT - TOOLTIP_OFFSET_TOP)),
            vec2(width, TOOLTIP_HEIGHT),
        );
        overlay.rect_filled(bubble, theme::ROUNDING_SM, theme::TOOLTIP_BG);
        overlay.galley(bubble.min + TOOLTIP_PADDING, galley, theme::TEXT_PRIMARY);
    }
    if let Some(preview) = &view.preview {
        draw_preview(ui.ctx(), &overlay, rect, track, preview, textures, font.clone());
    }
    if let Some(tooltip) = &view.chapter_tooltip {
        let galley = overlay.layout_no_wrap(tooltip.title.clone(), font, theme::TEXT_PRIMARY);
        let bubble = Rect::from_min_size(
            pos2(tooltip.x, tooltip.y),
            galley.size() + TOOLTIP_PADDING * 2.0,
        );
        overlay.rect_filled(bubble, theme::ROUNDING_SM, theme::TOOLTIP_BG);
        overlay.galley(bubble.min + TOOLTIP_PADDING, galley, theme::TEXT_PRIMARY);
    }

    events
}

fn draw_track(painter: &egui::Painter, track: Rect, view: &SeekBarView, active: bool) {
    painter.rect_filled(track, CornerRadius::ZERO, theme::TRACK_BG);

    for segment in &view.chapters {
        let chapter_rect = Rect::from_min_max(
            pos2(x_at_fraction(track, segment.left / 100.0), track.top()),
            pos2(x_at_fraction(track, segment.right() / 100.0), track.bottom()),
        );
        painter.rect_filled(chapter_rect, CornerRadius::ZERO, theme::CHAPTER_FILL);
    }

    let played = view
        .range
        .usable_width()
        .map(|width| (view.value - view.range.start) / width)
        .unwrap_or(0.0);
    let knob_x = x_at_fraction(track, played);
    painter.rect_filled(
        Rect::from_min_max(track.min, pos2(knob_x, track.bottom())),
        CornerRadius::ZERO,
        theme::ACCENT,
    );

    // Sharp bands: every four stops open and close one colored interval.
    for stops in view.ad_gradient.stops().chunks_exact(4) {
        let (start, end) = (&stops[1], &stops[2]);
        let x0 = x_at_fraction(track, start.fraction);
        let x1 = x_at_fraction(track, end.fraction);
        if x1 <= x0 {
            continue;
        }
        let band = Rect::from_min_max(pos2(x0, track.top()), pos2(x1, track.bottom()));
        painter.rect_filled(band, CornerRadius::ZERO, start.color);
    }

    let radius = if active { KNOB_RADIUS } else { KNOB_RADIUS * 0.6 };
    painter.circle_filled(pos2(knob_x, track.center().y), radius, theme::KNOB_COLOR);
}

fn leave(state: &mut SeekBarState, events: &mut Vec<ScrubInput>) {
    if state.hovered_chapter.take().is_some() {
        events.push(ScrubInput::ChapterLeave);
    }
    if state.hovering {
        state.hovering = false;
        state.last_pointer_x = None;
        events.push(ScrubInput::PointerLeave);
    }
}

fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    view: &SeekBarView,
    track: Rect,
    state: &mut SeekBarState,
    events: &mut Vec<ScrubInput>,
) {
    let kind = if ui.input(|i| i.any_touches()) {
        InputKind::Touch
    } else {
        InputKind::Pointer
    };

    if response.drag_started() {
        response.request_focus();
        state.dragging = true;
        events.push(ScrubInput::ChangeStart(kind));
    }
    if state.dragging {
        if let Some(pos) = response.interact_pointer_pos() {
            if response.drag_started() || response.drag_delta() != egui::Vec2::ZERO {
                events.push(ScrubInput::Change(value_at(view, track, pos.x)));
            }
        }
    }
    if response.drag_stopped() {
        state.dragging = false;
        events.push(ScrubInput::ChangeEnd);
    } else if response.clicked() {
        response.request_focus();
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(ScrubInput::ChangeStart(kind));
            events.push(ScrubInput::Change(value_at(view, track, pos.x)));
            events.push(ScrubInput::ChangeEnd);
        }
    }

    let Some(pos) = response.hover_pos() else {
        leave(state, events);
        return;
    };
    state.hovering = true;
    let x = pos.x - track.left();
    if state.last_pointer_x != Some(x) {
        state.last_pointer_x = Some(x);
        events.push(ScrubInput::PointerMove { x });
    }
    hover_chapter(view, track, pos, state, events);
}

fn hover_chapter(
    view: &SeekBarView,
    track: Rect,
    pos: Pos2,
    state: &mut SeekBarState,
    events: &mut Vec<ScrubInput>,
) {
    let percent = if track.width() > 0.0 {
        ((pos.x - track.left()) / track.width() * 100.0) as f64
    } else {
        0.0
    };
    let hovered = view
        .chapters
        .iter()
        .find(|segment| segment.contains_percent(percent))
        .map(|segment| segment.index);
    if hovered == state.hovered_chapter {
        return;
    }
    if state.hovered_chapter.is_some() {
        events.push(ScrubInput::ChapterLeave);
    }
    if let Some(index) = hovered {
        events.push(ScrubInput::ChapterEnter {
            index,
            x: pos.x,
            y: pos.y,
        });
    }
    state.hovered_chapter = hovered;
}

fn handle_keys(
    ui: &egui::Ui,
    response: &egui::Response,
    view: &SeekBarView,
    events: &mut Vec<ScrubInput>,
) {
    if !response.has_focus() {
        return;
    }
    let step = ui.input(|i| {
        if i.key_pressed(egui::Key::ArrowRight) {
            Some(KEYBOARD_STEP_SECS)
        } else if i.key_pressed(egui::Key::ArrowLeft) {
            Some(-KEYBOARD_STEP_SECS)
        } else {
            None
        }
    });
    let Some(step) = step else {
        return;
    };
    let target = (view.value + step).clamp(view.range.start, view.range.end.max(view.range.start));
    events.push(ScrubInput::ChangeStart(InputKind::Keyboard));
    events.push(ScrubInput::Change(target));
    events.push(ScrubInput::ChangeEnd);
}

fn preview_texture(ctx: &egui::Context, textures: &dyn TextureLookup) -> Option<SizedTexture> {
    if let Some(handle) = textures.preview_texture() {
        return Some(SizedTexture::from_handle(handle));
    }
    let uri = textures.preview_uri()?;
    match ctx.try_load_texture(uri, egui::TextureOptions::LINEAR, egui::load::SizeHint::default()) {
        Ok(TexturePoll::Ready { texture }) => Some(texture),
        _ => None,
    }
}

fn draw_preview(
    ctx: &egui::Context,
    painter: &egui::Painter,
    bar: Rect,
    track: Rect,
    preview: &PreviewView,
    textures: &dyn TextureLookup,
    font: FontId,
) {
    let container = preview.layout.container;
    let frame = Rect::from_min_size(
        pos2(track.left() + container.left, bar.top() + container.top),
        vec2(container.width, container.height),
    );
    painter.rect_filled(frame, theme::ROUNDING, theme::BG_DARK);

    if preview.has_image {
        if let Some(texture) = preview_texture(ctx, textures) {
            let placement = preview.layout.image;
            let extent = |extent: ImageExtent, natural: f32, fill: f32| match extent {
                ImageExtent::Explicit(px) => px * placement.scale,
                ImageExtent::Natural => natural * placement.scale,
                ImageExtent::Fill => fill,
            };
            let size = vec2(
                extent(placement.width, texture.size.x, frame.width()),
                extent(placement.height, texture.size.y, frame.height()),
            );
            let image_rect = Rect::from_min_size(frame.min + vec2(placement.left, placement.top), size);
            painter.with_clip_rect(frame).image(
                texture.id,
                image_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    if !preview.caption.is_empty() {
        let strip = Rect::from_min_max(pos2(frame.left(), frame.bottom() - CAPTION_HEIGHT), frame.max);
        painter.rect_filled(strip, CornerRadius::ZERO, theme::TOOLTIP_BG);
        painter.text(
            strip.center(),
            Align2::CENTER_CENTER,
            &preview.caption,
            font,
            theme::TEXT_PRIMARY,
        );
    }
    painter.rect_stroke(
        frame,
        theme::ROUNDING,
        egui::Stroke::new(1.0, theme::PREVIEW_BORDER),
        egui::StrokeKind::Outside,
    );
}
