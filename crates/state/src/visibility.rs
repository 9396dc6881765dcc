use crate::range::SeekRange;

/// Live windows narrower than this many seconds hide the seek bar.
pub const MIN_SEEK_WINDOW_SECS: f64 = 5.0;

/// Whether the seek bar should be shown at all.
pub fn should_display(
    range: &SeekRange,
    is_live: bool,
    linear_ad_playing: bool,
    min_window: f64,
) -> bool {
    let width = range.width();
    if !width.is_finite() {
        return false;
    }
    if is_live && width < min_window {
        return false;
    }
    !linear_ad_playing
}
