use scrubline_state::config::ThumbnailConfig;

use crate::decode::can_decode;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageTrack {
    pub id: u32,
    pub mime_type: String,
    pub codecs: String,
    pub bandwidth: u64,
}

impl ImageTrack {
    pub fn new(id: u32, mime_type: impl Into<String>, codecs: impl Into<String>, bandwidth: u64) -> Self {
        Self {
            id,
            mime_type: mime_type.into(),
            codecs: codecs.into(),
            bandwidth,
        }
    }

    /// Frames live inside a container and must be extracted after fetching.
    pub fn is_multiplexed(&self, config: &ThumbnailConfig) -> bool {
        self.mime_type.eq_ignore_ascii_case(&config.multiplexed_mime)
            && self.codecs == config.multiplexed_codec
    }
}

/// Picks the image track to draw previews from.
///
/// Preferred mime types are tried in order; within one, the highest bitrate
/// under `max_bandwidth_fraction` of the estimated bandwidth wins. Preferred
/// types this build cannot decode are skipped. Without a preferred candidate,
/// a multiplexed track is used, then the first decodable track, then the first.
pub fn select_image_track<'a>(
    tracks: &'a [ImageTrack],
    estimated_bandwidth: f64,
    config: &ThumbnailConfig,
) -> Option<&'a ImageTrack> {
    let first = tracks.first()?;
    let budget = estimated_bandwidth * config.max_bandwidth_fraction;

    for mime in config.mime_preference.iter().filter(|m| can_decode(m)) {
        let best = tracks
            .iter()
            // Reversed so equal bitrates keep the earlier track.
            .rev()
            .filter(|t| t.mime_type.to_lowercase() == *mime && (t.bandwidth as f64) < budget)
            .max_by_key(|t| t.bandwidth);
        if best.is_some() {
            return best;
        }
    }

    tracks
        .iter()
        .find(|t| t.is_multiplexed(config))
        .or_else(|| tracks.iter().find(|t| can_decode(&t.mime_type)))
        .or(Some(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks() -> Vec<ImageTrack> {
        vec![
            ImageTrack::new(1, "image/jpeg", "", 5_000),
            ImageTrack::new(2, "image/jpeg", "", 9_000),
            ImageTrack::new(3, "image/webp", "", 50_000),
            ImageTrack::new(4, "application/mp4", "mjpg", 1_000),
        ]
    }

    #[test]
    fn prefers_mime_order_then_highest_bitrate_under_budget() {
        let config = ThumbnailConfig::default();
        let list = tracks();
        // budget 10_000: webp too expensive, best jpeg is 9_000.
        assert_eq!(select_image_track(&list, 1_000_000.0, &config).map(|t| t.id), Some(2));
        // budget 100_000: webp ranks above jpeg.
        assert_eq!(select_image_track(&list, 10_000_000.0, &config).map(|t| t.id), Some(3));
    }

    #[test]
    fn falls_back_to_multiplexed_then_first() {
        let config = ThumbnailConfig::default();
        let list = tracks();
        assert_eq!(select_image_track(&list, 0.0, &config).map(|t| t.id), Some(4));

        let no_mux = &list[..3];
        assert_eq!(select_image_track(no_mux, 0.0, &config).map(|t| t.id), Some(1));
    }

    #[test]
    fn undecodable_formats_lose_to_jpeg() {
        let config = ThumbnailConfig::default();
        let list = vec![
            ImageTrack::new(1, "image/avif", "", 2_000),
            ImageTrack::new(2, "image/svg+xml", "", 1_000),
            ImageTrack::new(3, "image/jpeg", "", 3_000),
        ];
        assert!(!can_decode("image/avif"));
        assert!(!can_decode("image/svg+xml"));
        assert_eq!(select_image_track(&list, 1_000_000.0, &config).map(|t| t.id), Some(3));
        // Nothing under budget: skip to the first track that can be shown.
        assert_eq!(select_image_track(&list, 0.0, &config).map(|t| t.id), Some(3));
    }

    #[test]
    fn only_undecodable_tracks_still_yield_one() {
        let list = vec![ImageTrack::new(9, "image/avif", "", 10)];
        assert_eq!(
            select_image_track(&list, 1e9, &ThumbnailConfig::default()).map(|t| t.id),
            Some(9)
        );
    }

    #[test]
    fn no_tracks_means_no_thumbnails() {
        assert!(select_image_track(&[], 1e9, &ThumbnailConfig::default()).is_none());
    }

    #[test]
    fn mime_match_is_case_insensitive() {
        let list = vec![ImageTrack::new(7, "IMAGE/PNG", "", 10)];
        assert_eq!(
            select_image_track(&list, 1e9, &ThumbnailConfig::default()).map(|t| t.id),
            Some(7)
        );
    }
}
