pub mod decode;
pub mod error;
pub mod fetch;
pub mod mp4;
pub mod pipeline;
pub mod track;

pub use decode::ThumbnailImage;
pub use error::ThumbnailError;
pub use fetch::{HttpSegmentFetcher, SegmentFetcher, SegmentRequest, ThumbnailResolver};
pub use pipeline::{PreviewUpdate, ThumbnailPipeline};
pub use track::{select_image_track, ImageTrack};
