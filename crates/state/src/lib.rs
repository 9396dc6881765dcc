pub mod ad_markers;
pub mod chapter;
pub mod config;
pub mod cue;
pub mod input;
pub mod range;
pub mod thumbnail;
pub mod time_format;
pub mod view;
pub mod visibility;
