pub mod constants;
pub mod seek_bar;
pub mod theme;

pub trait TextureLookup {
    fn preview_texture(&self) -> Option<&egui::TextureHandle>;
    /// Set when the preview shows an image the host loads by URI.
    fn preview_uri(&self) -> Option<&str>;
}
