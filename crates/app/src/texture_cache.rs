use scrubline_media::ThumbnailImage;

/// GPU side of the preview image. Holds at most one texture, replaced in place.
#[derive(Default)]
pub struct TextureCache {
    preview_texture: Option<egui::TextureHandle>,
    preview_uri: Option<String>,
    synced_generation: Option<u64>,
}

impl TextureCache {
    pub fn sync_preview(
        &mut self,
        ctx: &egui::Context,
        generation: u64,
        image: Option<&ThumbnailImage>,
    ) {
        if self.synced_generation == Some(generation) {
            return;
        }
        self.synced_generation = Some(generation);

        match image {
            Some(ThumbnailImage::Decoded(img)) => {
                self.preview_uri = None;
                let (width, height) = (img.width() as usize, img.height() as usize);
                let color_image = egui::ColorImage::from_rgba_unmultiplied([width, height], img.as_raw());
                if let Some(ref mut handle) = self.preview_texture {
                    handle.set(color_image, egui::TextureOptions::LINEAR);
                    return;
                }
                let texture = ctx.load_texture("thumbnail_preview", color_image, egui::TextureOptions::LINEAR);
                self.preview_texture = Some(texture);
            }
            Some(ThumbnailImage::Remote { uri }) => {
                self.preview_texture = None;
                self.preview_uri = Some(uri.clone());
            }
            None => {
                self.preview_texture = None;
                self.preview_uri = None;
            }
        }
    }
}

impl scrubline_ui::TextureLookup for TextureCache {
    fn preview_texture(&self) -> Option<&egui::TextureHandle> {
        self.preview_texture.as_ref()
    }

    fn preview_uri(&self) -> Option<&str> {
        self.preview_uri.as_deref()
    }
}
