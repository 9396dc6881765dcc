#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl ByteRange {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    /// Value for an HTTP `Range` header, `None` when the whole resource is wanted.
    pub fn header_value(&self) -> Option<String> {
        match (self.start, self.end) {
            (0, None) => None,
            (start, None) => Some(format!("bytes={start}-")),
            (start, Some(end)) => Some(format!("bytes={start}-{end}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailDescriptor {
    pub uris: Vec<String>,
    pub width: f64,
    pub height: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub image_width: Option<f64>,
    pub image_height: Option<f64>,
    pub sprite: bool,
    pub byte_range: ByteRange,
    pub codec_hint: String,
}

impl ThumbnailDescriptor {
    pub fn primary_uri(&self) -> Option<&str> {
        self.uris.first().map(String::as_str)
    }

    pub fn key(&self) -> Option<ThumbnailKey> {
        self.primary_uri()
            .map(|uri| ThumbnailKey::new(uri, self.byte_range))
    }
}

/// Identity of the bytes behind a thumbnail: the resource without its sprite
/// fragment, plus the byte range read from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThumbnailKey {
    resource: String,
    byte_range: ByteRange,
}

impl ThumbnailKey {
    pub fn new(uri: &str, byte_range: ByteRange) -> Self {
        let resource = match uri.split_once('#') {
            Some((base, _fragment)) => base,
            None => uri,
        };
        Self {
            resource: resource.to_owned(),
            byte_range,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn byte_range(&self) -> ByteRange {
        self.byte_range
    }

    pub fn is_offline(&self) -> bool {
        self.resource.starts_with("offline:")
    }
}

/// Left edge for a popup of `width` centred on `pixel`, kept inside the track.
pub fn popup_left(pixel: f32, width: f32, track_width: f32) -> f32 {
    (track_width - width).min((pixel - width / 2.0).max(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageExtent {
    Explicit(f32),
    /// Stretch to the container, preserving aspect.
    Fill,
    /// The decoded image's own size.
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub left: f32,
    pub top: f32,
    pub scale: f32,
    pub width: ImageExtent,
    pub height: ImageExtent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailLayout {
    pub container: PopupRect,
    pub image: ImagePlacement,
}

/// Places the preview container above the track and crops the sprite into it.
pub fn layout_thumbnail(
    descriptor: &ThumbnailDescriptor,
    container_width: f32,
    offset_top: f32,
    pixel: f32,
    track_width: f32,
) -> ThumbnailLayout {
    let width = container_width;
    let aspect = if descriptor.width > 0.0 && descriptor.height > 0.0 {
        descriptor.height / descriptor.width
    } else {
        9.0 / 16.0
    };
    let height = (width as f64 * aspect).floor() as f32;
    let scale = if descriptor.width > 0.0 {
        (width as f64 / descriptor.width) as f32
    } else {
        1.0
    };

    let extent = |explicit: Option<f64>| match explicit {
        Some(px) => ImageExtent::Explicit(px as f32),
        None if descriptor.sprite => ImageExtent::Natural,
        None => ImageExtent::Fill,
    };

    ThumbnailLayout {
        container: PopupRect {
            left: popup_left(pixel, width, track_width),
            top: -(height - offset_top),
            width,
            height,
        },
        image: ImagePlacement {
            left: -scale * descriptor.position_x as f32,
            top: -scale * descriptor.position_y as f32,
            scale,
            width: extent(descriptor.image_width),
            height: extent(descriptor.image_height),
        },
    }
}
