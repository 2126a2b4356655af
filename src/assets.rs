pub mod decode;
pub mod store;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Format sniffed from the encoded bytes, when recognized.
    pub format: Option<image::ImageFormat>,
    /// Pixels in row-major premultiplied RGBA8.
    pub rgba8_premul: image::RgbaImage,
}

impl PreparedImage {
    pub fn width(&self) -> u32 {
        self.rgba8_premul.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba8_premul.height()
    }
}
