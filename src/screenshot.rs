//! PNG export of PPU output (feature `screenshot`).

use std::path::Path;

use image::{ColorType, ImageFormat, ImageResult};

use crate::ppu::{NES_HEIGHT, NES_WIDTH, Ppu};

/// Save the PPU's current frame as a 256x240 RGBA PNG.
pub fn save_png<P: AsRef<Path>>(ppu: &Ppu, path: P) -> ImageResult<()> {
    save_rgba(path, ppu.frame_buffer(), NES_WIDTH as u32, NES_HEIGHT as u32)
}

/// Save any RGBA buffer (e.g. a `Ppu::pattern_table` view) as PNG.
pub fn save_rgba<P: AsRef<Path>>(path: P, rgba: &[u8], width: u32, height: u32) -> ImageResult<()> {
    log::debug!("writing {width}x{height} PNG to {}", path.as_ref().display());
    image::save_buffer_with_format(path, rgba, width, height, ColorType::Rgba8, ImageFormat::Png)
}
