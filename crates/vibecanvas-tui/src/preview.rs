//! Terminal rendition of the generated image
//!
//! Each cell shows two vertically stacked pixels: an upper half block with
//! the top pixel as foreground and the bottom pixel as background.

use image::imageops::FilterType;
use image::RgbImage;
use log::warn;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;
use vibecanvas_core::VibeResult;

/// Decoded images are shrunk to this once so per-frame scaling stays cheap
const MAX_SOURCE_SIDE: u32 = 256;

pub struct Preview {
    image: RgbImage,
}

impl Preview {
    /// Decode the result's data URI. `None` if it is not a readable image.
    pub fn from_result(result: &VibeResult) -> Option<Self> {
        let Some(bytes) = result.image_bytes() else {
            warn!("Image URL for {:?} is not a base64 data URI", result.title);
            return None;
        };

        let decoded = match image::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(e) => {
                warn!("Could not decode image for {:?}: {}", result.title, e);
                return None;
            }
        };

        let thumb = if decoded.width() > MAX_SOURCE_SIDE || decoded.height() > MAX_SOURCE_SIDE {
            decoded.resize(MAX_SOURCE_SIDE, MAX_SOURCE_SIDE, FilterType::Triangle)
        } else {
            decoded
        };

        Some(Self {
            image: thumb.to_rgb8(),
        })
    }

    /// Pixel size that fits `area` (one column, two rows per cell) keeping
    /// the aspect ratio
    fn fitted_size(&self, area: Rect) -> (u32, u32) {
        let max_w = area.width as f64;
        let max_h = area.height as f64 * 2.0;
        let (iw, ih) = (self.image.width() as f64, self.image.height() as f64);
        if iw == 0.0 || ih == 0.0 {
            return (0, 0);
        }

        let scale = (max_w / iw).min(max_h / ih);
        (
            ((iw * scale).floor() as u32).max(1),
            ((ih * scale).floor() as u32).max(1),
        )
    }
}

fn to_color(pixel: &image::Rgb<u8>) -> Color {
    let [r, g, b] = pixel.0;
    Color::Rgb(r, g, b)
}

impl Widget for &Preview {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let (w, h) = self.fitted_size(area);
        if w == 0 || h == 0 {
            return;
        }

        let scaled = image::imageops::resize(&self.image, w, h, FilterType::Triangle);
        let x_offset = area.x + (area.width.saturating_sub(w as u16)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(h.div_ceil(2) as u16)) / 2;

        for py in (0..h).step_by(2) {
            for px in 0..w {
                let top = to_color(scaled.get_pixel(px, py));
                let bottom = if py + 1 < h {
                    to_color(scaled.get_pixel(px, py + 1))
                } else {
                    Color::Reset
                };

                let pos = (x_offset + px as u16, y_offset + (py / 2) as u16);
                if let Some(cell) = buf.cell_mut(pos) {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}
