use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut};

use crate::artwork::ArtworkError;

/// Edge length of both the fallback avatar and decoded artwork
pub const AVATAR_SIZE: u32 = 200;

const INITIAL_FONT_SIZE: f32 = 64.0;
const INITIAL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Tried in order when no font path is configured
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/system/fonts/Roboto-Regular.ttf",
    "/System/Library/Fonts/SFNS.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Generated placeholder artwork plus the inputs it was drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarImage {
    /// `#RRGGBB` without the hash, as derived from the label
    pub color_hex: String,
    pub color: Rgba<u8>,
    pub initial: String,
    pub image: RgbaImage,
}

/// Java-compatible `String.hashCode`: `31 * h + unit` over UTF-16 code units.
pub fn label_hash(label: &str) -> i32 {
    label
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Last six hex digits of the label hash, left-padded with `F`.
pub fn avatar_color_hex(label: &str) -> String {
    let hex = format!("{:X}", label_hash(label) as u32);
    let tail = &hex[hex.len().saturating_sub(6)..];
    format!("{:F>6}", tail)
}

pub fn avatar_color(label: &str) -> Rgba<u8> {
    // Only hex digits and 'F' reach here, so the parse cannot fail
    let rgb = u32::from_str_radix(&avatar_color_hex(label), 16).unwrap_or(0xFF_FF_FF);
    Rgba([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255])
}

/// Uppercased first character, or `?` for an empty label
pub fn avatar_initial(label: &str) -> String {
    match label.chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

/// Renders fallback avatars and normalizes fetched artwork.
/// Loads its font once; avatars are still drawn (without a glyph) if no font is found.
pub struct Compositor {
    font: Option<FontVec>,
}

impl Compositor {
    /// Load the configured font, or the first system font that parses
    pub fn new(font_path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match font_path {
            Some(path) => vec![path.to_path_buf()],
            None => SYSTEM_FONT_PATHS.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            match Self::load_font(path) {
                Ok(font) => {
                    log::info!("Loaded avatar font from {}", path.display());
                    return Self { font: Some(font) };
                }
                Err(e) => log::debug!("Font candidate skipped: {:#}", e),
            }
        }

        log::warn!("No usable font found, fallback avatars will be drawn without initials");
        Self::without_font()
    }

    pub fn without_font() -> Self {
        Self { font: None }
    }

    fn load_font(path: &Path) -> Result<FontVec> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        FontVec::try_from_vec(data)
            .with_context(|| format!("Failed to parse font {}", path.display()))
    }

    /// Colored circle with the label's initial, derived from the label alone
    pub fn render_avatar(&self, label: &str) -> AvatarImage {
        let color_hex = avatar_color_hex(label);
        let color = avatar_color(label);
        let initial = avatar_initial(label);

        let mut canvas = RgbaImage::from_pixel(AVATAR_SIZE, AVATAR_SIZE, Rgba([0, 0, 0, 0]));
        let center = (AVATAR_SIZE / 2) as i32;
        draw_filled_circle_mut(&mut canvas, (center, center), center, color);

        if let Some(font) = &self.font {
            let scale = PxScale::from(INITIAL_FONT_SIZE);
            let width = Self::measure_text_width(font, &initial, scale);
            let ascent = font.as_scaled(scale).ascent();

            // Baseline sits at size / 1.6, a little below the middle
            let baseline = AVATAR_SIZE as f32 / 1.6;
            let x = ((AVATAR_SIZE as f32 - width) / 2.0).round() as i32;
            let y = (baseline - ascent).round() as i32;

            draw_text_mut(&mut canvas, INITIAL_COLOR, x, y, scale, font, &initial);
        }

        AvatarImage {
            color_hex,
            color,
            initial,
            image: canvas,
        }
    }

    /// Decode fetched artwork bytes and scale to the avatar size
    pub fn decode_and_resize_artwork(&self, bytes: &[u8]) -> Result<RgbaImage, ArtworkError> {
        let img = image::load_from_memory(bytes)?;
        let resized = img.resize_exact(
            AVATAR_SIZE,
            AVATAR_SIZE,
            image::imageops::FilterType::Lanczos3,
        );
        Ok(resized.to_rgba8())
    }

    fn measure_text_width(font: &FontVec, text: &str, scale: PxScale) -> f32 {
        let scaled_font = font.as_scaled(scale);
        text.chars()
            .map(|ch| scaled_font.h_advance(font.glyph_id(ch)))
            .sum()
    }
}

/// Encode image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder;

    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);

    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .context("Failed to encode PNG")?;

    Ok(buffer)
}
