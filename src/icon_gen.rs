use crate::font::{FontSources, LabelFont};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Sizes generated when none are requested
pub const DEFAULT_SIZES: [u32; 4] = [16, 32, 48, 128];

pub const DEFAULT_LABEL: &str = "RE";
pub const DEFAULT_BG_COLOR: &str = "#007bff";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([0x00, 0x7b, 0xff, 255]);
const DEFAULT_FOREGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 255]);

// Library-side view of the command line
#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
    pub sizes: Vec<u32>,
    pub text: String,
    pub bg_color: String,
    pub text_color: String,
    pub font: PathBuf,
    pub verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: PathBuf::from("."),
            sizes: DEFAULT_SIZES.to_vec(),
            text: DEFAULT_LABEL.to_string(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            font: PathBuf::from(crate::font::DEFAULT_SCALABLE_FONT),
            verbose: false,
        }
    }
}

/// Label and colors shared by every icon in a batch
#[derive(Debug, Clone)]
pub struct IconStyle {
    pub label: String,
    pub background: Rgba<u8>,
    pub foreground: Rgba<u8>,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            background: DEFAULT_BACKGROUND,
            foreground: DEFAULT_FOREGROUND,
        }
    }
}

impl IconStyle {
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            label: args.text.clone(),
            background: parse_color(&args.bg_color).context("Invalid background color")?,
            foreground: parse_color(&args.text_color).context("Invalid text color")?,
        })
    }
}

/// Parse a CSS color string into an RGBA pixel
pub fn parse_color(color: &str) -> Result<Rgba<u8>> {
    let color = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow::anyhow!("Can't parse CSS color: {color}"))?;
    Ok(Rgba([
        (color.red * 255.).round() as u8,
        (color.green * 255.).round() as u8,
        (color.blue * 255.).round() as u8,
        (color.alpha * 255.).round() as u8,
    ]))
}

pub fn generate_icons(args: Args) -> Result<()> {
    let style = IconStyle::from_args(&args)?;
    let fonts = FontSources::system(&args.font);

    // Ensure the output directory exists
    create_dir_all(&args.output).context("Can't create output directory")?;

    for &size in &args.sizes {
        let font = fonts.resolve(size);
        if args.verbose {
            println!("  icon{size}.png: {} font", font.kind());
        }

        let icon = draw_icon(size, &style, &font);
        let filename = icon_filename(size);
        save_png(&icon, &args.output.join(&filename))?;
        println!("Created {filename}");
    }

    Ok(())
}

pub fn icon_filename(size: u32) -> String {
    format!("icon{size}.png")
}

/// Render one icon, resolving its label font from `fonts`.
///
/// Never fails: when no font can be loaded the icon is plain background.
pub fn render_icon(size: u32, style: &IconStyle, fonts: &FontSources) -> RgbaImage {
    let font = fonts.resolve(size);
    draw_icon(size, style, &font)
}

/// Render one icon with an already resolved label font
pub fn draw_icon(size: u32, style: &IconStyle, font: &LabelFont) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(size, size, opaque(style.background));

    let (text_width, text_height) = text_size(size, &style.label, font);
    let (x, y) = centered_origin(size, text_width, text_height);

    draw_label(&mut canvas, font, &style.label, x, y, style.foreground);
    canvas
}

/// Measured label size, or a coarse estimate when there is no font
pub fn text_size(size: u32, label: &str, font: &LabelFont) -> (i32, i32) {
    match font.measure(label) {
        Some(bbox) => (bbox.width(), bbox.height()),
        None => estimate_text_size(size, label),
    }
}

pub fn estimate_text_size(size: u32, label: &str) -> (i32, i32) {
    let size = size as i32;
    (label.chars().count() as i32 * (size / 6), size / 4)
}

/// Top-left draw position for a block of text, floor-divided
pub fn centered_origin(size: u32, text_width: i32, text_height: i32) -> (i32, i32) {
    let size = size as i32;
    (
        (size - text_width).div_euclid(2),
        (size - text_height).div_euclid(2),
    )
}

/// Draw `text` with its ascender line at `(x, y)`, clipped to the canvas
fn draw_label(
    canvas: &mut RgbaImage,
    font: &LabelFont,
    text: &str,
    x: i32,
    y: i32,
    color: Rgba<u8>,
) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    for glyph in font.layout(text, x, y) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || py < 0 || px >= width || py >= height {
                return;
            }
            blend_coverage(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
        });
    }
}

/// Composite `color` over `pixel` with the given glyph coverage
fn blend_coverage(pixel: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * f32::from(color[3]) / 255.0;
    if alpha <= 0.0 {
        return;
    }

    for channel in 0..3 {
        let blended =
            f32::from(pixel[channel]) * (1.0 - alpha) + f32::from(color[channel]) * alpha;
        pixel[channel] = blended.round() as u8;
    }
    let blended_alpha = alpha * 255.0 + f32::from(pixel[3]) * (1.0 - alpha);
    pixel[3] = blended_alpha.round().min(255.0) as u8;
}

// Icons are always fully opaque
fn opaque(color: Rgba<u8>) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file: {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image.as_raw(), &mut out_file, image.width(), image.height())
        .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    out_file
        .flush()
        .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}
