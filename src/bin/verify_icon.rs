use anyhow::{Context, Result};
use image::io::Reader as ImageReader;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "icon128.png".to_string());

    let img = ImageReader::open(&path)
        .with_context(|| format!("Failed to open image: {path}"))?
        .decode()
        .with_context(|| format!("Failed to decode image: {path}"))?;

    let rgba_img = img.to_rgba8();
    let width = img.width();
    let height = img.height();

    println!("Checking placeholder icon: {}", path);
    println!("Image dimensions: {}x{}", width, height);

    if width == 0 || height == 0 {
        anyhow::bail!("Image is empty");
    }

    // The corner is never covered by the centered label
    let background = *rgba_img.get_pixel(0, 0);
    println!(
        "Background (corner) RGBA: [{}, {}, {}, {}]",
        background[0], background[1], background[2], background[3]
    );

    let mut translucent = 0;
    let mut label_pixels = 0;
    for pixel in rgba_img.pixels() {
        if pixel[3] != 255 {
            translucent += 1;
        }
        if *pixel != background {
            label_pixels += 1;
        }
    }

    println!("\nPixel analysis:");
    println!("  {} pixels are not fully opaque", translucent);
    println!("  {} pixels differ from the background", label_pixels);

    if width == height && translucent == 0 {
        println!("✓ Valid placeholder icon");
    } else {
        println!("⚠ Icon should be square and fully opaque");
    }

    if label_pixels == 0 {
        println!("⚠ No label drawn (no font was available)");
    }

    Ok(())
}
