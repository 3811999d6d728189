//! Renders one watch face outside the device host and writes it as a BMP
//! file, for eyeballing changes without a connected device.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use clap::Parser;

use worldclock_plugin::{
    Bitmap, ImageSize, Invalidator, PluginHandle, TickCallback, TickSource, WorldClockAction,
};

#[derive(Parser)]
#[command(about = "Render a world-clock face to a BMP file")]
struct Args {
    /// IANA timezone identifier, e.g. Europe/Zurich. Empty renders a blank
    /// face.
    #[arg(default_value = "")]
    timezone: String,

    #[arg(long, default_value_t = 80)]
    width: u32,

    #[arg(long, default_value_t = 80)]
    height: u32,

    /// Output file.
    #[arg(long, default_value = "watchface.bmp")]
    output: PathBuf,

    /// Print the location-picker tree as JSON instead of rendering.
    #[arg(long)]
    tree: bool,
}

struct NullTickSource;

impl TickSource for NullTickSource {
    fn subscribe(&self, _callback: TickCallback) {}
}

struct NullInvalidator;

impl Invalidator for NullInvalidator {
    fn action_image_changed(&self, _action_parameter: &str) {}
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let plugin = Arc::new(PluginHandle {
        tick_source: Arc::new(NullTickSource),
        invalidator: Arc::new(NullInvalidator),
        configuration: BTreeMap::from([("locale".to_owned(), locale_from_env())]),
    });
    let action = WorldClockAction::load(Arc::downgrade(&plugin))?;

    if args.tree {
        println!(
            "{}",
            serde_json::to_string_pretty(&action.profile_action_data())?
        );
        return Ok(());
    }

    let image = action.command_image(&args.timezone, ImageSize::new(args.width, args.height))?;
    write_bmp(&image, &args.output).with_context(|| format!("writing {}", args.output.display()))?;
    log::info!(
        "wrote {}x{} face for `{}` to {}",
        image.width(),
        image.height(),
        args.timezone,
        args.output.display()
    );
    Ok(())
}

fn locale_from_env() -> String {
    std::env::var("LANG")
        .ok()
        .and_then(|lang| lang.split('.').next().map(str::to_owned))
        .unwrap_or_else(|| "en".to_owned())
}

// Rows are 4-byte aligned in the BMP pixel array.
fn row_stride(width: u32) -> usize {
    (width as usize * 3 + 3) & !3
}

fn write_bmp(image: &Bitmap, path: &Path) -> Result<()> {
    let width = image.width();
    let height = image.height();
    let stride = row_stride(width);
    let pixel_bytes = stride * height as usize;
    let rgb = image.to_rgb_bytes();

    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(b"BM")?;
    out.write_u32::<LittleEndian>(54 + pixel_bytes as u32)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(54)?;
    out.write_u32::<LittleEndian>(40)?;
    out.write_i32::<LittleEndian>(width as i32)?;
    out.write_i32::<LittleEndian>(height as i32)?;
    out.write_u16::<LittleEndian>(1)?;
    out.write_u16::<LittleEndian>(24)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(pixel_bytes as u32)?;
    out.write_i32::<LittleEndian>(2835)?;
    out.write_i32::<LittleEndian>(2835)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(0)?;

    // Bottom-up rows, BGR pixel order.
    let padding = vec![0u8; stride - width as usize * 3];
    for y in (0..height).rev() {
        let start = (y * width * 3) as usize;
        let row = &rgb[start..start + width as usize * 3];
        for pixel in row.chunks_exact(3) {
            out.write_all(&[pixel[2], pixel[1], pixel[0]])?;
        }
        out.write_all(&padding)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_four_bytes() {
        assert_eq!(row_stride(80), 240);
        assert_eq!(row_stride(81), 244);
        assert_eq!(row_stride(82), 248);
        assert_eq!(row_stride(1), 4);
    }
}
