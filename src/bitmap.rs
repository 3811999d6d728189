use std::fmt;

use embedded_graphics::{
    image::Image,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
    Pixel,
};
use lazy_static::lazy_static;
use tinybmp::Bmp;

use crate::host::ImageSize;

static WATCHFACE_BMP: &[u8] = include_bytes!("../assets/watchface1.bmp");

lazy_static! {
    static ref WATCHFACE: Bmp<'static, Rgb888> =
        Bmp::from_slice(WATCHFACE_BMP).expect("embedded watch face decodes");
}

/// Decoded background watch face, loaded once for the process lifetime.
pub fn watchface() -> &'static Bmp<'static, Rgb888> {
    &WATCHFACE
}

/// In-memory RGB composition surface matching the device's bitmap contract.
/// Drawing happens through [`DrawTarget`]; pixels falling outside the
/// surface are clipped.
pub struct BitmapBuilder {
    size: ImageSize,
    pixels: Vec<Rgb888>,
}

impl BitmapBuilder {
    pub fn new(size: ImageSize) -> Self {
        Self {
            size,
            pixels: vec![Rgb888::BLACK; (size.width * size.height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Draw `image` centered on the surface.
    pub fn set_background_image<D>(&mut self, image: &D)
    where
        D: ImageDrawable<Color = Rgb888>,
    {
        let offset = Point::new(
            (self.size.width as i32 - image.size().width as i32) / 2,
            (self.size.height as i32 - image.size().height as i32) / 2,
        );
        let _ = Image::new(image, offset).draw(self);
    }

    /// Stroke a straight line between two points.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Rgb888, stroke: u32) {
        let style = PrimitiveStyle::with_stroke(color, stroke);
        let _ = Line::new(from, to).into_styled(style).draw(self);
    }

    /// Freeze the composition into the host's outbound bitmap.
    pub fn into_image(self) -> Bitmap {
        Bitmap {
            size: self.size,
            pixels: self.pixels,
        }
    }
}

impl OriginDimensions for BitmapBuilder {
    fn size(&self) -> Size {
        Size::new(self.size.width, self.size.height)
    }
}

impl DrawTarget for BitmapBuilder {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.size.width
                && (point.y as u32) < self.size.height
            {
                let index = point.y as u32 * self.size.width + point.x as u32;
                self.pixels[index as usize] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

/// Fully composed raster handed back to the host. Row-major, top-left
/// origin.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: ImageSize,
    pixels: Vec<Rgb888>,
}

impl Bitmap {
    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        (x < self.size.width && y < self.size.height)
            .then(|| self.pixels[(y * self.size.width + x) as usize])
    }

    /// Raw RGB triples in row order.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&[pixel.r(), pixel.g(), pixel.b()]);
        }
        bytes
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({}x{})", self.size.width, self.size.height)
    }
}
