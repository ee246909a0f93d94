//! # Pixel Classification
//!
//! The extraction pipeline only needs a `(x, y) -> color` accessor and grid
//! bounds. This module defines that accessor ([`PixelGrid`]), an owned
//! in-memory grid ([`Bitmap`]) and the conductivity test ([`Threshold`]).
//!
//! Colors are carried at 16 bits per channel with alpha premultiplied, so
//! 8-bit and 16-bit sources are classified against the same cutoff.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default cutoff on the 16-bit scale (0xDEFF, roughly 87% of full scale).
/// For 8-bit sources any channel of 223 or more is conductive.
pub const DEFAULT_THRESHOLD: u16 = 57087;

/// A color sample, 16 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb16 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Rgb16 {
    pub const BLACK: Rgb16 = Rgb16 { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb16 = Rgb16 {
        r: u16::MAX,
        g: u16::MAX,
        b: u16::MAX,
    };

    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Rgb16 { r, g, b }
    }

    /// Widen an 8-bit sample (0xAB becomes 0xABAB).
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Rgb16 {
            r: u16::from(r) * 257,
            g: u16::from(g) * 257,
            b: u16::from(b) * 257,
        }
    }

    /// Premultiply a straight-alpha 16-bit sample.
    pub fn premultiplied(r: u16, g: u16, b: u16, a: u16) -> Self {
        let scale = |c: u16| (u32::from(c) * u32::from(a) / 0xFFFF) as u16;
        Rgb16 {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [(self.r >> 8) as u8, (self.g >> 8) as u8, (self.b >> 8) as u8]
    }
}

/// Conductivity cutoff: a pixel conducts when any channel exceeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threshold(pub u16);

impl Threshold {
    pub fn is_conductive(&self, color: Rgb16) -> bool {
        color.r > self.0 || color.g > self.0 || color.b > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(DEFAULT_THRESHOLD)
    }
}

/// Read-only access to a decoded image.
pub trait PixelGrid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Color at `(x, y)`. Callers stay within `width() x height()`.
    fn color_at(&self, x: usize, y: usize) -> Rgb16;
}

/// Owned row-major pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgb16>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Bitmap {
            width,
            height,
            pixels: vec![Rgb16::BLACK; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb16>) -> Option<Self> {
        if pixels.len() != width * height {
            return None;
        }
        Some(Bitmap {
            width,
            height,
            pixels,
        })
    }

    /// Build a bitmap from ASCII art: `#` is a white (conductive) pixel,
    /// anything else is black. Short rows are padded with black.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut bitmap = Bitmap::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    bitmap.set(x, y, Rgb16::WHITE);
                }
            }
        }
        bitmap
    }

    /// Writes outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb16) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn pixels(&self) -> &[Rgb16] {
        &self.pixels
    }
}

impl PixelGrid for Bitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn color_at(&self, x: usize, y: usize) -> Rgb16 {
        self.pixels[y * self.width + x]
    }
}

impl PixelGrid for image::RgbaImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn color_at(&self, x: usize, y: usize) -> Rgb16 {
        let [r, g, b, a] = self.get_pixel(x as u32, y as u32).0;
        let widen = |c: u8| u16::from(c) * 257;
        Rgb16::premultiplied(widen(r), widen(g), widen(b), widen(a))
    }
}

impl From<&image::DynamicImage> for Bitmap {
    fn from(img: &image::DynamicImage) -> Self {
        let rgba = img.to_rgba16();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Rgb16::premultiplied(r, g, b, a)
            })
            .collect();
        Bitmap {
            width: width as usize,
            height: height as usize,
            pixels,
        }
    }
}

/// Decode an image file into a [`Bitmap`].
pub fn load_bitmap(path: impl AsRef<Path>) -> Result<Bitmap> {
    let img = image::open(path.as_ref())?;
    Ok(Bitmap::from(&img))
}

/// Per-pixel conductivity of an image, kept after a load so the next load
/// can carry wire states over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConductivityMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl ConductivityMask {
    pub fn from_grid<G: PixelGrid + ?Sized>(grid: &G, threshold: Threshold) -> Self {
        let (width, height) = (grid.width(), grid.height());
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(threshold.is_conductive(grid.color_at(x, y)));
            }
        }
        ConductivityMask {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels outside the mask read as non-conductive.
    pub fn is_conductive(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }
}
