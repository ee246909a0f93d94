//! Diagnostic renderings of an extracted netlist.

use std::path::Path;

use image::{Rgba, RgbaImage};
use log::info;

use crate::error::Result;
use crate::netlist::Netlist;
use crate::types::WireId;

/// Stable, well-spread color for a wire. Channels stay in `55..255`.
pub fn wire_color(wire: WireId) -> Rgba<u8> {
    let id = wire.index() as u64;
    let channel = |mul: u64, add: u64| (55 + (id.wrapping_mul(mul).wrapping_add(add) % 200)) as u8;
    Rgba([channel(97, 13), channel(57, 101), channel(131, 37), 255])
}

/// Every wire in its own color on a black background.
pub fn wire_map_image(netlist: &Netlist) -> RgbaImage {
    let (width, height) = (netlist.width() as u32, netlist.height() as u32);
    RgbaImage::from_fn(width, height, |x, y| {
        match netlist.wire_at(x as usize, y as usize) {
            Some(wire) => wire_color(wire),
            None => Rgba([0, 0, 0, 255]),
        }
    })
}

/// Gate inputs in red, outputs in green, everything else transparent.
pub fn gate_image(netlist: &Netlist) -> RgbaImage {
    let mut img = RgbaImage::new(netlist.width() as u32, netlist.height() as u32);
    for gate in netlist.gates() {
        img.put_pixel(
            gate.input_pixel.x as u32,
            gate.input_pixel.y as u32,
            Rgba([255, 0, 0, 255]),
        );
        img.put_pixel(
            gate.output_pixel.x as u32,
            gate.output_pixel.y as u32,
            Rgba([0, 255, 0, 255]),
        );
    }
    img
}

/// Write `wire_map.png` and `gates.png` into `dir`.
pub fn save_debug_images(netlist: &Netlist, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    wire_map_image(netlist).save(dir.join("wire_map.png"))?;
    gate_image(netlist).save(dir.join("gates.png"))?;
    info!("wrote debug images to '{}'", dir.display());
    Ok(())
}
