//! # Bitmap Logic Library
//!
//! Extracts a circuit of NOT gates from a bitmap and simulates it.
//!
//! Bright pixels conduct. Orthogonally adjacent conductive pixels form wires,
//! a background pixel whose diagonal corners match one of four fixed patterns
//! becomes an inverter, and a background pixel with no conductive diagonals
//! joins the wires crossing over it.
//!
//! This library provides:
//! - Pixel classification and wire extraction ([`pixel`], [`wire`])
//! - Gate and crossing detection ([`detect`]) and netlist resolution ([`netlist`])
//! - A tick-based simulator with randomized switching ([`simulator`], [`gate`])
//! - JSON configuration, debug renderings, a terminal viewer and a window viewer

pub mod config;
pub mod console;
pub mod debug_image;
pub mod detect;
pub mod error;
pub mod gate;
pub mod gui;
pub mod netlist;
pub mod pixel;
pub mod simulator;
pub mod types;
pub mod wire;

// Re-export commonly used items for easier importing
pub use config::{AppConfig, SimulatorConfig};
pub use error::{Result, SimError};
pub use gate::{Gate, SwitchingRates};
pub use netlist::{CarryOver, Netlist};
pub use pixel::{load_bitmap, Bitmap, PixelGrid, Rgb16, Threshold};
pub use simulator::{PixelState, Simulator};
pub use types::{GateId, Point, WireId};
