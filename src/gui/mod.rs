//! # GUI Module
//!
//! Window front end for the simulator: the source image with the live state
//! overlay, a control bar and a status bar.
//!
//! - scroll: zoom around the pointer
//! - middle drag: pan
//! - primary press / release: drive the wire under the pointer high / low

pub mod components;
pub mod state;

use std::path::PathBuf;

use eframe::egui;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::pixel::{load_bitmap, Bitmap, PixelGrid};
use crate::simulator::Simulator;
use components::{circuit_view, compose_frame, ControlPanel, StatusBar};
use state::GuiState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub window_size: [f32; 2],
    /// Overlay weight when blending states over the source image.
    pub overlay_mix: f32,
    pub start_running: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            window_size: [1024.0, 768.0],
            overlay_mix: 0.7,
            start_running: true,
        }
    }
}

/// Main GUI application structure
pub struct GuiApp {
    /// The simulator driven by this window
    simulator: Simulator,
    /// Image the current circuit was extracted from
    source: Bitmap,
    /// File the image came from, used by reload
    image_path: Option<PathBuf>,
    config: GuiConfig,
    gui_state: GuiState,
    texture: Option<egui::TextureHandle>,
    /// Pixel under the pointer during the previous frame
    hovered: Option<(usize, usize)>,
}

impl GuiApp {
    /// Create a new GUI application around an already loaded simulator.
    ///
    /// # Arguments
    /// * `simulator` - Simulator with `source` loaded
    /// * `source` - Image shown under the state overlay
    /// * `image_path` - Where `source` was read from, if anywhere
    /// * `config` - Window settings
    /// * `ticks_per_frame` - Ticks run for each displayed frame
    pub fn new(
        simulator: Simulator,
        source: Bitmap,
        image_path: Option<PathBuf>,
        config: GuiConfig,
        ticks_per_frame: u32,
    ) -> Self {
        let gui_state = GuiState::new(config.start_running, ticks_per_frame);
        Self {
            simulator,
            source,
            image_path,
            config,
            gui_state,
            texture: None,
            hovered: None,
        }
    }

    /// Re-read an image from disk and rebuild the circuit from it.
    ///
    /// On failure the current circuit is kept and the error is shown in the
    /// status bar.
    fn load_from(&mut self, path: PathBuf) {
        match load_bitmap(&path) {
            Ok(bitmap) => {
                let resized = (bitmap.width(), bitmap.height()) != self.simulator.size();
                self.simulator.load_image(&bitmap);
                self.source = bitmap;
                if resized {
                    self.gui_state.camera = None;
                }
                self.gui_state.pressed = None;
                self.gui_state.clear_error();
                info!("loaded '{}'", path.display());
                self.image_path = Some(path);
            }
            Err(e) => {
                error!("failed to load '{}': {}", path.display(), e);
                self.gui_state
                    .set_error(format!("failed to load '{}': {}", path.display(), e));
            }
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let frame = compose_frame(&self.source, &self.simulator, self.config.overlay_mix);
        match &mut self.texture {
            Some(texture) => texture.set(frame, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("circuit", frame, egui::TextureOptions::NEAREST));
            }
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        let actions = egui::TopBottomPanel::top("controls")
            .show(ctx, |ui| ControlPanel::render(ui, &mut self.gui_state))
            .inner;

        if self.gui_state.running {
            self.simulator.simulate_n(self.gui_state.ticks_per_frame);
        } else if actions.step {
            self.simulator.simulate();
        }

        if actions.reload {
            match self.image_path.clone() {
                Some(path) => self.load_from(path),
                None => self
                    .gui_state
                    .set_error("no image file to reload".to_string()),
            }
        }
        if actions.open {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", &["png", "bmp", "gif"])
                .pick_file()
            {
                self.load_from(path);
            }
        }

        self.refresh_texture(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            StatusBar::render(ui, &self.gui_state, &self.simulator, self.hovered);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(texture) = &self.texture {
                self.hovered = circuit_view(ui, texture, &mut self.gui_state, &mut self.simulator);
            }
        });
    }
}

/// Open the window and block until it is closed.
///
/// # Errors
/// Returns an error if eframe cannot create the window, e.g. when no display
/// server is available.
pub fn run_gui(
    simulator: Simulator,
    source: Bitmap,
    image_path: Option<PathBuf>,
    config: GuiConfig,
    ticks_per_frame: u32,
) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("Bitmap Logic Simulator"),
        ..Default::default()
    };

    eframe::run_native(
        "Bitmap Logic Simulator",
        options,
        Box::new(move |_cc| {
            Box::new(GuiApp::new(
                simulator,
                source,
                image_path,
                config,
                ticks_per_frame,
            ))
        }),
    )
}
