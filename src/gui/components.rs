//! # GUI Components
//!
//! Widgets of the window front end: the control bar, the status bar and the
//! circuit view. The circuit view blends the source image with the state
//! overlay the same way for every pixel:
//!
//! ```text
//! out = source * (1 - mix) + overlay * mix      overlay = white if powered else black
//! ```

use egui::{Color32, ColorImage, Sense};

use super::state::{Camera, GuiState};
use crate::pixel::{Bitmap, PixelGrid};
use crate::simulator::Simulator;

/// What the user asked for through the control bar this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlActions {
    pub step: bool,
    pub reload: bool,
    pub open: bool,
}

/// Blend one source pixel with its state overlay.
pub fn blend(source: [u8; 3], powered: bool, mix: f32) -> Color32 {
    let overlay = if powered { 255.0 } else { 0.0 };
    let mix = mix.clamp(0.0, 1.0);
    let channel = |c: u8| (f32::from(c) * (1.0 - mix) + overlay * mix).round() as u8;
    Color32::from_rgb(channel(source[0]), channel(source[1]), channel(source[2]))
}

/// Full frame of the circuit view.
///
/// # Arguments
/// * `source` - Image the circuit was extracted from
/// * `simulator` - Provides the per-pixel states
/// * `mix` - Overlay weight in `[0, 1]`
///
/// Pixels outside either grid are drawn from whichever side has them.
pub fn compose_frame(source: &Bitmap, simulator: &Simulator, mix: f32) -> ColorImage {
    let (width, height) = simulator.size();
    let mut pixels = Vec::with_capacity(width * height);
    for pixel in simulator.pixels() {
        let color = if pixel.x < source.width() && pixel.y < source.height() {
            source.color_at(pixel.x, pixel.y).to_rgb8()
        } else {
            [0, 0, 0]
        };
        pixels.push(blend(color, pixel.state, mix));
    }
    ColorImage {
        size: [width, height],
        pixels,
    }
}

/// Run control, reload and file buttons.
pub struct ControlPanel;

impl ControlPanel {
    /// Render the control bar
    ///
    /// ```text
    /// ┌───────────────────────────────────────────────────────────┐
    /// │ [Pause] [Step] [Reload] [Open…]  Ticks/frame [ 5 ] [Close] │
    /// └───────────────────────────────────────────────────────────┘
    /// ```
    pub fn render(ui: &mut egui::Ui, state: &mut GuiState) -> ControlActions {
        let mut actions = ControlActions::default();
        ui.horizontal(|ui| {
            let run_label = if state.running { "Pause" } else { "Run" };
            if ui.button(run_label).clicked() {
                state.running = !state.running;
            }
            if ui
                .add_enabled(!state.running, egui::Button::new("Step"))
                .clicked()
            {
                actions.step = true;
            }
            if ui.button("Reload").clicked() {
                actions.reload = true;
            }
            if ui.button("Open…").clicked() {
                actions.open = true;
            }

            ui.separator();
            ui.label("Ticks/frame");
            ui.add(egui::DragValue::new(&mut state.ticks_per_frame).clamp_range(1..=1000));

            ui.separator();
            if ui.button("Close").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        actions
    }
}

/// Circuit statistics and the last error.
pub struct StatusBar;

impl StatusBar {
    pub fn render(ui: &mut egui::Ui, state: &GuiState, simulator: &Simulator, hovered: Option<(usize, usize)>) {
        ui.horizontal(|ui| {
            if state.running {
                ui.colored_label(Color32::GREEN, "● Running");
            } else {
                ui.colored_label(Color32::RED, "● Paused");
            }
            let (width, height) = simulator.size();
            ui.label(format!("{}x{}", width, height));
            ui.label(format!("wires: {}", simulator.wire_count()));
            ui.label(format!("gates: {}", simulator.gate_count()));
            ui.label(format!("tick: {}", simulator.ticks()));

            if let Some((x, y)) = hovered {
                let wire = match simulator.wire_at(x, y) {
                    Ok(Some(wire)) => format!(
                        "{} = {}",
                        wire,
                        simulator.wire_state(wire).unwrap_or(false)
                    ),
                    _ => "background".to_string(),
                };
                ui.label(format!("({}, {}) {}", x, y, wire));
            }

            if let Some(error) = state.get_error() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(Color32::RED, format!("Error: {}", error));
                });
            }
        });
    }
}

/// Draw the circuit and handle camera and pointer input. Returns the pixel
/// under the pointer.
pub fn circuit_view(
    ui: &mut egui::Ui,
    texture: &egui::TextureHandle,
    state: &mut GuiState,
    simulator: &mut Simulator,
) -> Option<(usize, usize)> {
    let (view, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let image = simulator.size();
    let camera = state
        .camera
        .get_or_insert_with(|| Camera::fit(view.size(), image));

    let (scroll, pointer_delta, middle_down, primary_pressed, primary_released, hover) =
        ui.input(|i| {
            (
                i.scroll_delta.y,
                i.pointer.delta(),
                i.pointer.middle_down(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.hover_pos(),
            )
        });

    if response.hovered() {
        if scroll != 0.0 {
            if let Some(anchor) = hover {
                camera.zoom_at(view, anchor, scroll);
            }
        }
        if middle_down {
            camera.pan_by(pointer_delta);
        }
    }

    let hovered = hover.and_then(|pos| {
        if view.contains(pos) {
            camera.screen_to_pixel(view, image, pos)
        } else {
            None
        }
    });

    let image_rect = camera.image_rect(view, image);
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    let painter = ui.painter_at(view);
    painter.rect_filled(view, 0.0, Color32::from_gray(24));
    painter.image(texture.id(), image_rect, uv, Color32::WHITE);

    if primary_pressed && response.hovered() {
        if let Some((x, y)) = hovered {
            if let Ok(true) = simulator.set(x, y, true) {
                state.pressed = Some((x, y));
            }
        }
    }
    if primary_released {
        if let Some((x, y)) = state.pressed.take() {
            if let Err(e) = simulator.set(x, y, false) {
                state.set_error(e.to_string());
            }
        }
    }

    hovered
}
