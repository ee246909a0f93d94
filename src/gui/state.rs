//! # GUI State Management
//!
//! View state of the window front end: run control, the camera that maps
//! image pixels to screen points, and the pixel currently held down by the
//! pointer. Kept free of any egui context so it can be tested headless.

use egui::{Pos2, Rect, Vec2};

/// Smallest and largest screen size of one image pixel.
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 64.0;

/// Maps image pixels to screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Screen points per image pixel.
    pub zoom: f32,
    /// Offset of the image center from the view center, in screen points.
    pub pan: Vec2,
}

impl Camera {
    /// Largest zoom that shows the whole image inside `view`.
    pub fn fit(view: Vec2, image: (usize, usize)) -> Self {
        let (w, h) = (image.0.max(1) as f32, image.1.max(1) as f32);
        let zoom = (view.x / w).min(view.y / h).clamp(MIN_ZOOM, MAX_ZOOM);
        Camera {
            zoom,
            pan: Vec2::ZERO,
        }
    }

    /// Screen rectangle covered by the image.
    pub fn image_rect(&self, view: Rect, image: (usize, usize)) -> Rect {
        let size = Vec2::new(image.0 as f32 * self.zoom, image.1 as f32 * self.zoom);
        Rect::from_center_size(view.center() + self.pan, size)
    }

    /// Image pixel under a screen position, if any.
    pub fn screen_to_pixel(&self, view: Rect, image: (usize, usize), pos: Pos2) -> Option<(usize, usize)> {
        let rect = self.image_rect(view, image);
        let local = (pos - rect.min) / self.zoom;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (x, y) = (local.x as usize, local.y as usize);
        (x < image.0 && y < image.1).then_some((x, y))
    }

    /// Zoom by a scroll amount, keeping the point under `anchor` fixed.
    pub fn zoom_at(&mut self, view: Rect, anchor: Pos2, scroll: f32) {
        let factor = (1.0 + scroll * 0.002).clamp(0.5, 2.0);
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let applied = new_zoom / self.zoom;
        let from_center = anchor - (view.center() + self.pan);
        self.pan -= from_center * (applied - 1.0);
        self.zoom = new_zoom;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}

/// Everything the window remembers between frames.
#[derive(Debug, Clone)]
pub struct GuiState {
    /// Whether ticks run every frame
    pub running: bool,
    /// Ticks run per displayed frame
    pub ticks_per_frame: u32,
    /// Fitted lazily on the first frame that knows the view size
    pub camera: Option<Camera>,
    /// Pixel driven high by the primary button, released on button up
    pub pressed: Option<(usize, usize)>,
    /// Last error message
    pub last_error: Option<String>,
}

impl GuiState {
    pub fn new(running: bool, ticks_per_frame: u32) -> Self {
        Self {
            running,
            ticks_per_frame,
            camera: None,
            pressed: None,
            last_error: None,
        }
    }

    pub fn set_error(&mut self, error: String) {
        self.last_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn get_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
