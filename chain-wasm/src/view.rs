//! World/canvas coordinate mapping. The simulation runs in a fixed virtual
//! rectangle; resizing only ever changes this mapping, never body positions.

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::constants::{WORLD_H, WORLD_W};

/// Pixels-per-world-unit scale plus the letterbox offset centering the world
/// rectangle on the canvas. World y points up, canvas y points down.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    scale: f64,
    offset: (f64, f64),
    canvas_h: f64,
}

impl Viewport {
    pub fn new() -> Self {
        Viewport {
            scale: 1.0,
            offset: (0.0, 0.0),
            canvas_h: 1.0,
        }
    }

    /// Fit the world rectangle into the canvas, centered, with a margin.
    pub fn fit(&mut self, canvas: &HtmlCanvasElement) {
        let (w, h) = (canvas.width() as f64, canvas.height() as f64);
        let margin = 10.0; // px
        self.scale = ((w - 2.0 * margin) / WORLD_W as f64)
            .min((h - 2.0 * margin) / WORLD_H as f64)
            .max(0.05);
        self.offset = (
            (w - WORLD_W as f64 * self.scale) / 2.0,
            (h - WORLD_H as f64 * self.scale) / 2.0,
        );
        self.canvas_h = h;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_screen(&self, x: f32, y: f32) -> (f64, f64) {
        let (ox, oy) = self.offset;
        (
            x as f64 * self.scale + ox,
            self.canvas_h - (y as f64 * self.scale + oy),
        )
    }

    pub fn to_world(&self, x: f64, y: f64) -> (f32, f32) {
        let (ox, oy) = self.offset;
        (
            ((x - ox) / self.scale) as f32,
            ((self.canvas_h - y - oy) / self.scale) as f32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Match the canvas backing store to its CSS size times the device pixel
/// ratio; a mismatched store stretches the drawing non-uniformly.
pub fn sync_backing_store(window: &Window, canvas: &HtmlCanvasElement) {
    let dpr = window.device_pixel_ratio();
    let (css_w, css_h) = match canvas.dyn_ref::<web_sys::Element>() {
        Some(el) => {
            let rect = el.get_bounding_client_rect();
            (rect.width().max(1.0), rect.height().max(1.0))
        }
        None => (canvas.client_width() as f64, canvas.client_height() as f64),
    };
    let w = (css_w * dpr).round().clamp(1.0, 10000.0) as u32;
    let h = (css_h * dpr).round().clamp(1.0, 10000.0) as u32;
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
}
