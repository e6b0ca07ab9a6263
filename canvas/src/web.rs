//! Browser target: paints into a `CanvasRenderingContext2d`.
//!
//! This module is the only place that touches `web_sys`. Scene units are
//! mapped to backing-store pixels with a device-pixel-ratio transform set
//! once per [`Surface::clear`]. Each frame is painted into a detached canvas
//! and copied to the visible one on [`Surface::present`].

use std::f64::consts::TAU;

use js_sys::Array;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::Point;
use crate::color::Rgba;
use crate::surface::{FontSpec, ImageData, Path, PathOp, Rect, StrokeStyle, Surface};

/// A failed `Canvas2D` call, carrying the JS exception's debug rendering.
#[derive(Debug, thiserror::Error)]
#[error("canvas call failed: {0}")]
pub struct WebError(pub String);

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self(format!("{value:?}"))
    }
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    back: Option<Detached>,
    dpr: f64,
}

/// A canvas that is not attached to the document, with its 2d context.
struct Detached {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Detached {
    fn new(width: u32, height: u32) -> Result<Self, WebError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| WebError("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| WebError("created element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| WebError("no 2d context".into()))?
            .dyn_into()
            .map_err(|_| WebError("2d context has an unexpected type".into()))?;
        Ok(Self { canvas, ctx })
    }
}

impl CanvasSurface {
    /// Wrap the on-screen context. Frames are painted off screen and only
    /// copied onto it by [`Surface::present`], so a failed frame leaves the
    /// previous one visible.
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d, dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self { ctx, back: None, dpr }
    }

    #[must_use]
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn frame(&self) -> Result<&CanvasRenderingContext2d, WebError> {
        self.back
            .as_ref()
            .map(|b| &b.ctx)
            .ok_or_else(|| WebError("frame not started; call clear first".into()))
    }

    fn trace(&self, path: &Path) -> Result<&CanvasRenderingContext2d, WebError> {
        let ctx = self.frame()?;
        ctx.begin_path();
        for op in path.ops() {
            match *op {
                PathOp::MoveTo(p) => ctx.move_to(p.x, p.y),
                PathOp::LineTo(p) => ctx.line_to(p.x, p.y),
                PathOp::Close => ctx.close_path(),
                PathOp::Circle { center, radius } => {
                    ctx.move_to(center.x + radius, center.y);
                    ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
                }
            }
        }
        Ok(ctx)
    }

    /// Copy decoded pixels into a detached canvas that `drawImage` can scale.
    fn staging_canvas(image: &ImageData) -> Result<HtmlCanvasElement, WebError> {
        let staging = Detached::new(image.width(), image.height())?;
        let data =
            web_sys::ImageData::new_with_u8_clamped_array_and_sh(Clamped(image.pixels()), image.width(), image.height())?;
        staging.ctx.put_image_data(&data, 0.0, 0.0)?;
        Ok(staging.canvas)
    }
}

impl Surface for CanvasSurface {
    type Error = WebError;

    fn clear(&mut self) -> Result<(), WebError> {
        let canvas = self.ctx.canvas().ok_or_else(|| WebError("context has no canvas".into()))?;
        let (width, height) = (canvas.width(), canvas.height());
        let reusable = self
            .back
            .as_ref()
            .is_some_and(|b| b.canvas.width() == width && b.canvas.height() == height);
        if !reusable {
            self.back = Some(Detached::new(width, height)?);
        }
        let ctx = self.frame()?;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
        ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        Ok(())
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) -> Result<(), WebError> {
        let ctx = self.trace(path)?;
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill();
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) -> Result<(), WebError> {
        let ctx = self.trace(path)?;
        let segments = Array::new();
        if let Some([on, off]) = stroke.dash {
            segments.push(&JsValue::from_f64(on));
            segments.push(&JsValue::from_f64(off));
        }
        ctx.set_line_dash(&segments)?;
        ctx.set_stroke_style_str(&stroke.color.to_css());
        ctx.set_line_width(stroke.width);
        ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, color: Rgba) -> Result<(), WebError> {
        let ctx = self.frame()?;
        ctx.set_font(&font.to_css());
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill_text(text, at.x, at.y)?;
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageData, dest: Rect, opacity: f64) -> Result<(), WebError> {
        let staging = Self::staging_canvas(image)?;
        let ctx = self.frame()?;
        ctx.set_global_alpha(opacity);
        let drawn = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(&staging, dest.x, dest.y, dest.w, dest.h);
        ctx.set_global_alpha(1.0);
        drawn.map_err(WebError::from)
    }

    fn present(&mut self) -> Result<(), WebError> {
        let back = self.back.as_ref().ok_or_else(|| WebError("frame not started; call clear first".into()))?;
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(back.canvas.width()), f64::from(back.canvas.height()));
        self.ctx.draw_image_with_html_canvas_element(&back.canvas, 0.0, 0.0)?;
        Ok(())
    }
}
