use std::f64::consts::TAU;

use glam::Vec2;
use trace_engine::{Arrowhead, Badge, Rgba, TraceSurface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

// Style setters via property assignment, avoiding the deprecated JsValue setters.
fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str("fillStyle"), &JsValue::from_str(color));
}

fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str("strokeStyle"), &JsValue::from_str(color));
}

/// [`TraceSurface`] over a browser Canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `canvas_id`, size it and grab its 2D context.
    pub fn attach(document: &Document, canvas_id: &str, size: Vec2) -> Result<Self, JsValue> {
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("canvas #{canvas_id} not found")))?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn circle_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
    }
}

impl TraceSurface for CanvasSurface {
    fn is_attached(&self) -> bool {
        self.canvas.is_connected()
    }

    fn clear(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_point(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if self.circle_path(center, radius) {
            set_fill_style(&self.ctx, &color.to_css());
            self.ctx.fill();
        }
    }

    fn draw_badge(&mut self, badge: &Badge) {
        let color = badge.color.to_css();
        self.ctx.save();
        if self.circle_path(badge.center, badge.radius) {
            set_fill_style(&self.ctx, &badge.fill.to_css());
            set_stroke_style(&self.ctx, &color);
            self.ctx.set_line_width(badge.ring_width as f64);
            self.ctx.fill();
            self.ctx.stroke();
        }
        set_fill_style(&self.ctx, &color);
        self.ctx.set_font(&format!("bold {}px Inter, sans-serif", badge.font_px));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        if let Err(e) = self
            .ctx
            .fill_text(&badge.label(), badge.center.x as f64, badge.center.y as f64)
        {
            log::warn!("trace: badge label failed: {e:?}");
        }
        self.ctx.restore();
    }

    fn fill_arrowhead(&mut self, arrow: &Arrowhead) {
        let [tip, left, right] = arrow.vertices();
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.move_to(tip.x as f64, tip.y as f64);
        self.ctx.line_to(left.x as f64, left.y as f64);
        self.ctx.line_to(right.x as f64, right.y as f64);
        self.ctx.close_path();
        set_fill_style(&self.ctx, &arrow.color.to_css());
        self.ctx.fill();
        self.ctx.restore();
    }
}
