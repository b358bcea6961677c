// Drawing side of the field. The simulation only needs three primitives, so it
// talks to a `Surface` and the canvas implementation lives behind it.

use nalgebra_glm as glm;
use std::f64::consts::PI;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::FieldError;

pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_circle(&mut self, center: &glm::DVec2, radius: f64, style: &str);
    fn stroke_line(&mut self, from: &glm::DVec2, to: &glm::DVec2, width: f64, style: &str);
}

pub struct CanvasRenderer {
    pub context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        CanvasRenderer { context }
    }

    // Ok(None) when the canvas can't give us a 2d context, which callers treat
    // as "nothing to draw on" rather than an error
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Option<Self>, JsValue> {
        let context = match canvas.get_context("2d")? {
            Some(context) => context,
            None => return Ok(None),
        };
        Ok(context
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
            .map(CanvasRenderer::new))
    }
}

impl Surface for CanvasRenderer {
    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, center: &glm::DVec2, radius: f64, style: &str) {
        self.context.begin_path();
        // throws on a negative radius
        if let Err(e) = self.context.arc(center.x, center.y, radius, 0.0, 2.0 * PI) {
            warn!("arc failed: {}", FieldError::from(e));
            return;
        }
        self.context.set_fill_style(&JsValue::from_str(style));
        self.context.fill();
    }

    #[allow(deprecated)]
    fn stroke_line(&mut self, from: &glm::DVec2, to: &glm::DVec2, width: f64, style: &str) {
        self.context.begin_path();
        self.context.set_stroke_style(&JsValue::from_str(style));
        self.context.set_line_width(width);
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.context.stroke();
    }
}
