//! WASM bindings for in-browser annotation.
//!
//! This module exposes the annotator and the tooltip controller to
//! JavaScript via wasm-bindgen. The host script applies returned actions to
//! the DOM; all policy lives on this side of the boundary.

use wasm_bindgen::prelude::*;

use crate::annotator::Annotator;
use crate::options::AnnotateOptions;
use crate::tooltip::{Action, DeviceMode, Marker, Rect, TooltipController, Viewport};
use crate::watcher::Rescanner;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_options(options_json: Option<String>) -> Result<AnnotateOptions, JsValue> {
    match options_json {
        Some(json) => serde_json::from_str(&json).map_err(err),
        None => Ok(AnnotateOptions::default()),
    }
}

fn actions_json(actions: &[Action]) -> Result<String, JsValue> {
    serde_json::to_string(actions).map_err(err)
}

/// Annotate a full HTML document and return the annotated HTML.
///
/// `options_json` is an optional JSON object; absent fields take their
/// defaults.
#[wasm_bindgen]
pub fn annotate_html(html: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let annotator = Annotator::new(parse_options(options_json)?).map_err(err)?;
    Ok(annotator.annotate(html).html)
}

/// Extract the glossary terms of a document as a JSON array of
/// `{display, ordinal, definition, slug}` objects.
#[wasm_bindgen]
pub fn extract_terms(html: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let annotator = Annotator::new(parse_options(options_json)?).map_err(err)?;
    let index = annotator.extract_terms(html);
    serde_json::to_string(index.entries()).map_err(err)
}

/// A live annotation session: the annotated document, a rescanner for
/// content added later, and the tooltip state machine.
///
/// Event methods return a JSON array of actions for the host to apply.
#[wasm_bindgen]
pub struct GlossarySession {
    html: String,
    report_json: String,
    rescanner: Rescanner,
    controller: TooltipController,
}

#[wasm_bindgen]
impl GlossarySession {
    /// Annotate `html` and start a session over the result.
    ///
    /// `touch` selects the tap interaction model instead of hover.
    #[wasm_bindgen(constructor)]
    pub fn new(
        html: &str,
        options_json: Option<String>,
        touch: bool,
    ) -> Result<GlossarySession, JsValue> {
        let options = parse_options(options_json)?;
        let annotator = Annotator::new(options).map_err(err)?;
        let annotated = annotator.annotate(html);

        let rescanner = annotator.rescanner(&annotated).map_err(err)?;
        let mode = if touch {
            DeviceMode::Touch
        } else {
            DeviceMode::Hover
        };
        let controller = annotator.tooltip_controller(annotated.index.clone(), mode);

        Ok(GlossarySession {
            html: annotated.html,
            report_json: serde_json::to_string(&annotated.report).map_err(err)?,
            rescanner,
            controller,
        })
    }

    /// The annotated document HTML.
    #[wasm_bindgen(getter)]
    pub fn html(&self) -> String {
        self.html.clone()
    }

    /// Annotation counts as a JSON object.
    #[wasm_bindgen(getter)]
    pub fn report(&self) -> String {
        self.report_json.clone()
    }

    /// Annotate a fragment added after the initial pass (its `outerHTML`)
    /// and return the annotated fragment.
    pub fn annotate_fragment(&mut self, fragment: &str) -> String {
        self.rescanner.annotate_fragment(fragment).0
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pointer_enter(
        &mut self,
        ref_id: &str,
        href: &str,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        viewport_width: f64,
        viewport_height: f64,
        scroll_y: f64,
    ) -> Result<String, JsValue> {
        let marker = marker(ref_id, href, left, top, width, height);
        let viewport = viewport(viewport_width, viewport_height, scroll_y);
        actions_json(&self.controller.pointer_enter(marker, viewport))
    }

    pub fn pointer_leave_marker(&mut self, now_ms: f64) -> Result<String, JsValue> {
        actions_json(&self.controller.pointer_leave_marker(now_ms as u64))
    }

    pub fn pointer_enter_panel(&mut self) -> Result<String, JsValue> {
        actions_json(&self.controller.pointer_enter_panel())
    }

    pub fn pointer_leave_panel(&mut self, now_ms: f64) -> Result<String, JsValue> {
        actions_json(&self.controller.pointer_leave_panel(now_ms as u64))
    }

    /// A tap on a marker. Pass a tap elsewhere via [`tap_outside`].
    ///
    /// [`tap_outside`]: GlossarySession::tap_outside
    #[allow(clippy::too_many_arguments)]
    pub fn tap(
        &mut self,
        ref_id: &str,
        href: &str,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        viewport_width: f64,
        viewport_height: f64,
        scroll_y: f64,
    ) -> Result<String, JsValue> {
        let marker = marker(ref_id, href, left, top, width, height);
        let viewport = viewport(viewport_width, viewport_height, scroll_y);
        actions_json(&self.controller.tap(Some(marker), viewport))
    }

    pub fn tap_outside(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
        scroll_y: f64,
    ) -> Result<String, JsValue> {
        let viewport = viewport(viewport_width, viewport_height, scroll_y);
        actions_json(&self.controller.tap(None, viewport))
    }

    pub fn dismiss(&mut self) -> Result<String, JsValue> {
        actions_json(&self.controller.dismiss())
    }

    pub fn scrolled(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
        scroll_y: f64,
        now_ms: f64,
    ) -> Result<String, JsValue> {
        let viewport = viewport(viewport_width, viewport_height, scroll_y);
        actions_json(&self.controller.scrolled(viewport, now_ms as u64))
    }

    pub fn resized(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
        scroll_y: f64,
    ) -> Result<String, JsValue> {
        let viewport = viewport(viewport_width, viewport_height, scroll_y);
        actions_json(&self.controller.resized(viewport))
    }

    /// Fire due timers (grace hides, throttled moves). Call from a
    /// `requestAnimationFrame` loop or a short interval.
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsValue> {
        actions_json(&self.controller.tick(now_ms as u64))
    }
}

fn marker(ref_id: &str, href: &str, left: f64, top: f64, width: f64, height: f64) -> Marker {
    Marker {
        ref_id: ref_id.to_string(),
        slug: href.to_string(),
        rect: Rect {
            left,
            top,
            width,
            height,
        },
    }
}

fn viewport(width: f64, height: f64, scroll_y: f64) -> Viewport {
    Viewport {
        width,
        height,
        scroll_y,
    }
}
