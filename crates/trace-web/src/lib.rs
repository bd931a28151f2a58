//! Browser bindings for the trace engine.
//!
//! One player lives in a `thread_local!`, because wasm-bindgen cannot export
//! generic structs directly. The page drives it from `requestAnimationFrame`:
//!
//! ```ignore
//! trace_init("trace-canvas", null);
//! await trace_load("/letter-data");
//! trace_request("a");
//! const frame = (dt) => { trace_tick(dt); requestAnimationFrame(frame); };
//! ```

pub mod canvas;
pub mod loader;

use std::cell::{Cell, RefCell};

use trace_engine::{TraceConfig, TracePlayer};
use wasm_bindgen::prelude::*;

pub use canvas::CanvasSurface;
pub use loader::fetch_catalog;

thread_local! {
    static PLAYER: RefCell<Option<TracePlayer<CanvasSurface>>> = const { RefCell::new(None) };
    /// Bumped on every init so a load started for an older player is dropped.
    static GENERATION: Cell<u32> = const { Cell::new(0) };
}

fn with_player<R>(f: impl FnOnce(&mut TracePlayer<CanvasSurface>) -> R) -> Option<R> {
    PLAYER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn not_initialized() -> JsValue {
    JsValue::from_str("trace player not initialized; call trace_init() first")
}

/// Create the player on the canvas with id `canvas_id`.
///
/// `config_json` may override any `TraceConfig` field; `null` keeps defaults.
#[wasm_bindgen]
pub fn trace_init(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json.as_deref() {
        Some(json) => TraceConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => TraceConfig::default(),
    };
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let surface = CanvasSurface::attach(&document, canvas_id, config.canvas_size())?;

    with_player(|p| p.dispose());
    PLAYER.with(|cell| *cell.borrow_mut() = Some(TracePlayer::new(config, surface)));
    GENERATION.with(|g| g.set(g.get().wrapping_add(1)));
    log::info!("trace-web: initialized on #{canvas_id}");
    Ok(())
}

/// Fetch `<base_url>/<KEY>.json` for each configured letter and install the
/// catalog. Load failures are reported through `trace_status`, not thrown.
/// A later call supersedes one still in flight.
#[wasm_bindgen]
pub async fn trace_load(base_url: String) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let generation = GENERATION.with(Cell::get);
    let (token, keys) = with_player(|p| {
        let token = p.begin_load();
        (token, p.sequencer().config().letter_keys.clone())
    })
    .ok_or_else(not_initialized)?;

    let result = fetch_catalog(&window, &base_url, &keys).await;

    if GENERATION.with(Cell::get) != generation {
        log::debug!("trace-web: player replaced during load, dropping result");
        return Ok(());
    }
    with_player(|p| p.finish_load(token, result));
    Ok(())
}

/// Ask for a letter. Anything but a single letter is ignored.
#[wasm_bindgen]
pub fn trace_request(letter: Option<String>) {
    with_player(|p| p.request(letter.as_deref()));
}

/// Advance playback by `dt_ms`. Returns the number of callbacks fired.
#[wasm_bindgen]
pub fn trace_tick(dt_ms: f32) -> u32 {
    with_player(|p| p.tick(dt_ms) as u32).unwrap_or(0)
}

/// Cancel playback and release the player.
#[wasm_bindgen]
pub fn trace_dispose() {
    PLAYER.with(|cell| {
        if let Some(mut player) = cell.borrow_mut().take() {
            player.dispose();
        }
    });
    GENERATION.with(|g| g.set(g.get().wrapping_add(1)));
}

// ---- View accessors ----

/// "loading", "ready" or "error".
#[wasm_bindgen]
pub fn trace_status() -> String {
    with_player(|p| p.status().as_str())
        .unwrap_or("loading")
        .to_string()
}

#[wasm_bindgen]
pub fn trace_active_letter() -> Option<String> {
    with_player(|p| p.sequencer().active_letter().map(|k| k.to_string())).flatten()
}

#[wasm_bindgen]
pub fn trace_completed_strokes() -> Option<u32> {
    with_player(|p| p.sequencer().completed_strokes().map(|n| n as u32)).flatten()
}

#[wasm_bindgen]
pub fn trace_is_drawing() -> bool {
    with_player(|p| p.sequencer().is_drawing()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn trace_error_message() -> Option<String> {
    with_player(|p| p.sequencer().error_message().map(str::to_string)).flatten()
}

#[wasm_bindgen]
pub fn trace_status_message() -> Option<String> {
    with_player(|p| p.sequencer().status_message().map(str::to_string)).flatten()
}

/// Accessible caption for the canvas.
#[wasm_bindgen]
pub fn trace_label() -> String {
    with_player(|p| p.sequencer().label()).unwrap_or_else(|| "Trace animation".to_string())
}

/// Palette as JSON: `[{ "name": "Deep Blue", "color": "#005587ff" }, ...]`.
#[wasm_bindgen]
pub fn trace_legend() -> String {
    with_player(|p| serde_json::to_string(p.sequencer().legend()))
        .and_then(Result::ok)
        .unwrap_or_else(|| "[]".to_string())
}
