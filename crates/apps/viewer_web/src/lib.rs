//! Browser entry point for the OAE globe dashboard.
//!
//! The host page owns the DOM controls and the requestAnimationFrame loop;
//! this crate owns everything behind them: dataset loading, the wgpu globe,
//! picking, and model runs. Exports are thin wrappers over a thread-local
//! [`ViewerState`].

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use dashboard::Session;
use foundation::math::Vec3;
use formats::{CUSTOM_COUNTRY, CountryPresets, cells_from_geojson_str};
use layers::{CellMesh, Colormap, HEX_LIFT, LegendSnapshot, tessellate_cells};
use modelapi::{
    MODEL_ENDPOINT, ModelApiError, RunForm, RunResponse, error_from_response,
    missing_fields_message,
};
use prefs::LocalStoragePrefs;
use runtime::{EventBus, Frame};
use scene::Ray;

mod wgpu;

use wgpu::{HexVertex, WgpuContext};

const CANVAS_ID: &str = "oae-canvas";

/// Globe spin per animation frame while auto-rotation is on.
const AUTO_SPIN_RAD_PER_FRAME: f64 = 0.001;

/// Pointer travel below this is a click; at or above it is a drag.
const CLICK_DRAG_THRESHOLD_PX: f64 = 6.0;

const FOV_Y_RAD: f32 = std::f32::consts::FRAC_PI_4;
const NEAR_PLANE: f32 = 0.05;
const FAR_PLANE: f32 = 100.0;

const ORBIT_SPEED: f64 = 0.005;
const PITCH_LIMIT_RAD: f64 = 1.55;
const MIN_DISTANCE: f64 = 1.2;
const MAX_DISTANCE: f64 = 20.0;

#[derive(Debug, Copy, Clone)]
struct CameraState {
    yaw_rad: f64,
    pitch_rad: f64,
    distance: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            yaw_rad: 0.6,
            pitch_rad: 0.3,
            distance: 3.0,
        }
    }
}

impl CameraState {
    fn eye(&self) -> Vec3 {
        let cp = self.pitch_rad.cos();
        Vec3::new(
            self.distance * cp * self.yaw_rad.sin(),
            self.distance * self.pitch_rad.sin(),
            self.distance * cp * self.yaw_rad.cos(),
        )
    }
}

#[derive(Debug, Copy, Clone)]
struct PointerTrack {
    down_x: f64,
    down_y: f64,
    last_x: f64,
    last_y: f64,
}

struct ViewerState {
    wgpu: Option<WgpuContext>,
    session: Session,
    prefs: LocalStoragePrefs,
    presets: CountryPresets,
    frame: Frame,
    bus: EventBus,
    camera: CameraState,
    spin_rad: f64,
    auto_rotate: bool,
    pointer: Option<PointerTrack>,
    /// Cached tessellation; geometry survives model runs, only colors change.
    meshes: Vec<CellMesh>,
    canvas_width: f64,
    canvas_height: f64,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            wgpu: None,
            session: Session::new(),
            prefs: LocalStoragePrefs::new(),
            presets: CountryPresets::default(),
            frame: Frame::first(),
            bus: EventBus::new(),
            camera: CameraState::default(),
            spin_rad: 0.0,
            auto_rotate: true,
            pointer: None,
            meshes: Vec::new(),
            canvas_width: 1.0,
            canvas_height: 1.0,
        }
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::default());
}

fn with_state<R>(f: impl FnOnce(&mut ViewerState) -> R) -> R {
    STATE.with(|s| f(&mut s.borrow_mut()))
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

// Column-major 4x4 matrices, matching the WGSL mat4x4 layout.

type Mat4 = [[f32; 4]; 4];

fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for c in 0..4 {
        for r in 0..4 {
            let mut acc = 0.0;
            for k in 0..4 {
                acc += a[k][r] * b[c][k];
            }
            out[c][r] = acc;
        }
    }
    out
}

fn mat4_perspective_rh_z0(fov_y_rad: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_rad * 0.5).tan();
    let nf = 1.0 / (near - far);
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, near * far * nf, 0.0],
    ]
}

fn mat4_look_at_origin_rh(eye: Vec3) -> Mat4 {
    let f = eye.scale(-1.0).normalized();
    let s = f.cross(Vec3::new(0.0, 1.0, 0.0)).normalized();
    let u = s.cross(f);
    let [fx, fy, fz] = f.as_f32();
    let [sx, sy, sz] = s.as_f32();
    let [ux, uy, uz] = u.as_f32();
    let [ex, ey, ez] = eye.as_f32();
    [
        [sx, ux, -fx, 0.0],
        [sy, uy, -fy, 0.0],
        [sz, uz, -fz, 0.0],
        [
            -(sx * ex + sy * ey + sz * ez),
            -(ux * ex + uy * ey + uz * ez),
            fx * ex + fy * ey + fz * ez,
            1.0,
        ],
    ]
}

fn mat4_rotation_y(angle_rad: f32) -> Mat4 {
    let c = angle_rad.cos();
    let s = angle_rad.sin();
    [
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn view_proj_with_spin(state: &ViewerState) -> Mat4 {
    let aspect = (state.canvas_width / state.canvas_height.max(1.0)) as f32;
    let proj = mat4_perspective_rh_z0(FOV_Y_RAD, aspect.max(0.01), NEAR_PLANE, FAR_PLANE);
    let view = mat4_look_at_origin_rh(state.camera.eye());
    let model = mat4_rotation_y(state.spin_rad as f32);
    mat4_mul(mat4_mul(proj, view), model)
}

fn rotate_y(v: Vec3, angle_rad: f64) -> Vec3 {
    let c = angle_rad.cos();
    let s = angle_rad.sin();
    Vec3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

/// Screen pixel to a ray in globe-local space (spin unapplied).
fn screen_ray(state: &ViewerState, x_px: f64, y_px: f64) -> Option<Ray> {
    if state.canvas_width <= 0.0 || state.canvas_height <= 0.0 {
        return None;
    }

    let eye = state.camera.eye();
    let forward = eye.scale(-1.0).normalized();
    let right = forward.cross(Vec3::new(0.0, 1.0, 0.0)).normalized();
    let up = right.cross(forward);

    let aspect = state.canvas_width / state.canvas_height;
    let tan_half = (FOV_Y_RAD as f64 * 0.5).tan();
    let ndc_x = 2.0 * x_px / state.canvas_width - 1.0;
    let ndc_y = 1.0 - 2.0 * y_px / state.canvas_height;

    let dir = (forward
        + right.scale(ndc_x * tan_half * aspect)
        + up.scale(ndc_y * tan_half))
    .normalized();

    // The globe spins as a model rotation, so picking happens in the globe's
    // own frame: undo the spin on the camera ray instead of every vertex.
    Some(Ray::new(
        rotate_y(eye, -state.spin_rad),
        rotate_y(dir, -state.spin_rad),
    ))
}

fn render_scene(state: &ViewerState) {
    if let Some(ctx) = &state.wgpu {
        let view_proj = view_proj_with_spin(state);
        if let Err(e) = wgpu::render_globe(ctx, view_proj) {
            web_sys::console::error_1(&e);
        }
    }
}

/// Rebuilds the hex overlay vertex data and legend after any color-affecting
/// change. A selection with no data anywhere leaves the screen untouched.
fn refresh_visuals(state: &mut ViewerState) {
    let Some(out) = state.session.recolor() else {
        return;
    };

    let mut paint_by_index = std::collections::BTreeMap::new();
    for (cell, paint) in state.session.world().cells().iter().zip(&out.paints) {
        paint_by_index.insert(cell.index, *paint);
    }

    let mut vertices = Vec::new();
    for mesh in &state.meshes {
        let Some(paint) = paint_by_index.get(&mesh.cell_index) else {
            continue;
        };
        if !paint.visible {
            continue;
        }
        let color = [
            paint.rgb[0] as f32 / 255.0,
            paint.rgb[1] as f32 / 255.0,
            paint.rgb[2] as f32 / 255.0,
        ];
        for p in &mesh.positions {
            vertices.push(HexVertex {
                position: p.as_f32(),
                color,
            });
        }
    }

    if let Some(ctx) = &mut state.wgpu {
        wgpu::set_hex_mesh(ctx, &vertices);
    }

    update_legend_dom(&out.legend);
    render_scene(state);
}

// DOM helpers. Missing elements are skipped rather than treated as errors so
// the crate also works on pages that omit optional panels.

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

fn element_by_id(id: &str) -> Option<web_sys::Element> {
    document()?.get_element_by_id(id)
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = element_by_id(id) {
        let classes = el.class_list();
        let result = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
        let _ = result;
    }
}

fn set_style(id: &str, property: &str, value: &str) {
    if let Some(el) = element_by_id(id)
        && let Some(html) = el.dyn_ref::<web_sys::HtmlElement>()
    {
        let _ = html.style().set_property(property, value);
    }
}

fn form_value(id: &str) -> String {
    let Some(el) = element_by_id(id) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
        return input.value();
    }
    if let Some(select) = el.dyn_ref::<web_sys::HtmlSelectElement>() {
        return select.value();
    }
    String::new()
}

fn set_input_value(id: &str, value: &str) {
    if let Some(el) = element_by_id(id)
        && let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>()
    {
        input.set_value(value);
    }
}

fn update_legend_dom(legend: &LegendSnapshot) {
    set_text("scaleMin", &legend.min_label);
    set_text("scaleMax", &legend.max_label);
    set_text("unitLabel", &legend.unit_label);
    set_style("scaleBar", "background", &legend.css_gradient());
}

fn show_model_result(text: &str, is_error: bool) {
    if let Some(el) = element_by_id("modelResult")
        && let Some(html) = el.dyn_ref::<web_sys::HtmlElement>()
    {
        html.set_inner_text(text);
        let color = if is_error { "#f87171" } else { "#86efac" };
        let _ = html.style().set_property("color", color);
    }
    set_hidden("modelResult", false);
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Kicks off async wgpu initialization against the `oae-canvas` element.
#[wasm_bindgen]
pub fn init_wgpu() {
    wasm_bindgen_futures::spawn_local(async {
        match wgpu::init_wgpu_from_canvas_id(CANVAS_ID).await {
            Ok(ctx) => with_state(|state| {
                state.wgpu = Some(ctx);
                // The dataset may have finished loading before the GPU did.
                refresh_visuals(state);
                render_scene(state);
            }),
            Err(e) => web_sys::console::error_1(&e),
        }
    });
}

#[wasm_bindgen]
pub fn set_canvas_sizes(width: u32, height: u32) {
    with_state(|state| {
        state.canvas_width = width.max(1) as f64;
        state.canvas_height = height.max(1) as f64;
        if let Some(ctx) = &mut state.wgpu {
            wgpu::resize_wgpu(ctx, width, height);
        }
        render_scene(state);
    });
}

#[wasm_bindgen]
pub fn set_auto_rotate(enabled: bool) {
    with_state(|state| state.auto_rotate = enabled);
}

/// Advances the frame clock and renders. Driven by requestAnimationFrame.
#[wasm_bindgen]
pub fn advance_frame(dt_s: f64) {
    with_state(|state| {
        state.frame = state.frame.advance(dt_s);
        if state.auto_rotate && state.pointer.is_none() {
            state.spin_rad += AUTO_SPIN_RAD_PER_FRAME;
        }
        render_scene(state);
    });
}

#[wasm_bindgen]
pub fn camera_orbit(dx: f64, dy: f64) {
    with_state(|state| {
        state.camera.yaw_rad -= dx * ORBIT_SPEED;
        state.camera.pitch_rad = clamp(
            state.camera.pitch_rad + dy * ORBIT_SPEED,
            -PITCH_LIMIT_RAD,
            PITCH_LIMIT_RAD,
        );
        render_scene(state);
    });
}

#[wasm_bindgen]
pub fn camera_zoom(delta_y: f64) {
    with_state(|state| {
        state.camera.distance = clamp(
            state.camera.distance * (0.0015 * delta_y).exp(),
            MIN_DISTANCE,
            MAX_DISTANCE,
        );
        render_scene(state);
    });
}

#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64) {
    with_state(|state| {
        state.pointer = Some(PointerTrack {
            down_x: x,
            down_y: y,
            last_x: x,
            last_y: y,
        });
    });
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) {
    let drag = with_state(|state| {
        let track = state.pointer.as_mut()?;
        let dx = x - track.last_x;
        let dy = y - track.last_y;
        track.last_x = x;
        track.last_y = y;
        Some((dx, dy))
    });
    if let Some((dx, dy)) = drag {
        camera_orbit(dx, dy);
    }
}

/// Ends a pointer gesture. Short gestures count as clicks and pick a cell;
/// anything that travelled the threshold or more was a drag.
#[wasm_bindgen]
pub fn pointer_up(x: f64, y: f64) {
    let tooltip = with_state(|state| {
        let track = state.pointer.take()?;
        let travel = ((x - track.down_x).powi(2) + (y - track.down_y).powi(2)).sqrt();
        if travel >= CLICK_DRAG_THRESHOLD_PX {
            return None;
        }

        let hit = scene::pick_screen(
            state.session.world(),
            x,
            y,
            |px, py| screen_ray(state, px, py),
            1.0,
        )?;
        state.session.tooltip_text(hit.cell_index)
    });

    match tooltip {
        Some(text) => {
            set_text("tooltip", &text);
            set_style("tooltip", "left", &format!("{}px", x + 12.0));
            set_style("tooltip", "top", &format!("{}px", y + 12.0));
            set_hidden("tooltip", false);
        }
        None => set_hidden("tooltip", true),
    }
}

/// Aborts the current pointer gesture (pointercancel, pointerleave) and
/// hides the tooltip without picking.
#[wasm_bindgen]
pub fn pointer_cancel() {
    with_state(|state| state.pointer = None);
    set_hidden("tooltip", true);
}

/// Fetches the hex-cell GeoJSON dataset and loads it into the session.
#[wasm_bindgen]
pub fn load_dataset(url: String) {
    wasm_bindgen_futures::spawn_local(async move {
        let text = match fetch_text(&url).await {
            Ok(t) => t,
            Err(msg) => {
                web_sys::console::error_1(&JsValue::from_str(&msg));
                return;
            }
        };
        let cells = match cells_from_geojson_str(&text) {
            Ok(cells) => cells,
            Err(e) => {
                web_sys::console::error_1(&JsValue::from_str(&format!("dataset error: {e}")));
                return;
            }
        };

        with_state(|state| {
            let frame = state.frame;
            state
                .session
                .load_cells(cells, &mut state.prefs, frame, &mut state.bus);
            state.meshes = tessellate_cells(state.session.world(), HEX_LIFT);
            refresh_visuals(state);
        });
    });
}

/// Fetches the country presets file used by [`apply_country_preset`].
#[wasm_bindgen]
pub fn load_presets(url: String) {
    wasm_bindgen_futures::spawn_local(async move {
        let text = match fetch_text(&url).await {
            Ok(t) => t,
            Err(msg) => {
                web_sys::console::error_1(&JsValue::from_str(&msg));
                return;
            }
        };
        match CountryPresets::from_json_str(&text) {
            Ok(presets) => with_state(|state| state.presets = presets),
            Err(e) => {
                web_sys::console::error_1(&JsValue::from_str(&format!("presets error: {e}")));
            }
        }
    });
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch {url} failed: {e}"))?;
    if !resp.ok() {
        return Err(format!("fetch {url} failed: HTTP {}", resp.status()));
    }
    resp.text()
        .await
        .map_err(|e| format!("fetch {url} failed: {e}"))
}

/// Fills the price inputs from a country preset. The CUSTOM sentinel clears
/// them instead. Returns whether a preset was applied.
#[wasm_bindgen]
pub fn apply_country_preset(country: &str) -> bool {
    if country == CUSTOM_COUNTRY {
        for id in ["gasPrice", "fuelPrice", "elecPrice", "elecCIntensity"] {
            set_input_value(id, "");
        }
        return false;
    }

    let preset = with_state(|state| state.presets.get(country).copied());
    match preset {
        Some(p) => {
            set_input_value("gasPrice", &p.gas_price.to_string());
            set_input_value("fuelPrice", &p.fuel_price.to_string());
            set_input_value("elecPrice", &p.elec_price.to_string());
            set_input_value("elecCIntensity", &p.elec_c_intensity.to_string());
            true
        }
        None => false,
    }
}

/// Switches the color ramp. Unknown names are ignored and return false.
#[wasm_bindgen]
pub fn set_colormap(name: &str) -> bool {
    let Some(colormap) = Colormap::from_name(name) else {
        return false;
    };
    with_state(|state| {
        state.session.set_colormap(colormap);
        refresh_visuals(state);
    });
    true
}

/// Flips the colormap direction, returning the new reversed flag.
#[wasm_bindgen]
pub fn toggle_colormap_reversed() -> bool {
    with_state(|state| {
        let reversed = state.session.toggle_reversed();
        refresh_visuals(state);
        reversed
    })
}

/// Selects the variable to color by. False when no loaded cell carries it.
#[wasm_bindgen]
pub fn set_active_variable(key: &str) -> bool {
    with_state(|state| {
        let frame = state.frame;
        match state
            .session
            .set_active_variable(key, &mut state.prefs, frame, &mut state.bus)
        {
            Ok(()) => {
                refresh_visuals(state);
                true
            }
            Err(_) => false,
        }
    })
}

#[wasm_bindgen]
pub fn active_variable() -> Option<String> {
    with_state(|state| state.session.active_variable().map(str::to_string))
}

/// True while a model run is pending; the host page disables the run button.
#[wasm_bindgen]
pub fn model_run_in_flight() -> bool {
    with_state(|state| state.session.run_in_flight())
}

/// Snapshot of the layer buttons: `[{key, label, active}]`.
///
/// The host page rebuilds its button row from this after data changes.
#[wasm_bindgen]
pub fn layer_controls() -> JsValue {
    with_state(|state| {
        let active = state.session.active_variable().map(str::to_string);
        let arr = js_sys::Array::new();
        for key in state.session.available_variables() {
            let obj = js_sys::Object::new();
            let _ = js_sys::Reflect::set(&obj, &"key".into(), &JsValue::from_str(&key));
            let _ = js_sys::Reflect::set(
                &obj,
                &"label".into(),
                &JsValue::from_str(layers::registry::display_label(&key)),
            );
            let _ = js_sys::Reflect::set(
                &obj,
                &"active".into(),
                &JsValue::from_bool(active.as_deref() == Some(key.as_str())),
            );
            arr.push(&obj);
        }
        arr.into()
    })
}

/// Takes all pending events as `[{frame, kind, detail}]`, oldest first.
#[wasm_bindgen]
pub fn drain_events() -> JsValue {
    with_state(|state| {
        let arr = js_sys::Array::new();
        for event in state.bus.drain() {
            let obj = js_sys::Object::new();
            let _ = js_sys::Reflect::set(
                &obj,
                &"frame".into(),
                &JsValue::from_f64(event.frame_index as f64),
            );
            let _ = js_sys::Reflect::set(&obj, &"kind".into(), &JsValue::from_str(event.kind));
            let _ =
                js_sys::Reflect::set(&obj, &"detail".into(), &JsValue::from_str(&event.detail));
            arr.push(&obj);
        }
        arr.into()
    })
}

/// Reads the model form, validates it, and POSTs a run to the backend.
///
/// Local validation failures render immediately. A run already in flight
/// drops the new request instead of queueing it.
#[wasm_bindgen]
pub fn run_model() {
    let form = RunForm {
        gas_price: form_value("gasPrice"),
        fuel_price: form_value("fuelPrice"),
        elec_price: form_value("elecPrice"),
        elec_c_intensity: form_value("elecCIntensity"),
        ccs_cost: form_value("CCS_cost"),
        ccs_eff: form_value("CCS_eff"),
        hfo_price: form_value("hfoPrice"),
        precip_surface: form_value("precip_surface"),
        country: form_value("country"),
    };

    let request = match form.validate() {
        Ok(req) => req,
        Err(missing) => {
            show_model_result(&missing_fields_message(&missing), true);
            return;
        }
    };

    let started = with_state(|state| state.session.begin_run());
    if !started {
        return;
    }

    set_hidden("modelResult", true);
    set_hidden("modelLoader", false);

    wasm_bindgen_futures::spawn_local(async move {
        let outcome = post_model_run(&request).await;

        set_hidden("modelLoader", true);

        let summary = match outcome {
            Ok(response) => {
                let updated = with_state(|state| {
                    let frame = state.frame;
                    let updated = state.session.apply_run_updates(
                        response.cell_updates(),
                        &mut state.prefs,
                        frame,
                        &mut state.bus,
                    );
                    refresh_visuals(state);
                    updated
                });
                let [emission, cost] = response.summary_lines();
                show_model_result(&format!("{emission}\n{cost}"), false);
                format!("updated {updated} cells")
            }
            Err(e) => {
                show_model_result(&e.to_string(), true);
                format!("failed: {e}")
            }
        };

        with_state(|state| {
            let frame = state.frame;
            state.session.finish_run(&summary, frame, &mut state.bus);
        });
    });
}

async fn post_model_run(request: &modelapi::RunRequest) -> Result<RunResponse, ModelApiError> {
    let body = serde_json::to_string(request)
        .map_err(|e| ModelApiError::Transport(format!("encode failed: {e}")))?;

    let resp = gloo_net::http::Request::post(MODEL_ENDPOINT)
        .header("Content-Type", "application/json")
        .body(body)
        .map_err(|e| ModelApiError::Transport(format!("request failed: {e}")))?
        .send()
        .await
        .map_err(|e| ModelApiError::Transport(format!("request failed: {e}")))?;

    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| ModelApiError::Transport(format!("unreadable response: {e}")))?;

    if !(200..300).contains(&status) {
        return Err(error_from_response(status, &text));
    }

    RunResponse::from_json_str(&text)
        .map_err(|e| ModelApiError::Transport(format!("malformed response: {e}")))
}
