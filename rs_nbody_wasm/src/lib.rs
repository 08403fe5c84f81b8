// rs_nbody_wasm/src/lib.rs
// Frame-driven wasm wrapper around the n-body simulator.

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;
use rs_nbody::models::Body;
use rs_nbody::simulation::Simulator;
use rs_nbody::utils::{PhysicsError, SimulationConfig};

fn to_js(e: PhysicsError) -> JsValue {
    let message = e.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

#[wasm_bindgen]
pub struct WasmSimulator {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmSimulator {
    /// Empty box of side `width` that runs until `horizon`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, hz: f64, theta: f64, horizon: f64) -> Result<WasmSimulator, JsValue> {
        let config = SimulationConfig::new(width, Some(hz), Some(theta), None, None).with_horizon(horizon);
        Simulator::new(config, Vec::new(), Vec::new())
            .map(|simulator| WasmSimulator { simulator })
            .map_err(to_js)
    }

    /// Adds a body and returns its index.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn add_body(
        &mut self,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        radius: f64,
        mass: f64,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<usize, JsValue> {
        let body = Body::new((x, y), (vx, vy), radius, mass).map_err(to_js)?;
        self.simulator.add_body(body.with_color((r, g, b))).map_err(to_js)
    }

    /// Runs until the next frame. Returns `false` once the horizon is reached.
    #[wasm_bindgen]
    pub fn advance_frame(&mut self) -> bool {
        self.simulator.advance_to_next_frame(&mut ())
    }

    /// Body positions as `[x0, y0, x1, y1, ...]`.
    #[wasm_bindgen]
    pub fn positions(&self) -> Float64Array {
        let flat: Vec<f64> = self
            .simulator
            .bodies()
            .iter()
            .flat_map(|body| [body.position.0, body.position.1])
            .collect();
        Float64Array::from(flat.as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn time(&self) -> f64 {
        self.simulator.clock()
    }

    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> usize {
        self.simulator.bodies().len()
    }

    #[wasm_bindgen]
    pub fn kinetic_energy(&self) -> f64 {
        self.simulator.total_kinetic_energy()
    }
}
