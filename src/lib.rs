#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod geom;
pub mod graph;
pub mod necklace;

use std::fmt;

use geom::{Circle3, CurveInput, Line3, Point3, Polyline3, Vec3};
use graph::node::NecklaceNode;
use graph::value::Value;
use necklace::{NodeVariant, SampleResult, SamplingConfig};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Publiek toegangspunt voor de host: één necklace-node met zijn curve.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    curve: Option<CurveInput>,
    node: NecklaceNode,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            curve: None,
            node: NecklaceNode::default(),
        }
    }

    /// Maak een engine voor een specifieke variant, op id of weergavenaam.
    pub fn with_variant(name: &str) -> Result<Engine, JsValue> {
        let variant = NodeVariant::from_name(name)
            .ok_or_else(|| js_error(&format!("onbekende necklace-variant `{name}`")))?;
        Ok(Engine {
            initialized: true,
            curve: None,
            node: NecklaceNode::new(variant),
        })
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Stel een polyline in uit platte `[x0, y0, z0, x1, ...]` coördinaten.
    #[wasm_bindgen]
    pub fn set_polyline(&mut self, coordinates: &[f64], closed: bool) -> Result<(), JsValue> {
        let polyline = Polyline3::from_flat(coordinates, closed).map_err(to_js_error)?;
        self.replace_curve(CurveInput::Polyline(polyline));
        Ok(())
    }

    /// Stel een cirkel in rond `center` in het vlak met normaal `normal`.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn set_circle(
        &mut self,
        cx: f64,
        cy: f64,
        cz: f64,
        nx: f64,
        ny: f64,
        nz: f64,
        radius: f64,
    ) -> Result<(), JsValue> {
        let circle = Circle3::try_new(Point3::new(cx, cy, cz), Vec3::new(nx, ny, nz), radius)
            .map_err(to_js_error)?;
        self.replace_curve(CurveInput::Circle(circle));
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_line(
        &mut self,
        x1: f64,
        y1: f64,
        z1: f64,
        x2: f64,
        y2: f64,
        z2: f64,
    ) -> Result<(), JsValue> {
        let start = Point3::new(x1, y1, z1);
        let end = Point3::new(x2, y2, z2);
        if !start.is_finite() || !end.is_finite() {
            return Err(js_error("lijn bevat niet-eindige coördinaten"));
        }
        self.replace_curve(CurveInput::Line(Line3::new(start, end)));
        Ok(())
    }

    /// Zet een scalair attribuut op lange of korte naam, bv. `numSample`
    /// of `tw`.
    #[wasm_bindgen]
    pub fn set_input(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        self.node
            .set_named(name, &Value::Number(value))
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_up_vector(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.node
            .set_named("upVector", &Value::Vector([x, y, z]))
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_shift(&mut self, index: usize, value: f64) -> Result<(), JsValue> {
        self.node.set_shift(index, value).map_err(to_js_error)
    }

    /// Vervang de volledige configuratie met een JS-object
    /// (`{ sampleCount, frontAxis, upAxis, ... }`).
    #[wasm_bindgen]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: SamplingConfig =
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        self.node.set_config(config);
        Ok(())
    }

    /// Herbereken de samples als er iets gewijzigd is.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        let curve = self
            .curve
            .as_ref()
            .ok_or_else(|| js_error("er is geen curve ingesteld"))?;
        let computed = self.node.compute(curve).map_err(to_js_error)?;
        if computed {
            debug_log!(
                "necklace: {} samples op {} curve",
                self.sample_count(),
                curve.kind()
            );
        }
        Ok(())
    }

    /// Posities als `[x0, y0, z0, x1, ...]`.
    #[wasm_bindgen]
    pub fn positions(&self) -> Result<Vec<f64>, JsValue> {
        self.current_result().map(SampleResult::flat_positions)
    }

    /// Rotaties als `[rx0, ry0, rz0, rx1, ...]` in de ingestelde hoekeenheid.
    #[wasm_bindgen]
    pub fn rotations(&self) -> Result<Vec<f64>, JsValue> {
        self.current_result().map(SampleResult::flat_rotations)
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn shifts(&self) -> Vec<f64> {
        self.node.shifts().to_vec()
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.node.result().map_or(0, SampleResult::len)
    }

    /// Volledig resultaat inclusief diagnostiek.
    #[wasm_bindgen]
    pub fn get_samples(&self) -> Result<JsValue, JsValue> {
        let result = self.current_result()?;
        serde_wasm_bindgen::to_value(result).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Engine {
    fn replace_curve(&mut self, curve: CurveInput) {
        self.curve = Some(curve);
        self.node.invalidate_curve();
    }

    fn current_result(&self) -> Result<&SampleResult, JsValue> {
        if self.node.is_dirty() {
            return Err(js_error("necklace is nog niet geëvalueerd"));
        }
        self.node
            .result()
            .ok_or_else(|| js_error("necklace is nog niet geëvalueerd"))
    }

    /// Directe toegang voor native gebruik.
    #[must_use]
    pub fn node(&self) -> &NecklaceNode {
        &self.node
    }

    #[must_use]
    pub fn curve(&self) -> Option<&CurveInput> {
        self.curve.as_ref()
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::warn!("{message}");
        JsValue::NULL
    }
}
