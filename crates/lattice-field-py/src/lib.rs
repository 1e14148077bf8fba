use lattice_field_core::{FieldGlyph, SimConfig, World, DEFAULT_VIEW_SCALE};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn world_from_json(config_json: &str) -> PyResult<World> {
    let config =
        SimConfig::from_json(config_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    World::try_new(config).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Default simulation config as JSON, for callers to edit and pass back.
#[pyfunction]
fn default_config_json() -> PyResult<String> {
    SimConfig::default()
        .to_json()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Run a particle-cloud experiment and return the `RunSummary` as JSON.
#[pyfunction]
fn run_experiment_json(config_json: &str, steps: usize, sample_every: usize) -> PyResult<String> {
    let mut world = world_from_json(config_json)?;
    let summary = world
        .try_run_experiment(steps, sample_every)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    serde_json::to_string(&summary).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Advance `steps` frames, then return one `{anchor, tip}` segment per cell as JSON.
#[pyfunction]
#[pyo3(signature = (config_json, steps, scale_view = DEFAULT_VIEW_SCALE))]
fn field_glyphs_json(config_json: &str, steps: usize, scale_view: f32) -> PyResult<String> {
    let mut world = world_from_json(config_json)?;
    world
        .try_advance(steps)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let glyphs: Vec<FieldGlyph> = world.field().glyphs(scale_view).collect();
    serde_json::to_string(&glyphs).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(default_config_json, m)?)?;
    m.add_function(wrap_pyfunction!(run_experiment_json, m)?)?;
    m.add_function(wrap_pyfunction!(field_glyphs_json, m)?)?;
    Ok(())
}
