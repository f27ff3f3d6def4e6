use autotroph_core::python::core;
use autotroph_genes::python::genes;
use pyo3::prelude::*;
use pyo3::wrap_pymodule;

#[pymodule]
#[pyo3(name = "_lib")]
fn autotroph(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;
    m.add_wrapped(wrap_pymodule!(genes))?;

    set_path(m, "autotroph._lib.core", "core")?;
    set_path(m, "autotroph._lib.genes", "genes")?;

    Ok(())
}

/// Register a submodule in `sys.modules` so that it can be imported by its
/// dotted path.
fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let modules = PyModule::import_bound(m.py(), "sys")?.getattr("modules")?;
    modules.set_item(path, m.getattr(module)?)
}
