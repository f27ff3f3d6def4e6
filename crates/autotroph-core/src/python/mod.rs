//! Python bindings for the steady-state model and parameter sweeps

use crate::errors::AutotrophError;
use crate::model::SteadyStateCarbonModel;
use crate::parameters::{ModelParameters, ParameterName};
use crate::sweep::{GridSweep, ParameterSweep, Quantity};
use numpy::{IntoPyArray, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

impl From<AutotrophError> for PyErr {
    fn from(e: AutotrophError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }
}

fn parameters_from_dict(parameters: Option<&Bound<'_, PyAny>>) -> PyResult<ModelParameters> {
    match parameters {
        Some(parameters) => pythonize::depythonize::<ModelParameters>(parameters)
            .map_err(|e| PyValueError::new_err(format!("{}", e))),
        None => Ok(ModelParameters::default()),
    }
}

/// Python wrapper for SteadyStateCarbonModel
///
/// Example:
///     model = SteadyStateCarbonModel(gamma=2.0, chi=0.1)
///     model.c_in()
///     model.summary()["doubling_time_hr"]
#[pyclass(frozen)]
#[pyo3(name = "SteadyStateCarbonModel")]
#[derive(Debug, Clone)]
pub struct PySteadyStateCarbonModel(pub SteadyStateCarbonModel);

#[pymethods]
impl PySteadyStateCarbonModel {
    /// Any parameter left as None takes its default. `phi` and `omega` left as
    /// None are derived from the other parameters.
    #[new]
    #[pyo3(signature = (
        alpha=None, beta=None, gamma=None, delta=None, phi=None, omega=None,
        chi=None, c_out=None, k_eq=None, hcarb_ratio=None, gamma_omega_ratio=None,
        cell_volume=None, cell_surface_area=None, carbon_per_cell=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        alpha: Option<f64>,
        beta: Option<f64>,
        gamma: Option<f64>,
        delta: Option<f64>,
        phi: Option<f64>,
        omega: Option<f64>,
        chi: Option<f64>,
        c_out: Option<f64>,
        k_eq: Option<f64>,
        hcarb_ratio: Option<f64>,
        gamma_omega_ratio: Option<f64>,
        cell_volume: Option<f64>,
        cell_surface_area: Option<f64>,
        carbon_per_cell: Option<f64>,
    ) -> Self {
        let mut parameters = ModelParameters::default();
        let supplied = [
            (ParameterName::Alpha, alpha),
            (ParameterName::Beta, beta),
            (ParameterName::Gamma, gamma),
            (ParameterName::Delta, delta),
            (ParameterName::Phi, phi),
            (ParameterName::Omega, omega),
            (ParameterName::Chi, chi),
            (ParameterName::COut, c_out),
            (ParameterName::KEq, k_eq),
            (ParameterName::HcarbRatio, hcarb_ratio),
            (ParameterName::GammaOmegaRatio, gamma_omega_ratio),
            (ParameterName::CellVolume, cell_volume),
            (ParameterName::CellSurfaceArea, cell_surface_area),
            (ParameterName::CarbonPerCell, carbon_per_cell),
        ];
        for (name, value) in supplied {
            if let Some(value) = value {
                parameters.set(name, value);
            }
        }
        Self(SteadyStateCarbonModel::from_parameters(parameters))
    }

    /// Build from a dict of parameters, optionally validating them first
    #[staticmethod]
    #[pyo3(signature = (parameters, validate=false))]
    fn from_parameters(parameters: &Bound<'_, PyAny>, validate: bool) -> PyResult<Self> {
        let parameters = parameters_from_dict(Some(parameters))?;
        let model = if validate {
            SteadyStateCarbonModel::try_from_parameters(parameters)?
        } else {
            SteadyStateCarbonModel::from_parameters(parameters)
        };
        Ok(Self(model))
    }

    /// Build from a TOML parameter file
    #[staticmethod]
    fn load(path: std::path::PathBuf) -> PyResult<Self> {
        Ok(Self(SteadyStateCarbonModel::from_parameters(
            ModelParameters::load(path)?,
        )))
    }

    /// Parameters in use, with phi and omega resolved
    fn parameters<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        Ok(pythonize::pythonize(py, &self.0.resolved_parameters())?)
    }

    fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        Ok(pythonize::pythonize(py, &self.0.summary())?)
    }

    #[getter]
    fn alpha(&self) -> f64 {
        self.0.alpha()
    }

    #[getter]
    fn beta(&self) -> f64 {
        self.0.beta()
    }

    #[getter]
    fn gamma(&self) -> f64 {
        self.0.gamma()
    }

    #[getter]
    fn delta(&self) -> f64 {
        self.0.delta()
    }

    #[getter]
    fn phi(&self) -> f64 {
        self.0.phi()
    }

    #[getter]
    fn omega(&self) -> f64 {
        self.0.omega()
    }

    #[getter]
    fn chi(&self) -> f64 {
        self.0.chi()
    }

    #[getter]
    fn c_out(&self) -> f64 {
        self.0.c_out()
    }

    #[getter]
    fn k_eq(&self) -> f64 {
        self.0.k_eq()
    }

    #[getter]
    fn h_out(&self) -> f64 {
        self.0.h_out()
    }

    #[getter]
    fn hcarb_ratio(&self) -> f64 {
        self.0.hcarb_ratio()
    }

    #[getter]
    fn flux_conversion_factor(&self) -> f64 {
        self.0.flux_conversion_factor()
    }

    fn c_in(&self) -> f64 {
        self.0.c_in()
    }

    fn h_in(&self) -> f64 {
        self.0.h_in()
    }

    fn rubisco_flux(&self) -> f64 {
        self.0.rubisco_flux()
    }

    fn rubisco_flux_per_cell_per_s(&self) -> f64 {
        self.0.rubisco_flux_per_cell_per_s()
    }

    fn hcarb_flux(&self) -> f64 {
        self.0.hcarb_flux()
    }

    fn hcarb_flux_per_cell_per_s(&self) -> f64 {
        self.0.hcarb_flux_per_cell_per_s()
    }

    fn biomass_flux(&self) -> f64 {
        self.0.biomass_flux()
    }

    fn biomass_flux_per_cell_per_s(&self) -> f64 {
        self.0.biomass_flux_per_cell_per_s()
    }

    fn doubling_time_hr(&self) -> f64 {
        self.0.doubling_time_hr()
    }

    fn growth_rate_hr(&self) -> f64 {
        self.0.growth_rate_hr()
    }

    fn c_leakage(&self) -> f64 {
        self.0.c_leakage()
    }

    fn c_leakage_per_cell_per_s(&self) -> f64 {
        self.0.c_leakage_per_cell_per_s()
    }

    fn __repr__(&self) -> String {
        format!(
            "SteadyStateCarbonModel(c_in={:.4}, h_in={:.4}, biomass_flux={:.4})",
            self.0.c_in(),
            self.0.h_in(),
            self.0.biomass_flux()
        )
    }
}

/// Sweep one parameter and return a dict of numpy arrays keyed by output name.
///
/// The swept values are included under the parameter's own name.
#[pyfunction]
#[pyo3(signature = (parameter, values, base=None))]
fn sweep<'py>(
    py: Python<'py>,
    parameter: &str,
    values: PyReadonlyArray1<'py, f64>,
    base: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyDict>> {
    let parameter: ParameterName = parameter.parse()?;
    let base = parameters_from_dict(base)?;
    let values = values.as_array().to_owned();

    let results = py.allow_threads(|| ParameterSweep::new(base, parameter, values).run());

    let dict = PyDict::new_bound(py);
    dict.set_item(
        parameter.as_str(),
        results.values().clone().into_pyarray_bound(py),
    )?;
    for quantity in Quantity::ALL {
        dict.set_item(
            quantity.as_str(),
            results.output(quantity).into_pyarray_bound(py),
        )?;
    }
    Ok(dict)
}

/// Sweep two parameters over the outer product of their values.
///
/// Returns a dict holding the row and column values under their parameter
/// names and one 2-D numpy array per output, indexed `[row, column]`.
#[pyfunction]
#[pyo3(signature = (rows, row_values, columns, column_values, base=None))]
fn grid_sweep<'py>(
    py: Python<'py>,
    rows: &str,
    row_values: PyReadonlyArray1<'py, f64>,
    columns: &str,
    column_values: PyReadonlyArray1<'py, f64>,
    base: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyDict>> {
    let rows: ParameterName = rows.parse()?;
    let columns: ParameterName = columns.parse()?;
    let base = parameters_from_dict(base)?;
    let grid = GridSweep::new(
        base,
        (rows, row_values.as_array().to_owned()),
        (columns, column_values.as_array().to_owned()),
    )?;

    let results = py.allow_threads(|| grid.run());

    let dict = PyDict::new_bound(py);
    let (row_name, row_values) = results.rows();
    dict.set_item(row_name.as_str(), row_values.clone().into_pyarray_bound(py))?;
    let (column_name, column_values) = results.columns();
    dict.set_item(
        column_name.as_str(),
        column_values.clone().into_pyarray_bound(py),
    )?;
    for quantity in Quantity::ALL {
        dict.set_item(
            quantity.as_str(),
            results.output(quantity).into_pyarray_bound(py),
        )?;
    }
    Ok(dict)
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySteadyStateCarbonModel>()?;
    m.add_function(wrap_pyfunction!(sweep, m)?)?;
    m.add_function(wrap_pyfunction!(grid_sweep, m)?)?;
    Ok(())
}
