//! Parameter sweeps
//!
//! Evaluate the steady-state model across a range of values for one or two
//! parameters. Each point builds an independent model from a copy of the base
//! parameters, so points are evaluated in parallel via rayon.

use crate::errors::{AutotrophError, AutotrophResult};
use crate::model::{SteadyStateCarbonModel, SteadyStateSummary};
use crate::parameters::{ModelParameters, ParameterName};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An output of the steady-state model that can be extracted from a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    CIn,
    HIn,
    RubiscoFlux,
    HcarbFlux,
    BiomassFlux,
    RubiscoFluxPerCellPerS,
    HcarbFluxPerCellPerS,
    BiomassFluxPerCellPerS,
    DoublingTimeHr,
    GrowthRateHr,
    CLeakage,
    CLeakagePerCellPerS,
}

impl Quantity {
    /// Every output, in [`SteadyStateSummary`] field order.
    pub const ALL: [Quantity; 12] = [
        Quantity::CIn,
        Quantity::HIn,
        Quantity::RubiscoFlux,
        Quantity::HcarbFlux,
        Quantity::BiomassFlux,
        Quantity::RubiscoFluxPerCellPerS,
        Quantity::HcarbFluxPerCellPerS,
        Quantity::BiomassFluxPerCellPerS,
        Quantity::DoublingTimeHr,
        Quantity::GrowthRateHr,
        Quantity::CLeakage,
        Quantity::CLeakagePerCellPerS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quantity::CIn => "c_in",
            Quantity::HIn => "h_in",
            Quantity::RubiscoFlux => "rubisco_flux",
            Quantity::HcarbFlux => "hcarb_flux",
            Quantity::BiomassFlux => "biomass_flux",
            Quantity::RubiscoFluxPerCellPerS => "rubisco_flux_per_cell_per_s",
            Quantity::HcarbFluxPerCellPerS => "hcarb_flux_per_cell_per_s",
            Quantity::BiomassFluxPerCellPerS => "biomass_flux_per_cell_per_s",
            Quantity::DoublingTimeHr => "doubling_time_hr",
            Quantity::GrowthRateHr => "growth_rate_hr",
            Quantity::CLeakage => "c_leakage",
            Quantity::CLeakagePerCellPerS => "c_leakage_per_cell_per_s",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quantity {
    type Err = AutotrophError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| AutotrophError::UnknownQuantity(s.to_string()))
    }
}

impl SteadyStateSummary {
    /// Read a single output by name.
    pub fn get(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::CIn => self.c_in,
            Quantity::HIn => self.h_in,
            Quantity::RubiscoFlux => self.rubisco_flux,
            Quantity::HcarbFlux => self.hcarb_flux,
            Quantity::BiomassFlux => self.biomass_flux,
            Quantity::RubiscoFluxPerCellPerS => self.rubisco_flux_per_cell_per_s,
            Quantity::HcarbFluxPerCellPerS => self.hcarb_flux_per_cell_per_s,
            Quantity::BiomassFluxPerCellPerS => self.biomass_flux_per_cell_per_s,
            Quantity::DoublingTimeHr => self.doubling_time_hr,
            Quantity::GrowthRateHr => self.growth_rate_hr,
            Quantity::CLeakage => self.c_leakage,
            Quantity::CLeakagePerCellPerS => self.c_leakage_per_cell_per_s,
        }
    }
}

fn evaluate(base: &ModelParameters, assignments: &[(ParameterName, f64)]) -> SteadyStateSummary {
    let mut parameters = base.clone();
    for &(name, value) in assignments {
        parameters.set(name, value);
    }
    SteadyStateCarbonModel::from_parameters(parameters).summary()
}

/// Sweep a single parameter over a set of values.
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    base: ModelParameters,
    parameter: ParameterName,
    values: Array1<f64>,
}

impl ParameterSweep {
    pub fn new(base: ModelParameters, parameter: ParameterName, values: Array1<f64>) -> Self {
        Self {
            base,
            parameter,
            values,
        }
    }

    /// Evaluate the model at every value. Results keep the input order.
    pub fn run(&self) -> SweepResults {
        log::debug!(
            "Sweeping {} over {} values",
            self.parameter,
            self.values.len()
        );
        let values = self.values.to_vec();
        let summaries = values
            .par_iter()
            .map(|&value| evaluate(&self.base, &[(self.parameter, value)]))
            .collect();

        SweepResults {
            parameter: self.parameter,
            values: self.values.clone(),
            summaries,
        }
    }
}

/// Outputs of a [`ParameterSweep`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    parameter: ParameterName,
    values: Array1<f64>,
    summaries: Vec<SteadyStateSummary>,
}

impl SweepResults {
    pub fn parameter(&self) -> ParameterName {
        self.parameter
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn summaries(&self) -> &[SteadyStateSummary] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// One output across the sweep, aligned with [`SweepResults::values`].
    pub fn output(&self, quantity: Quantity) -> Array1<f64> {
        self.summaries.iter().map(|s| s.get(quantity)).collect()
    }
}

/// Sweep two parameters over the outer product of their values.
#[derive(Debug, Clone)]
pub struct GridSweep {
    base: ModelParameters,
    rows: (ParameterName, Array1<f64>),
    columns: (ParameterName, Array1<f64>),
}

impl GridSweep {
    /// Both axes must name different parameters.
    pub fn new(
        base: ModelParameters,
        rows: (ParameterName, Array1<f64>),
        columns: (ParameterName, Array1<f64>),
    ) -> AutotrophResult<Self> {
        if rows.0 == columns.0 {
            return Err(AutotrophError::DuplicateSweepParameter(rows.0.to_string()));
        }
        Ok(Self {
            base,
            rows,
            columns,
        })
    }

    /// Evaluate the model at every grid point.
    pub fn run(&self) -> GridSweepResults {
        let (row_name, row_values) = &self.rows;
        let (column_name, column_values) = &self.columns;
        let shape = (row_values.len(), column_values.len());
        log::debug!(
            "Sweeping {} x {} over a {}x{} grid",
            row_name,
            column_name,
            shape.0,
            shape.1
        );

        let points: Vec<(f64, f64)> = row_values
            .iter()
            .flat_map(|&r| column_values.iter().map(move |&c| (r, c)))
            .collect();
        let summaries: Vec<SteadyStateSummary> = points
            .par_iter()
            .map(|&(r, c)| evaluate(&self.base, &[(*row_name, r), (*column_name, c)]))
            .collect();

        GridSweepResults {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            summaries: Array2::from_shape_fn(shape, |(i, j)| summaries[i * shape.1 + j]),
        }
    }
}

/// Outputs of a [`GridSweep`], indexed `[row, column]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSweepResults {
    rows: (ParameterName, Array1<f64>),
    columns: (ParameterName, Array1<f64>),
    summaries: Array2<SteadyStateSummary>,
}

impl GridSweepResults {
    pub fn rows(&self) -> (ParameterName, &Array1<f64>) {
        (self.rows.0, &self.rows.1)
    }

    pub fn columns(&self) -> (ParameterName, &Array1<f64>) {
        (self.columns.0, &self.columns.1)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.summaries.dim()
    }

    pub fn summary(&self, row: usize, column: usize) -> Option<&SteadyStateSummary> {
        self.summaries.get((row, column))
    }

    /// One output over the grid, with shape `(rows, columns)`.
    pub fn output(&self, quantity: Quantity) -> Array2<f64> {
        self.summaries.map(|s| s.get(quantity))
    }
}
