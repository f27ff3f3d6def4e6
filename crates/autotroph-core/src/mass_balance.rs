//! Mass balance of intracellular inorganic carbon
//!
//! The steady state in [`crate::model`] is the fixed point of two linear
//! rate equations:
//!
//! $$\frac{dC}{dt} = \alpha(C_{out} - C) - \gamma C - \delta C + \phi H$$
//! $$\frac{dH}{dt} = \beta(H_{out} - H) + \chi H_{out} + \delta C - \phi H - \omega H$$
//!
//! This module evaluates those rates at a given state and solves the linear
//! system numerically. It never steps the system forward in time.

use crate::errors::{AutotrophError, AutotrophResult};
use crate::model::SteadyStateCarbonModel;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Rate equations for intracellular CO2 (C) and HCO3- (H).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassBalance {
    alpha: f64,
    beta: f64,
    gamma: f64,
    delta: f64,
    phi: f64,
    omega: f64,
    chi: f64,
    c_out: f64,
    h_out: f64,
}

/// Individual carbon fluxes at a given intracellular state (µM/s).
///
/// Exchange fluxes are positive into the cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonBudget {
    pub co2_influx: f64,
    pub hco3_influx: f64,
    pub active_uptake: f64,
    pub hydration: f64,
    pub dehydration: f64,
    pub rubisco: f64,
    pub hcarb: f64,
}

impl CarbonBudget {
    /// Net inorganic carbon entering the cell.
    pub fn net_uptake(&self) -> f64 {
        self.co2_influx + self.hco3_influx + self.active_uptake
    }

    /// Carbon leaving the inorganic pools through fixation.
    pub fn total_fixation(&self) -> f64 {
        self.rubisco + self.hcarb
    }
}

impl MassBalance {
    pub fn from_model(model: &SteadyStateCarbonModel) -> Self {
        Self {
            alpha: model.alpha(),
            beta: model.beta(),
            gamma: model.gamma(),
            delta: model.delta(),
            phi: model.phi(),
            omega: model.omega(),
            chi: model.chi(),
            c_out: model.c_out(),
            h_out: model.h_out(),
        }
    }

    /// Break the rates down into their individual fluxes.
    pub fn budget(&self, c: f64, h: f64) -> CarbonBudget {
        CarbonBudget {
            co2_influx: self.alpha * (self.c_out - c),
            hco3_influx: self.beta * (self.h_out - h),
            active_uptake: self.chi * self.h_out,
            hydration: self.delta * c,
            dehydration: self.phi * h,
            rubisco: self.gamma * c,
            hcarb: self.omega * h,
        }
    }

    /// Time derivatives `(dC/dt, dH/dt)` at the given concentrations (µM/s).
    pub fn rates(&self, c: f64, h: f64) -> (f64, f64) {
        let b = self.budget(c, h);
        let dc_dt = b.co2_influx - b.rubisco - b.hydration + b.dehydration;
        let dh_dt = b.hco3_influx + b.active_uptake + b.hydration - b.dehydration - b.hcarb;
        (dc_dt, dh_dt)
    }

    /// Matrix `A` of the steady-state system `A x = s` with `x = (C, H)`.
    pub fn system_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(
            self.alpha + self.gamma + self.delta,
            -self.phi,
            -self.delta,
            self.beta + self.phi + self.omega,
        )
    }

    /// Source vector `s` of the steady-state system.
    pub fn source(&self) -> Vector2<f64> {
        Vector2::new(
            self.alpha * self.c_out,
            (self.beta + self.chi) * self.h_out,
        )
    }

    /// Solve for the steady state `(C, H)` by LU decomposition.
    pub fn solve(&self) -> AutotrophResult<(f64, f64)> {
        let x = self
            .system_matrix()
            .lu()
            .solve(&self.source())
            .ok_or(AutotrophError::SingularSystem)?;
        Ok((x[0], x[1]))
    }
}
