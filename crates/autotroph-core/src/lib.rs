//! Steady-state model of inorganic carbon uptake and fixation
//!
//! A photosynthetic cell takes up CO2 and HCO3- across its membrane,
//! interconverts them and fixes carbon through rubisco (CO2) and
//! H-carboxylation (HCO3-). This crate provides the closed-form steady state
//! of that system together with the derived fluxes and growth physiology.
//!
//! # Module Organisation
//!
//! - `parameters`: Rate constants and cell geometry with literature defaults
//! - `model`: The steady-state solver and derived quantities
//! - `mass_balance`: The underlying rate equations and a numerical cross-check
//! - `sweep`: Parallel evaluation over ranges of parameter values
//! - `python`: Python bindings

pub mod constants;
pub mod errors;
pub mod mass_balance;
pub mod model;
pub mod parameters;
pub mod python;
pub mod sweep;

pub use model::SteadyStateCarbonModel;
pub use parameters::{ModelParameters, ParameterName};
