//! Steady-state carbon model
//!
//! Closed-form steady state of the linear mass-balance system coupling CO2 and
//! HCO3- exchange across the membrane, their interconversion and their
//! consumption by rubisco and H-carboxylation. See [`crate::mass_balance`] for
//! the underlying equations.

use crate::constants::SECONDS_PER_HOUR;
use crate::errors::AutotrophResult;
use crate::parameters::ModelParameters;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

/// Numerators and shared denominator of the steady-state solution.
///
/// $$C_{in} = \frac{c_{out}(k_{eq}\phi(\beta+\chi) + \alpha(\beta+\phi+\omega))}{D}$$
/// $$H_{in} = \frac{c_{out}(\alpha\delta + k_{eq}(\alpha+\gamma+\delta)(\beta+\chi))}{D}$$
/// $$D = \beta(\gamma+\delta) + \gamma\phi + (\gamma+\delta)\omega + \alpha(\beta+\phi+\omega)$$
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateTerms {
    pub c_numerator: f64,
    pub h_numerator: f64,
    pub denominator: f64,
}

impl SteadyStateTerms {
    /// Intracellular CO2 (µM)
    pub fn c_in(&self) -> f64 {
        self.c_numerator / self.denominator
    }

    /// Intracellular HCO3- (µM)
    pub fn h_in(&self) -> f64 {
        self.h_numerator / self.denominator
    }
}

/// Snapshot of every derived quantity for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteadyStateSummary {
    /// Intracellular CO2 (µM)
    pub c_in: f64,
    /// Intracellular HCO3- (µM)
    pub h_in: f64,
    /// µM/s
    pub rubisco_flux: f64,
    /// µM/s
    pub hcarb_flux: f64,
    /// µM/s
    pub biomass_flux: f64,
    /// C atoms / cell / s
    pub rubisco_flux_per_cell_per_s: f64,
    /// C atoms / cell / s
    pub hcarb_flux_per_cell_per_s: f64,
    /// C atoms / cell / s
    pub biomass_flux_per_cell_per_s: f64,
    /// hr
    pub doubling_time_hr: f64,
    /// 1/hr
    pub growth_rate_hr: f64,
    /// Net CO2 efflux (µM/s)
    pub c_leakage: f64,
    /// C atoms / cell / s
    pub c_leakage_per_cell_per_s: f64,
}

/// Model of dual limitation by CO2 and HCO3- in autotrophy.
///
/// Built once from a [`ModelParameters`] set, after which every accessor is a
/// pure function of the stored values. Unset `phi`/`omega` are resolved at
/// construction.
///
/// No validation is performed by [`SteadyStateCarbonModel::from_parameters`]:
/// unphysical inputs produce negative, infinite or NaN outputs rather than
/// errors.
///
/// Serializes as its supplied [`ModelParameters`] only. Derived values are
/// recomputed on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModelParameters", into = "ModelParameters")]
pub struct SteadyStateCarbonModel {
    parameters: ModelParameters,
    phi: f64,
    omega: f64,
    h_out: f64,
    flux_conversion_factor: f64,
}

impl SteadyStateCarbonModel {
    /// Create a model with default parameters.
    pub fn new() -> Self {
        Self::from_parameters(ModelParameters::default())
    }

    /// Create a model from parameters, deriving `phi` and `omega` if unset.
    pub fn from_parameters(parameters: ModelParameters) -> Self {
        let phi = match parameters.phi {
            Some(phi) => phi,
            None => {
                // Haldane relation
                let phi = parameters.delta / parameters.k_eq;
                debug!("phi not supplied; derived {} from delta / k_eq", phi);
                phi
            }
        };
        let omega = match parameters.omega {
            Some(omega) => omega,
            None => {
                let omega = parameters.gamma / parameters.gamma_omega_ratio;
                debug!(
                    "omega not supplied; derived {} from gamma / gamma_omega_ratio",
                    omega
                );
                omega
            }
        };

        let model = Self {
            h_out: parameters.h_out(),
            flux_conversion_factor: parameters.flux_conversion_factor(),
            parameters,
            phi,
            omega,
        };

        let denominator = model.steady_state_terms().denominator;
        if denominator == 0.0 || !denominator.is_finite() {
            warn!(
                "Steady-state denominator is {}; intracellular concentrations are undefined",
                denominator
            );
        }

        model
    }

    /// Validate the parameters, then build the model.
    pub fn try_from_parameters(parameters: ModelParameters) -> AutotrophResult<Self> {
        parameters.validate()?;
        Ok(Self::from_parameters(parameters))
    }

    /// Parameters as supplied, before `phi`/`omega` were resolved.
    pub fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    /// Parameters with `phi` and `omega` filled in with the values in use.
    pub fn resolved_parameters(&self) -> ModelParameters {
        ModelParameters {
            phi: Some(self.phi),
            omega: Some(self.omega),
            ..self.parameters.clone()
        }
    }

    /// CO2 membrane exchange rate (1/s)
    pub fn alpha(&self) -> f64 {
        self.parameters.alpha
    }

    /// HCO3- membrane exchange rate (1/s)
    pub fn beta(&self) -> f64 {
        self.parameters.beta
    }

    /// Rubisco carboxylation rate constant (1/s)
    pub fn gamma(&self) -> f64 {
        self.parameters.gamma
    }

    /// CO2 hydration rate constant (1/s)
    pub fn delta(&self) -> f64 {
        self.parameters.delta
    }

    /// HCO3- dehydration rate constant in use, supplied or derived (1/s)
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// H-carboxylation rate constant in use, supplied or derived (1/s)
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Active HCO3- uptake rate (1/s)
    pub fn chi(&self) -> f64 {
        self.parameters.chi
    }

    /// Extracellular CO2 (µM)
    pub fn c_out(&self) -> f64 {
        self.parameters.c_out
    }

    /// Extracellular HCO3-/CO2 equilibrium ratio
    pub fn k_eq(&self) -> f64 {
        self.parameters.k_eq
    }

    /// Extracellular HCO3-, always `k_eq * c_out` (µM)
    pub fn h_out(&self) -> f64 {
        self.h_out
    }

    /// Ratio of rubisco-derived to H-carboxylation-derived biomass carbon
    pub fn hcarb_ratio(&self) -> f64 {
        self.parameters.hcarb_ratio
    }

    /// Converts µM/s to C atoms / cell / s
    pub fn flux_conversion_factor(&self) -> f64 {
        self.flux_conversion_factor
    }

    /// Evaluate the closed-form steady-state numerators and their shared
    /// denominator.
    pub fn steady_state_terms(&self) -> SteadyStateTerms {
        let (a, b, g, d) = (self.alpha(), self.beta(), self.gamma(), self.delta());
        let (p, o, x) = (self.phi, self.omega, self.chi());
        let (c_out, k_eq) = (self.c_out(), self.k_eq());

        SteadyStateTerms {
            c_numerator: c_out * (k_eq * p * (b + x) + a * (b + p + o)),
            h_numerator: c_out * (a * d + k_eq * (a + g + d) * (b + x)),
            denominator: b * (g + d) + g * p + (g + d) * o + a * (b + p + o),
        }
    }

    /// Steady-state intracellular CO2 concentration (µM).
    pub fn c_in(&self) -> f64 {
        self.steady_state_terms().c_in()
    }

    /// Steady-state intracellular HCO3- concentration (µM).
    pub fn h_in(&self) -> f64 {
        self.steady_state_terms().h_in()
    }

    /// Rubisco carboxylation flux, `gamma * C_in` (µM/s).
    pub fn rubisco_flux(&self) -> f64 {
        self.gamma() * self.c_in()
    }

    /// [`Self::rubisco_flux`] in C atoms / cell / s
    pub fn rubisco_flux_per_cell_per_s(&self) -> f64 {
        self.rubisco_flux() * self.flux_conversion_factor
    }

    /// H-carboxylation flux, `omega * H_in` (µM/s).
    pub fn hcarb_flux(&self) -> f64 {
        self.omega * self.h_in()
    }

    /// [`Self::hcarb_flux`] in C atoms / cell / s
    pub fn hcarb_flux_per_cell_per_s(&self) -> f64 {
        self.hcarb_flux() * self.flux_conversion_factor
    }

    /// Biomass production flux (µM/s).
    ///
    /// Both pathways feed biomass synthesis, which is colimited by whichever
    /// supplies less carbon once H-carboxylation is scaled by `hcarb_ratio`.
    pub fn biomass_flux(&self) -> f64 {
        colimited(self.rubisco_flux(), self.hcarb_ratio() * self.hcarb_flux())
    }

    /// [`Self::biomass_flux`] in C atoms / cell / s
    pub fn biomass_flux_per_cell_per_s(&self) -> f64 {
        self.biomass_flux() * self.flux_conversion_factor
    }

    /// Doubling time in hours. Infinite when there is no biomass production.
    pub fn doubling_time_hr(&self) -> f64 {
        self.parameters.carbon_per_cell / (SECONDS_PER_HOUR * self.biomass_flux_per_cell_per_s())
    }

    /// Exponential growth rate implied by the doubling time (1/hr).
    pub fn growth_rate_hr(&self) -> f64 {
        LN_2 / self.doubling_time_hr()
    }

    /// Net CO2 efflux, the negative of net CO2 influx (µM/s).
    pub fn c_leakage(&self) -> f64 {
        -self.alpha() * (self.c_out() - self.c_in())
    }

    /// [`Self::c_leakage`] in C atoms / cell / s
    pub fn c_leakage_per_cell_per_s(&self) -> f64 {
        self.c_leakage() * self.flux_conversion_factor
    }

    /// Evaluate every derived quantity at once.
    pub fn summary(&self) -> SteadyStateSummary {
        SteadyStateSummary {
            c_in: self.c_in(),
            h_in: self.h_in(),
            rubisco_flux: self.rubisco_flux(),
            hcarb_flux: self.hcarb_flux(),
            biomass_flux: self.biomass_flux(),
            rubisco_flux_per_cell_per_s: self.rubisco_flux_per_cell_per_s(),
            hcarb_flux_per_cell_per_s: self.hcarb_flux_per_cell_per_s(),
            biomass_flux_per_cell_per_s: self.biomass_flux_per_cell_per_s(),
            doubling_time_hr: self.doubling_time_hr(),
            growth_rate_hr: self.growth_rate_hr(),
            c_leakage: self.c_leakage(),
            c_leakage_per_cell_per_s: self.c_leakage_per_cell_per_s(),
        }
    }
}

impl From<ModelParameters> for SteadyStateCarbonModel {
    fn from(parameters: ModelParameters) -> Self {
        Self::from_parameters(parameters)
    }
}

impl From<SteadyStateCarbonModel> for ModelParameters {
    fn from(model: SteadyStateCarbonModel) -> Self {
        model.parameters
    }
}

impl Default for SteadyStateCarbonModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum of two fluxes that propagates NaN, like an element-wise array
/// minimum. `f64::min` would silently drop a NaN operand.
fn colimited(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DELTA;
    use approx::assert_relative_eq;

    fn default_model() -> SteadyStateCarbonModel {
        SteadyStateCarbonModel::from_parameters(ModelParameters::default())
    }

    // ===== Construction =====

    #[test]
    fn test_phi_derived_from_haldane_relation() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            delta: 0.01,
            k_eq: 10.0,
            ..Default::default()
        });
        assert_relative_eq!(model.phi(), 0.001, max_relative = 1e-12);
    }

    #[test]
    fn test_omega_derived_from_gamma() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            gamma: 1.0,
            ..Default::default()
        });
        assert_relative_eq!(model.omega(), 0.01, max_relative = 1e-12);
    }

    #[test]
    fn test_omega_uses_configured_ratio() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            gamma: 3.0,
            gamma_omega_ratio: 10.0,
            ..Default::default()
        });
        assert_relative_eq!(model.omega(), 0.3, max_relative = 1e-12);
    }

    #[test]
    fn test_explicit_zero_is_not_derived() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            phi: Some(0.0),
            omega: Some(0.0),
            ..Default::default()
        });
        assert_eq!(model.phi(), 0.0);
        assert_eq!(model.omega(), 0.0);
        assert_eq!(model.hcarb_flux(), 0.0);
    }

    #[test]
    fn test_parameters_keep_unset_rates() {
        let model = default_model();
        assert!(model.parameters().phi.is_none());

        let resolved = model.resolved_parameters();
        assert_eq!(resolved.phi, Some(model.phi()));
        assert_eq!(resolved.omega, Some(model.omega()));

        // Rebuilding from resolved parameters gives the same model outputs
        let rebuilt = SteadyStateCarbonModel::from_parameters(resolved);
        assert_eq!(rebuilt.summary(), model.summary());
    }

    #[test]
    fn test_h_out() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            c_out: 30.0,
            k_eq: 10.0,
            ..Default::default()
        });
        assert_eq!(model.h_out(), 300.0);
    }

    #[test]
    fn test_try_from_parameters_rejects_invalid() {
        let result = SteadyStateCarbonModel::try_from_parameters(ModelParameters {
            beta: -0.1,
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(SteadyStateCarbonModel::try_from_parameters(ModelParameters::default()).is_ok());
    }

    // ===== Steady state =====

    #[test]
    fn test_concentrations_share_denominator() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            alpha: 3.7,
            beta: 0.2,
            gamma: 11.0,
            delta: 0.5,
            chi: 0.3,
            ..Default::default()
        });
        let terms = model.steady_state_terms();
        assert_eq!(model.c_in(), terms.c_numerator / terms.denominator);
        assert_eq!(model.h_in(), terms.h_numerator / terms.denominator);
    }

    #[test]
    fn test_passive_uptake_cannot_concentrate_co2() {
        let model = default_model();
        let c_in = model.c_in();
        let h_in = model.h_in();

        assert!(c_in > 0.0 && c_in < model.c_out(), "C_in = {}", c_in);
        assert!(h_in > 0.0 && h_in < model.h_out(), "H_in = {}", h_in);
    }

    #[test]
    fn test_active_uptake_raises_bicarbonate() {
        let passive = default_model();
        let active = SteadyStateCarbonModel::from_parameters(ModelParameters {
            chi: 1.0,
            ..Default::default()
        });
        assert!(active.h_in() > passive.h_in());
        assert!(active.hcarb_flux() > passive.hcarb_flux());
    }

    #[test]
    fn test_zero_denominator_gives_non_finite() {
        // With every rate zero nothing enters or leaves the cell
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
            delta: 0.0,
            phi: Some(0.0),
            omega: Some(0.0),
            ..Default::default()
        });
        assert_eq!(model.steady_state_terms().denominator, 0.0);
        assert!(!model.c_in().is_finite());
        assert!(!model.h_in().is_finite());
    }

    #[test]
    fn test_negative_permeability_is_not_flagged() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            alpha: -1.0,
            ..Default::default()
        });
        // Outputs are computed regardless; their meaning is undefined
        let _ = model.summary();
    }

    // ===== Fluxes =====

    #[test]
    fn test_per_cell_conversions() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            chi: 0.2,
            cell_volume: 2.0,
            ..Default::default()
        });
        let factor = model.flux_conversion_factor();
        assert_eq!(model.rubisco_flux_per_cell_per_s(), model.rubisco_flux() * factor);
        assert_eq!(model.hcarb_flux_per_cell_per_s(), model.hcarb_flux() * factor);
        assert_eq!(model.biomass_flux_per_cell_per_s(), model.biomass_flux() * factor);
        assert_eq!(model.c_leakage_per_cell_per_s(), model.c_leakage() * factor);
    }

    #[test]
    fn test_biomass_is_colimited() {
        let model = default_model();
        let expected = model
            .rubisco_flux()
            .min(model.hcarb_ratio() * model.hcarb_flux());
        assert_eq!(model.biomass_flux(), expected);
    }

    #[test]
    fn test_biomass_limited_by_hcarb_when_ratio_small() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            hcarb_ratio: 1.0,
            ..Default::default()
        });
        assert_eq!(model.biomass_flux(), model.hcarb_flux());
        assert!(model.hcarb_flux() < model.rubisco_flux());
    }

    #[test]
    fn test_colimited_propagates_nan() {
        assert!(colimited(f64::NAN, 1.0).is_nan());
        assert!(colimited(1.0, f64::NAN).is_nan());
        assert_eq!(colimited(1.0, 2.0), 1.0);
    }

    // ===== Physiology =====

    #[test]
    fn test_growth_rate_and_doubling_time() {
        let model = default_model();
        let doubling_time = model.doubling_time_hr();
        assert!(doubling_time.is_finite() && doubling_time > 0.0);
        assert_relative_eq!(
            model.growth_rate_hr() * doubling_time,
            LN_2,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_no_biomass_means_no_growth() {
        let model = SteadyStateCarbonModel::from_parameters(ModelParameters {
            hcarb_ratio: 0.0,
            ..Default::default()
        });
        assert_eq!(model.biomass_flux(), 0.0);
        assert_eq!(model.doubling_time_hr(), f64::INFINITY);
        assert_eq!(model.growth_rate_hr(), 0.0);
    }

    #[test]
    fn test_leakage_is_negative_influx() {
        let model = default_model();
        // C_in < C_out, so CO2 flows in and leakage is negative
        assert!(model.c_leakage() < 0.0);
        assert_relative_eq!(
            model.c_leakage(),
            -model.alpha() * (model.c_out() - model.c_in())
        );
    }

    #[test]
    fn test_summary_matches_accessors() {
        let model = default_model();
        let summary = model.summary();
        assert_eq!(summary.c_in, model.c_in());
        assert_eq!(summary.biomass_flux, model.biomass_flux());
        assert_eq!(summary.doubling_time_hr, model.doubling_time_hr());
        assert_eq!(summary.c_leakage_per_cell_per_s, model.c_leakage_per_cell_per_s());
    }

    #[test]
    fn test_accessors_are_repeatable() {
        let model = default_model();
        assert_eq!(model.summary(), model.summary());
    }

    #[test]
    fn test_serialization() {
        let model = default_model();
        let json = serde_json::to_string(&model).expect("Serialization failed");
        let parsed: SteadyStateCarbonModel =
            serde_json::from_str(&json).expect("Deserialization failed");
        assert_relative_eq!(parsed.phi(), model.phi(), max_relative = 1e-12);
        assert_relative_eq!(parsed.c_in(), model.c_in(), max_relative = 1e-12);
    }

    #[test]
    fn test_serialization_writes_supplied_parameters_only() {
        let value = serde_json::to_value(default_model()).unwrap();
        assert!(value.get("h_out").is_none());
        assert!(value.get("flux_conversion_factor").is_none());
        // Unset phi stays unset on the wire
        assert!(value.get("phi").is_none());
    }

    #[test]
    fn test_deserialization_rejects_derived_values() {
        for (field, tampered) in [("h_out", 999.0), ("flux_conversion_factor", -1.0)] {
            let mut value = serde_json::to_value(default_model()).unwrap();
            value[field] = serde_json::json!(tampered);
            let result = serde_json::from_value::<SteadyStateCarbonModel>(value);
            assert!(result.is_err(), "{} should not be settable", field);
        }
    }

    #[test]
    fn test_deserialization_recomputes_derived_values() {
        let value = serde_json::json!({"k_eq": 20.0, "c_out": 3.0, "cell_volume": 3.0});
        let parsed: SteadyStateCarbonModel = serde_json::from_value(value).unwrap();

        assert_eq!(parsed.h_out(), 60.0);
        assert_eq!(
            parsed.flux_conversion_factor(),
            parsed.parameters().flux_conversion_factor()
        );
        assert_relative_eq!(parsed.phi(), DEFAULT_DELTA / 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_deserialized_phi_is_a_supplied_parameter() {
        let mut value = serde_json::to_value(default_model()).unwrap();
        value["phi"] = serde_json::json!(5.0);

        let parsed: SteadyStateCarbonModel = serde_json::from_value(value).unwrap();

        assert_eq!(parsed.parameters().phi, Some(5.0));
        assert_eq!(parsed.phi(), 5.0);
        assert_relative_eq!(parsed.omega(), 0.01, max_relative = 1e-12);
    }
}
