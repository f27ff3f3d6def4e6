//! Model parameters
//!
//! Rate constants, concentrations and cell geometry for the two-species
//! (CO2/HCO3-) uptake and fixation model. Each field has a documented default
//! taken from [`crate::constants`].

use crate::constants::{
    default_beta, default_k_eq, equilibrium_ratio, C_PER_CELL, CELL_SA, CELL_V, DEFAULT_ALPHA,
    DEFAULT_CHI, DEFAULT_COUT, DEFAULT_DELTA, DEFAULT_GAMMA, DEFAULT_GAMMA_OMEGA_RATIO,
    DEFAULT_HCARB_RATIO, PKA_EFF,
};
use crate::errors::{AutotrophError, AutotrophResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Parameters of the steady-state carbon model.
///
/// The cell exchanges CO2 and HCO3- with the medium across its membrane,
/// interconverts the two species and fixes carbon through two pathways:
///
/// ```text
///            alpha                 beta (+ chi uptake)
///  C_out  <-------->  C_in       H_in  <-------->  H_out = k_eq * C_out
///                      |  delta ->  |
///                      |  <- phi    |
///                gamma v            v omega
///                 rubisco       H-carboxylation
/// ```
///
/// `phi` and `omega` may be left as `None`, in which case the model derives
/// them when it is built: `phi = delta / k_eq` (Haldane relation) and
/// `omega = gamma / gamma_omega_ratio`. An explicit zero is kept as zero.
///
/// Unknown keys are rejected when deserializing, so a misspelled parameter
/// cannot silently fall back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelParameters {
    /// Effective CO2 permeability of the membrane (permeability × SA/V)
    /// unit: 1/s
    /// default: 12000 (3000 µm/s × 4 /µm)
    pub alpha: f64,

    /// Effective HCO3- permeability of the membrane (permeability × SA/V)
    /// unit: 1/s
    /// default: ~0.0151
    pub beta: f64,

    /// First order rate constant for rubisco carboxylation
    /// unit: 1/s
    /// default: 1.0
    pub gamma: f64,

    /// First order rate constant for CO2 hydration (catalysed or spontaneous)
    /// unit: 1/s
    /// default: 0.01
    pub delta: f64,

    /// First order rate constant for HCO3- dehydration
    /// unit: 1/s
    /// default: derived as delta / k_eq
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phi: Option<f64>,

    /// First order rate constant for HCO3--dependent carboxylation
    /// unit: 1/s
    /// default: derived as gamma / gamma_omega_ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omega: Option<f64>,

    /// Ratio used to derive omega from gamma when omega is not supplied
    /// unit: dimensionless
    /// default: 100
    pub gamma_omega_ratio: f64,

    /// First order rate constant for active HCO3- uptake
    /// unit: 1/s
    /// default: 0.0
    pub chi: f64,

    /// Extracellular CO2 concentration
    /// unit: µM
    /// default: 15.0
    pub c_out: f64,

    /// HCO3-/CO2 ratio at chemical equilibrium
    /// unit: dimensionless
    /// default: 10^(7.1 - 6.1) = 10
    pub k_eq: f64,

    /// Ratio of rubisco-derived to H-carboxylation-derived carbon in biomass
    /// unit: dimensionless
    /// default: 100
    pub hcarb_ratio: f64,

    /// Cell volume
    /// unit: µm³
    /// default: 1.5
    pub cell_volume: f64,

    /// Cell surface area
    /// unit: µm²
    /// default: 6.0
    pub cell_surface_area: f64,

    /// Carbon atoms in one cell
    /// unit: atoms
    /// default: 1e10
    pub carbon_per_cell: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: default_beta(),
            gamma: DEFAULT_GAMMA,
            delta: DEFAULT_DELTA,
            phi: None,
            omega: None,
            gamma_omega_ratio: DEFAULT_GAMMA_OMEGA_RATIO,
            chi: DEFAULT_CHI,
            c_out: DEFAULT_COUT,
            k_eq: default_k_eq(),
            hcarb_ratio: DEFAULT_HCARB_RATIO,
            cell_volume: CELL_V,
            cell_surface_area: CELL_SA,
            carbon_per_cell: C_PER_CELL,
        }
    }
}

impl ModelParameters {
    /// Set the equilibrium ratio from an intracellular pH.
    pub fn with_ph(mut self, ph: f64) -> Self {
        self.k_eq = equilibrium_ratio(ph, PKA_EFF);
        self
    }

    /// Extracellular HCO3- concentration (µM), always `k_eq * c_out`.
    pub fn h_out(&self) -> f64 {
        self.k_eq * self.c_out
    }

    /// Converts a µM/s flux into carbon atoms per cell per second.
    pub fn flux_conversion_factor(&self) -> f64 {
        // µm³ -> L, µM -> M, mol -> molecules
        self.cell_volume * 1e-15 * 1e-6 * crate::constants::AVOGADRO
    }

    /// Cell surface area to volume ratio (1/µm).
    pub fn surface_to_volume_ratio(&self) -> f64 {
        self.cell_surface_area / self.cell_volume
    }

    /// Read a single parameter by name.
    ///
    /// Returns `None` for `phi` and `omega` when they have not been supplied.
    pub fn get(&self, name: ParameterName) -> Option<f64> {
        match name {
            ParameterName::Alpha => Some(self.alpha),
            ParameterName::Beta => Some(self.beta),
            ParameterName::Gamma => Some(self.gamma),
            ParameterName::Delta => Some(self.delta),
            ParameterName::Phi => self.phi,
            ParameterName::Omega => self.omega,
            ParameterName::GammaOmegaRatio => Some(self.gamma_omega_ratio),
            ParameterName::Chi => Some(self.chi),
            ParameterName::COut => Some(self.c_out),
            ParameterName::KEq => Some(self.k_eq),
            ParameterName::HcarbRatio => Some(self.hcarb_ratio),
            ParameterName::CellVolume => Some(self.cell_volume),
            ParameterName::CellSurfaceArea => Some(self.cell_surface_area),
            ParameterName::CarbonPerCell => Some(self.carbon_per_cell),
        }
    }

    /// Overwrite a single parameter by name.
    ///
    /// Setting `phi` or `omega` marks it as explicitly supplied.
    pub fn set(&mut self, name: ParameterName, value: f64) {
        match name {
            ParameterName::Alpha => self.alpha = value,
            ParameterName::Beta => self.beta = value,
            ParameterName::Gamma => self.gamma = value,
            ParameterName::Delta => self.delta = value,
            ParameterName::Phi => self.phi = Some(value),
            ParameterName::Omega => self.omega = Some(value),
            ParameterName::GammaOmegaRatio => self.gamma_omega_ratio = value,
            ParameterName::Chi => self.chi = value,
            ParameterName::COut => self.c_out = value,
            ParameterName::KEq => self.k_eq = value,
            ParameterName::HcarbRatio => self.hcarb_ratio = value,
            ParameterName::CellVolume => self.cell_volume = value,
            ParameterName::CellSurfaceArea => self.cell_surface_area = value,
            ParameterName::CarbonPerCell => self.carbon_per_cell = value,
        }
    }

    /// Check that the parameters are physically meaningful.
    ///
    /// Building a model does not call this; sweeps are free to wander into
    /// unphysical territory. Use [`crate::model::SteadyStateCarbonModel::try_from_parameters`]
    /// to build a model only from valid parameters.
    pub fn validate(&self) -> AutotrophResult<()> {
        use ParameterName::*;

        for name in [
            Alpha,
            Beta,
            Gamma,
            Delta,
            GammaOmegaRatio,
            COut,
            KEq,
            CellVolume,
            CellSurfaceArea,
            CarbonPerCell,
        ] {
            if let Some(value) = self.get(name) {
                check_positive(name, value)?;
            }
        }
        for name in [Chi, HcarbRatio, Phi, Omega] {
            if let Some(value) = self.get(name) {
                check_non_negative(name, value)?;
            }
        }
        Ok(())
    }

    /// Parse parameters from a TOML document.
    ///
    /// Fields that are not present take their default values.
    pub fn from_toml_str(source: &str) -> AutotrophResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load parameters from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> AutotrophResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

fn check_positive(name: ParameterName, value: f64) -> AutotrophResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AutotrophError::InvalidParameter {
            name: name.to_string(),
            value,
            reason: "must be finite and strictly positive".to_string(),
        });
    }
    Ok(())
}

fn check_non_negative(name: ParameterName, value: f64) -> AutotrophResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AutotrophError::InvalidParameter {
            name: name.to_string(),
            value,
            reason: "must be finite and non-negative".to_string(),
        });
    }
    Ok(())
}

/// Name of a settable field of [`ModelParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterName {
    Alpha,
    Beta,
    Gamma,
    Delta,
    Phi,
    Omega,
    GammaOmegaRatio,
    Chi,
    COut,
    KEq,
    HcarbRatio,
    CellVolume,
    CellSurfaceArea,
    CarbonPerCell,
}

impl ParameterName {
    /// Every parameter, in field order.
    pub const ALL: [ParameterName; 14] = [
        ParameterName::Alpha,
        ParameterName::Beta,
        ParameterName::Gamma,
        ParameterName::Delta,
        ParameterName::Phi,
        ParameterName::Omega,
        ParameterName::GammaOmegaRatio,
        ParameterName::Chi,
        ParameterName::COut,
        ParameterName::KEq,
        ParameterName::HcarbRatio,
        ParameterName::CellVolume,
        ParameterName::CellSurfaceArea,
        ParameterName::CarbonPerCell,
    ];

    /// Field name as used in TOML files and Python dicts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterName::Alpha => "alpha",
            ParameterName::Beta => "beta",
            ParameterName::Gamma => "gamma",
            ParameterName::Delta => "delta",
            ParameterName::Phi => "phi",
            ParameterName::Omega => "omega",
            ParameterName::GammaOmegaRatio => "gamma_omega_ratio",
            ParameterName::Chi => "chi",
            ParameterName::COut => "c_out",
            ParameterName::KEq => "k_eq",
            ParameterName::HcarbRatio => "hcarb_ratio",
            ParameterName::CellVolume => "cell_volume",
            ParameterName::CellSurfaceArea => "cell_surface_area",
            ParameterName::CarbonPerCell => "carbon_per_cell",
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterName {
    type Err = AutotrophError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| AutotrophError::UnknownParameter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_values() {
        let params = ModelParameters::default();
        assert_relative_eq!(params.alpha, 12000.0);
        assert_relative_eq!(params.gamma, 1.0);
        assert_relative_eq!(params.delta, 0.01);
        assert_relative_eq!(params.c_out, 15.0);
        assert_relative_eq!(params.k_eq, 10.0, max_relative = 1e-12);
        assert_relative_eq!(params.hcarb_ratio, 100.0);
        assert_eq!(params.chi, 0.0);
        assert!(params.phi.is_none());
        assert!(params.omega.is_none());
    }

    #[test]
    fn test_h_out_tracks_k_eq_and_c_out() {
        let params = ModelParameters {
            c_out: 20.0,
            k_eq: 5.0,
            ..Default::default()
        };
        assert_eq!(params.h_out(), 100.0);
    }

    #[test]
    fn test_flux_conversion_factor() {
        let params = ModelParameters::default();
        // 1.5 µm³ = 1.5e-15 L; 1 µM in that volume is ~903 molecules
        assert_relative_eq!(
            params.flux_conversion_factor(),
            1.5e-15 * 1e-6 * 6.02e23,
            max_relative = 1e-12
        );
        assert_relative_eq!(params.surface_to_volume_ratio(), 4.0);
    }

    #[test]
    fn test_with_ph() {
        let params = ModelParameters::default().with_ph(8.1);
        assert_relative_eq!(params.k_eq, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_set_and_get_by_name() {
        let mut params = ModelParameters::default();
        assert_eq!(params.get(ParameterName::Phi), None);

        params.set(ParameterName::Phi, 0.0);
        assert_eq!(params.phi, Some(0.0));
        assert_eq!(params.get(ParameterName::Phi), Some(0.0));

        params.set(ParameterName::COut, 42.0);
        assert_eq!(params.get(ParameterName::COut), Some(42.0));
    }

    #[test]
    fn test_parameter_name_round_trip() {
        for name in ParameterName::ALL {
            let parsed: ParameterName = name.to_string().parse().unwrap();
            assert_eq!(parsed, name);
        }
        assert!(matches!(
            "zeta".parse::<ParameterName>(),
            Err(AutotrophError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_validate_defaults() {
        assert!(ModelParameters::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_permeability() {
        let params = ModelParameters {
            alpha: -1.0,
            ..Default::default()
        };
        match params.validate() {
            Err(AutotrophError::InvalidParameter { name, value, .. }) => {
                assert_eq!(name, "alpha");
                assert_eq!(value, -1.0);
            }
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_allows_explicit_zero_rates() {
        let params = ModelParameters {
            phi: Some(0.0),
            omega: Some(0.0),
            hcarb_ratio: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let params = ModelParameters {
            omega: Some(f64::NAN),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_toml_partial_config() {
        let params = ModelParameters::from_toml_str(
            r#"
            gamma = 2.0
            phi = 0.0
            chi = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(params.gamma, 2.0);
        assert_eq!(params.phi, Some(0.0));
        assert_eq!(params.chi, 0.5);
        assert!(params.omega.is_none());
        assert_relative_eq!(params.c_out, 15.0);
    }

    #[test]
    fn test_toml_rejects_wrong_type() {
        let result = ModelParameters::from_toml_str("gamma = \"fast\"");
        assert!(matches!(result, Err(AutotrophError::Config(_))));
    }

    #[test]
    fn test_toml_rejects_misspelled_parameter() {
        let result = ModelParameters::from_toml_str("gama = 2.0");
        match result {
            Err(AutotrophError::Config(e)) => assert!(e.to_string().contains("gama")),
            other => panic!("Expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_rejects_unknown_field() {
        let result = serde_json::from_str::<ModelParameters>(r#"{"gamma": 2.0, "h_out": 1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_round_trip_omits_unset_rates() {
        let params = ModelParameters::default();
        let serialised = toml::to_string(&params).unwrap();
        assert!(!serialised.contains("phi"));

        let deserialised = ModelParameters::from_toml_str(&serialised).unwrap();
        assert_eq!(deserialised, params);
    }

    #[test]
    fn test_json_serialization() {
        let params = ModelParameters {
            omega: Some(0.02),
            ..Default::default()
        };
        let json = serde_json::to_string(&params).expect("Serialization failed");
        let parsed: ModelParameters = serde_json::from_str(&json).expect("Deserialization failed");
        assert_relative_eq!(parsed.omega.unwrap(), 0.02, max_relative = 1e-12);
        assert!(parsed.phi.is_none());
    }
}
