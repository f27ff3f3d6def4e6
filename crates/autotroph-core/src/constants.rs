//! Physical constants and literature defaults.
//!
//! BNID values refer to entries in the BioNumbers database. Membrane
//! permeabilities follow Mangan & Flamholz, PNAS 2016.

/// Cell surface area (µm²). BNID 101792
pub const CELL_SA: f64 = 6.0;

/// Cell volume (µm³). BNID 114924
pub const CELL_V: f64 = 1.5;

/// Surface-to-volume ratio of the default cell (1/µm).
pub const SA_V_RATIO: f64 = CELL_SA / CELL_V;

/// Carbon atoms per cell. BNID 103010
pub const C_PER_CELL: f64 = 1e10;

/// Empirical CO2 membrane permeability (µm/s).
pub const C_PERM: f64 = 0.3 * 1e4;

/// Effective HCO3- membrane permeability (µm/s).
///
/// Permeability of HCO3- is mostly due to the neutral H2CO3 species, so the
/// H2CO3 permeability is scaled by its abundance at pH 7.1 (pKa 3.2).
pub fn h_perm() -> f64 {
    3e-3 * 1e4 * 10f64.powf(3.2 - 7.1)
}

/// Default effective CO2 permeability accounting for SA/V (1/s).
pub const DEFAULT_ALPHA: f64 = C_PERM * SA_V_RATIO;

/// Default effective HCO3- permeability accounting for SA/V (1/s).
pub fn default_beta() -> f64 {
    h_perm() * SA_V_RATIO
}

/// Extracellular CO2 (µM), roughly Henry's law equilibrium at 25 C.
pub const DEFAULT_COUT: f64 = 15.0;

/// pH chosen so that the equilibrium ratio is 10.
pub const DEFAULT_PH: f64 = 7.1;

/// Effective pKa between CO2 and HCO3-.
pub const PKA_EFF: f64 = 6.1;

/// Rubisco carboxylation rate constant (1/s), about 1 µM of a fast rubisco.
pub const DEFAULT_GAMMA: f64 = 1.0;

/// Spontaneous CO2 hydration rate constant at 25 C (1/s).
pub const DEFAULT_DELTA: f64 = 0.01;

/// H-carboxylation capacity scales with rubisco capacity by this ratio.
pub const DEFAULT_GAMMA_OMEGA_RATIO: f64 = 100.0;

/// No driven HCO3- uptake by default.
pub const DEFAULT_CHI: f64 = 0.0;

/// Ratio of rubisco-derived to H-carboxylation-derived carbon in biomass.
pub const DEFAULT_HCARB_RATIO: f64 = 100.0;

/// Avogadro's number as used for flux conversion.
pub const AVOGADRO: f64 = 6.02e23;

/// s/hr
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// HCO3-/CO2 ratio at chemical equilibrium for a given pH.
///
/// A single ratio inside and outside the cell assumes pH equilibrium across
/// the membrane.
pub fn equilibrium_ratio(ph: f64, pka: f64) -> f64 {
    10f64.powf(ph - pka)
}

/// Default equilibrium ratio, `equilibrium_ratio(DEFAULT_PH, PKA_EFF)`.
pub fn default_k_eq() -> f64 {
    equilibrium_ratio(DEFAULT_PH, PKA_EFF)
}
