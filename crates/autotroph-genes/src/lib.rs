//! Genes of interest for *Halothiobacillus neapolitanus* CCM studies
//!
//! A static annotation table of the carboxysome, inorganic carbon transport
//! and regulatory genes, and a category filter used to choose which of them
//! appear in plots. Nothing here depends on the steady-state model.

pub mod python;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneError {
    #[error("Unknown gene category `{0}`")]
    UnknownCategory(String),
}

/// Functional category of an annotated gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneCategory {
    #[serde(rename = "regulation")]
    Regulation,
    #[serde(rename = "transport")]
    Transport,
    #[serde(rename = "CA")]
    CarbonicAnhydrase,
    #[serde(rename = "carboxysome")]
    Carboxysome,
    #[serde(rename = "carboxysomal rubisco")]
    CarboxysomalRubisco,
    #[serde(rename = "non-carboxysomal rubisco")]
    NonCarboxysomalRubisco,
    #[serde(rename = "chaperone")]
    Chaperone,
}

impl GeneCategory {
    pub const ALL: [GeneCategory; 7] = [
        GeneCategory::Regulation,
        GeneCategory::Transport,
        GeneCategory::CarbonicAnhydrase,
        GeneCategory::Carboxysome,
        GeneCategory::CarboxysomalRubisco,
        GeneCategory::NonCarboxysomalRubisco,
        GeneCategory::Chaperone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneCategory::Regulation => "regulation",
            GeneCategory::Transport => "transport",
            GeneCategory::CarbonicAnhydrase => "CA",
            GeneCategory::Carboxysome => "carboxysome",
            GeneCategory::CarboxysomalRubisco => "carboxysomal rubisco",
            GeneCategory::NonCarboxysomalRubisco => "non-carboxysomal rubisco",
            GeneCategory::Chaperone => "chaperone",
        }
    }
}

impl fmt::Display for GeneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneCategory {
    type Err = GeneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| GeneError::UnknownCategory(s.to_string()))
    }
}

/// A gene identified by its RefSeq locus tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneAnnotation {
    pub locus_tag: &'static str,
    /// Display name used in plots
    pub name: &'static str,
    pub category: GeneCategory,
}

const fn gene(
    locus_tag: &'static str,
    name: &'static str,
    category: GeneCategory,
) -> GeneAnnotation {
    GeneAnnotation {
        locus_tag,
        name,
        category,
    }
}

use GeneCategory::*;

/// Genes we want to plot, in table order.
pub static GENES_OF_INTEREST: [GeneAnnotation; 23] = [
    gene("HNEAP_RS07320", "Crp/Fnr", Regulation),
    gene("HNEAP_RS01030", "DAB2B", Transport),
    gene("HNEAP_RS01035", "DAB2A", Transport),
    gene("HNEAP_RS04585", "DAB1B", Transport),
    gene("HNEAP_RS04595", "DAB1A", Transport),
    gene("HNEAP_RS01040", "LysR DAB2", Regulation),
    gene("HNEAP_RS04645", "csosCA", CarbonicAnhydrase),
    gene("HNEAP_RS04565", "csos1D", Carboxysome),
    gene("HNEAP_RS04655", "cbbS", CarboxysomalRubisco),
    gene("HNEAP_RS04660", "cbbL", CarboxysomalRubisco),
    gene("HNEAP_RS04615", "acRAF", Chaperone),
    gene("HNEAP_RS04620", "csos1B", Carboxysome),
    gene("HNEAP_RS04625", "csos1A", Carboxysome),
    gene("HNEAP_RS05490", "LysR", Regulation),
    gene("HNEAP_RS04640", "csos4A", Carboxysome),
    gene("HNEAP_RS04635", "csos4B", Carboxysome),
    gene("HNEAP_RS04650", "csos2", Carboxysome),
    gene("HNEAP_RS04630", "csos1C", Carboxysome),
    // Non-carboxysomal form II rubisco, named cbbM in Baker et al. JBac 1998
    gene("HNEAP_RS05505", "cbbM", NonCarboxysomalRubisco),
    gene("HNEAP_RS04600", "cbbO", Chaperone),
    gene("HNEAP_RS04575", "cbbQ", Chaperone),
    // mcdAB, MacCready 2021
    gene("HNEAP_RS04610", "mcdA", Regulation),
    gene("HNEAP_RS12660", "mcdB", Regulation),
];

/// Look up a gene by locus tag.
pub fn find_gene(locus_tag: &str) -> Option<&'static GeneAnnotation> {
    GENES_OF_INTEREST.iter().find(|g| g.locus_tag == locus_tag)
}

/// Which categories to include in a plot.
///
/// Categories without an entry are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryFilter(HashMap<GeneCategory, bool>);

impl CategoryFilter {
    pub fn new(entries: impl IntoIterator<Item = (GeneCategory, bool)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Carboxysome structure, carbon transport and CA; regulators, chaperones
    /// and the form II rubisco are left out.
    pub fn default_plot() -> Self {
        Self::new([
            (Transport, true),
            (Carboxysome, true),
            (CarbonicAnhydrase, true),
            (CarboxysomalRubisco, true),
            (Regulation, false),
            (Chaperone, false),
            (NonCarboxysomalRubisco, false),
        ])
    }

    pub fn set(&mut self, category: GeneCategory, include: bool) {
        self.0.insert(category, include);
    }

    pub fn includes(&self, category: GeneCategory) -> bool {
        self.0.get(&category).copied().unwrap_or(false)
    }
}

/// Select the genes whose category the filter includes, keeping their order.
pub fn filter_genes<'a>(
    genes: &'a [GeneAnnotation],
    filter: &CategoryFilter,
) -> Vec<&'a GeneAnnotation> {
    genes.iter().filter(|g| filter.includes(g.category)).collect()
}
