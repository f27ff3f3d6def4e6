use crate::{filter_genes, CategoryFilter, GeneCategory, GENES_OF_INTEREST};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

/// All annotated genes as a list of dicts with `locus_tag`, `name` and `category`.
#[pyfunction]
fn genes_of_interest(py: Python<'_>) -> PyResult<Bound<'_, PyAny>> {
    Ok(pythonize::pythonize(py, &GENES_OF_INTEREST)?)
}

/// Genes whose category maps to True.
///
/// `categories` maps category names to include flags. When omitted the
/// default plotting selection is used.
#[pyfunction]
#[pyo3(name = "filter_genes", signature = (categories=None))]
fn py_filter_genes<'py>(
    py: Python<'py>,
    categories: Option<HashMap<String, bool>>,
) -> PyResult<Bound<'py, PyAny>> {
    let filter = match categories {
        Some(categories) => {
            let mut filter = CategoryFilter::default();
            for (name, include) in categories {
                let category: GeneCategory = name
                    .parse()
                    .map_err(|e| PyValueError::new_err(format!("{}", e)))?;
                filter.set(category, include);
            }
            filter
        }
        None => CategoryFilter::default_plot(),
    };
    let genes = filter_genes(&GENES_OF_INTEREST, &filter);
    Ok(pythonize::pythonize(py, &genes)?)
}

#[pymodule]
pub fn genes(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(genes_of_interest, m)?)?;
    m.add_function(wrap_pyfunction!(py_filter_genes, m)?)?;
    Ok(())
}
