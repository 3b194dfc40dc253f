pub mod catalog;
pub mod error;
pub mod extractors;
pub mod jurisdiction;
pub mod resolver;
pub mod rules;
pub mod store;

pub use catalog::{CalculationKind, DISCLAIMER};
pub use error::{EngineError, Result};
pub use jurisdiction::CantonCode;
pub use resolver::{canton_or_defaults, merge_parameters, resolve, Resolution, ResolvedParameters};
pub use store::{InMemoryStore, ParameterStore, ParameterUpsert};

use shared_types::{CalculationType, ComputeRequest, ComputeResponse, Inputs};

/// ComplianceEngine entry point
pub struct ComplianceEngine<S> {
    store: S,
}

impl<S: ParameterStore> ComplianceEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn calculation_types(&self) -> Vec<CalculationType> {
        self.store.calculation_types()
    }

    /// Effective parameters of a calculation type for an optional canton
    pub fn resolve(&self, slug: &str, canton_code: Option<&str>) -> Result<Resolution> {
        resolver::resolve(&self.store, slug, canton_code)
    }

    /// Resolve parameters and evaluate the requested formula
    pub fn compute(&self, request: &ComputeRequest) -> Result<ComputeResponse> {
        let resolution = self.resolve(
            &request.calculation_type,
            request.canton_code.as_deref(),
        )?;
        respond(
            &resolution.calculation_type,
            &resolution.parameters,
            &request.inputs,
        )
    }
}

impl ComplianceEngine<InMemoryStore> {
    /// Engine over an in-memory store loaded with the catalog defaults
    pub fn seeded() -> Self {
        Self::new(InMemoryStore::seeded())
    }
}

impl Default for ComplianceEngine<InMemoryStore> {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Evaluate `calculation_type` against already resolved parameters and
/// attach its legal reference and the disclaimer.
///
/// Callers that fetch parameter rows themselves (e.g. from a database) merge
/// them into a [`Resolution`] with [`Resolution::from_rows`] and finish here.
pub fn respond(
    calculation_type: &CalculationType,
    parameters: &ResolvedParameters,
    inputs: &Inputs,
) -> Result<ComputeResponse> {
    let results = rules::evaluate_slug(&calculation_type.slug, inputs, parameters)?;

    Ok(ComputeResponse {
        results,
        parameters: parameters.value_map(),
        legal_reference: calculation_type.formula.clone(),
        disclaimer: DISCLAIMER.to_string(),
    })
}
