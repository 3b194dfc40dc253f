pub mod compute;
pub mod types;

pub use compute::{
    CalculationResult, CapacityResult, ComputeRequest, ComputeResponse, EmergencyExitResult,
    EvacuationRouteResult, FireExtinguisherResult, InputValue, Inputs, LimitingFactor,
};
pub use types::{CalculationParameter, CalculationType, Canton, CantonLanguage, ValueType};
