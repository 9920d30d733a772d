use thiserror::Error;

/// Failure categories of the pipeline.
///
/// Every fallible operation returns a `rootcause::Report<Groth16Error>`, so callers can
/// match on `report.current_context()` while still getting the attached operands in the
/// debug output. A proof that simply fails to verify is not an error: verification returns
/// `Ok(false)` for that case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Groth16Error {
    #[error("Division by zero in the scalar field")]
    DivisionByZero,
    #[error("Interpolation points must be pairwise distinct and match the values")]
    InvalidInterpolationPoints,
    #[error("Witness does not satisfy the circuit")]
    UnsatisfiedWitness,
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Trusted setup failed: {0}")]
    SetupFailure(String),
}
