//! # WARNING
//! This library was made for academic purposes, and has not been audited for security!
//! Don't use this in production!
//!# Groth16 pipeline
//!
//!This crate takes a Rank 1 Constraint System through to a verified Groth16 proof: the R1CS is interpolated into a
//!Quadratic Arithmetic Program, a trusted setup derives a proving key and a verification key, the prover produces a
//!proof for a satisfying witness and the verifier checks it against the public inputs with three pairings.
//!
//!The implementation is type generic over any curve that implements `ark_ec::Pairing`. BN254 is the default curve and the
//!only one with a byte-exact proof encoding; MNT6-753 is exercised in the tests to keep the code generic.
//!
//!Errors are handled using the `rootcause` crate. Every fallible call returns a `Report<errors::Groth16Error>`, so
//!callers can match on the failure category with `report.current_context()` while the debug output carries the
//!attached operands (lengths, degrees, offending bytes).
//!
//!The core types are `circuits::R1CS`, `circuits::QAP`, `groth16::ProvingKey`, `groth16::VerificationKey` and
//!`groth16::Proof`.
//!
//!The general flow is:
//!
//!- Load a circuit with `CircuitDescription::from_json` and `into_r1cs`, or build an `R1CS` directly
//!- Use `QAP::from_r1cs` to convert the R1CS to a QAP
//!- Generate keys using `groth16::generate_trusted_setup`
//!- Generate a proof using `groth16::prove_with_qap` (or `generate_proof` with a precomputed `P(x)`)
//!- Verify the proof with `groth16::verify_proof`
//!
//!Enable the `parallel` feature to interpolate the QAP and derive the keys on a rayon pool.
//!

/// Contains the types for Rank 1 Constraint Systems and Quadratic Arithmetic Programs.
pub mod circuits;
/// Failure categories shared by every module.
pub mod errors;
/// Scalar field context: reduction, encoding and checked inversion.
pub mod field;
/// Contains the trusted setup, prover, verifier and proof encoding.
pub mod groth16;
mod helpers;
/// Contains types for polynomials.
pub mod polynomial;
#[cfg(test)]
mod test_circuits;

pub use circuits::{Circuit, CircuitDescription, QAP, R1CS};
pub use errors::Groth16Error;
pub use field::FieldContext;
pub use groth16::{Proof, ProvingKey, VerificationKey};
pub use polynomial::{Polynomial, PolynomialRing};
