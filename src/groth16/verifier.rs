use super::prover::Proof;
use super::setup::VerificationKey;
use crate::errors::Groth16Error;
use ark_ec::pairing::Pairing;
use log::{debug, info};
use rootcause::{Report, report};
use std::iter::zip;

/// Check `e(A, B) = e(α, β) + e(IC, γ) + e(C, δ)` where
/// `IC = ic[0] + Σ public_inputs[i] · ic[i + 1]`.
///
/// `public_inputs` excludes the constant one. A length mismatch is an error, a proof that
/// simply does not check out is `Ok(false)`. With `verbose` set every pairing term is logged
/// at info level.
pub fn verify_proof<C: Pairing>(
    verification_key: &VerificationKey<C>,
    proof: &Proof<C>,
    public_inputs: &[C::ScalarField],
    verbose: bool,
) -> Result<bool, Report<Groth16Error>> {
    verification_key.check_shape()?;
    if public_inputs.len() != verification_key.num_public_inputs() {
        return Err(report!(Groth16Error::MalformedInput(
            "wrong number of public inputs".to_string()
        ))
        .attach(format!("Given: {}", public_inputs.len()))
        .attach(format!(
            "Expected: {}",
            verification_key.num_public_inputs()
        )));
    }

    let ic = verification_key.ic();
    let ic_sum = ic[0]
        + zip(&ic[1..], public_inputs)
            .map(|(ic_i, x_i)| *ic_i * x_i)
            .sum::<C::G1>();

    let lhs = C::pairing(*proof.a(), *proof.b());
    let alpha_beta = C::pairing(*verification_key.alpha_1(), *verification_key.beta_2());
    let ic_gamma = C::pairing(ic_sum, *verification_key.gamma_2());
    let c_delta = C::pairing(*proof.c(), *verification_key.delta_2());

    if verbose {
        info!("e(A, B) = {}", lhs);
        info!("e(alpha, beta) = {}", alpha_beta);
        info!("e(IC, gamma) = {}", ic_gamma);
        info!("e(C, delta) = {}", c_delta);
    }

    let rhs = alpha_beta + ic_gamma + c_delta;
    let valid = lhs == rhs;
    debug!("Proof valid: {}", valid);
    Ok(valid)
}
