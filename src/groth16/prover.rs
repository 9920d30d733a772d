use super::setup::ProvingKey;
use crate::circuits::{Circuit, QAP, divide_by_target};
use crate::errors::Groth16Error;
use crate::helpers::rand_scalar;
use crate::polynomial::{Polynomial, PolynomialRing};
use ark_ec::CurveGroup;
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use log::debug;
use rand::{CryptoRng, Rng};
use rootcause::prelude::ResultExt;
use rootcause::{Report, report};
use std::iter::zip;

/// A Groth16 proof: two G1 points and one G2 point.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<C: Pairing> {
    a: C::G1,
    b: C::G2,
    c: C::G1,
}

impl<C: Pairing> Proof<C> {
    pub(crate) fn new(a: C::G1, b: C::G2, c: C::G1) -> Self {
        Proof { a, b, c }
    }

    pub fn a(&self) -> &C::G1 {
        &self.a
    }

    pub fn b(&self) -> &C::G2 {
        &self.b
    }

    pub fn c(&self) -> &C::G1 {
        &self.c
    }
}

/// `Σ scalars[i] · bases[i]`
fn weighted_sum<G: CurveGroup>(bases: &[G], scalars: &[G::ScalarField]) -> G {
    zip(bases, scalars).map(|(base, scalar)| *base * scalar).sum()
}

/// Generate a proof that `witness` satisfies the circuit behind `proving_key`.
///
/// `error_polynomial` is `P(x) = A(x)·B(x) - C(x)` for this witness, see
/// [`QAP::combine`]. Fresh blinding factors `r` and `s` are drawn from `rng` for every call,
/// so two proofs of the same witness differ.
pub fn generate_proof<C, R>(
    ring: &PolynomialRing<C::ScalarField>,
    circuit: &Circuit,
    proving_key: &ProvingKey<C>,
    witness: &[C::ScalarField],
    error_polynomial: &Polynomial<C::ScalarField>,
    rng: &mut R,
) -> Result<Proof<C>, Report<Groth16Error>>
where
    C: Pairing,
    R: Rng + CryptoRng,
{
    proving_key.check_shape()?;
    if witness.len() != proving_key.num_signals() || witness.len() != circuit.num_signals() {
        return Err(report!(Groth16Error::MalformedInput(
            "witness has the wrong length".to_string()
        ))
        .attach(format!("Witness length: {}", witness.len()))
        .attach(format!("Proving key signals: {}", proving_key.num_signals()))
        .attach(format!("Circuit signals: {}", circuit.num_signals())));
    }
    if circuit.num_instance_signals() != proving_key.num_instance_signals() {
        return Err(report!(Groth16Error::MalformedInput(
            "proving key was generated for a different circuit".to_string()
        )));
    }

    let h = divide_by_target(ring, error_polynomial, proving_key.target_polynomial())?;
    debug!("Computed H(x) with degree {:?}", h.degree());
    let h_tau = h
        .evaluate_over_srs(proving_key.h_query())
        .context(Groth16Error::UnsatisfiedWitness)
        .attach("H(x) is longer than the proving key's H query")?;

    let r: C::ScalarField = rand_scalar(rng);
    let s: C::ScalarField = rand_scalar(rng);

    let a = *proving_key.alpha_1()
        + weighted_sum(proving_key.a_query(), witness)
        + (*proving_key.delta_1() * r);

    let b_2 = *proving_key.beta_2()
        + weighted_sum(proving_key.b_g2_query(), witness)
        + (*proving_key.delta_2() * s);

    let b_1 = *proving_key.beta_1()
        + weighted_sum(proving_key.b_g1_query(), witness)
        + (*proving_key.delta_1() * s);

    let private_witness = &witness[proving_key.num_instance_signals()..];
    let c = weighted_sum(proving_key.private_query(), private_witness)
        + h_tau
        + (a * s)
        + (b_1 * r)
        - (*proving_key.delta_1() * (r * s));

    debug!("Generated proof");
    Ok(Proof::new(a, b_2, c))
}

/// Combine the witness against `qap` and prove it in one step.
pub fn prove_with_qap<C, R>(
    ring: &PolynomialRing<C::ScalarField>,
    circuit: &Circuit,
    qap: &QAP<C::ScalarField>,
    proving_key: &ProvingKey<C>,
    witness: &[C::ScalarField],
    rng: &mut R,
) -> Result<Proof<C>, Report<Groth16Error>>
where
    C: Pairing,
    R: Rng + CryptoRng,
{
    if qap.target_polynomial() != proving_key.target_polynomial() {
        return Err(report!(Groth16Error::MalformedInput(
            "proving key was generated for a different QAP".to_string()
        )));
    }
    let combined = qap.combine(ring, witness)?;
    generate_proof(ring, circuit, proving_key, witness, &combined.p, rng)
}
