use crate::circuits::{Circuit, QAP};
use crate::errors::Groth16Error;
use crate::helpers::rand_nonzero_scalar;
use crate::polynomial::{Polynomial, PolynomialRing};
use ark_ec::PrimeGroup;
use ark_ec::pairing::Pairing;
use ark_ff::{Field, Zero};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid,
    Validate,
};
use ark_std::cfg_iter;
use itertools::izip;
use log::debug;
use rand::{CryptoRng, Rng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rootcause::prelude::ResultExt;
use rootcause::{Report, report};
use std::fmt;
use zeroize::Zeroize;

/// The secret scalars of one trusted setup.
///
/// Only ever constructed inside the setup call. It cannot be cloned, its `Debug` output is
/// redacted, and the scalars are zeroised when it is dropped.
pub struct ToxicWaste<F: Field> {
    tau: F,
    alpha: F,
    beta: F,
    gamma: F,
    delta: F,
}

impl<F: Field> ToxicWaste<F> {
    fn sample<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        ToxicWaste {
            tau: rand_nonzero_scalar(rng),
            alpha: rand_nonzero_scalar(rng),
            beta: rand_nonzero_scalar(rng),
            gamma: rand_nonzero_scalar(rng),
            delta: rand_nonzero_scalar(rng),
        }
    }
}

#[cfg(any(test, feature = "insecure-debug"))]
impl<F: Field> ToxicWaste<F> {
    pub fn tau(&self) -> &F {
        &self.tau
    }

    pub fn alpha(&self) -> &F {
        &self.alpha
    }

    pub fn beta(&self) -> &F {
        &self.beta
    }

    pub fn gamma(&self) -> &F {
        &self.gamma
    }

    pub fn delta(&self) -> &F {
        &self.delta
    }
}

impl<F: Field> ToxicWaste<F> {
    fn wipe(&mut self) {
        self.tau.zeroize();
        self.alpha.zeroize();
        self.beta.zeroize();
        self.gamma.zeroize();
        self.delta.zeroize();
    }
}

impl<F: Field> Drop for ToxicWaste<F> {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl<F: Field> fmt::Debug for ToxicWaste<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToxicWaste(<redacted>)")
    }
}

/// Everything the prover needs, derived from the toxic waste.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct ProvingKey<C: Pairing> {
    alpha_1: C::G1,
    beta_1: C::G1,
    beta_2: C::G2,
    delta_1: C::G1,
    delta_2: C::G2,
    /// `[u_i(τ)]₁` for every signal
    a_query: Vec<C::G1>,
    /// `[v_i(τ)]₁` for every signal
    b_g1_query: Vec<C::G1>,
    /// `[v_i(τ)]₂` for every signal
    b_g2_query: Vec<C::G2>,
    /// `[(β·u_i(τ) + α·v_i(τ) + w_i(τ)) / δ]₁` for the private signals
    private_query: Vec<C::G1>,
    /// `[τ^j · Z(τ) / δ]₁` for `j = 0..m-1`
    h_query: Vec<C::G1>,
    target: Polynomial<C::ScalarField>,
    num_instance_signals: usize,
}

impl<C: Pairing> ProvingKey<C> {
    pub fn alpha_1(&self) -> &C::G1 {
        &self.alpha_1
    }

    pub fn beta_1(&self) -> &C::G1 {
        &self.beta_1
    }

    pub fn beta_2(&self) -> &C::G2 {
        &self.beta_2
    }

    pub fn delta_1(&self) -> &C::G1 {
        &self.delta_1
    }

    pub fn delta_2(&self) -> &C::G2 {
        &self.delta_2
    }

    pub fn a_query(&self) -> &[C::G1] {
        &self.a_query
    }

    pub fn b_g1_query(&self) -> &[C::G1] {
        &self.b_g1_query
    }

    pub fn b_g2_query(&self) -> &[C::G2] {
        &self.b_g2_query
    }

    pub fn private_query(&self) -> &[C::G1] {
        &self.private_query
    }

    pub fn h_query(&self) -> &[C::G1] {
        &self.h_query
    }

    /// The QAP's `Z(x)`, shared rather than recomputed.
    pub fn target_polynomial(&self) -> &Polynomial<C::ScalarField> {
        &self.target
    }

    pub fn num_signals(&self) -> usize {
        self.a_query.len()
    }

    pub fn num_instance_signals(&self) -> usize {
        self.num_instance_signals
    }

    /// Query lengths must agree with each other and with `Z(x)`. A key read from storage
    /// without validation may not satisfy this.
    pub(crate) fn check_shape(&self) -> Result<(), Report<Groth16Error>> {
        let signals = self.a_query.len();
        let consistent = self.b_g1_query.len() == signals
            && self.b_g2_query.len() == signals
            && (1..=signals).contains(&self.num_instance_signals)
            && self.private_query.len() == signals - self.num_instance_signals
            && self.target.len() >= 2
            && self.h_query.len() + 2 == self.target.len();
        if !consistent {
            return Err(report!(Groth16Error::MalformedInput(
                "proving key queries have inconsistent lengths".to_string()
            ))
            .attach(format!(
                "A: {}, B1: {}, B2: {}, private: {}, H: {}, Z: {}, instance: {}",
                signals,
                self.b_g1_query.len(),
                self.b_g2_query.len(),
                self.private_query.len(),
                self.h_query.len(),
                self.target.len(),
                self.num_instance_signals
            )));
        }
        Ok(())
    }
}

impl<C: Pairing> Valid for ProvingKey<C> {
    fn check(&self) -> Result<(), SerializationError> {
        self.check_shape()
            .map_err(|_| SerializationError::InvalidData)?;
        self.alpha_1.check()?;
        self.beta_1.check()?;
        self.beta_2.check()?;
        self.delta_1.check()?;
        self.delta_2.check()?;
        self.a_query.check()?;
        self.b_g1_query.check()?;
        self.b_g2_query.check()?;
        self.private_query.check()?;
        self.h_query.check()?;
        self.target.check()
    }
}

impl<C: Pairing> CanonicalDeserialize for ProvingKey<C> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        // Fields are checked as a whole below
        let unchecked = Validate::No;
        let key = ProvingKey {
            alpha_1: C::G1::deserialize_with_mode(&mut reader, compress, unchecked)?,
            beta_1: C::G1::deserialize_with_mode(&mut reader, compress, unchecked)?,
            beta_2: C::G2::deserialize_with_mode(&mut reader, compress, unchecked)?,
            delta_1: C::G1::deserialize_with_mode(&mut reader, compress, unchecked)?,
            delta_2: C::G2::deserialize_with_mode(&mut reader, compress, unchecked)?,
            a_query: Vec::deserialize_with_mode(&mut reader, compress, unchecked)?,
            b_g1_query: Vec::deserialize_with_mode(&mut reader, compress, unchecked)?,
            b_g2_query: Vec::deserialize_with_mode(&mut reader, compress, unchecked)?,
            private_query: Vec::deserialize_with_mode(&mut reader, compress, unchecked)?,
            h_query: Vec::deserialize_with_mode(&mut reader, compress, unchecked)?,
            target: Polynomial::deserialize_with_mode(&mut reader, compress, unchecked)?,
            num_instance_signals: usize::deserialize_with_mode(&mut reader, compress, unchecked)?,
        };
        if matches!(validate, Validate::Yes) {
            key.check()?;
        }
        Ok(key)
    }
}

/// Everything the verifier needs. Holds no secret.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct VerificationKey<C: Pairing> {
    alpha_1: C::G1,
    beta_2: C::G2,
    gamma_2: C::G2,
    delta_2: C::G2,
    /// `[(β·u_i(τ) + α·v_i(τ) + w_i(τ)) / γ]₁` for the constant one and the public inputs
    ic: Vec<C::G1>,
}

impl<C: Pairing> VerificationKey<C> {
    pub fn alpha_1(&self) -> &C::G1 {
        &self.alpha_1
    }

    pub fn beta_2(&self) -> &C::G2 {
        &self.beta_2
    }

    pub fn gamma_2(&self) -> &C::G2 {
        &self.gamma_2
    }

    pub fn delta_2(&self) -> &C::G2 {
        &self.delta_2
    }

    pub fn ic(&self) -> &[C::G1] {
        &self.ic
    }

    /// Number of public inputs expected by the verifier, excluding the constant one.
    pub fn num_public_inputs(&self) -> usize {
        self.ic.len().saturating_sub(1)
    }

    /// `ic` always carries the constant one's entry.
    pub(crate) fn check_shape(&self) -> Result<(), Report<Groth16Error>> {
        if self.ic.is_empty() {
            return Err(report!(Groth16Error::MalformedInput(
                "verification key has no IC entries".to_string()
            )));
        }
        Ok(())
    }
}

impl<C: Pairing> Valid for VerificationKey<C> {
    fn check(&self) -> Result<(), SerializationError> {
        self.check_shape()
            .map_err(|_| SerializationError::InvalidData)?;
        self.alpha_1.check()?;
        self.beta_2.check()?;
        self.gamma_2.check()?;
        self.delta_2.check()?;
        self.ic.check()
    }
}

impl<C: Pairing> CanonicalDeserialize for VerificationKey<C> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let unchecked = Validate::No;
        let key = VerificationKey {
            alpha_1: C::G1::deserialize_with_mode(&mut reader, compress, unchecked)?,
            beta_2: C::G2::deserialize_with_mode(&mut reader, compress, unchecked)?,
            gamma_2: C::G2::deserialize_with_mode(&mut reader, compress, unchecked)?,
            delta_2: C::G2::deserialize_with_mode(&mut reader, compress, unchecked)?,
            ic: Vec::deserialize_with_mode(&mut reader, compress, unchecked)?,
        };
        if matches!(validate, Validate::Yes) {
            key.check()?;
        }
        Ok(key)
    }
}

/// Run a trusted setup for `qap`.
///
/// The toxic waste is sampled inside this call and dropped (zeroised) before it returns, on
/// the success path as well as on every error path.
pub fn generate_trusted_setup<C, R>(
    ring: &PolynomialRing<C::ScalarField>,
    witness_length: usize,
    circuit: &Circuit,
    qap: &QAP<C::ScalarField>,
    rng: &mut R,
) -> Result<(ProvingKey<C>, VerificationKey<C>), Report<Groth16Error>>
where
    C: Pairing,
    R: Rng + CryptoRng,
{
    let toxic_waste = ToxicWaste::sample(rng);
    derive_keys(ring, witness_length, circuit, qap, &toxic_waste)
}

/// Same as [`generate_trusted_setup`] but hands the toxic waste back to the caller.
///
/// Anyone holding the returned value can forge proofs. Only meant for checking the
/// construction in tests and debugging sessions.
#[cfg(any(test, feature = "insecure-debug"))]
pub fn generate_trusted_setup_insecure<C, R>(
    ring: &PolynomialRing<C::ScalarField>,
    witness_length: usize,
    circuit: &Circuit,
    qap: &QAP<C::ScalarField>,
    rng: &mut R,
) -> Result<
    (
        ProvingKey<C>,
        VerificationKey<C>,
        ToxicWaste<C::ScalarField>,
    ),
    Report<Groth16Error>,
>
where
    C: Pairing,
    R: Rng + CryptoRng,
{
    let toxic_waste = ToxicWaste::sample(rng);
    let (proving_key, verification_key) =
        derive_keys(ring, witness_length, circuit, qap, &toxic_waste)?;
    Ok((proving_key, verification_key, toxic_waste))
}

fn derive_keys<C: Pairing>(
    ring: &PolynomialRing<C::ScalarField>,
    witness_length: usize,
    circuit: &Circuit,
    qap: &QAP<C::ScalarField>,
    toxic_waste: &ToxicWaste<C::ScalarField>,
) -> Result<(ProvingKey<C>, VerificationKey<C>), Report<Groth16Error>> {
    if witness_length != circuit.num_signals() || witness_length != qap.num_signals() {
        return Err(report!(Groth16Error::SetupFailure(
            "signal counts disagree".to_string()
        ))
        .attach(format!("Witness length: {}", witness_length))
        .attach(format!("Circuit signals: {}", circuit.num_signals()))
        .attach(format!("QAP signals: {}", qap.num_signals())));
    }

    if qap.num_constraints() == 0 {
        return Err(report!(Groth16Error::SetupFailure(
            "circuit has no constraints".to_string()
        )));
    }

    debug!(
        "Starting trusted setup for {} signals and {} constraints",
        qap.num_signals(),
        qap.num_constraints()
    );

    let ToxicWaste {
        tau,
        alpha,
        beta,
        gamma,
        delta,
    } = toxic_waste;

    let mut z_tau = ring.evaluate(qap.target_polynomial(), tau);
    if z_tau.is_zero() {
        return Err(report!(Groth16Error::SetupFailure(
            "secret point is a root of the target polynomial".to_string()
        )));
    }
    let mut gamma_inverse = ring
        .field()
        .inverse(gamma)
        .context(Groth16Error::SetupFailure("gamma is not invertible".to_string()))?;
    let mut delta_inverse = ring
        .field()
        .inverse(delta)
        .context(Groth16Error::SetupFailure("delta is not invertible".to_string()))?;

    let g1 = C::G1::generator();
    let g2 = C::G2::generator();

    let evaluate_at_tau = |polys: &[Polynomial<C::ScalarField>]| -> Vec<C::ScalarField> {
        cfg_iter!(polys).map(|p| ring.evaluate(p, tau)).collect()
    };
    let mut u_tau = evaluate_at_tau(qap.u());
    let mut v_tau = evaluate_at_tau(qap.v());
    let mut w_tau = evaluate_at_tau(qap.w());

    let a_query: Vec<C::G1> = cfg_iter!(u_tau).map(|x| g1 * x).collect();
    let b_g1_query: Vec<C::G1> = cfg_iter!(v_tau).map(|x| g1 * x).collect();
    let b_g2_query: Vec<C::G2> = cfg_iter!(v_tau).map(|x| g2 * x).collect();

    debug!("Generated A and B queries");

    // Public and private signals are divided by different secrets so the verifier can add the
    // public part back in without learning anything about the private one.
    let mut psi: Vec<C::ScalarField> = izip!(&u_tau, &v_tau, &w_tau)
        .map(|(u, v, w)| *beta * u + *alpha * v + w)
        .collect();
    let (public_psi, private_psi) = psi.split_at(circuit.num_instance_signals());
    let ic: Vec<C::G1> = cfg_iter!(public_psi)
        .map(|x| g1 * (*x * gamma_inverse))
        .collect();
    let private_query: Vec<C::G1> = cfg_iter!(private_psi)
        .map(|x| g1 * (*x * delta_inverse))
        .collect();

    debug!("Generated public and private queries");

    // H(x) = P(x) / Z(x) has degree at most m - 2
    let mut power = z_tau * delta_inverse;
    let h_query: Vec<C::G1> = (0..qap.num_constraints() - 1)
        .map(|_| {
            let point = g1 * power;
            power *= tau;
            point
        })
        .collect();

    debug!("Generated H query of length {}", h_query.len());

    u_tau.zeroize();
    v_tau.zeroize();
    w_tau.zeroize();
    psi.zeroize();
    power.zeroize();
    z_tau.zeroize();
    gamma_inverse.zeroize();
    delta_inverse.zeroize();

    let proving_key = ProvingKey {
        alpha_1: g1 * alpha,
        beta_1: g1 * beta,
        beta_2: g2 * beta,
        delta_1: g1 * delta,
        delta_2: g2 * delta,
        a_query,
        b_g1_query,
        b_g2_query,
        private_query,
        h_query,
        target: qap.target_polynomial().clone(),
        num_instance_signals: circuit.num_instance_signals(),
    };
    let verification_key = VerificationKey {
        alpha_1: g1 * alpha,
        beta_2: g2 * beta,
        gamma_2: g2 * gamma,
        delta_2: g2 * delta,
        ic,
    };
    Ok((proving_key, verification_key))
}
