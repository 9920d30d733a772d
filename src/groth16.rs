//! Trusted setup, proving and verification.
//!
//! The flow for one circuit is
//!
//! - [`generate_trusted_setup`] once, which samples the toxic waste, derives a
//!   [`ProvingKey`] and a [`VerificationKey`] and then destroys the toxic waste
//! - [`generate_proof`] (or [`prove_with_qap`]) for every witness
//! - [`verify_proof`] with the public inputs only
//!
//! Keys are immutable once generated and can be shared between threads.

mod encoding;
mod prover;
mod setup;
mod verifier;

pub use encoding::{FQ_BYTES, PROOF_BYTES};
pub use prover::{Proof, generate_proof, prove_with_qap};
#[cfg(any(test, feature = "insecure-debug"))]
pub use setup::generate_trusted_setup_insecure;
pub use setup::{ProvingKey, ToxicWaste, VerificationKey, generate_trusted_setup};
pub use verifier::verify_proof;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::QAP;
    use crate::errors::Groth16Error;
    use crate::field::FieldContext;
    use crate::polynomial::PolynomialRing;
    use crate::test_circuits::{
        cubic, cubic_witness, multiplication, multiplication_witness, product, product_witness,
    };
    use ark_bn254::{Bn254, Fr};
    use ark_ec::pairing::Pairing;
    use ark_ec::PrimeGroup;
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use log::debug;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rootcause::Report;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ring<F: ark_ff::PrimeField>() -> PolynomialRing<F> {
        PolynomialRing::new(FieldContext::new())
    }

    #[test]
    fn cubic_end_to_end() -> Result<(), Report<Groth16Error>> {
        init();
        let ring = ring::<Fr>();
        let (circuit, r1cs) = cubic::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        debug!("QAP derived");

        let mut rng = StdRng::seed_from_u64(10);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(
            &ring,
            circuit.num_signals(),
            &circuit,
            &qap,
            &mut rng,
        )?;
        debug!("Trusted setup complete");

        let w = cubic_witness::<Fr>(3);
        assert!(r1cs.is_satisfied(&w)?);
        let combined = qap.combine(&ring, &w)?;
        let proof = generate_proof(&ring, &circuit, &pk, &w, &combined.p, &mut rng)?;
        debug!("Proof generated");

        let public = circuit.public_inputs(&w)?;
        assert_eq!(public, &[Fr::from(35u64)]);
        assert!(verify_proof(&vk, &proof, public, true)?);
        assert!(!verify_proof(&vk, &proof, &[Fr::from(34u64)], false)?);
        Ok(())
    }

    #[test]
    fn multiplication_end_to_end() -> Result<(), Report<Groth16Error>> {
        init();
        let ring = ring::<Fr>();
        let (circuit, r1cs) = multiplication::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(11);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(&ring, 6, &circuit, &qap, &mut rng)?;

        let w = multiplication_witness::<Fr>(3, 4);
        let proof = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;

        assert!(verify_proof(&vk, &proof, &[Fr::from(12u64)], false)?);
        assert!(!verify_proof(&vk, &proof, &[Fr::from(11u64)], false)?);
        Ok(())
    }

    #[test]
    fn product_circuit() -> Result<(), Report<Groth16Error>> {
        init();
        let ring = ring::<Fr>();
        let (circuit, r1cs) = product::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(12);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(&ring, 8, &circuit, &qap, &mut rng)?;

        let x = rng.random_range(0..1000);
        let y = rng.random_range(0..1000);
        let z = rng.random_range(0..1000);
        let u = rng.random_range(0..1000);
        let w = product_witness::<Fr>(x, y, z, u);
        debug!("Generating proof for witness {:?}", w);
        assert!(r1cs.is_satisfied(&w)?);
        assert!(qap.is_satisfied(&ring, &w)?);

        let proof = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;
        assert!(verify_proof(&vk, &proof, circuit.public_inputs(&w)?, false)?);
        Ok(())
    }

    #[test]
    fn generic_over_the_curve() -> Result<(), Report<Groth16Error>> {
        init();
        type Field = ark_mnt6_753::Fr;
        let ring = ring::<Field>();
        let (circuit, r1cs) = multiplication::<Field>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(13);
        let (pk, vk) = generate_trusted_setup::<ark_mnt6_753::MNT6_753, _>(
            &ring, 6, &circuit, &qap, &mut rng,
        )?;

        let w = multiplication_witness::<Field>(6, 7);
        let proof = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;
        assert!(verify_proof(&vk, &proof, &[Field::from(42u64)], false)?);
        assert!(!verify_proof(&vk, &proof, &[Field::from(41u64)], false)?);
        Ok(())
    }

    #[test]
    fn error_polynomial_factors_through_target() -> Result<(), Report<Groth16Error>> {
        let ring = ring::<Fr>();
        let (_, r1cs) = cubic::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let combined = qap.combine(&ring, &cubic_witness::<Fr>(3))?;
        let h = combined.quotient(&ring, qap.target_polynomial())?;

        assert_eq!(ring.mul(&h, qap.target_polynomial()), combined.p);
        assert_eq!(combined.p.len(), 13);
        assert_eq!(qap.target_polynomial().len(), 8);
        assert_eq!(h.len(), combined.p.len() - qap.target_polynomial().len() + 1);
        assert_eq!(h.len(), 6);

        let (_, r1cs) = multiplication::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let combined = qap.combine(&ring, &multiplication_witness::<Fr>(3, 4))?;
        let h = combined.quotient(&ring, qap.target_polynomial())?;
        assert_eq!(ring.mul(&h, qap.target_polynomial()), combined.p);
        assert_eq!(qap.target_polynomial().len(), 5);
        assert_eq!(h.len(), 3);
        Ok(())
    }

    #[test]
    fn unsatisfied_witness_is_rejected() -> Result<(), Report<Groth16Error>> {
        let ring = ring::<Fr>();
        let (circuit, r1cs) = cubic::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(14);
        let (pk, _) = generate_trusted_setup::<Bn254, _>(&ring, 8, &circuit, &qap, &mut rng)?;

        let mut w = cubic_witness::<Fr>(3);
        w[1] = Fr::from(34u64);
        w[6] = Fr::from(34u64);
        assert!(!qap.is_satisfied(&ring, &w)?);

        let err = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng).unwrap_err();
        assert_eq!(err.current_context(), &Groth16Error::UnsatisfiedWitness);

        let combined = qap.combine(&ring, &w)?;
        let err = generate_proof(&ring, &circuit, &pk, &w, &combined.p, &mut rng).unwrap_err();
        assert_eq!(err.current_context(), &Groth16Error::UnsatisfiedWitness);
        Ok(())
    }

    #[test]
    fn malformed_inputs() -> Result<(), Report<Groth16Error>> {
        let ring = ring::<Fr>();
        let (circuit, r1cs) = cubic::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(15);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(&ring, 8, &circuit, &qap, &mut rng)?;

        let w = cubic_witness::<Fr>(3);
        let proof = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;

        for public in [vec![], vec![Fr::from(35u64), Fr::from(1u64)]] {
            let err = verify_proof(&vk, &proof, &public, false).unwrap_err();
            assert!(matches!(
                err.current_context(),
                Groth16Error::MalformedInput(_)
            ));
        }

        let combined = qap.combine(&ring, &w)?;
        let err = generate_proof(&ring, &circuit, &pk, &w[..7], &combined.p, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            Groth16Error::MalformedInput(_)
        ));

        // Key from another circuit
        let (other_circuit, other_r1cs) = multiplication::<Fr>();
        let other_qap = QAP::from_r1cs(&ring, &other_r1cs)?;
        let (other_pk, _) =
            generate_trusted_setup::<Bn254, _>(&ring, 6, &other_circuit, &other_qap, &mut rng)?;
        let err = prove_with_qap(&ring, &circuit, &qap, &other_pk, &w, &mut rng).unwrap_err();
        assert!(matches!(
            err.current_context(),
            Groth16Error::MalformedInput(_)
        ));
        Ok(())
    }

    #[test]
    fn proofs_are_randomised() -> Result<(), Report<Groth16Error>> {
        let ring = ring::<Fr>();
        let (circuit, r1cs) = multiplication::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(16);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(&ring, 6, &circuit, &qap, &mut rng)?;

        let w = multiplication_witness::<Fr>(5, 9);
        let first = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;
        let second = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;

        assert_ne!(first, second);
        assert!(verify_proof(&vk, &first, &[Fr::from(45u64)], false)?);
        assert!(verify_proof(&vk, &second, &[Fr::from(45u64)], false)?);
        Ok(())
    }

    #[test]
    fn tampered_or_foreign_proofs_fail() -> Result<(), Report<Groth16Error>> {
        let ring = ring::<Fr>();
        let (circuit, r1cs) = multiplication::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(17);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(&ring, 6, &circuit, &qap, &mut rng)?;
        let (_, other_vk) =
            generate_trusted_setup::<Bn254, _>(&ring, 6, &circuit, &qap, &mut rng)?;

        let w = multiplication_witness::<Fr>(3, 4);
        let proof = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;
        let public = [Fr::from(12u64)];
        assert!(verify_proof(&vk, &proof, &public, false)?);
        assert!(!verify_proof(&other_vk, &proof, &public, false)?);

        let g1 = <Bn254 as Pairing>::G1::generator();
        let shifted = Proof::<Bn254>::new(*proof.a() + g1, *proof.b(), *proof.c());
        assert!(!verify_proof(&vk, &shifted, &public, false)?);
        let shifted = Proof::<Bn254>::new(*proof.a(), *proof.b(), *proof.c() + g1);
        assert!(!verify_proof(&vk, &shifted, &public, false)?);
        Ok(())
    }

    #[test]
    fn keys_and_proofs_survive_encoding() -> Result<(), Report<Groth16Error>> {
        let ring = ring::<Fr>();
        let (circuit, r1cs) = cubic::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(18);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(&ring, 8, &circuit, &qap, &mut rng)?;

        let mut pk_bytes = Vec::new();
        pk.serialize_compressed(&mut pk_bytes).unwrap();
        let pk = ProvingKey::<Bn254>::deserialize_compressed(pk_bytes.as_slice()).unwrap();
        let mut vk_bytes = Vec::new();
        vk.serialize_compressed(&mut vk_bytes).unwrap();
        let vk = VerificationKey::<Bn254>::deserialize_compressed(vk_bytes.as_slice()).unwrap();

        let w = cubic_witness::<Fr>(3);
        let proof = prove_with_qap(&ring, &circuit, &qap, &pk, &w, &mut rng)?;
        let proof = Proof::from_bytes(&proof.to_bytes())?;
        assert!(verify_proof(&vk, &proof, &[Fr::from(35u64)], false)?);
        Ok(())
    }

    #[test]
    fn keys_are_shared_between_threads() -> Result<(), Report<Groth16Error>> {
        init();
        let ring = ring::<Fr>();
        let (circuit, r1cs) = multiplication::<Fr>();
        let qap = QAP::from_r1cs(&ring, &r1cs)?;
        let mut rng = StdRng::seed_from_u64(19);
        let (pk, vk) = generate_trusted_setup::<Bn254, _>(&ring, 6, &circuit, &qap, &mut rng)?;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=4u64)
                .map(|i| {
                    let (ring, circuit, qap, pk, vk) = (&ring, &circuit, &qap, &pk, &vk);
                    scope.spawn(move || -> Result<bool, Report<Groth16Error>> {
                        let mut rng = StdRng::seed_from_u64(100 + i);
                        let w = multiplication_witness::<Fr>(i, i + 1);
                        let proof = prove_with_qap(ring, circuit, qap, pk, &w, &mut rng)?;
                        verify_proof(vk, &proof, &[Fr::from(i * (i + 1))], false)
                    })
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap().unwrap());
            }
        });
        Ok(())
    }
}
