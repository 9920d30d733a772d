//! Circuits shared by the unit tests, in the JSON form the circuit compiler emits.

use crate::circuits::{Circuit, CircuitDescription, R1CS};
use crate::field::FieldContext;
use ark_ff::PrimeField;

/// `y = x^3 + x + 5` with private `x` (s0) and public `y` (s1).
pub(crate) const CUBIC_JSON: &str = r#"{
    "signals": ["one", "s1", "s0", "s2", "s3", "s4", "s5", "out"],
    "public_inputs": 1,
    "private_inputs": 1,
    "constraints": [
        { "a": {"1": "1"},           "b": {"0": "1"}, "c": {"1": "1"} },
        { "a": {"2": "1"},           "b": {"2": "1"}, "c": {"3": "1"} },
        { "a": {"3": "1"},           "b": {"2": "1"}, "c": {"4": "1"} },
        { "a": {"4": "1", "2": "1"}, "b": {"0": "1"}, "c": {"5": "1"} },
        { "a": {"5": "1", "0": "5"}, "b": {"0": "1"}, "c": {"6": "1"} },
        { "a": {"1": "1"},           "b": {"0": "1"}, "c": {"6": "1"} },
        { "a": {"0": "1"},           "b": {"0": "1"}, "c": {"7": "1"} }
    ]
}"#;

/// `c = a * b` with private `a`, `b` and public `c`.
pub(crate) const MULTIPLICATION_JSON: &str = r#"{
    "signals": ["one", "c", "a", "b", "d", "out"],
    "public_inputs": 1,
    "private_inputs": 2,
    "constraints": [
        { "a": {"1": "1"}, "b": {"0": "1"}, "c": {"1": "1"} },
        { "a": {"2": "1"}, "b": {"3": "1"}, "c": {"4": "1"} },
        { "a": {"1": "1"}, "b": {"0": "1"}, "c": {"4": "1"} },
        { "a": {"0": "1"}, "b": {"0": "1"}, "c": {"5": "1"} }
    ]
}"#;

fn load<F: PrimeField>(json: &str) -> (Circuit, R1CS<F>) {
    CircuitDescription::from_json(json)
        .unwrap()
        .into_r1cs(&FieldContext::new())
        .unwrap()
}

pub(crate) fn cubic<F: PrimeField>() -> (Circuit, R1CS<F>) {
    load(CUBIC_JSON)
}

pub(crate) fn cubic_witness<F: PrimeField>(x: u64) -> Vec<F> {
    let y = x * x * x + x + 5;
    [1, y, x, x * x, x * x * x, x * x * x + x, y, 1]
        .into_iter()
        .map(F::from)
        .collect()
}

pub(crate) fn multiplication<F: PrimeField>() -> (Circuit, R1CS<F>) {
    load(MULTIPLICATION_JSON)
}

pub(crate) fn multiplication_witness<F: PrimeField>(a: u64, b: u64) -> Vec<F> {
    [1, a * b, a, b, a * b, 1].into_iter().map(F::from).collect()
}

/// `r = x * y * z * u` through the intermediates `v1 = x * y` and `v2 = z * u`, given as
/// dense columns over the signals `[one, r, x, y, z, u, v1, v2]`.
pub(crate) fn product<F: PrimeField>() -> (Circuit, R1CS<F>) {
    let l = vec![
        vec![0, 0, 0],
        vec![0, 0, 0],
        vec![1, 0, 0],
        vec![0, 0, 0],
        vec![0, 1, 0],
        vec![0, 0, 0],
        vec![0, 0, 1],
        vec![0, 0, 0],
    ];
    let r = vec![
        vec![0, 0, 0],
        vec![0, 0, 0],
        vec![0, 0, 0],
        vec![1, 0, 0],
        vec![0, 0, 0],
        vec![0, 1, 0],
        vec![0, 0, 0],
        vec![0, 0, 1],
    ];
    let o = vec![
        vec![0, 0, 0],
        vec![0, 0, 1],
        vec![0, 0, 0],
        vec![0, 0, 0],
        vec![0, 0, 0],
        vec![0, 0, 0],
        vec![1, 0, 0],
        vec![0, 1, 0],
    ];
    let to_field = |matrix: Vec<Vec<u64>>| -> Vec<Vec<F>> {
        matrix
            .into_iter()
            .map(|col| col.into_iter().map(F::from).collect())
            .collect()
    };

    let signals = ["one", "r", "x", "y", "z", "u", "v1", "v2"]
        .map(String::from)
        .to_vec();
    let circuit = Circuit::new(signals, 1, 4).unwrap();
    let r1cs = R1CS::from_columns(to_field(l), to_field(r), to_field(o)).unwrap();
    (circuit, r1cs)
}

pub(crate) fn product_witness<F: PrimeField>(x: u64, y: u64, z: u64, u: u64) -> Vec<F> {
    [1, x * y * z * u, x, y, z, u, x * y, z * u]
        .into_iter()
        .map(F::from)
        .collect()
}
