use std::collections::BTreeMap;

use cuckoo::{solve, solve_serial, verify, Edge, EdgeGenerator, Outcome, Plain, SipEdges, SolverConfig};

const EDGE_BITS: u32 = 10;

/// Brute force: group every nonce by its edge. The solver sweeps partitions in
/// order and keeps the smallest repeated edge of the first partition that has
/// one; its proof is that edge's two lowest nonces.
fn expected(g: &SipEdges, partitions: u32) -> Outcome {
    let mut by_edge: BTreeMap<Edge, Vec<u32>> = BTreeMap::new();
    for nonce in 0..g.half_size() {
        by_edge.entry(g.edge(nonce)).or_default().push(nonce);
    }
    by_edge
        .into_iter()
        .filter(|(_, nonces)| nonces.len() >= 2)
        .min_by_key(|(edge, _)| (edge.u & (partitions - 1), *edge))
        .map_or(Outcome::NoSolution, |(_, nonces)| {
            Outcome::Solved(cuckoo::Proof { nonces: nonces[..2].to_vec() })
        })
}

fn header(i: u32) -> Vec<u8> {
    format!("cuckoo test header {i}").into_bytes()
}

#[test]
fn matches_brute_force_oracle() {
    let mut solved = 0;
    for i in 0..24 {
        let g = SipEdges::from_header(&header(i), EDGE_BITS);
        for partitions in [1, 4, 16] {
            let want = expected(&g, partitions);
            for threads in [1, 3] {
                let c = SolverConfig { edge_bits: EDGE_BITS, threads, partitions, ..SolverConfig::default() };
                let got = solve(g, c).unwrap();
                assert_eq!(got, want, "header {i}, {c:?}");
            }
            if partitions == 1 && want.is_solved() {
                solved += 1;
            }
        }
    }
    // Roughly half of all 2^10-edge graphs contain a repeated edge.
    assert!(solved > 0 && solved < 24, "{solved} of 24 headers solved");
}

#[test]
fn solving_is_idempotent() {
    for i in 0..8 {
        let g = SipEdges::from_header(&header(i), 12);
        let c = SolverConfig { edge_bits: 12, threads: 4, partitions: 8, ..SolverConfig::default() };
        assert_eq!(solve(g, c).unwrap(), solve(g, c).unwrap());
    }
}

#[test]
fn thread_count_does_not_change_the_answer() {
    for i in 0..8 {
        let g = SipEdges::from_header(&header(100 + i), 12);
        let base = SolverConfig { edge_bits: 12, partitions: 4, ..SolverConfig::default() };
        let serial = solve_serial::<Plain, _>(g, base).unwrap();
        for threads in [2, 4, 8] {
            assert_eq!(solve(g, SolverConfig { threads, ..base }).unwrap(), serial);
        }
        if let Some(proof) = serial.proof() {
            assert_eq!(verify(&proof.nonces, 2, &g), Ok(()));
        }
    }
}

#[test]
fn tampered_proofs_are_rejected() {
    let (g, proof) = (0..64)
        .find_map(|i| {
            let g = SipEdges::from_header(&header(i), EDGE_BITS);
            let c = SolverConfig { edge_bits: EDGE_BITS, ..SolverConfig::default() };
            solve(g, c).unwrap().proof().cloned().map(|p| (g, p))
        })
        .expect("some header in 64 has a 2-cycle");
    assert!(verify(&proof.nonces, 2, &g).is_ok());

    let [a, b] = [proof.nonces[0], proof.nonces[1]];
    // Any other nonce paired with `a` either has a different edge or is a
    // third copy of the same edge.
    let other = (0..g.half_size()).find(|&n| n != a && n != b && g.edge(n) != g.edge(a)).unwrap();
    let mut forged = vec![a, other];
    forged.sort_unstable();
    assert!(verify(&forged, 2, &g).is_err());
    assert!(verify(&[b, a], 2, &g).is_err());
    assert!(verify(&[a], 2, &g).is_err());
}

#[test]
fn rejects_bad_configuration_before_searching() {
    let g = SipEdges::from_header(b"config", EDGE_BITS);
    let zero = SolverConfig { edge_bits: EDGE_BITS, threads: 0, ..SolverConfig::default() };
    assert!(matches!(
        solve(g, zero),
        Err(cuckoo::CuckooError::Config(cuckoo::ConfigError::ZeroThreads))
    ));
    let mismatch = SolverConfig { edge_bits: EDGE_BITS + 1, ..SolverConfig::default() };
    assert!(matches!(
        solve(g, mismatch),
        Err(cuckoo::CuckooError::Config(cuckoo::ConfigError::EdgeBitsMismatch { .. }))
    ));
    let threaded = SolverConfig { edge_bits: EDGE_BITS, threads: 2, ..SolverConfig::default() };
    assert!(matches!(
        solve_serial::<Plain, _>(g, threaded),
        Err(cuckoo::CuckooError::Config(cuckoo::ConfigError::SerialThreads(2)))
    ));
}

#[test]
fn outcome_serializes_with_a_tag() {
    let solved = Outcome::Solved(cuckoo::Proof { nonces: vec![3, 9] });
    assert_eq!(serde_json::to_string(&solved).unwrap(), r#"{"outcome":"solved","nonces":[3,9]}"#);
    assert_eq!(serde_json::to_string(&Outcome::NoSolution).unwrap(), r#"{"outcome":"no_solution"}"#);
}
