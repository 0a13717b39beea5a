//! Independent proof verification.
//!
//! Replays the edge generator for every nonce of a proof and walks the
//! resulting edges, alternating sides, until the walk returns to its start.
//! A valid proof visits every edge exactly once on the way.

use crate::error::VerifyError;

use super::edge::EdgeGenerator;

/// Checks that `nonces` is a cycle of exactly `proof_size` edges.
///
/// Nonces must be strictly ascending and below the generator's edge count.
pub fn verify<G>(nonces: &[u32], proof_size: usize, generator: &G) -> Result<(), VerifyError>
where
    G: EdgeGenerator + ?Sized,
{
    if nonces.len() != proof_size {
        return Err(VerifyError::WrongLength {
            found: nonces.len(),
            expected: proof_size,
        });
    }
    let half_size = generator.half_size();
    let mut uvs = Vec::with_capacity(2 * proof_size);
    for (index, &nonce) in nonces.iter().enumerate() {
        if nonce >= half_size {
            return Err(VerifyError::NonceTooBig { nonce, half_size });
        }
        if index > 0 && nonce <= nonces[index - 1] {
            return Err(VerifyError::NotAscending { index });
        }
        let edge = generator.edge(nonce);
        uvs.push(edge.u);
        uvs.push(edge.v);
    }
    if uvs.is_empty() {
        return Err(VerifyError::DeadEnd);
    }

    // Even slots hold u-nodes and odd slots v-nodes; stepping by two keeps the
    // search on one side.
    let slots = uvs.len();
    let mut i = 0;
    let mut walked = 0;
    loop {
        let mut partner = None;
        let mut k = (i + 2) % slots;
        while k != i {
            if uvs[k] == uvs[i] {
                if partner.is_some() {
                    return Err(VerifyError::Branch);
                }
                partner = Some(k);
            }
            k = (k + 2) % slots;
        }
        let j = partner.ok_or(VerifyError::DeadEnd)?;
        i = j ^ 1;
        walked += 1;
        if i == 0 {
            break;
        }
    }
    if walked == proof_size {
        Ok(())
    } else {
        Err(VerifyError::ShortCycle { length: walked })
    }
}
