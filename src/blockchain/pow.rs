use sha2::{Digest, Sha256};

use super::DIFFICULTY;

/// Check whether `sha256("{last_proof}{proof}")` starts with `DIFFICULTY`
/// leading zeros (in hex).
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{last_proof}{proof}");
    let digest = hex::encode(Sha256::digest(guess.as_bytes()));
    digest.chars().take(DIFFICULTY).all(|c| c == '0')
}

/// Search proofs from 0 upwards until one satisfies `valid_proof`.
///
/// The search is unbounded; with a fixed low difficulty it terminates after
/// tens of thousands of hashes on average.
pub fn proof_of_work(last_proof: u64) -> u64 {
    let mut proof = 0u64;
    while !valid_proof(last_proof, proof) {
        proof = proof.wrapping_add(1);
    }
    proof
}

/// Same search as [`proof_of_work`], giving up after `max_attempts` candidates.
pub fn proof_of_work_bounded(last_proof: u64, max_attempts: u64) -> Option<u64> {
    (0..max_attempts).find(|proof| valid_proof(last_proof, *proof))
}
