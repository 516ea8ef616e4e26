use solana_program::pubkey::Pubkey;

use crate::error::RegistryError;
use crate::state::MAX_SEED_LEN;

/// Derive the canonical program address for `seed` under `namespace`.
///
/// Bumps are tried from 255 down to 0 and the first one whose hash lands off
/// the ed25519 curve is returned alongside the address.
pub fn derive(
    namespace: &[u8],
    seed: &str,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), RegistryError> {
    check_seed(seed)?;
    Pubkey::try_find_program_address(&[namespace, seed.as_bytes()], program_id)
        .ok_or(RegistryError::DerivationExhausted)
}

/// Check that `address` and `bump` are the canonical derivation of `seed`.
///
/// Any other bump is rejected even if it happens to produce a valid
/// off-curve address.
pub fn verify(
    address: &Pubkey,
    namespace: &[u8],
    seed: &str,
    bump: u8,
    program_id: &Pubkey,
) -> Result<(), RegistryError> {
    let (expected, canonical_bump) = derive(namespace, seed, program_id)?;
    if expected != *address || canonical_bump != bump {
        return Err(RegistryError::InvalidRecordAddress);
    }
    Ok(())
}

fn check_seed(seed: &str) -> Result<(), RegistryError> {
    if seed.len() > MAX_SEED_LEN {
        return Err(RegistryError::PayloadTooLarge);
    }
    Ok(())
}
