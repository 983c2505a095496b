//! PDA derivations for the proxy program

use pinocchio::pubkey::{find_program_address, Pubkey};

/// Seed of the singleton registry account.
pub const REGISTRY_SEED: &[u8] = b"registry";
/// Seed of per-user proxy accounts: ["proxy", user].
pub const PROXY_SEED: &[u8] = b"proxy";

pub fn derive_registry_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    find_program_address(&[REGISTRY_SEED], program_id)
}

pub fn derive_proxy_pda(user: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    find_program_address(&[PROXY_SEED, user.as_ref()], program_id)
}
