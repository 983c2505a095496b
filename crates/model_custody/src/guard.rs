//! Caller resolution and owner authorization

use crate::error::CustodyError;
use crate::state::Principal;

/// Resolve the effective caller of an operation.
///
/// A relay envelope is honored only when the trusted relay is the signer;
/// anyone else presenting one is rejected outright.
pub fn resolve_caller(
    signer: &Principal,
    envelope: Option<Principal>,
    trusted_relay: &Principal,
) -> Result<Principal, CustodyError> {
    match envelope {
        None => Ok(*signer),
        Some(original_sender) if signer == trusted_relay => Ok(original_sender),
        Some(_) => Err(CustodyError::UntrustedRelay),
    }
}

/// Check that the resolved caller is the owner. Side-effect free.
pub fn authorize(resolved: &Principal, owner: &Principal) -> Result<(), CustodyError> {
    if resolved != owner {
        return Err(CustodyError::Unauthorized);
    }
    Ok(())
}
