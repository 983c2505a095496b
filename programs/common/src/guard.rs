//! Caller resolution and owner authorization
//!
//! Every user-facing instruction carries a one-byte envelope tag at the head
//! of its data. A direct call resolves to the transaction signer; a relayed
//! call carries the original sender and is honored only when the configured
//! trusted relay is the signer. Authorization is checked before any state
//! mutation (fail closed).

use pinocchio::pubkey::Pubkey;

use crate::error::OnrampError;
use crate::instruction::InstructionReader;

/// Envelope tag: the signer is the caller.
pub const ENVELOPE_DIRECT: u8 = 0;
/// Envelope tag: the data carries the authenticated original sender.
pub const ENVELOPE_RELAYED: u8 = 1;

/// Parse the relay envelope at the reader's current position.
///
/// Returns the embedded original sender for a relayed call, `None` for a
/// direct call.
pub fn read_envelope(reader: &mut InstructionReader) -> Result<Option<Pubkey>, OnrampError> {
    match reader.read_u8()? {
        ENVELOPE_DIRECT => Ok(None),
        ENVELOPE_RELAYED => Ok(Some(reader.read_pubkey()?)),
        _ => Err(OnrampError::InvalidInstruction),
    }
}

/// Resolve the effective caller of an operation.
pub fn resolve_caller(
    signer: &Pubkey,
    envelope: Option<Pubkey>,
    trusted_relay: &Pubkey,
) -> Result<Pubkey, OnrampError> {
    match envelope {
        None => Ok(*signer),
        Some(original_sender) if signer == trusted_relay => Ok(original_sender),
        Some(_) => Err(OnrampError::UntrustedRelay),
    }
}

/// Check that the resolved caller is the owner. Side-effect free.
pub fn authorize(resolved: &Pubkey, owner: &Pubkey) -> Result<(), OnrampError> {
    if resolved != owner {
        return Err(OnrampError::Unauthorized);
    }
    Ok(())
}
