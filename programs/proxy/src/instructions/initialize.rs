//! Initialize instruction - set up the registry

use onramp_common::*;
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey};

use crate::pda::derive_registry_pda;
use crate::state::Registry;

/// Process initialize instruction for the registry
///
/// Called once at deployment. Records the governance authority, the trusted
/// relay signer and the converter binding.
///
/// # Arguments
/// * `program_id` - The proxy program ID
/// * `registry_account` - The registry account to initialize (must be PDA)
/// * `governance` - Factory administrator
/// * `trusted_relay` - The one signer allowed to carry relay envelopes
/// * `converter_program` - Converter program of this deployment
/// * `pool` - Pool account granted spending authority on proxy ledgers
pub fn process_initialize(
    program_id: &Pubkey,
    registry_account: &AccountInfo,
    governance: &Pubkey,
    trusted_relay: &Pubkey,
    converter_program: &Pubkey,
    pool: &Pubkey,
) -> Result<(), OnrampError> {
    let (expected_pda, bump) = derive_registry_pda(program_id);
    if registry_account.key() != &expected_pda {
        msg!("Error: Registry account is not the correct PDA");
        return Err(OnrampError::InvalidAccount);
    }

    if registry_account.data_len() != Registry::LEN {
        msg!("Error: Registry account has incorrect size");
        return Err(OnrampError::InvalidAccount);
    }

    let registry = unsafe { borrow_account_data_mut::<Registry>(registry_account)? };
    registry.initialize_in_place(
        *governance,
        *trusted_relay,
        *converter_program,
        *pool,
        bump,
    )?;

    msg!("Registry initialized");
    Ok(())
}
