//! Withdraw native instruction - recover stray lamports to the owner

use onramp_common::*;
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::logger::Logger;

use crate::state::{Proxy, Registry};

/// Process withdraw native instruction
///
/// Moves the proxy's entire spendable lamport balance to the owner. The
/// rent reserve recorded at initialization always stays behind so the
/// account itself survives. A zero spendable balance succeeds as a no-op.
///
/// # Arguments
/// * `registry_account` - Registry account (read)
/// * `proxy_account` - The caller's proxy account
/// * `caller_account` - Transaction signer
/// * `recipient_account` - Must be the proxy's owner
/// * `envelope` - Relay envelope parsed from the instruction data
pub fn process_withdraw_native(
    registry_account: &AccountInfo,
    proxy_account: &AccountInfo,
    caller_account: &AccountInfo,
    recipient_account: &AccountInfo,
    envelope: Option<Pubkey>,
) -> ProgramResult {
    let registry = unsafe { borrow_account_data::<Registry>(registry_account)? };

    let resolved = resolve_caller(caller_account.key(), envelope, &registry.trusted_relay)?;
    if !registry.is_clone(proxy_account.key()) {
        msg!("Error: Account was not created by this registry");
        return Err(OnrampError::InvalidAccount.into());
    }

    let proxy = unsafe { borrow_account_data::<Proxy>(proxy_account)? };
    authorize(&resolved, &proxy.user)?;

    if recipient_account.key() != &proxy.user {
        msg!("Error: Recipient must be the proxy owner");
        return Err(OnrampError::InvalidAccount.into());
    }

    let amount = proxy.spare_lamports(proxy_account.lamports());
    if amount == 0 {
        msg!("nothing to withdraw");
        return Ok(());
    }

    unsafe {
        *proxy_account.borrow_mut_lamports_unchecked() -= amount;
        *recipient_account.borrow_mut_lamports_unchecked() += amount;
    }

    let mut logger = Logger::<48>::default();
    logger.append("native withdrawn, lamports: ");
    logger.append(amount);
    logger.log();
    Ok(())
}
