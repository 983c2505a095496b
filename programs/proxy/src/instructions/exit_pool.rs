//! Exit pool instruction - redeem pool shares back into the underlying
//! reserves

use onramp_common::*;
use pinocchio::cpi::invoke;
use pinocchio::instruction::{AccountMeta, Instruction};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

use crate::instructions::enter_pool::validate_proxy_ledger;
use crate::state::{Proxy, Registry};

/// Process exit pool instruction
///
/// Redeems exactly `amount` of the proxy's pool shares for their
/// proportional share of the pool reserves. The proceeds stay custodied in
/// the proxy's ledgers, mirroring enter's custody policy; recovery is a
/// separate withdraw step.
///
/// # Arguments
/// * `registry_account` - Registry account (read)
/// * `proxy_account` - The caller's proxy account
/// * `caller_account` - Transaction signer
/// * `pool_account` - The configured pool
/// * `share_ledger` - Proxy's pool-share ledger
/// * `wrapped_ledger` - Proxy's wrapped-native ledger
/// * `reserve_ledger` - Proxy's reserve-token ledger
/// * `envelope` - Relay envelope parsed from the instruction data
/// * `amount` - Pool shares to redeem
pub fn process_exit_pool(
    registry_account: &AccountInfo,
    proxy_account: &AccountInfo,
    caller_account: &AccountInfo,
    pool_account: &AccountInfo,
    share_ledger: &AccountInfo,
    wrapped_ledger: &AccountInfo,
    reserve_ledger: &AccountInfo,
    envelope: Option<Pubkey>,
    amount: u128,
) -> ProgramResult {
    let registry = unsafe { borrow_account_data::<Registry>(registry_account)? };

    let resolved = resolve_caller(caller_account.key(), envelope, &registry.trusted_relay)?;
    let entry = registry
        .find(&resolved)
        .ok_or(OnrampError::NoProxyForCaller)?;
    if &entry.proxy != proxy_account.key() {
        msg!("Error: Proxy account does not match the registry entry");
        return Err(OnrampError::InvalidAccount.into());
    }

    let proxy = unsafe { borrow_account_data::<Proxy>(proxy_account)? };
    authorize(&resolved, &proxy.user)?;

    if pool_account.key() != &registry.pool {
        msg!("Error: Pool account does not match the registry");
        return Err(OnrampError::InvalidAccount.into());
    }
    validate_owner(pool_account, &registry.converter_program)?;
    validate_proxy_ledger(registry, share_ledger, proxy_account.key(), ASSET_POOL_SHARE)?;
    validate_proxy_ledger(registry, wrapped_ledger, proxy_account.key(), ASSET_WRAPPED_NATIVE)?;
    validate_proxy_ledger(registry, reserve_ledger, proxy_account.key(), ASSET_RESERVE)?;

    let shares_held = unsafe { borrow_account_data::<TokenBalance>(share_ledger)? }.balance;
    if amount > shares_held {
        msg!("Error: Redemption exceeds the held pool shares");
        return Err(OnrampError::InsufficientBalance.into());
    }

    // Redemption is covered by the allowance granted at initialization.
    let redeem_data = encode_redeem(amount);
    let redeem_metas = [
        AccountMeta::writable(pool_account.key()),
        AccountMeta::writable(share_ledger.key()),
        AccountMeta::writable(wrapped_ledger.key()),
        AccountMeta::writable(reserve_ledger.key()),
    ];
    let redeem_instruction = Instruction {
        program_id: &registry.converter_program,
        accounts: &redeem_metas,
        data: &redeem_data,
    };
    invoke(
        &redeem_instruction,
        &[pool_account, share_ledger, wrapped_ledger, reserve_ledger],
    )?;

    msg!("exited pool");
    Ok(())
}
