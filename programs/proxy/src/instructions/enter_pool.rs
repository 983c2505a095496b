//! Enter pool instruction - convert the proxy's native balance into the
//! pool position

use onramp_common::*;
use pinocchio::cpi::{invoke, invoke_signed};
use pinocchio::instruction::{AccountMeta, Instruction, Seed, Signer};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::logger::Logger;

use crate::pda::PROXY_SEED;
use crate::state::{Proxy, Registry};

/// Process enter pool instruction
///
/// Resolves the caller, finds their registered proxy, moves the proxy's
/// entire spendable lamport balance into the pool vault, wraps it and
/// converts the full wrapped balance into pool shares. The shares remain in
/// the proxy's own ledger so the position can later be unwound without new
/// approvals. Any converter failure aborts the whole transaction.
///
/// # Arguments
/// * `registry_account` - Registry account (read)
/// * `proxy_account` - The caller's proxy account
/// * `caller_account` - Transaction signer
/// * `pool_account` - The configured pool
/// * `vault_account` - The pool's native vault
/// * `wrapped_ledger` - Proxy's wrapped-native ledger
/// * `share_ledger` - Proxy's pool-share ledger
/// * `envelope` - Relay envelope parsed from the instruction data
pub fn process_enter_pool(
    registry_account: &AccountInfo,
    proxy_account: &AccountInfo,
    caller_account: &AccountInfo,
    pool_account: &AccountInfo,
    vault_account: &AccountInfo,
    wrapped_ledger: &AccountInfo,
    share_ledger: &AccountInfo,
    envelope: Option<Pubkey>,
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

    validate_pool_accounts(registry, pool_account, vault_account)?;
    validate_proxy_ledger(registry, wrapped_ledger, proxy_account.key(), ASSET_WRAPPED_NATIVE)?;
    validate_proxy_ledger(registry, share_ledger, proxy_account.key(), ASSET_POOL_SHARE)?;

    let user = proxy.user;
    let bump_seed = [proxy.bump];

    // Move the spendable balance into the pool vault. Debiting our own
    // account is permitted; the wrap below makes the deposit whole or the
    // transaction reverts. A zero balance is left for the converter to
    // reject so the failure surfaces with its reason.
    let amount = proxy.spare_lamports(proxy_account.lamports());
    if amount > 0 {
        unsafe {
            *proxy_account.borrow_mut_lamports_unchecked() -= amount;
            *vault_account.borrow_mut_lamports_unchecked() += amount;
        }
    }

    let seeds = [
        Seed::from(PROXY_SEED),
        Seed::from(user.as_ref()),
        Seed::from(&bump_seed),
    ];

    let wrap_data = encode_wrap(amount);
    let wrap_metas = [
        AccountMeta::writable(pool_account.key()),
        AccountMeta::readonly(vault_account.key()),
        AccountMeta::writable(wrapped_ledger.key()),
        AccountMeta::readonly_signer(proxy_account.key()),
    ];
    let wrap_instruction = Instruction {
        program_id: &registry.converter_program,
        accounts: &wrap_metas,
        data: &wrap_data,
    };
    invoke_signed(
        &wrap_instruction,
        &[pool_account, vault_account, wrapped_ledger, proxy_account],
        &[Signer::from(&seeds[..])],
    )?;

    // Full-balance conversion; covered by the allowance granted at
    // initialization, no signer needed.
    let convert_data = encode_convert();
    let convert_metas = [
        AccountMeta::writable(pool_account.key()),
        AccountMeta::writable(wrapped_ledger.key()),
        AccountMeta::writable(share_ledger.key()),
    ];
    let convert_instruction = Instruction {
        program_id: &registry.converter_program,
        accounts: &convert_metas,
        data: &convert_data,
    };
    invoke(
        &convert_instruction,
        &[pool_account, wrapped_ledger, share_ledger],
    )?;

    let mut logger = Logger::<48>::default();
    logger.append("entered pool, lamports: ");
    logger.append(amount);
    logger.log();
    Ok(())
}

/// The pool and vault accounts must be the configured ones.
pub(crate) fn validate_pool_accounts(
    registry: &Registry,
    pool_account: &AccountInfo,
    vault_account: &AccountInfo,
) -> Result<(), OnrampError> {
    if pool_account.key() != &registry.pool {
        msg!("Error: Pool account does not match the registry");
        return Err(OnrampError::InvalidAccount);
    }
    validate_owner(pool_account, &registry.converter_program)?;
    let pool = unsafe { borrow_account_data::<Pool>(pool_account)? };
    if &pool.vault != vault_account.key() {
        msg!("Error: Vault account does not match the pool");
        return Err(OnrampError::InvalidAccount);
    }
    Ok(())
}

/// A proxy ledger must be converter-owned, initialized, carry the expected
/// asset tag and be held by the proxy.
pub(crate) fn validate_proxy_ledger(
    registry: &Registry,
    ledger_account: &AccountInfo,
    holder: &Pubkey,
    asset: u8,
) -> Result<(), OnrampError> {
    validate_owner(ledger_account, &registry.converter_program)?;
    let ledger = unsafe { borrow_account_data::<TokenBalance>(ledger_account)? };
    if ledger.initialized == 0 || ledger.asset != asset || &ledger.holder != holder {
        msg!("Error: Ledger does not match the proxy");
        return Err(OnrampError::LedgerMismatch);
    }
    Ok(())
}
