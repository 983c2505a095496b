//! Withdraw tokens instruction - recover a stray asset balance to the owner

use onramp_common::*;
use pinocchio::cpi::invoke_signed;
use pinocchio::instruction::{AccountMeta, Instruction, Seed, Signer};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

use crate::instructions::enter_pool::validate_proxy_ledger;
use crate::pda::PROXY_SEED;
use crate::state::{Proxy, Registry};

/// Process withdraw tokens instruction
///
/// Transfers the proxy's entire current balance of one asset to the owner's
/// own ledger. A zero balance succeeds without transferring anything, so
/// the operation is idempotent.
///
/// # Arguments
/// * `registry_account` - Registry account (read)
/// * `proxy_account` - The caller's proxy account
/// * `caller_account` - Transaction signer
/// * `proxy_ledger` - Proxy-held ledger of the asset
/// * `user_ledger` - Owner-held ledger of the same asset
/// * `envelope` - Relay envelope parsed from the instruction data
/// * `asset` - Asset tag being recovered
pub fn process_withdraw_tokens(
    registry_account: &AccountInfo,
    proxy_account: &AccountInfo,
    caller_account: &AccountInfo,
    proxy_ledger: &AccountInfo,
    user_ledger: &AccountInfo,
    envelope: Option<Pubkey>,
    asset: u8,
) -> ProgramResult {
    let registry = unsafe { borrow_account_data::<Registry>(registry_account)? };

    let resolved = resolve_caller(caller_account.key(), envelope, &registry.trusted_relay)?;
    if !registry.is_clone(proxy_account.key()) {
        msg!("Error: Account was not created by this registry");
        return Err(OnrampError::InvalidAccount.into());
    }

    let proxy = unsafe { borrow_account_data::<Proxy>(proxy_account)? };
    authorize(&resolved, &proxy.user)?;

    validate_proxy_ledger(registry, proxy_ledger, proxy_account.key(), asset)?;
    validate_proxy_ledger(registry, user_ledger, &proxy.user, asset)?;

    let amount = unsafe { borrow_account_data::<TokenBalance>(proxy_ledger)? }.balance;
    if amount == 0 {
        msg!("nothing to withdraw");
        return Ok(());
    }

    let user = proxy.user;
    let bump_seed = [proxy.bump];
    let seeds = [
        Seed::from(PROXY_SEED),
        Seed::from(user.as_ref()),
        Seed::from(&bump_seed),
    ];

    let transfer_data = encode_transfer(amount);
    let transfer_metas = [
        AccountMeta::writable(proxy_ledger.key()),
        AccountMeta::writable(user_ledger.key()),
        AccountMeta::readonly_signer(proxy_account.key()),
    ];
    let transfer_instruction = Instruction {
        program_id: &registry.converter_program,
        accounts: &transfer_metas,
        data: &transfer_data,
    };
    invoke_signed(
        &transfer_instruction,
        &[proxy_ledger, user_ledger, proxy_account],
        &[Signer::from(&seeds[..])],
    )?;

    msg!("tokens withdrawn");
    Ok(())
}
