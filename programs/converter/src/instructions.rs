//! Converter instruction handlers

use onramp_common::*;
use pinocchio::pubkey::find_program_address;
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::logger::Logger;

use crate::state::{issue_shares, record_unwrap, record_wrap, redeem_shares};

/// Accounts that will be borrowed mutably must be pairwise distinct.
fn validate_distinct(accounts: &[&AccountInfo]) -> Result<(), OnrampError> {
    for i in 0..accounts.len() {
        for j in i + 1..accounts.len() {
            if accounts[i].key() == accounts[j].key() {
                return Err(OnrampError::InvalidAccount);
            }
        }
    }
    Ok(())
}

/// Initialize the pool with a seeded secondary reserve.
pub fn process_init_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    secondary_reserve: u128,
) -> ProgramResult {
    let [pool_account, vault_account, payer] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_signer(payer)?;
    validate_owner(pool_account, program_id)?;

    let (expected_pda, bump) = find_program_address(&[POOL_SEED], program_id);
    if pool_account.key() != &expected_pda {
        msg!("Error: Pool account is not the correct PDA");
        return Err(OnrampError::InvalidAccount.into());
    }
    if pool_account.data_len() != Pool::LEN {
        msg!("Error: Pool account has incorrect size");
        return Err(OnrampError::InvalidAccount.into());
    }

    let pool = unsafe { borrow_account_data_mut::<Pool>(pool_account)? };
    pool.initialize(*vault_account.key(), secondary_reserve, bump)?;

    msg!("pool initialized");
    Ok(())
}

/// Initialize a per-(asset, holder) ledger account.
pub fn process_init_ledger(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    asset: u8,
    holder: &Pubkey,
) -> ProgramResult {
    let [ledger_account] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_owner(ledger_account, program_id)?;
    validate_writable(ledger_account)?;

    if !matches!(asset, ASSET_WRAPPED_NATIVE | ASSET_RESERVE | ASSET_POOL_SHARE) {
        msg!("Error: Unknown asset tag");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let (expected_pda, bump) =
        find_program_address(&[LEDGER_SEED, &[asset], holder.as_ref()], program_id);
    if ledger_account.key() != &expected_pda {
        msg!("Error: Ledger account is not the correct PDA");
        return Err(OnrampError::InvalidAccount.into());
    }
    if ledger_account.data_len() != TokenBalance::LEN {
        msg!("Error: Ledger account has incorrect size");
        return Err(OnrampError::InvalidAccount.into());
    }

    let ledger = unsafe { borrow_account_data_mut::<TokenBalance>(ledger_account)? };
    ledger.initialize(asset, *holder, bump)?;

    msg!("ledger initialized");
    Ok(())
}

/// Credit the holder's wrapped-native ledger against lamports already
/// deposited in the pool vault.
pub fn process_wrap(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
    let [pool_account, vault_account, ledger_account, holder] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_owner(pool_account, program_id)?;
    validate_owner(ledger_account, program_id)?;
    validate_signer(holder)?;
    validate_distinct(&[pool_account, vault_account, ledger_account])?;

    let pool = unsafe { borrow_account_data_mut::<Pool>(pool_account)? };
    if pool.initialized == 0 || &pool.vault != vault_account.key() {
        msg!("Error: Vault account does not match the pool");
        return Err(OnrampError::InvalidAccount.into());
    }

    let ledger = unsafe { borrow_account_data_mut::<TokenBalance>(ledger_account)? };
    if ledger.asset != ASSET_WRAPPED_NATIVE || &ledger.holder != holder.key() {
        msg!("Error: Ledger does not match the holder");
        return Err(OnrampError::LedgerMismatch.into());
    }

    // The deposit must already sit in the vault before it is acknowledged.
    let backed = pool
        .native_liability
        .checked_add(amount as u128)
        .ok_or(OnrampError::Overflow)?;
    if (vault_account.lamports() as u128) < backed {
        msg!("Error: Vault does not cover the wrap");
        return Err(OnrampError::AdapterFailure.into());
    }

    let credited = record_wrap(pool, amount)?;
    ledger.credit(credited)?;

    let mut logger = Logger::<32>::default();
    logger.append("wrapped lamports: ");
    logger.append(amount);
    logger.log();
    Ok(())
}

/// Pay out lamports from the vault for wrapped balance being burned.
pub fn process_unwrap(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
    let [pool_account, vault_account, ledger_account, holder] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_owner(pool_account, program_id)?;
    validate_owner(vault_account, program_id)?;
    validate_owner(ledger_account, program_id)?;
    validate_signer(holder)?;
    validate_writable(holder)?;
    validate_distinct(&[pool_account, vault_account, ledger_account, holder])?;

    let pool = unsafe { borrow_account_data_mut::<Pool>(pool_account)? };
    if pool.initialized == 0 || &pool.vault != vault_account.key() {
        msg!("Error: Vault account does not match the pool");
        return Err(OnrampError::InvalidAccount.into());
    }

    let ledger = unsafe { borrow_account_data_mut::<TokenBalance>(ledger_account)? };
    if ledger.asset != ASSET_WRAPPED_NATIVE || &ledger.holder != holder.key() {
        msg!("Error: Ledger does not match the holder");
        return Err(OnrampError::LedgerMismatch.into());
    }

    let released = record_unwrap(pool, amount)?;
    ledger.debit(released)?;

    unsafe {
        *vault_account.borrow_mut_lamports_unchecked() -= amount;
        *holder.borrow_mut_lamports_unchecked() += amount;
    }

    let mut logger = Logger::<32>::default();
    logger.append("unwrapped lamports: ");
    logger.append(amount);
    logger.log();
    Ok(())
}

/// Convert the holder's entire wrapped-native balance into pool shares.
/// Covered by the allowance granted to the pool; no holder signature.
pub fn process_convert(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let [pool_account, from_ledger, to_ledger] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_owner(pool_account, program_id)?;
    validate_owner(from_ledger, program_id)?;
    validate_owner(to_ledger, program_id)?;
    validate_distinct(&[pool_account, from_ledger, to_ledger])?;

    let pool = unsafe { borrow_account_data_mut::<Pool>(pool_account)? };
    let from = unsafe { borrow_account_data_mut::<TokenBalance>(from_ledger)? };
    let to = unsafe { borrow_account_data_mut::<TokenBalance>(to_ledger)? };

    if pool.initialized == 0
        || from.asset != ASSET_WRAPPED_NATIVE
        || to.asset != ASSET_POOL_SHARE
        || from.holder != to.holder
    {
        msg!("Error: Ledger pair does not form a conversion");
        return Err(OnrampError::LedgerMismatch.into());
    }

    let amount = from.balance;
    from.spend_allowance(pool_account.key(), amount)?;
    let shares = issue_shares(pool, amount)?;
    from.debit(amount)?;
    to.credit(shares)?;

    msg!("converted to pool shares");
    Ok(())
}

/// Redeem shares for the proportional cut of both reserves.
/// Covered by the allowance granted to the pool; no holder signature.
pub fn process_redeem(program_id: &Pubkey, accounts: &[AccountInfo], amount: u128) -> ProgramResult {
    let [pool_account, share_ledger, wrapped_ledger, reserve_ledger] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_owner(pool_account, program_id)?;
    validate_owner(share_ledger, program_id)?;
    validate_owner(wrapped_ledger, program_id)?;
    validate_owner(reserve_ledger, program_id)?;
    validate_distinct(&[pool_account, share_ledger, wrapped_ledger, reserve_ledger])?;

    let pool = unsafe { borrow_account_data_mut::<Pool>(pool_account)? };
    let shares = unsafe { borrow_account_data_mut::<TokenBalance>(share_ledger)? };
    let wrapped = unsafe { borrow_account_data_mut::<TokenBalance>(wrapped_ledger)? };
    let reserve = unsafe { borrow_account_data_mut::<TokenBalance>(reserve_ledger)? };

    if pool.initialized == 0
        || shares.asset != ASSET_POOL_SHARE
        || wrapped.asset != ASSET_WRAPPED_NATIVE
        || reserve.asset != ASSET_RESERVE
        || shares.holder != wrapped.holder
        || shares.holder != reserve.holder
    {
        msg!("Error: Ledger set does not form a redemption");
        return Err(OnrampError::LedgerMismatch.into());
    }

    shares.spend_allowance(pool_account.key(), amount)?;
    shares.debit(amount)?;
    let (wrapped_out, reserve_out) = redeem_shares(pool, amount)?;
    wrapped.credit(wrapped_out)?;
    reserve.credit(reserve_out)?;

    msg!("redeemed pool shares");
    Ok(())
}

/// Move balance between two ledgers of the same asset; the sending holder
/// must sign.
pub fn process_transfer(program_id: &Pubkey, accounts: &[AccountInfo], amount: u128) -> ProgramResult {
    let [from_ledger, to_ledger, holder] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_owner(from_ledger, program_id)?;
    validate_owner(to_ledger, program_id)?;
    validate_signer(holder)?;

    if from_ledger.key() == to_ledger.key() {
        msg!("Error: Transfer to the same ledger");
        return Err(OnrampError::LedgerMismatch.into());
    }

    let from = unsafe { borrow_account_data_mut::<TokenBalance>(from_ledger)? };
    let to = unsafe { borrow_account_data_mut::<TokenBalance>(to_ledger)? };

    if from.asset != to.asset || &from.holder != holder.key() {
        msg!("Error: Ledger pair does not form a transfer");
        return Err(OnrampError::LedgerMismatch.into());
    }

    from.debit(amount)?;
    to.credit(amount)?;

    msg!("transferred");
    Ok(())
}

/// Grant `spender` an allowance on the holder's ledger; the holder must
/// sign.
pub fn process_approve(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    spender: &Pubkey,
    amount: u128,
) -> ProgramResult {
    let [ledger_account, holder] = accounts else {
        return Err(OnrampError::InvalidAccount.into());
    };

    validate_owner(ledger_account, program_id)?;
    validate_signer(holder)?;

    let ledger = unsafe { borrow_account_data_mut::<TokenBalance>(ledger_account)? };
    if &ledger.holder != holder.key() {
        msg!("Error: Only the holder can approve");
        return Err(OnrampError::LedgerMismatch.into());
    }

    ledger.approve(*spender, amount);

    msg!("approved");
    Ok(())
}
