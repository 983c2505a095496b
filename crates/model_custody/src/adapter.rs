//! Asset adapter: wrap/unwrap and pool conversion against the converter
//!
//! These model the external converter boundary. Proportional issue/redeem
//! math stands in for the protocol's own pricing; nothing in the custody
//! transitions depends on its details beyond "full conversion" and
//! "proportional redemption".

use crate::error::CustodyError;
use crate::ledger::Ledgers;
use crate::math::mul_div_u128;
use crate::state::{Asset, Pool, Principal};

/// Wrap `amount` of the holder's native balance into wrapped-native.
pub fn wrap(
    ledgers: &mut Ledgers,
    pool: &mut Pool,
    holder: &Principal,
    amount: u128,
) -> Result<(), CustodyError> {
    if amount == 0 {
        return Err(CustodyError::AdapterFailure);
    }
    ledgers.debit(Asset::Native, holder, amount)?;
    ledgers.credit(Asset::WrappedNative, holder, amount)?;
    pool.native_liability = pool
        .native_liability
        .checked_add(amount)
        .ok_or(CustodyError::Overflow)?;
    Ok(())
}

/// Unwrap `amount` of wrapped-native back to the native asset.
pub fn unwrap(
    ledgers: &mut Ledgers,
    pool: &mut Pool,
    holder: &Principal,
    amount: u128,
) -> Result<(), CustodyError> {
    if amount == 0 {
        return Err(CustodyError::AdapterFailure);
    }
    ledgers.debit(Asset::WrappedNative, holder, amount)?;
    if pool.native_liability < amount {
        return Err(CustodyError::AdapterFailure);
    }
    pool.native_liability -= amount;
    ledgers.credit(Asset::Native, holder, amount)?;
    Ok(())
}

/// Convert the holder's entire wrapped-native balance into pool shares.
///
/// Returns the shares issued. Requires the converter's allowance granted at
/// proxy initialization; no per-call approval.
pub fn convert_all(
    ledgers: &mut Ledgers,
    pool: &mut Pool,
    converter: &Principal,
    holder: &Principal,
) -> Result<u128, CustodyError> {
    let amount = ledgers.balance_of(Asset::WrappedNative, holder);
    if amount == 0 {
        return Err(CustodyError::AdapterFailure);
    }
    ledgers.spend_allowance(Asset::WrappedNative, holder, converter, amount)?;

    let shares = if pool.share_supply == 0 {
        amount
    } else {
        mul_div_u128(amount, pool.share_supply, pool.wrapped_reserve)
            .ok_or(CustodyError::Overflow)?
    };
    if shares == 0 {
        // Pool rejects a dust trade
        return Err(CustodyError::AdapterFailure);
    }

    ledgers.debit(Asset::WrappedNative, holder, amount)?;
    pool.wrapped_reserve = pool
        .wrapped_reserve
        .checked_add(amount)
        .ok_or(CustodyError::Overflow)?;
    pool.share_supply = pool
        .share_supply
        .checked_add(shares)
        .ok_or(CustodyError::Overflow)?;
    ledgers.credit(Asset::PoolShare, holder, shares)?;
    Ok(shares)
}

/// Redeem exactly `amount` pool shares for the proportional reserves.
///
/// Returns (wrapped-native out, reserve out); both stay on the holder's
/// ledgers.
pub fn redeem(
    ledgers: &mut Ledgers,
    pool: &mut Pool,
    converter: &Principal,
    holder: &Principal,
    amount: u128,
) -> Result<(u128, u128), CustodyError> {
    if amount == 0 || pool.share_supply == 0 {
        return Err(CustodyError::AdapterFailure);
    }
    ledgers.spend_allowance(Asset::PoolShare, holder, converter, amount)?;
    ledgers.debit(Asset::PoolShare, holder, amount)?;

    let wrapped_out = mul_div_u128(pool.wrapped_reserve, amount, pool.share_supply)
        .ok_or(CustodyError::Overflow)?;
    let reserve_out = mul_div_u128(pool.secondary_reserve, amount, pool.share_supply)
        .ok_or(CustodyError::Overflow)?;

    pool.wrapped_reserve -= wrapped_out;
    pool.secondary_reserve -= reserve_out;
    pool.share_supply -= amount;

    ledgers.credit(Asset::WrappedNative, holder, wrapped_out)?;
    ledgers.credit(Asset::Reserve, holder, reserve_out)?;
    Ok((wrapped_out, reserve_out))
}
