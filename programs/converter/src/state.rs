//! Pool accounting - issue and redeem against the reserves

use onramp_common::{OnrampError, Pool};

fn mul_div(a: u128, b: u128, den: u128) -> Result<u128, OnrampError> {
    if den == 0 {
        return Err(OnrampError::AdapterFailure);
    }
    let product = a.checked_mul(b).ok_or(OnrampError::Overflow)?;
    Ok(product / den)
}

/// Record a native deposit backing newly issued wrapped balance.
pub fn record_wrap(pool: &mut Pool, amount: u64) -> Result<u128, OnrampError> {
    if amount == 0 {
        return Err(OnrampError::AdapterFailure);
    }
    let amount = amount as u128;
    pool.native_liability = pool
        .native_liability
        .checked_add(amount)
        .ok_or(OnrampError::Overflow)?;
    Ok(amount)
}

/// Release native liability for wrapped balance being unwrapped.
pub fn record_unwrap(pool: &mut Pool, amount: u64) -> Result<u128, OnrampError> {
    if amount == 0 {
        return Err(OnrampError::AdapterFailure);
    }
    let amount = amount as u128;
    if pool.native_liability < amount {
        return Err(OnrampError::AdapterFailure);
    }
    pool.native_liability -= amount;
    Ok(amount)
}

/// Issue shares for `amount` of wrapped-native moved into the pool.
///
/// First issuance is 1:1; afterwards shares grow in proportion to the
/// wrapped reserve. Dust conversions that would issue nothing are rejected.
pub fn issue_shares(pool: &mut Pool, amount: u128) -> Result<u128, OnrampError> {
    if amount == 0 {
        return Err(OnrampError::AdapterFailure);
    }
    let shares = if pool.share_supply == 0 {
        amount
    } else {
        mul_div(amount, pool.share_supply, pool.wrapped_reserve)?
    };
    if shares == 0 {
        return Err(OnrampError::AdapterFailure);
    }
    pool.wrapped_reserve = pool
        .wrapped_reserve
        .checked_add(amount)
        .ok_or(OnrampError::Overflow)?;
    pool.share_supply = pool
        .share_supply
        .checked_add(shares)
        .ok_or(OnrampError::Overflow)?;
    Ok(shares)
}

/// Redeem `amount` shares for their proportional cut of both reserves.
pub fn redeem_shares(pool: &mut Pool, amount: u128) -> Result<(u128, u128), OnrampError> {
    if amount == 0 || pool.share_supply == 0 || amount > pool.share_supply {
        return Err(OnrampError::AdapterFailure);
    }
    let wrapped_out = mul_div(pool.wrapped_reserve, amount, pool.share_supply)?;
    let reserve_out = mul_div(pool.secondary_reserve, amount, pool.share_supply)?;

    pool.wrapped_reserve -= wrapped_out;
    pool.secondary_reserve -= reserve_out;
    pool.share_supply -= amount;
    Ok((wrapped_out, reserve_out))
}
