//! Custody transitions - total functions over `State`
//!
//! Every transition takes the state by value and returns either the next
//! state or an error; a failed transition never lets a partially mutated
//! state escape, so partial effects are not observable.

use crate::adapter;
use crate::error::CustodyError;
use crate::guard::{authorize, resolve_caller};
use crate::state::{clone_address, Asset, Principal, Proxy, ProxyHandle, State};

/// Out-of-band arrival of native value at `holder` (deposits reach a proxy
/// this way; no authorization applies).
pub fn fund_native(mut s: State, holder: &Principal, amount: u128) -> Result<State, CustodyError> {
    s.ledgers.credit(Asset::Native, holder, amount)?;
    Ok(s)
}

/// Initialize the proxy at `handle` exactly once: set owner and factory and
/// grant the converter unlimited spending authority over every asset the
/// proxy will ever hold, so later conversions need no per-call approval.
pub fn initialize_proxy(
    mut s: State,
    handle: ProxyHandle,
    user: Principal,
    factory: Principal,
) -> Result<State, CustodyError> {
    let proxy = s
        .proxies
        .get(handle)
        .ok_or(CustodyError::NoProxyForCaller)?;
    if proxy.initialized {
        return Err(CustodyError::AlreadyInitialized);
    }
    let address = proxy.address;

    let converter = s.converter;
    for asset in [Asset::WrappedNative, Asset::Reserve, Asset::PoolShare] {
        s.ledgers
            .approve(asset, &address, &converter, u128::MAX)?;
    }

    let proxy = &mut s.proxies[handle];
    proxy.user = user;
    proxy.factory = factory;
    proxy.initialized = true;
    Ok(s)
}

/// Create and initialize a proxy for the resolved caller.
///
/// Open to any caller; the caller becomes the owner. A caller that already
/// has a proxy is rejected so an existing position is never orphaned.
pub fn create_proxy(
    mut s: State,
    signer: Principal,
    envelope: Option<Principal>,
) -> Result<State, CustodyError> {
    let user = resolve_caller(&signer, envelope, &s.trusted_relay)?;
    if s.get_proxy(&user).is_some() {
        return Err(CustodyError::AlreadyHasProxy);
    }
    if s.proxies.is_full() || s.registry.is_full() {
        return Err(CustodyError::RegistryFull);
    }

    let handle = s.proxies.len();
    let address = clone_address(&user);
    // push cannot fail: capacity checked above
    let _ = s.proxies.try_push(Proxy::fresh(address));
    // Registry entry is finalized before the initialization call touches
    // the new proxy.
    let _ = s.registry.try_push((user, handle));

    let factory = s.factory;
    initialize_proxy(s, handle, user, factory)
}

/// Convert the proxy's entire native balance into pool shares; the shares
/// stay in the proxy's custody.
pub fn enter_pool(
    mut s: State,
    handle: ProxyHandle,
    signer: Principal,
    envelope: Option<Principal>,
) -> Result<State, CustodyError> {
    let resolved = resolve_caller(&signer, envelope, &s.trusted_relay)?;
    let proxy = s
        .proxies
        .get(handle)
        .ok_or(CustodyError::NoProxyForCaller)?;
    authorize(&resolved, &proxy.user)?;
    let address = proxy.address;
    let converter = s.converter;

    let amount = s.ledgers.balance_of(Asset::Native, &address);
    adapter::wrap(&mut s.ledgers, &mut s.pool, &address, amount)?;
    adapter::convert_all(&mut s.ledgers, &mut s.pool, &converter, &address)?;
    Ok(s)
}

/// Redeem exactly `amount` pool shares; the proceeds stay in the proxy's
/// custody until withdrawn separately.
pub fn exit_pool(
    mut s: State,
    handle: ProxyHandle,
    signer: Principal,
    envelope: Option<Principal>,
    amount: u128,
) -> Result<State, CustodyError> {
    let resolved = resolve_caller(&signer, envelope, &s.trusted_relay)?;
    let proxy = s
        .proxies
        .get(handle)
        .ok_or(CustodyError::NoProxyForCaller)?;
    authorize(&resolved, &proxy.user)?;
    let address = proxy.address;
    let converter = s.converter;

    if amount > s.ledgers.balance_of(Asset::PoolShare, &address) {
        return Err(CustodyError::InsufficientBalance);
    }
    adapter::redeem(&mut s.ledgers, &mut s.pool, &converter, &address, amount)?;
    Ok(s)
}

/// Transfer the proxy's entire balance of `asset` to the owner. A zero
/// balance is a successful no-op.
pub fn withdraw_tokens(
    mut s: State,
    handle: ProxyHandle,
    signer: Principal,
    envelope: Option<Principal>,
    asset: Asset,
) -> Result<State, CustodyError> {
    let resolved = resolve_caller(&signer, envelope, &s.trusted_relay)?;
    let proxy = s
        .proxies
        .get(handle)
        .ok_or(CustodyError::NoProxyForCaller)?;
    authorize(&resolved, &proxy.user)?;
    let address = proxy.address;
    let user = proxy.user;

    let amount = s.ledgers.balance_of(asset, &address);
    if amount == 0 {
        return Ok(s);
    }
    s.ledgers.transfer(asset, &address, &user, amount)?;
    Ok(s)
}

/// Transfer the proxy's entire native balance to the owner.
pub fn withdraw_native(
    s: State,
    handle: ProxyHandle,
    signer: Principal,
    envelope: Option<Principal>,
) -> Result<State, CustodyError> {
    withdraw_tokens(s, handle, signer, envelope, Asset::Native)
}

/// Factory pass-through: resolve the caller's own proxy, then enter.
pub fn factory_enter_pool(
    s: State,
    signer: Principal,
    envelope: Option<Principal>,
) -> Result<State, CustodyError> {
    let resolved = resolve_caller(&signer, envelope, &s.trusted_relay)?;
    let handle = s
        .get_proxy(&resolved)
        .ok_or(CustodyError::NoProxyForCaller)?;
    enter_pool(s, handle, signer, envelope)
}

/// Factory pass-through: resolve the caller's own proxy, then exit.
pub fn factory_exit_pool(
    s: State,
    signer: Principal,
    envelope: Option<Principal>,
    amount: u128,
) -> Result<State, CustodyError> {
    let resolved = resolve_caller(&signer, envelope, &s.trusted_relay)?;
    let handle = s
        .get_proxy(&resolved)
        .ok_or(CustodyError::NoProxyForCaller)?;
    exit_pool(s, handle, signer, envelope, amount)
}
