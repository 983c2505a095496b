//! End-to-end custody scenarios
//!
//! Drives the full deposit -> enter -> exit -> withdraw flow through the
//! custody model, and checks that the program-side state types and the
//! reference converter agree with it.

use model_custody::{self as model, Asset, CustodyError};
use onramp_common::{OnrampError, MAX_PROXIES};
use onramp_converter::{issue_shares, redeem_shares};
use onramp_integration_tests::{actors, deployed, with_funded_proxy, POOL_RESERVE};
use onramp_proxy::state::{Proxy, ProxyEntry, Registry};
use solana_program_test::tokio;

const DEPOSIT: u128 = 5_000_000_000; // 5 native units

#[tokio::test]
async fn test_end_to_end_enter_exit_withdraw() {
    let actors = actors();
    let (state, handle, address) = with_funded_proxy(&actors, DEPOSIT);

    println!("Deposit arrived out of band ------------------------");
    println!("  proxy native: {}", state.ledgers.balance_of(Asset::Native, &address));

    // Enter the pool through the factory pass-through.
    let state = model::factory_enter_pool(state, actors.alice, None).unwrap();
    let shares = state.ledgers.balance_of(Asset::PoolShare, &address);

    println!("After entering pool --------------------------------");
    println!("  proxy shares: {}", shares);
    println!("  proxy native: {}", state.ledgers.balance_of(Asset::Native, &address));

    assert!(shares > 0);
    assert_eq!(state.ledgers.balance_of(Asset::Native, &address), 0);
    assert_eq!(state.ledgers.balance_of(Asset::WrappedNative, &address), 0);
    // The position stays in the proxy; alice's own balances are untouched.
    assert_eq!(state.ledgers.balance_of(Asset::PoolShare, &actors.alice), 0);

    // Exit the full position.
    let state = model::factory_exit_pool(state, actors.alice, None, shares).unwrap();
    let wrapped = state.ledgers.balance_of(Asset::WrappedNative, &address);
    let reserve = state.ledgers.balance_of(Asset::Reserve, &address);

    println!("After exiting pool ---------------------------------");
    println!("  proxy wrapped: {}", wrapped);
    println!("  proxy reserve: {}", reserve);

    assert_eq!(state.ledgers.balance_of(Asset::PoolShare, &address), 0);
    assert!(wrapped > 0);
    assert!(reserve > 0);
    assert_eq!(state.ledgers.balance_of(Asset::WrappedNative, &actors.alice), 0);
    assert_eq!(state.ledgers.balance_of(Asset::Reserve, &actors.alice), 0);

    // Recovery is a separate step.
    let state = model::withdraw_tokens(state, handle, actors.alice, None, Asset::WrappedNative).unwrap();
    let state = model::withdraw_tokens(state, handle, actors.alice, None, Asset::Reserve).unwrap();
    assert_eq!(state.ledgers.balance_of(Asset::WrappedNative, &actors.alice), wrapped);
    assert_eq!(state.ledgers.balance_of(Asset::Reserve, &actors.alice), reserve);
    assert_eq!(state.ledgers.balance_of(Asset::WrappedNative, &address), 0);
    assert_eq!(state.ledgers.balance_of(Asset::Reserve, &address), 0);
}

#[tokio::test]
async fn test_enter_with_empty_proxy_propagates_adapter_failure() {
    let actors = actors();
    let state = model::create_proxy(deployed(&actors), actors.alice, None).unwrap();

    let err = model::factory_enter_pool(state, actors.alice, None).unwrap_err();
    assert_eq!(err, CustodyError::AdapterFailure);
}

#[tokio::test]
async fn test_partial_exit_keeps_remaining_position() {
    let actors = actors();
    let (state, _, address) = with_funded_proxy(&actors, DEPOSIT);
    let state = model::factory_enter_pool(state, actors.alice, None).unwrap();
    let shares = state.ledgers.balance_of(Asset::PoolShare, &address);

    let state = model::factory_exit_pool(state, actors.alice, None, shares / 2).unwrap();
    assert_eq!(
        state.ledgers.balance_of(Asset::PoolShare, &address),
        shares - shares / 2
    );
    assert!(state.ledgers.balance_of(Asset::WrappedNative, &address) > 0);

    // Over-redeeming the rest fails without touching anything.
    let remaining = state.ledgers.balance_of(Asset::PoolShare, &address);
    let err = model::factory_exit_pool(state.clone(), actors.alice, None, remaining + 1).unwrap_err();
    assert_eq!(err, CustodyError::InsufficientBalance);
    assert_eq!(state.ledgers.balance_of(Asset::PoolShare, &address), remaining);
}

#[tokio::test]
async fn test_factory_lifecycle_and_clone_checks() {
    let actors = actors();
    let state = model::create_proxy(deployed(&actors), actors.alice, None).unwrap();
    let handle = state.get_proxy(&actors.alice).unwrap();
    let address = state.proxies[handle].address;

    // One proxy per user.
    let err = model::create_proxy(state.clone(), actors.alice, None).unwrap_err();
    assert_eq!(err, CustodyError::AlreadyHasProxy);
    assert_eq!(state.get_proxy(&actors.alice), Some(handle));

    // Clone verification rejects spoofed addresses.
    assert!(state.is_clone(&address));
    assert!(!state.is_clone(&actors.mallory));
    assert!(!state.is_clone(&actors.alice));

    // Other users still get their own proxies.
    let state = model::create_proxy(state, actors.mallory, None).unwrap();
    assert_ne!(state.get_proxy(&actors.mallory), Some(handle));
}

#[tokio::test]
async fn test_registry_capacity_is_enforced() {
    let actors = actors();
    let mut state = deployed(&actors);
    for i in 0..model::MAX_PROXIES {
        let user = [i as u8 + 1; 32];
        state = model::create_proxy(state, user, None).unwrap();
    }
    let err = model::create_proxy(state, [0xEE; 32], None).unwrap_err();
    assert_eq!(err, CustodyError::RegistryFull);
}

#[tokio::test]
async fn test_program_registry_agrees_with_model() {
    let actors = actors();
    let converter_id = fresh_converter_id();
    let mut registry = Registry {
        governance: actors.factory,
        trusted_relay: actors.relay,
        converter_program: converter_id,
        pool: actors.pool,
        proxy_count: 0,
        bump: 255,
        initialized: 1,
        _padding: [0; 4],
        entries: [ProxyEntry {
            user: [0; 32],
            proxy: [0; 32],
        }; MAX_PROXIES],
    };

    let state = model::create_proxy(deployed(&actors), actors.alice, None).unwrap();
    let handle = state.get_proxy(&actors.alice).unwrap();
    let address = state.proxies[handle].address;
    registry.register(actors.alice, address).unwrap();

    // Lookup and provenance agree between the program state and the model.
    assert_eq!(registry.converter_address(), &converter_id);
    assert_eq!(registry.find(&actors.alice).unwrap().proxy, address);
    assert_eq!(registry.is_clone(&address), state.is_clone(&address));
    assert_eq!(registry.is_clone(&actors.alice), state.is_clone(&actors.alice));

    // Both reject the second registration the same way.
    let program_err = registry.register(actors.alice, address).unwrap_err();
    let model_err = model::create_proxy(state, actors.alice, None).unwrap_err();
    assert_eq!(program_err, OnrampError::AlreadyHasProxy);
    assert_eq!(model_err, CustodyError::AlreadyHasProxy);
}

#[tokio::test]
async fn test_proxy_account_initializes_once_with_rent_floor() {
    let actors = actors();
    let mut proxy = Proxy {
        user: [0; 32],
        registry: [0; 32],
        rent_floor: 0,
        initialized: 0,
        bump: 0,
        _padding: [0; 6],
    };
    proxy.initialize(actors.alice, actors.factory, 890_880, 254).unwrap();

    let err = proxy
        .initialize(actors.mallory, actors.factory, 0, 0)
        .unwrap_err();
    assert_eq!(err, OnrampError::AlreadyInitialized);
    assert_eq!(proxy.user(), &actors.alice);
    assert_eq!(proxy.factory(), &actors.factory);

    // The rent reserve is never spendable.
    assert_eq!(proxy.spare_lamports(890_880 + DEPOSIT as u64), DEPOSIT as u64);
    assert_eq!(proxy.spare_lamports(890_880), 0);
}

#[tokio::test]
async fn test_converter_math_agrees_with_model() {
    let actors = actors();
    let (state, _, address) = with_funded_proxy(&actors, DEPOSIT);
    let state = model::factory_enter_pool(state, actors.alice, None).unwrap();
    let model_shares = state.ledgers.balance_of(Asset::PoolShare, &address);

    let mut pool = onramp_common::Pool {
        wrapped_reserve: 0,
        secondary_reserve: 0,
        share_supply: 0,
        native_liability: 0,
        vault: [0; 32],
        initialized: 0,
        bump: 0,
        _padding: [0; 14],
    };
    pool.initialize([5; 32], POOL_RESERVE, 255).unwrap();

    let program_shares = issue_shares(&mut pool, DEPOSIT).unwrap();
    assert_eq!(program_shares, model_shares);

    let (wrapped_out, reserve_out) = redeem_shares(&mut pool, program_shares).unwrap();
    let state = model::factory_exit_pool(state, actors.alice, None, model_shares).unwrap();
    assert_eq!(
        wrapped_out,
        state.ledgers.balance_of(Asset::WrappedNative, &address)
    );
    assert_eq!(
        reserve_out,
        state.ledgers.balance_of(Asset::Reserve, &address)
    );
}

fn fresh_converter_id() -> [u8; 32] {
    onramp_integration_tests::fresh_principal()
}
