//! Property tests over the custody transitions

use proptest::prelude::*;

use crate::*;

const FACTORY: Principal = [0xf1; 32];
const CONVERTER: Principal = [0xc0; 32];
const RELAY: Principal = [0x77; 32];
const ALICE: Principal = [1u8; 32];

const POOL_RESERVE: u128 = 1_000_000_000;

fn principal(tag: u8) -> Principal {
    [tag; 32]
}

fn with_funded_proxy(deposit: u128) -> (State, ProxyHandle, Principal) {
    let s = State::new(FACTORY, CONVERTER, RELAY, POOL_RESERVE);
    let s = create_proxy(s, ALICE, None).expect("create");
    let handle = s.get_proxy(&ALICE).expect("registered");
    let address = s.proxies[handle].address;
    let s = fund_native(s, &address, deposit).expect("fund");
    (s, handle, address)
}

/// Value is never minted or destroyed outside the pool's own accounting.
fn conservation_holds(s: &State, native_total: u128, reserve_total: u128) -> bool {
    let native = s.ledgers.total_of(Asset::Native) + s.pool.native_liability;
    let wrapped = s.ledgers.total_of(Asset::WrappedNative) + s.pool.wrapped_reserve;
    let shares = s.ledgers.total_of(Asset::PoolShare);
    let reserve = s.ledgers.total_of(Asset::Reserve) + s.pool.secondary_reserve;

    native == native_total
        && wrapped == s.pool.native_liability
        && shares == s.pool.share_supply
        && reserve == reserve_total
}

proptest! {
    /// spec property: callers other than the owner can never move value.
    #[test]
    fn prop_unauthorized_callers_never_mutate(
        deposit in 1u128..1_000_000_000u128,
        tag in 0u8..=255u8,
    ) {
        prop_assume!(principal(tag) != ALICE && principal(tag) != RELAY);
        let (s, handle, address) = with_funded_proxy(deposit);
        let attacker = principal(tag);

        let attempts = [
            enter_pool(s.clone(), handle, attacker, None),
            exit_pool(s.clone(), handle, attacker, None, 1),
            withdraw_tokens(s.clone(), handle, attacker, None, Asset::Reserve),
            withdraw_native(s.clone(), handle, attacker, None),
        ];
        for attempt in attempts {
            prop_assert_eq!(attempt.unwrap_err(), CustodyError::Unauthorized);
        }
        prop_assert_eq!(s.ledgers.balance_of(Asset::Native, &address), deposit);
    }

    /// A full enter/exit/withdraw cycle conserves every asset class.
    #[test]
    fn prop_enter_exit_conserves_value(
        deposit in 1u128..1_000_000_000u128,
        exit_bps in 1u32..=10_000u32,
    ) {
        let (s, handle, address) = with_funded_proxy(deposit);
        prop_assert!(conservation_holds(&s, deposit, POOL_RESERVE));

        let s = enter_pool(s, handle, ALICE, None).unwrap();
        prop_assert!(conservation_holds(&s, deposit, POOL_RESERVE));

        let shares = s.ledgers.balance_of(Asset::PoolShare, &address);
        prop_assert!(shares > 0);

        let portion = math::min_u128(
            math::mul_div_u128(shares, exit_bps as u128, 10_000).unwrap().max(1),
            shares,
        );
        let s = exit_pool(s, handle, ALICE, None, portion).unwrap();
        prop_assert!(conservation_holds(&s, deposit, POOL_RESERVE));

        let s = withdraw_tokens(s, handle, ALICE, None, Asset::WrappedNative).unwrap();
        let s = withdraw_tokens(s, handle, ALICE, None, Asset::Reserve).unwrap();
        let s = withdraw_native(s, handle, ALICE, None).unwrap();
        prop_assert!(conservation_holds(&s, deposit, POOL_RESERVE));

        // Custody moved to the user, nowhere else.
        prop_assert_eq!(s.ledgers.balance_of(Asset::WrappedNative, &address), 0);
        prop_assert_eq!(s.ledgers.balance_of(Asset::Reserve, &address), 0);
    }

    /// Redeeming more than the held share balance always fails cleanly.
    #[test]
    fn prop_exit_never_over_redeems(
        deposit in 1u128..1_000_000_000u128,
        excess in 1u128..1_000_000u128,
    ) {
        let (s, handle, address) = with_funded_proxy(deposit);
        let s = enter_pool(s, handle, ALICE, None).unwrap();
        let shares = s.ledgers.balance_of(Asset::PoolShare, &address);

        let err = exit_pool(s.clone(), handle, ALICE, None, shares + excess).unwrap_err();
        prop_assert_eq!(err, CustodyError::InsufficientBalance);
        prop_assert_eq!(s.ledgers.balance_of(Asset::PoolShare, &address), shares);
    }

    /// Relayed and direct calls from the same principal are interchangeable.
    #[test]
    fn prop_relay_is_transparent(deposit in 1u128..1_000_000_000u128) {
        let (direct, handle, address) = with_funded_proxy(deposit);
        let relayed = direct.clone();

        let direct = enter_pool(direct, handle, ALICE, None).unwrap();
        let relayed = enter_pool(relayed, handle, RELAY, Some(ALICE)).unwrap();
        prop_assert_eq!(
            direct.ledgers.balance_of(Asset::PoolShare, &address),
            relayed.ledgers.balance_of(Asset::PoolShare, &address)
        );
    }
}
