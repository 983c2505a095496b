//! Authorization and relay scenarios
//!
//! Only the designated user, directly or through the trusted relay, may
//! operate a proxy; everything else fails closed with the pinned reasons.

use model_custody::{self as model, Asset, CustodyError};
use onramp_common::{
    read_envelope, resolve_caller, InstructionReader, OnrampError, ENVELOPE_RELAYED,
};
use onramp_integration_tests::{actors, deployed, with_funded_proxy};
use solana_program_test::tokio;

const DEPOSIT: u128 = 5_000_000_000;

#[tokio::test]
async fn test_every_user_operation_rejects_non_owners() {
    let actors = actors();
    let (state, handle, address) = with_funded_proxy(&actors, DEPOSIT);

    let attempts = [
        model::enter_pool(state.clone(), handle, actors.mallory, None),
        model::exit_pool(state.clone(), handle, actors.mallory, None, 1),
        model::withdraw_tokens(state.clone(), handle, actors.mallory, None, Asset::Reserve),
        model::withdraw_native(state.clone(), handle, actors.mallory, None),
    ];
    for attempt in attempts {
        let err = attempt.unwrap_err();
        assert_eq!(err, CustodyError::Unauthorized);
        assert_eq!(err.message(), "ProvideLiquidity: Caller is not authorized");
    }

    // Nothing moved.
    assert_eq!(state.ledgers.balance_of(Asset::Native, &address), DEPOSIT);
    assert_eq!(state.ledgers.balance_of(Asset::Native, &actors.mallory), 0);
}

#[tokio::test]
async fn test_initialization_happens_exactly_once() {
    let actors = actors();
    let state = model::create_proxy(deployed(&actors), actors.alice, None).unwrap();
    let handle = state.get_proxy(&actors.alice).unwrap();

    let err =
        model::initialize_proxy(state.clone(), handle, actors.mallory, actors.factory).unwrap_err();
    assert_eq!(err, CustodyError::AlreadyInitialized);
    assert_eq!(
        err.message(),
        "Contract instance has already been initialized"
    );
    assert_eq!(state.proxies[handle].user, actors.alice);
}

#[tokio::test]
async fn test_trusted_relay_acts_as_the_original_sender() {
    let actors = actors();

    // Creation through the relay: alice, not the relay, becomes the owner.
    let state = model::create_proxy(deployed(&actors), actors.relay, Some(actors.alice)).unwrap();
    let handle = state.get_proxy(&actors.alice).unwrap();
    assert_eq!(state.proxies[handle].user, actors.alice);
    assert!(state.get_proxy(&actors.relay).is_none());

    // Relayed operations behave exactly like direct ones.
    let address = state.proxies[handle].address;
    let state = model::fund_native(state, &address, DEPOSIT).unwrap();
    let state = model::factory_enter_pool(state, actors.relay, Some(actors.alice)).unwrap();
    assert!(state.ledgers.balance_of(Asset::PoolShare, &address) > 0);
}

#[tokio::test]
async fn test_relay_envelope_from_anyone_else_is_rejected() {
    let actors = actors();
    let (state, handle, address) = with_funded_proxy(&actors, DEPOSIT);

    let err =
        model::enter_pool(state.clone(), handle, actors.mallory, Some(actors.alice)).unwrap_err();
    assert_eq!(err, CustodyError::UntrustedRelay);
    // The envelope does not even help the victim herself.
    let err =
        model::enter_pool(state.clone(), handle, actors.alice, Some(actors.alice)).unwrap_err();
    assert_eq!(err, CustodyError::UntrustedRelay);
    assert_eq!(state.ledgers.balance_of(Asset::Native, &address), DEPOSIT);
}

#[tokio::test]
async fn test_passthrough_without_a_proxy_is_rejected() {
    let actors = actors();
    let state = deployed(&actors);

    assert_eq!(
        model::factory_enter_pool(state.clone(), actors.mallory, None).unwrap_err(),
        CustodyError::NoProxyForCaller
    );
    assert_eq!(
        model::factory_exit_pool(state, actors.mallory, None, 1).unwrap_err(),
        CustodyError::NoProxyForCaller
    );
}

#[tokio::test]
async fn test_program_guard_matches_model_guard() {
    let actors = actors();

    // Program-side resolution over the wire format.
    let mut data = [0u8; 33];
    data[0] = ENVELOPE_RELAYED;
    data[1..].copy_from_slice(&actors.alice);
    let mut reader = InstructionReader::new(&data);
    let envelope = read_envelope(&mut reader).unwrap();

    let resolved = resolve_caller(&actors.relay, envelope, &actors.relay).unwrap();
    assert_eq!(resolved, actors.alice);

    let program_err = resolve_caller(&actors.mallory, envelope, &actors.relay).unwrap_err();
    let model_err =
        model::resolve_caller(&actors.mallory, envelope, &actors.relay).unwrap_err();
    assert_eq!(program_err, OnrampError::UntrustedRelay);
    assert_eq!(model_err, CustodyError::UntrustedRelay);

    // The pinned failure strings agree across the layers.
    assert_eq!(
        OnrampError::Unauthorized.message(),
        CustodyError::Unauthorized.message()
    );
    assert_eq!(
        OnrampError::AlreadyInitialized.message(),
        CustodyError::AlreadyInitialized.message()
    );
}
