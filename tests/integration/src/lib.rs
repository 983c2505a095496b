//! Shared helpers for the onramp integration tests
//!
//! The suites here drive the custody model and the program state types
//! directly on the host. Full on-chain runs require the programs compiled
//! to .so files and deployed to a test validator; the scenario coverage
//! lives at the logic level so it runs everywhere.

use model_custody as model;
use solana_sdk::pubkey::Pubkey;

/// Secondary reserve the pool is seeded with in every scenario.
pub const POOL_RESERVE: u128 = 1_000_000_000;

/// The cast of a scenario.
pub struct Actors {
    pub factory: model::Principal,
    pub pool: model::Principal,
    pub relay: model::Principal,
    pub alice: model::Principal,
    pub mallory: model::Principal,
}

pub fn actors() -> Actors {
    Actors {
        factory: fresh_principal(),
        pool: fresh_principal(),
        relay: fresh_principal(),
        alice: fresh_principal(),
        mallory: fresh_principal(),
    }
}

pub fn fresh_principal() -> model::Principal {
    Pubkey::new_unique().to_bytes()
}

/// A deployed factory with an empty registry and a seeded pool.
pub fn deployed(actors: &Actors) -> model::State {
    model::State::new(actors.factory, actors.pool, actors.relay, POOL_RESERVE)
}

/// A deployed factory with a proxy for alice holding `deposit` native units.
pub fn with_funded_proxy(
    actors: &Actors,
    deposit: u128,
) -> (model::State, model::ProxyHandle, model::Principal) {
    let state = model::create_proxy(deployed(actors), actors.alice, None).expect("create proxy");
    let handle = state.get_proxy(&actors.alice).expect("registered");
    let address = state.proxies[handle].address;
    let state = model::fund_native(state, &address, deposit).expect("fund");
    (state, handle, address)
}
