//! Bridge between on-chain state and the custody model (test support)
//!
//! Maps the program's account structs into `model_custody` state so tests
//! can replay an on-chain configuration against the model's transitions and
//! check that both sides agree on the observable behavior.

use model_custody as model;
use pinocchio::pubkey::Pubkey;

use super::{Proxy, Registry};

/// Build a model state from a registry plus the proxy accounts it tracks.
///
/// `proxies` pairs each proxy account address with its deserialized state;
/// the pool's secondary reserve is not part of on-chain proxy state and is
/// supplied by the caller.
pub fn to_model_state(
    registry: &Registry,
    registry_key: &Pubkey,
    proxies: &[(Pubkey, Proxy)],
    pool_secondary_reserve: u128,
) -> model::State {
    let mut s = model::State::new(
        *registry_key,
        registry.pool,
        registry.trusted_relay,
        pool_secondary_reserve,
    );
    for (address, proxy) in proxies {
        let handle = s.proxies.len();
        let mut record = model::Proxy::fresh(*address);
        record.initialized = proxy.initialized != 0;
        record.user = proxy.user;
        record.factory = proxy.registry;
        let _ = s.proxies.try_push(record);
        let _ = s.registry.try_push((proxy.user, handle));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_custody::CustodyError;

    const REGISTRY_KEY: Pubkey = [0xAA; 32];
    const ALICE: Pubkey = [1u8; 32];
    const MALLORY: Pubkey = [9u8; 32];

    fn registered_state() -> (Registry, Vec<(Pubkey, Proxy)>) {
        let mut registry = Registry::new([1; 32], [2; 32], [3; 32], [4; 32], 255);
        let address = [0x51u8; 32];
        registry.register(ALICE, address).unwrap();

        let mut proxy = Proxy {
            user: [0; 32],
            registry: [0; 32],
            rent_floor: 0,
            initialized: 0,
            bump: 254,
            _padding: [0; 6],
        };
        proxy.initialize(ALICE, REGISTRY_KEY, 1_000, 254).unwrap();
        (registry, vec![(address, proxy)])
    }

    #[test]
    fn test_lookup_agrees_across_bridge() {
        let (registry, proxies) = registered_state();
        let s = to_model_state(&registry, &REGISTRY_KEY, &proxies, 1_000_000);

        let handle = s.get_proxy(&ALICE).expect("registered in model");
        assert_eq!(s.proxies[handle].user, ALICE);
        assert!(registry.find(&ALICE).is_some());
        assert!(s.get_proxy(&MALLORY).is_none());
        assert!(registry.find(&MALLORY).is_none());
    }

    #[test]
    fn test_clone_check_agrees_across_bridge() {
        let (registry, proxies) = registered_state();
        let s = to_model_state(&registry, &REGISTRY_KEY, &proxies, 1_000_000);
        let address = proxies[0].0;

        assert_eq!(registry.is_clone(&address), s.is_clone(&address));
        assert_eq!(registry.is_clone(&ALICE), s.is_clone(&ALICE));
        assert_eq!(registry.is_clone(&[0x42; 32]), s.is_clone(&[0x42; 32]));
    }

    #[test]
    fn test_authorization_semantics_carry_over() {
        let (registry, proxies) = registered_state();
        let s = to_model_state(&registry, &REGISTRY_KEY, &proxies, 1_000_000);
        let handle = s.get_proxy(&ALICE).unwrap();

        // The bridged state enforces the same owner-only rule the program
        // enforces on-chain.
        let err = model::withdraw_native(s.clone(), handle, MALLORY, None).unwrap_err();
        assert_eq!(err, CustodyError::Unauthorized);

        // A bridged initialized proxy rejects re-initialization.
        let err =
            model::initialize_proxy(s, handle, MALLORY, REGISTRY_KEY).unwrap_err();
        assert_eq!(err, CustodyError::AlreadyInitialized);
    }
}
