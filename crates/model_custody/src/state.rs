//! Pure state model: principals, proxies, registry, ledgers, pool

use arrayvec::ArrayVec;

use crate::ledger::Ledgers;

/// Principals are 32-byte addresses, mirroring on-chain keys without the
/// dependency.
pub type Principal = [u8; 32];

/// Stable handle of a proxy in the arena.
pub type ProxyHandle = usize;

/// Small fixed bound keeps the model exhaustively explorable.
pub const MAX_PROXIES: usize = 8;

/// Assets known to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    /// Native value (lamports / ether)
    Native,
    /// Wrapped form of the native asset
    WrappedNative,
    /// Secondary reserve token of the pool
    Reserve,
    /// Pool-share token
    PoolShare,
}

/// Per-user proxy record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    /// False until initialized exactly once
    pub initialized: bool,
    /// Owning user; set only at initialization
    pub user: Principal,
    /// Factory that created this proxy; provenance, not authorization
    pub factory: Principal,
    /// Address under which the proxy holds custody
    pub address: Principal,
}

impl Proxy {
    /// A freshly cloned, not yet initialized proxy.
    pub fn fresh(address: Principal) -> Self {
        Self {
            initialized: false,
            user: [0; 32],
            factory: [0; 32],
            address,
        }
    }
}

/// Pool the converter trades against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pool {
    /// Wrapped-native reserve backing outstanding shares
    pub wrapped_reserve: u128,
    /// Secondary token reserve
    pub secondary_reserve: u128,
    /// Outstanding pool shares
    pub share_supply: u128,
    /// Native value owed to wrapped-native holders
    pub native_liability: u128,
}

/// Whole-system state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Proxy arena; handles index into it
    pub proxies: ArrayVec<Proxy, MAX_PROXIES>,
    /// user -> proxy handle, at most one entry per user
    pub registry: ArrayVec<(Principal, ProxyHandle), MAX_PROXIES>,
    /// All asset balances and allowances
    pub ledgers: Ledgers,
    /// The external pool
    pub pool: Pool,
    /// Address of the factory itself
    pub factory: Principal,
    /// Converter principal granted spending authority at initialization
    pub converter: Principal,
    /// The one signer allowed to carry relay envelopes
    pub trusted_relay: Principal,
}

impl State {
    /// A deployed factory with an empty registry and a seeded pool.
    pub fn new(
        factory: Principal,
        converter: Principal,
        trusted_relay: Principal,
        pool_secondary_reserve: u128,
    ) -> Self {
        Self {
            proxies: ArrayVec::new(),
            registry: ArrayVec::new(),
            ledgers: Ledgers::new(),
            pool: Pool {
                secondary_reserve: pool_secondary_reserve,
                ..Pool::default()
            },
            factory,
            converter,
            trusted_relay,
        }
    }

    /// Registry lookup: the handle of `user`'s proxy, if any.
    pub fn get_proxy(&self, user: &Principal) -> Option<ProxyHandle> {
        self.registry
            .iter()
            .find(|(owner, _)| owner == user)
            .map(|(_, handle)| *handle)
    }

    /// True only for addresses this factory actually produced.
    pub fn is_clone(&self, candidate: &Principal) -> bool {
        self.registry.iter().any(|(_, handle)| {
            self.proxies
                .get(*handle)
                .map(|proxy| &proxy.address == candidate)
                .unwrap_or(false)
        })
    }
}

/// Deterministic custody address of the proxy cloned for `user`.
///
/// Stands in for the derived account address; distinct from every user
/// principal by construction.
pub fn clone_address(user: &Principal) -> Principal {
    let mut address = *user;
    address[0] ^= 0x50;
    address[31] ^= 0xaa;
    address
}
