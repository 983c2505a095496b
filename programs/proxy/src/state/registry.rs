//! Proxy registry: factory configuration and the user -> proxy map

use onramp_common::{OnrampError, MAX_PROXIES};
use pinocchio::pubkey::Pubkey;

/// One registered proxy.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ProxyEntry {
    /// Owning user
    pub user: Pubkey,
    /// The user's proxy account
    pub proxy: Pubkey,
}

/// Registry account (the factory role): deployment configuration plus the
/// append-only user -> proxy map.
/// PDA: ["registry"]
#[repr(C)]
pub struct Registry {
    /// Factory administrator
    pub governance: Pubkey,
    /// The one signer allowed to carry relay envelopes
    pub trusted_relay: Pubkey,
    /// Converter program this deployment targets
    pub converter_program: Pubkey,
    /// Pool account granted spending authority on proxy ledgers
    pub pool: Pubkey,
    /// Number of registered proxies
    pub proxy_count: u16,
    /// PDA bump
    pub bump: u8,
    /// One-shot initialization flag
    pub initialized: u8,
    /// Padding
    pub _padding: [u8; 4],
    /// Registered proxies
    pub entries: [ProxyEntry; MAX_PROXIES],
}

impl Registry {
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Initialize the registry in-place (avoids a large stack temporary,
    /// which would exceed the BPF stack limit).
    pub fn initialize_in_place(
        &mut self,
        governance: Pubkey,
        trusted_relay: Pubkey,
        converter_program: Pubkey,
        pool: Pubkey,
        bump: u8,
    ) -> Result<(), OnrampError> {
        if self.initialized != 0 {
            return Err(OnrampError::AlreadyInitialized);
        }
        self.governance = governance;
        self.trusted_relay = trusted_relay;
        self.converter_program = converter_program;
        self.pool = pool;
        self.proxy_count = 0;
        self.bump = bump;
        self.initialized = 1;
        self._padding = [0; 4];

        // Zero the entry table without a stack temporary.
        unsafe {
            core::ptr::write_bytes(self.entries.as_mut_ptr(), 0, MAX_PROXIES);
        }
        Ok(())
    }

    /// Initialize a new registry (for tests only - uses stack)
    #[cfg(all(test, not(target_os = "solana")))]
    pub fn new(
        governance: Pubkey,
        trusted_relay: Pubkey,
        converter_program: Pubkey,
        pool: Pubkey,
        bump: u8,
    ) -> Self {
        Self {
            governance,
            trusted_relay,
            converter_program,
            pool,
            proxy_count: 0,
            bump,
            initialized: 1,
            _padding: [0; 4],
            entries: [ProxyEntry {
                user: [0; 32],
                proxy: [0; 32],
            }; MAX_PROXIES],
        }
    }

    /// Record `user`'s proxy. At most one entry per user, append-only.
    pub fn register(&mut self, user: Pubkey, proxy: Pubkey) -> Result<u16, OnrampError> {
        if self.find(&user).is_some() {
            return Err(OnrampError::AlreadyHasProxy);
        }
        if (self.proxy_count as usize) >= MAX_PROXIES {
            return Err(OnrampError::RegistryFull);
        }
        let idx = self.proxy_count;
        self.entries[idx as usize] = ProxyEntry { user, proxy };
        self.proxy_count += 1;
        Ok(idx)
    }

    /// Address of the converter program this deployment targets.
    pub fn converter_address(&self) -> &Pubkey {
        &self.converter_program
    }

    /// Registry lookup for `user`.
    pub fn find(&self, user: &Pubkey) -> Option<&ProxyEntry> {
        self.entries[..self.proxy_count as usize]
            .iter()
            .find(|entry| &entry.user == user)
    }

    /// True only for accounts this registry actually produced; a spoofed
    /// account that merely claims to be a proxy is rejected.
    pub fn is_clone(&self, candidate: &Pubkey) -> bool {
        self.entries[..self.proxy_count as usize]
            .iter()
            .any(|entry| &entry.proxy == candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new([1; 32], [2; 32], [3; 32], [4; 32], 255)
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = registry();
        let user = [10u8; 32];
        let proxy = [11u8; 32];

        let idx = registry.register(user, proxy).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(registry.proxy_count, 1);

        let entry = registry.find(&user).unwrap();
        assert_eq!(entry.proxy, proxy);
        assert!(registry.find(&[12u8; 32]).is_none());
    }

    #[test]
    fn test_second_registration_is_rejected() {
        let mut registry = registry();
        let user = [10u8; 32];
        registry.register(user, [11u8; 32]).unwrap();

        let err = registry.register(user, [12u8; 32]).unwrap_err();
        assert_eq!(err, OnrampError::AlreadyHasProxy);
        // The original mapping is untouched.
        assert_eq!(registry.find(&user).unwrap().proxy, [11u8; 32]);
        assert_eq!(registry.proxy_count, 1);
    }

    #[test]
    fn test_registry_capacity() {
        let mut registry = registry();
        for i in 0..MAX_PROXIES {
            let user = [i as u8; 32];
            let mut proxy = [i as u8; 32];
            proxy[0] ^= 0x50;
            registry.register(user, proxy).unwrap();
        }
        let err = registry.register([200u8; 32], [201u8; 32]).unwrap_err();
        assert_eq!(err, OnrampError::RegistryFull);
    }

    #[test]
    fn test_is_clone_only_for_registered_proxies() {
        let mut registry = registry();
        let user = [10u8; 32];
        let proxy = [11u8; 32];
        registry.register(user, proxy).unwrap();

        assert!(registry.is_clone(&proxy));
        assert!(!registry.is_clone(&user));
        assert!(!registry.is_clone(&[99u8; 32]));
    }

    #[test]
    fn test_initialize_in_place_happens_once() {
        let mut registry = registry();
        let err = registry
            .initialize_in_place([9; 32], [9; 32], [9; 32], [9; 32], 1)
            .unwrap_err();
        assert_eq!(err, OnrampError::AlreadyInitialized);
        assert_eq!(registry.governance, [1; 32]);
    }
}
