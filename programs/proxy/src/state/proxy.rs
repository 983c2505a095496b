//! Per-user proxy account

use onramp_common::OnrampError;
use pinocchio::pubkey::Pubkey;

/// Proxy instance: holds one user's custody and position.
/// PDA: ["proxy", user]
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Proxy {
    /// Owning user; set only at initialization
    pub user: Pubkey,
    /// Registry that created this proxy; provenance, never authorization
    pub registry: Pubkey,
    /// Lamports present at initialization; the balance below this line is
    /// the rent reserve and is never spendable
    pub rent_floor: u64,
    /// One-shot initialization flag
    pub initialized: u8,
    /// PDA bump
    pub bump: u8,
    /// Padding
    pub _padding: [u8; 6],
}

impl Proxy {
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// One-time initialization. Fails without touching any field when the
    /// proxy has already been initialized.
    pub fn initialize(
        &mut self,
        user: Pubkey,
        registry: Pubkey,
        rent_floor: u64,
        bump: u8,
    ) -> Result<(), OnrampError> {
        if self.initialized != 0 {
            return Err(OnrampError::AlreadyInitialized);
        }
        self.user = user;
        self.registry = registry;
        self.rent_floor = rent_floor;
        self.initialized = 1;
        self.bump = bump;
        self._padding = [0; 6];
        Ok(())
    }

    /// Spendable native balance given the account's current lamports.
    pub fn spare_lamports(&self, lamports: u64) -> u64 {
        lamports.saturating_sub(self.rent_floor)
    }

    /// The user permitted to operate this proxy.
    pub fn user(&self) -> &Pubkey {
        &self.user
    }

    /// The factory that created this proxy.
    pub fn factory(&self) -> &Pubkey {
        &self.registry
    }
}
