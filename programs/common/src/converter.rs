//! Converter interface
//!
//! Shared account layouts and instruction encoding for the converter
//! program. Both sides of the CPI boundary depend on this module so the
//! byte layouts can never drift apart: the proxy program builds instructions
//! and reads ledger balances through it, the converter program implements
//! it. Conversion pricing is the converter's own business and is not part
//! of this interface.

use pinocchio::pubkey::Pubkey;

use crate::error::OnrampError;

/// Wrapped form of the native asset, redeemable 1:1.
pub const ASSET_WRAPPED_NATIVE: u8 = 1;
/// Secondary reserve token of the pool.
pub const ASSET_RESERVE: u8 = 2;
/// Pool-share token: a proportional claim on the pool's reserves.
pub const ASSET_POOL_SHARE: u8 = 3;

/// PDA seed for the pool account.
pub const POOL_SEED: &[u8] = b"pool";
/// PDA seed for the pool's native vault.
pub const VAULT_SEED: &[u8] = b"vault";
/// PDA seed for ledger accounts: ["ledger", asset, holder].
pub const LEDGER_SEED: &[u8] = b"ledger";

/// Per-(asset, holder) balance record.
/// PDA: ["ledger", asset, holder]
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TokenBalance {
    /// Current balance
    pub balance: u128,
    /// Allowance granted to `spender`
    pub allowance: u128,
    /// Account holding this balance
    pub holder: Pubkey,
    /// Single approved spender
    pub spender: Pubkey,
    /// Asset tag (ASSET_*)
    pub asset: u8,
    /// One-shot initialization flag
    pub initialized: u8,
    /// PDA bump
    pub bump: u8,
    /// Padding
    pub _padding: [u8; 13],
}

impl TokenBalance {
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// One-time initialization.
    pub fn initialize(&mut self, asset: u8, holder: Pubkey, bump: u8) -> Result<(), OnrampError> {
        if self.initialized != 0 {
            return Err(OnrampError::AlreadyInitialized);
        }
        self.balance = 0;
        self.allowance = 0;
        self.holder = holder;
        self.spender = [0u8; 32];
        self.asset = asset;
        self.initialized = 1;
        self.bump = bump;
        self._padding = [0; 13];
        Ok(())
    }

    pub fn credit(&mut self, amount: u128) -> Result<(), OnrampError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(OnrampError::Overflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u128) -> Result<(), OnrampError> {
        if self.balance < amount {
            return Err(OnrampError::InsufficientBalance);
        }
        self.balance -= amount;
        Ok(())
    }

    /// Replace the (spender, allowance) slot.
    pub fn approve(&mut self, spender: Pubkey, amount: u128) {
        self.spender = spender;
        self.allowance = amount;
    }

    /// Consume `amount` of `spender`'s allowance.
    ///
    /// An unlimited (`u128::MAX`) allowance is never decremented.
    pub fn spend_allowance(&mut self, spender: &Pubkey, amount: u128) -> Result<(), OnrampError> {
        if &self.spender != spender || self.allowance < amount {
            return Err(OnrampError::InsufficientAllowance);
        }
        if self.allowance != u128::MAX {
            self.allowance -= amount;
        }
        Ok(())
    }
}

/// Pool account: reserves, outstanding shares, and the native vault binding.
/// PDA: ["pool"]
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Pool {
    /// Wrapped-native reserve backing outstanding shares
    pub wrapped_reserve: u128,
    /// Secondary token reserve
    pub secondary_reserve: u128,
    /// Outstanding pool shares
    pub share_supply: u128,
    /// Native lamports owed to wrapped-native holders
    pub native_liability: u128,
    /// Vault account holding the pool's native lamports
    pub vault: Pubkey,
    /// One-shot initialization flag
    pub initialized: u8,
    /// PDA bump
    pub bump: u8,
    /// Padding
    pub _padding: [u8; 14],
}

impl Pool {
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// One-time initialization with a seeded secondary reserve.
    pub fn initialize(
        &mut self,
        vault: Pubkey,
        secondary_reserve: u128,
        bump: u8,
    ) -> Result<(), OnrampError> {
        if self.initialized != 0 {
            return Err(OnrampError::AlreadyInitialized);
        }
        self.wrapped_reserve = 0;
        self.secondary_reserve = secondary_reserve;
        self.share_supply = 0;
        self.native_liability = 0;
        self.vault = vault;
        self.initialized = 1;
        self.bump = bump;
        self._padding = [0; 14];
        Ok(())
    }
}

/// Instruction discriminators of the converter program.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterInstruction {
    /// Initialize the pool
    InitPool = 0,
    /// Initialize a (asset, holder) ledger
    InitLedger = 1,
    /// Wrap deposited native lamports into wrapped-native balance
    Wrap = 2,
    /// Unwrap wrapped-native balance back to lamports
    Unwrap = 3,
    /// Convert the holder's entire wrapped-native balance into pool shares
    Convert = 4,
    /// Redeem pool shares for proportional reserves
    Redeem = 5,
    /// Transfer balance between ledgers of the same asset
    Transfer = 6,
    /// Grant a spender allowance on a ledger
    Approve = 7,
}

pub fn encode_init_pool(secondary_reserve: u128) -> [u8; 17] {
    let mut data = [0u8; 17];
    data[0] = ConverterInstruction::InitPool as u8;
    data[1..17].copy_from_slice(&secondary_reserve.to_le_bytes());
    data
}

pub fn encode_init_ledger(asset: u8, holder: &Pubkey) -> [u8; 34] {
    let mut data = [0u8; 34];
    data[0] = ConverterInstruction::InitLedger as u8;
    data[1] = asset;
    data[2..34].copy_from_slice(holder.as_ref());
    data
}

pub fn encode_wrap(amount: u64) -> [u8; 9] {
    let mut data = [0u8; 9];
    data[0] = ConverterInstruction::Wrap as u8;
    data[1..9].copy_from_slice(&amount.to_le_bytes());
    data
}

pub fn encode_unwrap(amount: u64) -> [u8; 9] {
    let mut data = [0u8; 9];
    data[0] = ConverterInstruction::Unwrap as u8;
    data[1..9].copy_from_slice(&amount.to_le_bytes());
    data
}

pub fn encode_convert() -> [u8; 1] {
    [ConverterInstruction::Convert as u8]
}

pub fn encode_redeem(amount: u128) -> [u8; 17] {
    let mut data = [0u8; 17];
    data[0] = ConverterInstruction::Redeem as u8;
    data[1..17].copy_from_slice(&amount.to_le_bytes());
    data
}

pub fn encode_transfer(amount: u128) -> [u8; 17] {
    let mut data = [0u8; 17];
    data[0] = ConverterInstruction::Transfer as u8;
    data[1..17].copy_from_slice(&amount.to_le_bytes());
    data
}

pub fn encode_approve(spender: &Pubkey, amount: u128) -> [u8; 49] {
    let mut data = [0u8; 49];
    data[0] = ConverterInstruction::Approve as u8;
    data[1..33].copy_from_slice(spender.as_ref());
    data[33..49].copy_from_slice(&amount.to_le_bytes());
    data
}
