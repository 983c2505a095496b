//! Error type shared across the onramp programs

use pinocchio::program_error::ProgramError;

/// Stable reason string for double initialization.
///
/// Part of the externally observable contract; must never change.
pub const MSG_ALREADY_INITIALIZED: &str = "Contract instance has already been initialized";

/// Stable reason string for a failed owner check.
///
/// Part of the externally observable contract; must never change.
pub const MSG_NOT_AUTHORIZED: &str = "ProvideLiquidity: Caller is not authorized";

/// Errors raised by the proxy and converter programs.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnrampError {
    /// Instruction data missing, malformed, or unknown discriminator
    InvalidInstruction = 0,
    /// Account failed ownership, PDA, size, or writability validation
    InvalidAccount,
    /// One-shot initialization attempted a second time
    AlreadyInitialized,
    /// Resolved caller is not the owner of the targeted proxy
    Unauthorized,
    /// Relay envelope presented by a signer other than the trusted relay
    UntrustedRelay,
    /// Requested amount exceeds the available balance
    InsufficientBalance,
    /// Caller has no proxy registered
    NoProxyForCaller,
    /// Caller already has a proxy registered
    AlreadyHasProxy,
    /// Registry has no room for another proxy
    RegistryFull,
    /// Ledger account does not carry the expected asset or holder
    LedgerMismatch,
    /// Spender allowance does not cover the requested amount
    InsufficientAllowance,
    /// Converter rejected the operation
    AdapterFailure,
    /// Arithmetic overflow
    Overflow,
}

impl OnrampError {
    /// Stable, user-visible reason string for this error.
    pub fn message(&self) -> &'static str {
        match self {
            OnrampError::InvalidInstruction => "Malformed instruction data",
            OnrampError::InvalidAccount => "Account validation failed",
            OnrampError::AlreadyInitialized => MSG_ALREADY_INITIALIZED,
            OnrampError::Unauthorized => MSG_NOT_AUTHORIZED,
            OnrampError::UntrustedRelay => "Relay envelope from untrusted relay",
            OnrampError::InsufficientBalance => "Amount exceeds available balance",
            OnrampError::NoProxyForCaller => "Caller has no proxy",
            OnrampError::AlreadyHasProxy => "Caller already has a proxy",
            OnrampError::RegistryFull => "Proxy registry is full",
            OnrampError::LedgerMismatch => "Ledger does not match expected asset or holder",
            OnrampError::InsufficientAllowance => "Spender allowance exhausted",
            OnrampError::AdapterFailure => "Converter operation failed",
            OnrampError::Overflow => "Arithmetic overflow",
        }
    }
}

impl From<OnrampError> for ProgramError {
    fn from(e: OnrampError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
