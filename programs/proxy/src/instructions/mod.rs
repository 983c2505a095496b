/// Proxy program instruction handlers

pub mod create_proxy;
pub mod enter_pool;
pub mod exit_pool;
pub mod initialize;
pub mod withdraw_native;
pub mod withdraw_tokens;

pub use create_proxy::*;
pub use enter_pool::*;
pub use exit_pool::*;
pub use initialize::*;
pub use withdraw_native::*;
pub use withdraw_tokens::*;

/// Instruction discriminators
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyInstruction {
    /// Initialize the registry
    Initialize = 0,
    /// Create and initialize the caller's proxy
    CreateProxy = 1,
    /// Convert the caller's proxy balance into the pool position
    EnterPool = 2,
    /// Redeem part or all of the pool position
    ExitPool = 3,
    /// Recover the proxy's full balance of one asset to the owner
    WithdrawTokens = 4,
    /// Recover the proxy's spare native balance to the owner
    WithdrawNative = 5,
}

// Instruction dispatching is handled in entrypoint.rs. The functions in
// this module are called from the entrypoint after account validation.
