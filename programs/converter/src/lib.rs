//! Onramp reference converter
//!
//! Implements the converter interface from `onramp-common`: a single pool
//! with a wrapped-native leg and a secondary reserve leg, per-holder token
//! ledgers, full-balance conversion into pool shares and proportional
//! redemption. The proxy program treats the converter as a black box; this
//! member exists so the whole flow can be exercised end to end. Pricing is
//! deliberately simple proportional accounting and is not a contract of the
//! interface.

#![cfg_attr(target_os = "solana", no_std)]

pub mod entrypoint;
pub mod instructions;
pub mod state;

// Panic handler for no_std builds (only for Solana BPF)
#[cfg(all(target_os = "solana", not(test)))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

pub use state::*;

pinocchio_pubkey::declare_id!("CGh6tipBQ9JhtfsZev5jbK7K5pRgd7qLUa9iRRWDRcVG");
