//! Create proxy instruction - clone and initialize a per-user instance

use onramp_common::*;
use pinocchio::cpi::invoke_signed;
use pinocchio::instruction::{AccountMeta, Instruction, Seed, Signer};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::logger::Logger;

use crate::pda::{derive_proxy_pda, PROXY_SEED};
use crate::state::{Proxy, Registry};

/// Process create proxy instruction
///
/// Open to any caller; the resolved caller becomes the new proxy's owner.
/// The registry entry is finalized before the new proxy is initialized, and
/// initialization grants the configured pool an unlimited allowance on the
/// proxy's wrapped-native, reserve and pool-share ledgers so that later
/// conversions need no per-call approval.
///
/// # Arguments
/// * `program_id` - The proxy program ID
/// * `registry_account` - Registry account (PDA)
/// * `proxy_account` - The proxy account to initialize (must be the user's PDA)
/// * `ledger_accounts` - Wrapped-native, reserve and pool-share ledgers of
///   the proxy, in that order
/// * `user` - Resolved caller becoming the owner
pub fn process_create_proxy(
    program_id: &Pubkey,
    registry_account: &AccountInfo,
    proxy_account: &AccountInfo,
    ledger_accounts: [&AccountInfo; 3],
    user: &Pubkey,
) -> ProgramResult {
    let registry = unsafe { borrow_account_data_mut::<Registry>(registry_account)? };
    if registry.initialized == 0 {
        msg!("Error: Registry is not initialized");
        return Err(OnrampError::InvalidAccount.into());
    }

    let (expected_pda, bump) = derive_proxy_pda(user, program_id);
    if proxy_account.key() != &expected_pda {
        msg!("Error: Proxy account is not the caller's PDA");
        return Err(OnrampError::InvalidAccount.into());
    }
    if proxy_account.data_len() != Proxy::LEN {
        msg!("Error: Proxy account has incorrect size");
        return Err(OnrampError::InvalidAccount.into());
    }

    // The ledgers must belong to the converter, carry the expected asset
    // tags and be held by the new proxy.
    let expected_assets = [ASSET_WRAPPED_NATIVE, ASSET_RESERVE, ASSET_POOL_SHARE];
    for (ledger_account, expected_asset) in ledger_accounts.iter().zip(expected_assets) {
        validate_owner(ledger_account, &registry.converter_program)?;
        let ledger = unsafe { borrow_account_data::<TokenBalance>(ledger_account)? };
        if ledger.initialized == 0
            || ledger.asset != expected_asset
            || &ledger.holder != proxy_account.key()
        {
            msg!("Error: Ledger does not match the new proxy");
            return Err(OnrampError::LedgerMismatch.into());
        }
    }

    // Registry entry first; the initialization call below must not be able
    // to observe a half-registered factory.
    registry.register(*user, *proxy_account.key())?;

    let proxy = unsafe { borrow_account_data_mut::<Proxy>(proxy_account)? };
    proxy.initialize(
        *user,
        *registry_account.key(),
        proxy_account.lamports(),
        bump,
    )?;

    // Unlimited spending authority for the pool over every asset this
    // proxy will ever hold.
    let approve_data = encode_approve(&registry.pool, u128::MAX);
    let bump_seed = [bump];
    let seeds = [
        Seed::from(PROXY_SEED),
        Seed::from(user.as_ref()),
        Seed::from(&bump_seed),
    ];
    for ledger_account in ledger_accounts {
        let metas = [
            AccountMeta::writable(ledger_account.key()),
            AccountMeta::readonly_signer(proxy_account.key()),
        ];
        let instruction = Instruction {
            program_id: &registry.converter_program,
            accounts: &metas,
            data: &approve_data,
        };
        invoke_signed(
            &instruction,
            &[ledger_account, proxy_account],
            &[Signer::from(&seeds[..])],
        )?;
    }

    msg!("event: proxy created");
    let mut logger = Logger::<32>::default();
    logger.append("proxies registered: ");
    logger.append(registry.proxy_count as u64);
    logger.log();
    Ok(())
}
