//! Proxy program entrypoint

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

use crate::instructions::{
    process_create_proxy, process_enter_pool, process_exit_pool, process_initialize,
    process_withdraw_native, process_withdraw_tokens, ProxyInstruction,
};
use crate::state::Registry;
use onramp_common::{
    borrow_account_data, read_envelope, resolve_caller, validate_owner, validate_signer,
    validate_writable, InstructionReader, OnrampError,
};

#[cfg(feature = "bpf-entrypoint")]
pinocchio::entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if instruction_data.is_empty() {
        msg!("Error: Instruction data is empty");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let discriminator = instruction_data[0];
    let instruction = match discriminator {
        0 => ProxyInstruction::Initialize,
        1 => ProxyInstruction::CreateProxy,
        2 => ProxyInstruction::EnterPool,
        3 => ProxyInstruction::ExitPool,
        4 => ProxyInstruction::WithdrawTokens,
        5 => ProxyInstruction::WithdrawNative,
        _ => {
            msg!("Error: Unknown instruction");
            return Err(OnrampError::InvalidInstruction.into());
        }
    };

    match instruction {
        ProxyInstruction::Initialize => {
            msg!("Instruction: Initialize");
            process_initialize_inner(program_id, accounts, &instruction_data[1..])
        }
        ProxyInstruction::CreateProxy => {
            msg!("Instruction: CreateProxy");
            process_create_proxy_inner(program_id, accounts, &instruction_data[1..])
        }
        ProxyInstruction::EnterPool => {
            msg!("Instruction: EnterPool");
            process_enter_pool_inner(program_id, accounts, &instruction_data[1..])
        }
        ProxyInstruction::ExitPool => {
            msg!("Instruction: ExitPool");
            process_exit_pool_inner(program_id, accounts, &instruction_data[1..])
        }
        ProxyInstruction::WithdrawTokens => {
            msg!("Instruction: WithdrawTokens");
            process_withdraw_tokens_inner(program_id, accounts, &instruction_data[1..])
        }
        ProxyInstruction::WithdrawNative => {
            msg!("Instruction: WithdrawNative");
            process_withdraw_native_inner(program_id, accounts, &instruction_data[1..])
        }
    }
}

// Instruction processors with account validation

/// Process initialize instruction
///
/// Expected accounts:
/// 0. `[writable]` Registry account (PDA)
/// 1. `[signer]` Governance authority
///
/// Expected data layout (128 bytes):
/// - governance: Pubkey (32 bytes)
/// - trusted_relay: Pubkey (32 bytes)
/// - converter_program: Pubkey (32 bytes)
/// - pool: Pubkey (32 bytes)
fn process_initialize_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 2 {
        msg!("Error: Initialize requires at least 2 accounts");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let registry_account = &accounts[0];
    let governance_account = &accounts[1];

    validate_owner(registry_account, program_id)?;
    validate_writable(registry_account)?;
    validate_signer(governance_account)?;

    let mut reader = InstructionReader::new(data);
    let governance = reader.read_pubkey()?;
    let trusted_relay = reader.read_pubkey()?;
    let converter_program = reader.read_pubkey()?;
    let pool = reader.read_pubkey()?;

    // The governance signer must be the one recorded.
    if governance_account.key() != &governance {
        msg!("Error: Governance account does not match instruction data");
        return Err(OnrampError::InvalidAccount.into());
    }

    process_initialize(
        program_id,
        registry_account,
        &governance,
        &trusted_relay,
        &converter_program,
        &pool,
    )?;
    Ok(())
}

/// Process create proxy instruction
///
/// Expected accounts:
/// 0. `[writable]` Registry account (PDA)
/// 1. `[writable]` Proxy account (caller's PDA)
/// 2. `[signer]` Caller (or the trusted relay)
/// 3. `[writable]` Proxy wrapped-native ledger
/// 4. `[writable]` Proxy reserve ledger
/// 5. `[writable]` Proxy pool-share ledger
/// 6. `[]` Converter program
///
/// Expected data layout:
/// - envelope: 1 byte tag (+ 32-byte original sender when relayed)
fn process_create_proxy_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 7 {
        msg!("Error: CreateProxy requires at least 7 accounts");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let registry_account = &accounts[0];
    let proxy_account = &accounts[1];
    let caller_account = &accounts[2];
    let wrapped_ledger = &accounts[3];
    let reserve_ledger = &accounts[4];
    let share_ledger = &accounts[5];
    let converter_program = &accounts[6];

    validate_owner(registry_account, program_id)?;
    validate_writable(registry_account)?;
    validate_owner(proxy_account, program_id)?;
    validate_writable(proxy_account)?;
    validate_signer(caller_account)?;

    let mut reader = InstructionReader::new(data);
    let envelope = read_envelope(&mut reader)?;

    let user = {
        let registry = unsafe { borrow_account_data::<Registry>(registry_account)? };
        if converter_program.key() != &registry.converter_program {
            msg!("Error: Converter program does not match the registry");
            return Err(OnrampError::InvalidAccount.into());
        }
        resolve_caller(caller_account.key(), envelope, &registry.trusted_relay)?
    };

    process_create_proxy(
        program_id,
        registry_account,
        proxy_account,
        [wrapped_ledger, reserve_ledger, share_ledger],
        &user,
    )
}

/// Process enter pool instruction
///
/// Expected accounts:
/// 0. `[]` Registry account (PDA)
/// 1. `[writable]` Proxy account
/// 2. `[signer]` Caller (or the trusted relay)
/// 3. `[writable]` Pool account
/// 4. `[writable]` Pool native vault
/// 5. `[writable]` Proxy wrapped-native ledger
/// 6. `[writable]` Proxy pool-share ledger
/// 7. `[]` Converter program
///
/// Expected data layout:
/// - envelope: 1 byte tag (+ 32-byte original sender when relayed)
fn process_enter_pool_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 8 {
        msg!("Error: EnterPool requires at least 8 accounts");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let registry_account = &accounts[0];
    let proxy_account = &accounts[1];
    let caller_account = &accounts[2];
    let pool_account = &accounts[3];
    let vault_account = &accounts[4];
    let wrapped_ledger = &accounts[5];
    let share_ledger = &accounts[6];

    validate_owner(registry_account, program_id)?;
    validate_owner(proxy_account, program_id)?;
    validate_writable(proxy_account)?;
    validate_signer(caller_account)?;

    let mut reader = InstructionReader::new(data);
    let envelope = read_envelope(&mut reader)?;

    process_enter_pool(
        registry_account,
        proxy_account,
        caller_account,
        pool_account,
        vault_account,
        wrapped_ledger,
        share_ledger,
        envelope,
    )
}

/// Process exit pool instruction
///
/// Expected accounts:
/// 0. `[]` Registry account (PDA)
/// 1. `[]` Proxy account
/// 2. `[signer]` Caller (or the trusted relay)
/// 3. `[writable]` Pool account
/// 4. `[writable]` Proxy pool-share ledger
/// 5. `[writable]` Proxy wrapped-native ledger
/// 6. `[writable]` Proxy reserve ledger
/// 7. `[]` Converter program
///
/// Expected data layout:
/// - envelope: 1 byte tag (+ 32-byte original sender when relayed)
/// - amount: u128 (16 bytes)
fn process_exit_pool_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 8 {
        msg!("Error: ExitPool requires at least 8 accounts");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let registry_account = &accounts[0];
    let proxy_account = &accounts[1];
    let caller_account = &accounts[2];
    let pool_account = &accounts[3];
    let share_ledger = &accounts[4];
    let wrapped_ledger = &accounts[5];
    let reserve_ledger = &accounts[6];

    validate_owner(registry_account, program_id)?;
    validate_owner(proxy_account, program_id)?;
    validate_signer(caller_account)?;

    let mut reader = InstructionReader::new(data);
    let envelope = read_envelope(&mut reader)?;
    let amount = reader.read_u128()?;

    process_exit_pool(
        registry_account,
        proxy_account,
        caller_account,
        pool_account,
        share_ledger,
        wrapped_ledger,
        reserve_ledger,
        envelope,
        amount,
    )
}

/// Process withdraw tokens instruction
///
/// Expected accounts:
/// 0. `[]` Registry account (PDA)
/// 1. `[]` Proxy account
/// 2. `[signer]` Caller (or the trusted relay)
/// 3. `[writable]` Proxy ledger of the asset
/// 4. `[writable]` Owner ledger of the asset
/// 5. `[]` Converter program
///
/// Expected data layout:
/// - envelope: 1 byte tag (+ 32-byte original sender when relayed)
/// - asset: u8 (1 byte)
fn process_withdraw_tokens_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 6 {
        msg!("Error: WithdrawTokens requires at least 6 accounts");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let registry_account = &accounts[0];
    let proxy_account = &accounts[1];
    let caller_account = &accounts[2];
    let proxy_ledger = &accounts[3];
    let user_ledger = &accounts[4];

    validate_owner(registry_account, program_id)?;
    validate_owner(proxy_account, program_id)?;
    validate_signer(caller_account)?;

    let mut reader = InstructionReader::new(data);
    let envelope = read_envelope(&mut reader)?;
    let asset = reader.read_u8()?;

    process_withdraw_tokens(
        registry_account,
        proxy_account,
        caller_account,
        proxy_ledger,
        user_ledger,
        envelope,
        asset,
    )
}

/// Process withdraw native instruction
///
/// Expected accounts:
/// 0. `[]` Registry account (PDA)
/// 1. `[writable]` Proxy account
/// 2. `[signer]` Caller (or the trusted relay)
/// 3. `[writable]` Recipient (the proxy owner)
///
/// Expected data layout:
/// - envelope: 1 byte tag (+ 32-byte original sender when relayed)
fn process_withdraw_native_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 4 {
        msg!("Error: WithdrawNative requires at least 4 accounts");
        return Err(OnrampError::InvalidInstruction.into());
    }

    let registry_account = &accounts[0];
    let proxy_account = &accounts[1];
    let caller_account = &accounts[2];
    let recipient_account = &accounts[3];

    validate_owner(registry_account, program_id)?;
    validate_owner(proxy_account, program_id)?;
    validate_writable(proxy_account)?;
    validate_writable(recipient_account)?;
    validate_signer(caller_account)?;

    let mut reader = InstructionReader::new(data);
    let envelope = read_envelope(&mut reader)?;

    process_withdraw_native(
        registry_account,
        proxy_account,
        caller_account,
        recipient_account,
        envelope,
    )
}
