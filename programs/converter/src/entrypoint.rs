//! Converter program entrypoint

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

use crate::instructions::{
    process_approve, process_convert, process_init_ledger, process_init_pool, process_redeem,
    process_transfer, process_unwrap, process_wrap,
};
use onramp_common::{ConverterInstruction, InstructionReader, OnrampError};

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
    let mut reader = InstructionReader::new(&instruction_data[1..]);

    match discriminator {
        d if d == ConverterInstruction::InitPool as u8 => {
            msg!("Instruction: InitPool");
            let secondary_reserve = reader.read_u128()?;
            process_init_pool(program_id, accounts, secondary_reserve)
        }
        d if d == ConverterInstruction::InitLedger as u8 => {
            msg!("Instruction: InitLedger");
            let asset = reader.read_u8()?;
            let holder = reader.read_pubkey()?;
            process_init_ledger(program_id, accounts, asset, &holder)
        }
        d if d == ConverterInstruction::Wrap as u8 => {
            msg!("Instruction: Wrap");
            let amount = reader.read_u64()?;
            process_wrap(program_id, accounts, amount)
        }
        d if d == ConverterInstruction::Unwrap as u8 => {
            msg!("Instruction: Unwrap");
            let amount = reader.read_u64()?;
            process_unwrap(program_id, accounts, amount)
        }
        d if d == ConverterInstruction::Convert as u8 => {
            msg!("Instruction: Convert");
            process_convert(program_id, accounts)
        }
        d if d == ConverterInstruction::Redeem as u8 => {
            msg!("Instruction: Redeem");
            let amount = reader.read_u128()?;
            process_redeem(program_id, accounts, amount)
        }
        d if d == ConverterInstruction::Transfer as u8 => {
            msg!("Instruction: Transfer");
            let amount = reader.read_u128()?;
            process_transfer(program_id, accounts, amount)
        }
        d if d == ConverterInstruction::Approve as u8 => {
            msg!("Instruction: Approve");
            let spender = reader.read_pubkey()?;
            let amount = reader.read_u128()?;
            process_approve(program_id, accounts, &spender, amount)
        }
        _ => {
            msg!("Error: Unknown instruction");
            Err(OnrampError::InvalidInstruction.into())
        }
    }
}
