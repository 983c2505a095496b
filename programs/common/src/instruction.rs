//! Instruction data deserialization
//!
//! Sequential reader over instruction data. All reads are bounds checked and
//! fail with `InvalidInstruction` rather than panicking.

use pinocchio::pubkey::Pubkey;

use crate::error::OnrampError;

/// Instruction data reader with a tracked offset.
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, OnrampError> {
        if self.offset >= self.data.len() {
            return Err(OnrampError::InvalidInstruction);
        }
        let val = self.data[self.offset];
        self.offset += 1;
        Ok(val)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, OnrampError> {
        Ok(u64::from_le_bytes(self.read_bytes::<8>()?))
    }

    #[inline]
    pub fn read_u128(&mut self) -> Result<u128, OnrampError> {
        Ok(u128::from_le_bytes(self.read_bytes::<16>()?))
    }

    #[inline]
    pub fn read_pubkey(&mut self) -> Result<Pubkey, OnrampError> {
        self.read_bytes::<32>()
    }

    #[inline]
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], OnrampError> {
        if self.offset + N > self.data.len() {
            return Err(OnrampError::InvalidInstruction);
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        Ok(bytes)
    }
}
