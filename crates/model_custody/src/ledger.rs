//! Asset ledgers: balances and allowances per (asset, holder)

use arrayvec::ArrayVec;

use crate::error::CustodyError;
use crate::state::{Asset, Principal};

/// Four assets times the principals a scenario can touch.
pub const MAX_LEDGER_ENTRIES: usize = 64;

/// One (asset, holder) row with a single (spender, allowance) slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub asset: Asset,
    pub holder: Principal,
    pub balance: u128,
    pub spender: Principal,
    pub allowance: u128,
}

/// All asset balances in the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledgers {
    pub entries: ArrayVec<LedgerEntry, MAX_LEDGER_ENTRIES>,
}

impl Ledgers {
    pub fn new() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    fn index_of(&self, asset: Asset, holder: &Principal) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.asset == asset && &entry.holder == holder)
    }

    fn entry_mut(
        &mut self,
        asset: Asset,
        holder: &Principal,
    ) -> Result<&mut LedgerEntry, CustodyError> {
        if let Some(idx) = self.index_of(asset, holder) {
            return Ok(&mut self.entries[idx]);
        }
        let entry = LedgerEntry {
            asset,
            holder: *holder,
            balance: 0,
            spender: [0; 32],
            allowance: 0,
        };
        self.entries
            .try_push(entry)
            .map_err(|_| CustodyError::LedgerFull)?;
        let last = self.entries.len() - 1;
        Ok(&mut self.entries[last])
    }

    /// Current balance; zero for an absent row.
    pub fn balance_of(&self, asset: Asset, holder: &Principal) -> u128 {
        self.index_of(asset, holder)
            .map(|idx| self.entries[idx].balance)
            .unwrap_or(0)
    }

    /// Allowance granted by `holder` to `spender`; zero for anyone else.
    pub fn allowance(&self, asset: Asset, holder: &Principal, spender: &Principal) -> u128 {
        self.index_of(asset, holder)
            .map(|idx| {
                let entry = &self.entries[idx];
                if &entry.spender == spender {
                    entry.allowance
                } else {
                    0
                }
            })
            .unwrap_or(0)
    }

    pub fn credit(
        &mut self,
        asset: Asset,
        holder: &Principal,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let entry = self.entry_mut(asset, holder)?;
        entry.balance = entry
            .balance
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    pub fn debit(
        &mut self,
        asset: Asset,
        holder: &Principal,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let idx = self
            .index_of(asset, holder)
            .ok_or(CustodyError::InsufficientBalance)?;
        let entry = &mut self.entries[idx];
        if entry.balance < amount {
            return Err(CustodyError::InsufficientBalance);
        }
        entry.balance -= amount;
        Ok(())
    }

    pub fn transfer(
        &mut self,
        asset: Asset,
        from: &Principal,
        to: &Principal,
        amount: u128,
    ) -> Result<(), CustodyError> {
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount)
    }

    /// Replace the (spender, allowance) slot on `holder`'s row.
    pub fn approve(
        &mut self,
        asset: Asset,
        holder: &Principal,
        spender: &Principal,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let entry = self.entry_mut(asset, holder)?;
        entry.spender = *spender;
        entry.allowance = amount;
        Ok(())
    }

    /// Consume `amount` of `spender`'s allowance on `holder`'s row.
    ///
    /// An unlimited (`u128::MAX`) allowance is never decremented.
    pub fn spend_allowance(
        &mut self,
        asset: Asset,
        holder: &Principal,
        spender: &Principal,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let idx = self
            .index_of(asset, holder)
            .ok_or(CustodyError::InsufficientAllowance)?;
        let entry = &mut self.entries[idx];
        if &entry.spender != spender || entry.allowance < amount {
            return Err(CustodyError::InsufficientAllowance);
        }
        if entry.allowance != u128::MAX {
            entry.allowance -= amount;
        }
        Ok(())
    }

    /// Sum of all balances of `asset` across holders.
    pub fn total_of(&self, asset: Asset) -> u128 {
        self.entries
            .iter()
            .filter(|entry| entry.asset == asset)
            .fold(0u128, |acc, entry| acc.saturating_add(entry.balance))
    }
}

impl Default for Ledgers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Principal = [1u8; 32];
    const BOB: Principal = [2u8; 32];
    const POOL: Principal = [3u8; 32];

    #[test]
    fn test_absent_rows_read_as_zero() {
        let ledgers = Ledgers::new();
        assert_eq!(ledgers.balance_of(Asset::Native, &ALICE), 0);
        assert_eq!(ledgers.allowance(Asset::Reserve, &ALICE, &POOL), 0);
    }

    #[test]
    fn test_transfer_moves_full_amount() {
        let mut ledgers = Ledgers::new();
        ledgers.credit(Asset::Reserve, &ALICE, 100).unwrap();
        ledgers.transfer(Asset::Reserve, &ALICE, &BOB, 60).unwrap();
        assert_eq!(ledgers.balance_of(Asset::Reserve, &ALICE), 40);
        assert_eq!(ledgers.balance_of(Asset::Reserve, &BOB), 60);

        assert_eq!(
            ledgers.transfer(Asset::Reserve, &ALICE, &BOB, 41).unwrap_err(),
            CustodyError::InsufficientBalance
        );
    }

    #[test]
    fn test_assets_do_not_mix() {
        let mut ledgers = Ledgers::new();
        ledgers.credit(Asset::Reserve, &ALICE, 100).unwrap();
        assert_eq!(ledgers.balance_of(Asset::PoolShare, &ALICE), 0);
        assert_eq!(
            ledgers.debit(Asset::PoolShare, &ALICE, 1).unwrap_err(),
            CustodyError::InsufficientBalance
        );
    }

    #[test]
    fn test_allowance_lifecycle() {
        let mut ledgers = Ledgers::new();
        ledgers.credit(Asset::WrappedNative, &ALICE, 1_000).unwrap();
        assert_eq!(
            ledgers
                .spend_allowance(Asset::WrappedNative, &ALICE, &POOL, 1)
                .unwrap_err(),
            CustodyError::InsufficientAllowance
        );

        ledgers
            .approve(Asset::WrappedNative, &ALICE, &POOL, u128::MAX)
            .unwrap();
        ledgers
            .spend_allowance(Asset::WrappedNative, &ALICE, &POOL, 500)
            .unwrap();
        assert_eq!(ledgers.allowance(Asset::WrappedNative, &ALICE, &POOL), u128::MAX);

        // A different spender gets nothing from the slot.
        assert_eq!(
            ledgers
                .spend_allowance(Asset::WrappedNative, &ALICE, &BOB, 1)
                .unwrap_err(),
            CustodyError::InsufficientAllowance
        );
    }
}
