//! Account validation and zero-copy access helpers

use core::mem::{align_of, size_of};

use pinocchio::account_info::AccountInfo;
use pinocchio::pubkey::Pubkey;

use crate::error::OnrampError;

/// Check that `account` is owned by `program`.
#[inline]
pub fn validate_owner(account: &AccountInfo, program: &Pubkey) -> Result<(), OnrampError> {
    if !account.is_owned_by(program) {
        return Err(OnrampError::InvalidAccount);
    }
    Ok(())
}

/// Check that `account` is writable.
#[inline]
pub fn validate_writable(account: &AccountInfo) -> Result<(), OnrampError> {
    if !account.is_writable() {
        return Err(OnrampError::InvalidAccount);
    }
    Ok(())
}

/// Check that `account` signed the transaction.
#[inline]
pub fn validate_signer(account: &AccountInfo) -> Result<(), OnrampError> {
    if !account.is_signer() {
        return Err(OnrampError::InvalidAccount);
    }
    Ok(())
}

/// Borrow an account's data as a reference to `T`.
///
/// # Safety
///
/// `T` must be `#[repr(C)]` and valid for any bit pattern of the account
/// data. The caller must ensure no other live borrow of the same account
/// data exists for the duration of the returned reference.
#[inline]
pub unsafe fn borrow_account_data<'a, T>(account: &'a AccountInfo) -> Result<&'a T, OnrampError> {
    let data = account.borrow_data_unchecked();
    if data.len() < size_of::<T>() {
        return Err(OnrampError::InvalidAccount);
    }
    let ptr = data.as_ptr();
    if (ptr as usize) % align_of::<T>() != 0 {
        return Err(OnrampError::InvalidAccount);
    }
    Ok(&*(ptr as *const T))
}

/// Borrow an account's data as a mutable reference to `T`.
///
/// # Safety
///
/// Same requirements as [`borrow_account_data`], and the account must be
/// writable in the current transaction.
#[inline]
pub unsafe fn borrow_account_data_mut<'a, T>(
    account: &'a AccountInfo,
) -> Result<&'a mut T, OnrampError> {
    let data = account.borrow_mut_data_unchecked();
    if data.len() < size_of::<T>() {
        return Err(OnrampError::InvalidAccount);
    }
    let ptr = data.as_mut_ptr();
    if (ptr as usize) % align_of::<T>() != 0 {
        return Err(OnrampError::InvalidAccount);
    }
    Ok(&mut *(ptr as *mut T))
}
