use crate::{
    error::{
        VaultResult,
        VaultError
    },
    // state::traits::SafeUnwrap
};
use log::warn;
use std::panic::Location;

pub trait SafeUnwrap {
    type Item;

    fn safe_unwrap(self) -> VaultResult<Self::Item>;
}

impl<T> SafeUnwrap for Option<T> {
    type Item = T;

    #[track_caller]
    #[inline(always)]
    fn safe_unwrap(self) -> VaultResult<T> {
        match self {
            Some(v) => Ok(v),
            None => {
                let caller = Location::caller();
                warn!("Unwrapping error thrown at {}:{}", caller.file(), caller.line());
                Err(VaultError::UnwrapError)
            }
        }
    }
}

impl<T,U> SafeUnwrap for Result<T,U> {
    type Item = T;

    #[track_caller]
    #[inline(always)]
    fn safe_unwrap(self) -> VaultResult<T> {
        match self {
            Ok(v) => Ok(v),
            Err(_) => {
                let caller = Location::caller();
                warn!("Unwrap error thrown at {}:{}", caller.file(), caller.line());
                Err(VaultError::UnwrapError)
            }
        }
    }
}