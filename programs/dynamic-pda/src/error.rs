use solana_program::program_error::ProgramError;
use thiserror::Error;

use crate::store::StoreError;

/// Every way a registry operation can fail.
///
/// The discriminants are stable: they become the `ProgramError::Custom` code
/// when the error crosses the instruction boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RegistryError {
    #[error("no bump seed produced a valid program address")]
    DerivationExhausted = 0,

    #[error("a record already exists for this seed")]
    DuplicateSeed = 1,

    #[error("no record exists at this address")]
    NotFound = 2,

    #[error("stored discriminator does not match the expected record class")]
    WrongRecordClass = 3,

    #[error("caller is not the authority of this record")]
    Unauthorized = 4,

    #[error("seed or payload exceeds the record layout bounds")]
    PayloadTooLarge = 5,

    #[error("record at this address was closed and cannot be re-created")]
    RecordClosed = 6,

    #[error("record class cannot be closed")]
    NotClosable = 7,

    #[error("record address does not match the address derived from the seed")]
    InvalidRecordAddress = 8,

    #[error("account owner does not fit its role in the instruction")]
    IllegalOwner = 9,

    #[error("payer cannot cover the reserved balance")]
    InsufficientFunds = 10,

    #[error("arithmetic overflow")]
    ArithmeticOverflow = 11,

    #[error("registry is already initialized")]
    AlreadyInitialized = 12,

    #[error("invalid instruction data")]
    InvalidInstructionData = 13,

    #[error("not enough account keys")]
    NotEnoughAccountKeys = 14,

    #[error("missing required signature")]
    MissingRequiredSignature = 15,

    #[error("account data could not be decoded")]
    InvalidAccountData = 16,

    #[error("return data could not be decoded")]
    InvalidReturnData = 17,

    #[error("instruction is addressed to another program")]
    IncorrectProgramId = 18,

    #[error("receiver cannot be the record being closed")]
    InvalidReceiver = 19,
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyAllocated => RegistryError::DuplicateSeed,
            StoreError::Retired => RegistryError::RecordClosed,
            StoreError::InsufficientFunds => RegistryError::InsufficientFunds,
            StoreError::ArithmeticOverflow => RegistryError::ArithmeticOverflow,
            StoreError::InvalidReceiver => RegistryError::InvalidReceiver,
            StoreError::NotSystemOwned => RegistryError::IllegalOwner,
            // A handle that outlived its slot means the record is gone.
            StoreError::StaleHandle => RegistryError::NotFound,
        }
    }
}

impl From<RegistryError> for ProgramError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidInstructionData => ProgramError::InvalidInstructionData,
            RegistryError::NotEnoughAccountKeys => ProgramError::NotEnoughAccountKeys,
            RegistryError::MissingRequiredSignature => ProgramError::MissingRequiredSignature,
            RegistryError::IllegalOwner => ProgramError::IllegalOwner,
            RegistryError::InsufficientFunds => ProgramError::InsufficientFunds,
            RegistryError::ArithmeticOverflow => ProgramError::ArithmeticOverflow,
            RegistryError::InvalidAccountData => ProgramError::InvalidAccountData,
            RegistryError::IncorrectProgramId => ProgramError::IncorrectProgramId,
            other => ProgramError::Custom(other as u32),
        }
    }
}
