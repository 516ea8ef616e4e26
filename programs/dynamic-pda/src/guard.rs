//! Checks that run before any handler trusts existing storage.
//!
//! Handlers only ever see storage through a [`Checked`] value, and the only
//! way to get one is [`load`], so the owner and discriminator checks cannot be
//! skipped at a call site.

use solana_program::{instruction::AccountMeta, msg, pubkey::Pubkey};

use crate::error::RegistryError;
use crate::state::{validate_discriminator, AccountClass, RecordClass};
use crate::store::{Ledger, SlotHandle};

/// Storage whose owner and discriminator have been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checked<C> {
    handle: SlotHandle,
    address: Pubkey,
    class: C,
}

pub type CheckedRecord = Checked<RecordClass>;

impl<C: Copy> Checked<C> {
    pub fn handle(&self) -> SlotHandle {
        self.handle
    }

    pub fn address(&self) -> &Pubkey {
        &self.address
    }

    pub fn class(&self) -> C {
        self.class
    }
}

/// Load `address` as an account of class `expected`.
pub fn load<C: AccountClass + Copy>(
    ledger: &Ledger,
    program_id: &Pubkey,
    address: &Pubkey,
    expected: C,
) -> Result<Checked<C>, RegistryError> {
    let Some(handle) = ledger.lookup(address) else {
        msg!("No {} at {}", expected.name(), address);
        return Err(RegistryError::NotFound);
    };
    let account = ledger.account_at(handle)?;

    if account.owner != *program_id {
        msg!("Account {} is owned by {}, not the registry", address, account.owner);
        return Err(RegistryError::IllegalOwner);
    }

    if !validate_discriminator(&account.data, &expected) {
        let found = RecordClass::from_discriminator(&account.data)
            .map_or("unknown class", |class| class.name());
        msg!("Account {} is a {}, not a {}", address, found, expected.name());
        return Err(RegistryError::WrongRecordClass);
    }

    Ok(Checked {
        handle,
        address: *address,
        class: expected,
    })
}

pub fn require_closable(record: &CheckedRecord) -> Result<(), RegistryError> {
    if !record.class().closable() {
        msg!("{} records cannot be closed", record.class().name());
        return Err(RegistryError::NotClosable);
    }
    Ok(())
}

pub fn require_signer(meta: &AccountMeta) -> Result<(), RegistryError> {
    if !meta.is_signer {
        msg!("Missing signature for {}", meta.pubkey);
        return Err(RegistryError::MissingRequiredSignature);
    }
    Ok(())
}

pub fn require_authority(stored: &Pubkey, caller: &Pubkey) -> Result<(), RegistryError> {
    if stored != caller {
        msg!("Signer {} is not the record authority", caller);
        return Err(RegistryError::Unauthorized);
    }
    Ok(())
}
