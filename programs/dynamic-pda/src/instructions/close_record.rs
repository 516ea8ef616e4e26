use solana_program::{instruction::AccountMeta, msg};

use crate::derive::derive;
use crate::error::RegistryError;
use crate::guard::{self, require_authority, require_closable, require_signer};
use crate::instructions::Context;
use crate::state::{AccountClass, RecordClass, RecordHeader};

pub struct CloseRecord<'a> {
    pub record: &'a AccountMeta,
    pub receiver: &'a AccountMeta,
    pub authority: &'a AccountMeta,
}

impl<'a> CloseRecord<'a> {
    pub fn parse(accounts: &'a [AccountMeta]) -> Result<Self, RegistryError> {
        let [record, receiver, authority] = accounts else {
            return Err(RegistryError::NotEnoughAccountKeys);
        };
        require_signer(authority)?;
        Ok(Self {
            record,
            receiver,
            authority,
        })
    }
}

/// Close a dynamic record, returning the lamports paid to the receiver.
pub fn close_record(ctx: Context<CloseRecord>, seed: &str) -> Result<u64, RegistryError> {
    close_as(ctx, RecordClass::Dynamic, seed)
}

/// The same close path pointed at normal records. The closability check
/// turns it away before anything is touched.
pub fn close_normal_record(ctx: Context<CloseRecord>, seed: &str) -> Result<u64, RegistryError> {
    msg!("Attempting to close normal record, seed: {}", seed);
    close_as(ctx, RecordClass::Normal, seed)
}

fn close_as(ctx: Context<CloseRecord>, class: RecordClass, seed: &str) -> Result<u64, RegistryError> {
    let Context {
        program_id,
        ledger,
        accounts,
    } = ctx;

    let record = guard::load(ledger, program_id, &accounts.record.pubkey, class)?;
    require_closable(&record)?;

    let (expected, _) = derive(class.namespace(), seed, program_id)?;
    if *record.address() != expected {
        msg!("Record {} is not the PDA for seed {}", record.address(), seed);
        return Err(RegistryError::InvalidRecordAddress);
    }

    let header = RecordHeader::read(ledger.data(record.handle())?)?;
    require_authority(&header.authority, &accounts.authority.pubkey)?;

    msg!("Closing {} at {}, seed: {}", class.name(), expected, seed);
    let reclaimed = ledger.deallocate(record.handle(), &accounts.receiver.pubkey)?;
    msg!("Returned {} lamports to {}", reclaimed, accounts.receiver.pubkey);

    Ok(reclaimed)
}
