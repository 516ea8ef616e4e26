use solana_program::{instruction::AccountMeta, msg, pubkey::Pubkey};

use crate::derive::derive;
use crate::error::RegistryError;
use crate::guard::require_signer;
use crate::instructions::{payload_limit, Context};
use crate::state::{AccountClass, RecordBody, RecordClass};

pub struct CreateRecord<'a> {
    pub record: &'a AccountMeta,
    pub authority: &'a AccountMeta,
    pub payer: &'a AccountMeta,
}

impl<'a> CreateRecord<'a> {
    pub fn parse(accounts: &'a [AccountMeta]) -> Result<Self, RegistryError> {
        let [record, authority, payer, _system_program] = accounts else {
            return Err(RegistryError::NotEnoughAccountKeys);
        };
        require_signer(authority)?;
        require_signer(payer)?;
        Ok(Self {
            record,
            authority,
            payer,
        })
    }
}

/// Allocate a record of `class` at the address derived from `seed`, sized
/// exactly for its contents, and return that address.
pub fn create_record(
    ctx: Context<CreateRecord>,
    class: RecordClass,
    seed: String,
    payload: Vec<u8>,
) -> Result<Pubkey, RegistryError> {
    let limit = payload_limit(ctx.ledger, ctx.program_id)?;
    if payload.len() > usize::from(limit) {
        msg!("Payload of {} bytes exceeds limit {}", payload.len(), limit);
        return Err(RegistryError::PayloadTooLarge);
    }

    let (address, bump) = derive(class.namespace(), &seed, ctx.program_id)?;
    if ctx.accounts.record.pubkey != address {
        msg!("Record account {} is not the PDA for seed {}", ctx.accounts.record.pubkey, seed);
        return Err(RegistryError::InvalidRecordAddress);
    }

    let body = RecordBody {
        seed,
        payload,
        authority: ctx.accounts.authority.pubkey,
    };
    let handle = ctx.ledger.allocate(
        &address,
        body.space(),
        ctx.program_id,
        &ctx.accounts.payer.pubkey,
    )?;
    body.write(class, ctx.ledger.data_mut(handle)?)?;

    msg!(
        "Created {} at {}, seed: {}, bump: {}",
        class.name(),
        address,
        body.seed,
        bump
    );
    Ok(address)
}
