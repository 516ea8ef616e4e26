use solana_program::{instruction::AccountMeta, msg};

use crate::error::RegistryError;
use crate::guard;
use crate::instructions::Context;
use crate::state::{RecordClass, RecordHeader, RecordInfo};

pub struct RecordAccount<'a> {
    pub record: &'a AccountMeta,
}

impl<'a> RecordAccount<'a> {
    pub fn parse(accounts: &'a [AccountMeta]) -> Result<Self, RegistryError> {
        let [record] = accounts else {
            return Err(RegistryError::NotEnoughAccountKeys);
        };
        Ok(Self { record })
    }
}

/// Report a record's header fields without copying out its payload.
pub fn get_record_info(
    ctx: Context<RecordAccount>,
    class: RecordClass,
) -> Result<RecordInfo, RegistryError> {
    let record = guard::load(ctx.ledger, ctx.program_id, &ctx.accounts.record.pubkey, class)?;
    let header = RecordHeader::read(ctx.ledger.data(record.handle())?)?;
    let reserved_balance = ctx.ledger.account_at(record.handle())?.lamports;

    msg!(
        "Record info - seed: {}, payload bytes: {}, authority: {}",
        header.seed,
        header.payload_len,
        header.authority
    );

    Ok(RecordInfo {
        address: *record.address(),
        class,
        seed: header.seed,
        authority: header.authority,
        payload_len: header.payload_len,
        reserved_balance,
    })
}
