use solana_program::msg;

use crate::derive::derive;
use crate::error::RegistryError;
use crate::guard;
use crate::instructions::{Context, RecordAccount};
use crate::state::{RecordBody, RecordClass, RecordSnapshot};

pub fn read_record(
    ctx: Context<RecordAccount>,
    class: RecordClass,
) -> Result<RecordSnapshot, RegistryError> {
    let record = guard::load(ctx.ledger, ctx.program_id, &ctx.accounts.record.pubkey, class)?;
    let body = RecordBody::read(ctx.ledger.data(record.handle())?)?;

    // The stored seed must still lead back to this address.
    let (derived, bump) = derive(class.namespace(), &body.seed, ctx.program_id)?;
    if derived != *record.address() {
        msg!("Stored seed {} does not derive {}", body.seed, record.address());
        return Err(RegistryError::InvalidAccountData);
    }

    let reserved_balance = ctx.ledger.account_at(record.handle())?.lamports;
    Ok(RecordSnapshot {
        address: derived,
        class,
        bump,
        seed: body.seed,
        payload: body.payload,
        authority: body.authority,
        reserved_balance,
    })
}
