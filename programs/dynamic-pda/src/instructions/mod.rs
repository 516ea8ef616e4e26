use solana_program::pubkey::Pubkey;

use crate::store::Ledger;

pub mod close_record;
pub mod create_record;
pub mod get_record_info;
pub mod initialize;
pub mod read_record;

pub use close_record::*;
pub use create_record::*;
pub use get_record_info::*;
pub use initialize::*;
pub use read_record::*;

/// What a handler runs against: the program id, the ledger and its own
/// validated account list.
pub struct Context<'a, T> {
    pub program_id: &'a Pubkey,
    pub ledger: &'a mut Ledger,
    pub accounts: T,
}

impl<'a, T> Context<'a, T> {
    pub fn new(program_id: &'a Pubkey, ledger: &'a mut Ledger, accounts: T) -> Self {
        Self {
            program_id,
            ledger,
            accounts,
        }
    }
}
