use borsh::BorshSerialize;
use solana_program::{instruction::AccountMeta, pubkey::Pubkey};

use crate::error::RegistryError;
use crate::instruction::RegistryInstruction;
use crate::instructions::{self, CloseRecord, Context, CreateRecord, Initialize, RecordAccount};
use crate::store::Ledger;

/// Decode and run one instruction against `ledger`, returning its return
/// data.
pub fn process_instruction(
    program_id: &Pubkey,
    ledger: &mut Ledger,
    accounts: &[AccountMeta],
    instruction_data: &[u8],
) -> Result<Vec<u8>, RegistryError> {
    if program_id != &crate::ID {
        return Err(RegistryError::IncorrectProgramId);
    }

    match RegistryInstruction::unpack(instruction_data)? {
        RegistryInstruction::Initialize { payload_limit } => {
            let accounts = Initialize::parse(accounts)?;
            instructions::initialize(Context::new(program_id, ledger, accounts), payload_limit)?;
            Ok(Vec::new())
        }
        RegistryInstruction::CreateRecord {
            class,
            seed,
            payload,
        } => {
            let accounts = CreateRecord::parse(accounts)?;
            let address = instructions::create_record(
                Context::new(program_id, ledger, accounts),
                class,
                seed,
                payload,
            )?;
            encode(&address)
        }
        RegistryInstruction::GetRecordInfo { class } => {
            let accounts = RecordAccount::parse(accounts)?;
            let info =
                instructions::get_record_info(Context::new(program_id, ledger, accounts), class)?;
            encode(&info)
        }
        RegistryInstruction::ReadRecord { class } => {
            let accounts = RecordAccount::parse(accounts)?;
            let snapshot =
                instructions::read_record(Context::new(program_id, ledger, accounts), class)?;
            encode(&snapshot)
        }
        RegistryInstruction::CloseRecord { seed } => {
            let accounts = CloseRecord::parse(accounts)?;
            let reclaimed =
                instructions::close_record(Context::new(program_id, ledger, accounts), &seed)?;
            encode(&reclaimed)
        }
        RegistryInstruction::CloseNormalRecord { seed } => {
            let accounts = CloseRecord::parse(accounts)?;
            let reclaimed = instructions::close_normal_record(
                Context::new(program_id, ledger, accounts),
                &seed,
            )?;
            encode(&reclaimed)
        }
    }
}

fn encode<T: BorshSerialize>(value: &T) -> Result<Vec<u8>, RegistryError> {
    borsh::to_vec(value).map_err(|_| RegistryError::InvalidReturnData)
}
