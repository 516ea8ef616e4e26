use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::derive::derive;
use crate::error::RegistryError;
use crate::state::{RecordClass, CONFIG_NAMESPACE, CONFIG_SEED};
use crate::store::SYSTEM_PROGRAM_ID;

/// Instructions understood by the registry. The borsh variant tag is the
/// first byte of the instruction data.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum RegistryInstruction {
    /// Write the registry configuration record.
    ///
    /// Accounts:
    /// 0. `[writable]` config PDA
    /// 1. `[writable, signer]` admin, pays for the config record
    /// 2. `[]` system program
    Initialize { payload_limit: u16 },

    /// Create a record of `class` at the address derived from `seed`.
    ///
    /// Accounts:
    /// 0. `[writable]` record PDA
    /// 1. `[signer]` authority stored in the record
    /// 2. `[writable, signer]` payer of the reserved balance
    /// 3. `[]` system program
    CreateRecord {
        class: RecordClass,
        seed: String,
        payload: Vec<u8>,
    },

    /// Return a [`crate::state::RecordInfo`] for the record.
    ///
    /// Accounts:
    /// 0. `[]` record
    GetRecordInfo { class: RecordClass },

    /// Return a full [`crate::state::RecordSnapshot`].
    ///
    /// Accounts:
    /// 0. `[]` record
    ReadRecord { class: RecordClass },

    /// Close a dynamic record and pay its reserved balance to the receiver.
    ///
    /// Accounts:
    /// 0. `[writable]` record PDA
    /// 1. `[writable]` receiver
    /// 2. `[signer]` record authority
    CloseRecord { seed: String },

    /// Close path aimed at normal records, which are never closable.
    ///
    /// Accounts: same as `CloseRecord`.
    CloseNormalRecord { seed: String },
}

impl RegistryInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, RegistryError> {
        borsh::from_slice(data).map_err(|_| RegistryError::InvalidInstructionData)
    }
}

pub fn initialize(
    program_id: &Pubkey,
    admin: &Pubkey,
    payload_limit: u16,
) -> Result<Instruction, RegistryError> {
    let (config, _) = derive(CONFIG_NAMESPACE, CONFIG_SEED, program_id)?;
    Ok(Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::Initialize { payload_limit },
        vec![
            AccountMeta::new(config, false),
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
    ))
}

pub fn create_record(
    program_id: &Pubkey,
    class: RecordClass,
    seed: &str,
    payload: &[u8],
    authority: &Pubkey,
    payer: &Pubkey,
) -> Result<Instruction, RegistryError> {
    let (record, _) = derive(class.namespace(), seed, program_id)?;
    Ok(Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::CreateRecord {
            class,
            seed: seed.to_string(),
            payload: payload.to_vec(),
        },
        vec![
            AccountMeta::new(record, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
    ))
}

pub fn get_record_info(program_id: &Pubkey, record: &Pubkey, class: RecordClass) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::GetRecordInfo { class },
        vec![AccountMeta::new_readonly(*record, false)],
    )
}

pub fn read_record(program_id: &Pubkey, record: &Pubkey, class: RecordClass) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::ReadRecord { class },
        vec![AccountMeta::new_readonly(*record, false)],
    )
}

/// Close the dynamic record derived from `seed`.
pub fn close_record(
    program_id: &Pubkey,
    seed: &str,
    receiver: &Pubkey,
    authority: &Pubkey,
) -> Result<Instruction, RegistryError> {
    let (record, _) = derive(RecordClass::Dynamic.namespace(), seed, program_id)?;
    Ok(close_record_at(program_id, &record, seed, receiver, authority))
}

/// Close with an explicitly supplied record account. The processor still
/// re-derives the address from `seed` and rejects a mismatch.
pub fn close_record_at(
    program_id: &Pubkey,
    record: &Pubkey,
    seed: &str,
    receiver: &Pubkey,
    authority: &Pubkey,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::CloseRecord {
            seed: seed.to_string(),
        },
        close_accounts(record, receiver, authority),
    )
}

pub fn close_normal_record(
    program_id: &Pubkey,
    seed: &str,
    receiver: &Pubkey,
    authority: &Pubkey,
) -> Result<Instruction, RegistryError> {
    let (record, _) = derive(RecordClass::Normal.namespace(), seed, program_id)?;
    Ok(Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::CloseNormalRecord {
            seed: seed.to_string(),
        },
        close_accounts(&record, receiver, authority),
    ))
}

fn close_accounts(record: &Pubkey, receiver: &Pubkey, authority: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*record, false),
        AccountMeta::new(*receiver, false),
        AccountMeta::new_readonly(*authority, true),
    ]
}
