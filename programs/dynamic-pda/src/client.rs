use borsh::BorshDeserialize;
use solana_program::{instruction::Instruction, pubkey::Pubkey};

use crate::error::RegistryError;
use crate::instruction;
use crate::runtime::Execute;
use crate::state::{RecordClass, RecordInfo, RecordSnapshot};

/// Typed front end over an [`Execute`] implementation.
pub struct RegistryClient<E> {
    executor: E,
    program_id: Pubkey,
}

impl<E: Execute> RegistryClient<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            program_id: crate::ID,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    pub fn initialize(&mut self, admin: &Pubkey, payload_limit: u16) -> Result<(), RegistryError> {
        let ix = instruction::initialize(&self.program_id, admin, payload_limit)?;
        self.executor.execute(&ix).map(drop)
    }

    /// Create a dynamic record and return its address.
    pub fn create_record(
        &mut self,
        seed: &str,
        payload: &[u8],
        authority: &Pubkey,
        payer: &Pubkey,
    ) -> Result<Pubkey, RegistryError> {
        self.create_as(RecordClass::Dynamic, seed, payload, authority, payer)
    }

    pub fn create_normal_record(
        &mut self,
        seed: &str,
        payload: &[u8],
        authority: &Pubkey,
        payer: &Pubkey,
    ) -> Result<Pubkey, RegistryError> {
        self.create_as(RecordClass::Normal, seed, payload, authority, payer)
    }

    pub fn create_as(
        &mut self,
        class: RecordClass,
        seed: &str,
        payload: &[u8],
        authority: &Pubkey,
        payer: &Pubkey,
    ) -> Result<Pubkey, RegistryError> {
        let ix =
            instruction::create_record(&self.program_id, class, seed, payload, authority, payer)?;
        self.call(&ix)
    }

    pub fn get_record_info(&mut self, address: &Pubkey) -> Result<RecordInfo, RegistryError> {
        self.get_record_info_as(address, RecordClass::Dynamic)
    }

    pub fn get_record_info_as(
        &mut self,
        address: &Pubkey,
        class: RecordClass,
    ) -> Result<RecordInfo, RegistryError> {
        let ix = instruction::get_record_info(&self.program_id, address, class);
        self.call(&ix)
    }

    pub fn read_record(&mut self, address: &Pubkey) -> Result<RecordSnapshot, RegistryError> {
        self.read_record_as(address, RecordClass::Dynamic)
    }

    pub fn read_record_as(
        &mut self,
        address: &Pubkey,
        class: RecordClass,
    ) -> Result<RecordSnapshot, RegistryError> {
        let ix = instruction::read_record(&self.program_id, address, class);
        self.call(&ix)
    }

    /// Close the dynamic record for `seed`, returning the lamports paid out.
    pub fn close_record(
        &mut self,
        seed: &str,
        receiver: &Pubkey,
        authority: &Pubkey,
    ) -> Result<u64, RegistryError> {
        let ix = instruction::close_record(&self.program_id, seed, receiver, authority)?;
        self.call(&ix)
    }

    pub fn close_normal_record(
        &mut self,
        seed: &str,
        receiver: &Pubkey,
        authority: &Pubkey,
    ) -> Result<u64, RegistryError> {
        let ix = instruction::close_normal_record(&self.program_id, seed, receiver, authority)?;
        self.call(&ix)
    }

    /// Submit an instruction built elsewhere and decode its return data.
    pub fn call<T: BorshDeserialize>(&mut self, ix: &Instruction) -> Result<T, RegistryError> {
        let data = self.executor.execute(ix)?;
        borsh::from_slice(&data).map_err(|_| RegistryError::InvalidReturnData)
    }
}
