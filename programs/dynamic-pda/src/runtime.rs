//! In-process host for the registry.
//!
//! [`Execute`] is the seam between the registry and whatever submits
//! instructions to a ledger. [`Bank`] implements it over an in-memory
//! [`Ledger`] with transaction semantics: an instruction that fails leaves
//! no trace.

use solana_program::{instruction::Instruction, pubkey::Pubkey};

use crate::error::RegistryError;
use crate::processor::process_instruction;
use crate::store::Ledger;

pub trait Execute {
    /// Run one instruction atomically and hand back its return data.
    fn execute(&mut self, instruction: &Instruction) -> Result<Vec<u8>, RegistryError>;
}

impl<E: Execute + ?Sized> Execute for &mut E {
    fn execute(&mut self, instruction: &Instruction) -> Result<Vec<u8>, RegistryError> {
        (**self).execute(instruction)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bank {
    ledger: Ledger,
}

impl Bank {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Credit `to` out of thin air. Wallet funding is the only way lamports
    /// enter the ledger.
    pub fn airdrop(&mut self, to: &Pubkey, lamports: u64) -> Result<(), RegistryError> {
        self.ledger.fund(to, lamports).map_err(RegistryError::from)
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.ledger.balance(address)
    }
}

impl Execute for Bank {
    fn execute(&mut self, instruction: &Instruction) -> Result<Vec<u8>, RegistryError> {
        let checkpoint = self.ledger.clone();
        let result = process_instruction(
            &instruction.program_id,
            &mut self.ledger,
            &instruction.accounts,
            &instruction.data,
        );
        if result.is_err() {
            self.ledger = checkpoint;
        }
        result
    }
}
