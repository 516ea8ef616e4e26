use solana_program::{instruction::AccountMeta, msg, pubkey::Pubkey};

use crate::derive::{derive, verify};
use crate::error::RegistryError;
use crate::guard::{self, require_signer};
use crate::instructions::Context;
use crate::state::{
    ConfigClass, RegistryConfig, CONFIG_NAMESPACE, CONFIG_SEED, DEFAULT_PAYLOAD_LIMIT,
    MAX_PAYLOAD_LEN,
};
use crate::store::{Ledger, StoreError};

pub struct Initialize<'a> {
    pub config: &'a AccountMeta,
    pub admin: &'a AccountMeta,
}

impl<'a> Initialize<'a> {
    pub fn parse(accounts: &'a [AccountMeta]) -> Result<Self, RegistryError> {
        let [config, admin, _system_program] = accounts else {
            return Err(RegistryError::NotEnoughAccountKeys);
        };
        require_signer(admin)?;
        Ok(Self { config, admin })
    }
}

pub fn initialize(ctx: Context<Initialize>, payload_limit: u16) -> Result<(), RegistryError> {
    if payload_limit > MAX_PAYLOAD_LEN {
        msg!("Payload limit {} exceeds {}", payload_limit, MAX_PAYLOAD_LEN);
        return Err(RegistryError::PayloadTooLarge);
    }

    let (config_address, bump) = derive(CONFIG_NAMESPACE, CONFIG_SEED, ctx.program_id)?;
    if ctx.accounts.config.pubkey != config_address {
        return Err(RegistryError::InvalidRecordAddress);
    }

    let admin = ctx.accounts.admin.pubkey;
    let handle = ctx
        .ledger
        .allocate(&config_address, RegistryConfig::LEN, ctx.program_id, &admin)
        .map_err(|err| match err {
            StoreError::AlreadyAllocated => RegistryError::AlreadyInitialized,
            other => other.into(),
        })?;

    let config = RegistryConfig {
        admin,
        payload_limit,
        bump,
    };
    config.write(ctx.ledger.data_mut(handle)?)?;

    msg!("Registry initialized, program id: {}", ctx.program_id);
    Ok(())
}

/// The stored configuration, if `initialize` has run.
pub fn load_config(
    ledger: &Ledger,
    program_id: &Pubkey,
) -> Result<Option<RegistryConfig>, RegistryError> {
    let (config_address, _) = derive(CONFIG_NAMESPACE, CONFIG_SEED, program_id)?;
    if ledger.lookup(&config_address).is_none() {
        return Ok(None);
    }
    let checked = guard::load(ledger, program_id, &config_address, ConfigClass)?;
    let config = RegistryConfig::read(ledger.data(checked.handle())?)?;
    verify(
        &config_address,
        CONFIG_NAMESPACE,
        CONFIG_SEED,
        config.bump,
        program_id,
    )?;
    Ok(Some(config))
}

pub fn payload_limit(ledger: &Ledger, program_id: &Pubkey) -> Result<u16, RegistryError> {
    Ok(load_config(ledger, program_id)?
        .map_or(DEFAULT_PAYLOAD_LIMIT, |config| config.payload_limit))
}
