use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{hash::hash, pubkey::Pubkey};

use crate::error::RegistryError;

pub const DISCRIMINATOR_LEN: usize = 8;

/// Longest seed accepted by the address deriver, in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Payload bound used until `initialize` stores a different one.
pub const DEFAULT_PAYLOAD_LIMIT: u16 = 100;

/// Hard ceiling for any configured payload limit.
pub const MAX_PAYLOAD_LEN: u16 = 1024;

pub const CONFIG_NAMESPACE: &[u8] = b"registry_config";
pub const CONFIG_SEED: &str = "";

pub type Discriminator = [u8; DISCRIMINATOR_LEN];

/// First 8 bytes of `sha256("account:<name>")`.
pub fn discriminator_for(name: &str) -> Discriminator {
    let digest = hash(format!("account:{name}").as_bytes()).to_bytes();
    let mut tag = [0u8; DISCRIMINATOR_LEN];
    tag.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    tag
}

/// Anything stored in the registry that carries a discriminator.
pub trait AccountClass {
    fn name(&self) -> &'static str;

    fn discriminator(&self) -> Discriminator {
        discriminator_for(self.name())
    }
}

/// Compare the tag at the start of `raw` with the one `expected` writes.
///
/// Storage for every class shares one layout convention, so this is the only
/// thing standing between a record and code written for another class.
pub fn validate_discriminator(raw: &[u8], expected: &impl AccountClass) -> bool {
    raw.get(..DISCRIMINATOR_LEN)
        .is_some_and(|tag| tag == expected.discriminator().as_slice())
}

/// The record classes that share the registry's storage.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordClass {
    /// Records created and closed through the dynamic path.
    Dynamic,
    /// Records that may be created and read but never closed.
    Normal,
}

impl RecordClass {
    pub const ALL: [RecordClass; 2] = [RecordClass::Dynamic, RecordClass::Normal];

    pub const fn namespace(self) -> &'static [u8] {
        match self {
            RecordClass::Dynamic => b"dynamic_pda",
            RecordClass::Normal => b"normal_pda",
        }
    }

    /// Whether the close path may destroy records of this class.
    pub const fn closable(self) -> bool {
        match self {
            RecordClass::Dynamic => true,
            RecordClass::Normal => false,
        }
    }

    pub fn from_discriminator(raw: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| validate_discriminator(raw, class))
    }
}

impl AccountClass for RecordClass {
    fn name(&self) -> &'static str {
        match self {
            RecordClass::Dynamic => "DynamicRecord",
            RecordClass::Normal => "NormalRecord",
        }
    }
}

/// Everything in a record after the discriminator.
///
/// Layout: `[seed: u32 len + bytes][payload: u32 len + bytes][authority: 32]`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordBody {
    pub seed: String,
    pub payload: Vec<u8>,
    pub authority: Pubkey,
}

impl RecordBody {
    /// Exact byte size of a record holding this body, discriminator included.
    pub fn space(&self) -> usize {
        DISCRIMINATOR_LEN + 4 + self.seed.len() + 4 + self.payload.len() + 32
    }

    /// Write the discriminator first, then the body.
    pub fn write(&self, class: RecordClass, data: &mut [u8]) -> Result<(), RegistryError> {
        if data.len() < self.space() {
            return Err(RegistryError::InvalidAccountData);
        }
        data[..DISCRIMINATOR_LEN].copy_from_slice(&class.discriminator());
        let mut cursor = &mut data[DISCRIMINATOR_LEN..];
        self.serialize(&mut cursor)
            .map_err(|_| RegistryError::InvalidAccountData)
    }

    /// Decode the body. The discriminator must already have been checked.
    pub fn read(data: &[u8]) -> Result<Self, RegistryError> {
        let mut body = data
            .get(DISCRIMINATOR_LEN..)
            .ok_or(RegistryError::InvalidAccountData)?;
        Self::deserialize(&mut body).map_err(|_| RegistryError::InvalidAccountData)
    }
}

/// Seed, payload length and authority, read without copying the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub seed: String,
    pub payload_len: u32,
    pub authority: Pubkey,
}

impl RecordHeader {
    pub fn read(data: &[u8]) -> Result<Self, RegistryError> {
        let invalid = |_| RegistryError::InvalidAccountData;
        let mut buf = data
            .get(DISCRIMINATOR_LEN..)
            .ok_or(RegistryError::InvalidAccountData)?;
        let seed = String::deserialize(&mut buf).map_err(invalid)?;
        let payload_len = u32::deserialize(&mut buf).map_err(invalid)?;
        buf = buf
            .get(payload_len as usize..)
            .ok_or(RegistryError::InvalidAccountData)?;
        let authority = Pubkey::deserialize(&mut buf).map_err(invalid)?;
        Ok(Self {
            seed,
            payload_len,
            authority,
        })
    }
}

/// Full, immutable copy of an active record.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub address: Pubkey,
    pub class: RecordClass,
    pub bump: u8,
    pub seed: String,
    pub payload: Vec<u8>,
    pub authority: Pubkey,
    pub reserved_balance: u64,
}

/// What `get_record_info` reports: the record minus its payload bytes.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    pub address: Pubkey,
    pub class: RecordClass,
    pub seed: String,
    pub authority: Pubkey,
    pub payload_len: u32,
    pub reserved_balance: u64,
}

/// Registry-wide settings written once by `initialize`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub admin: Pubkey,
    pub payload_limit: u16,
    pub bump: u8,
}

impl RegistryConfig {
    /// discriminator + admin + payload_limit + bump
    pub const LEN: usize = DISCRIMINATOR_LEN + 32 + 2 + 1;

    pub fn write(&self, data: &mut [u8]) -> Result<(), RegistryError> {
        if data.len() < Self::LEN {
            return Err(RegistryError::InvalidAccountData);
        }
        data[..DISCRIMINATOR_LEN].copy_from_slice(&ConfigClass.discriminator());
        let mut cursor = &mut data[DISCRIMINATOR_LEN..];
        self.serialize(&mut cursor)
            .map_err(|_| RegistryError::InvalidAccountData)
    }

    pub fn read(data: &[u8]) -> Result<Self, RegistryError> {
        let mut body = data
            .get(DISCRIMINATOR_LEN..)
            .ok_or(RegistryError::InvalidAccountData)?;
        Self::deserialize(&mut body).map_err(|_| RegistryError::InvalidAccountData)
    }
}

/// Tag for the configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigClass;

impl AccountClass for ConfigClass {
    fn name(&self) -> &'static str {
        "RegistryConfig"
    }
}
