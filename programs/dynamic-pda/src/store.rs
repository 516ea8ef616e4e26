//! Arena-backed account storage.
//!
//! Every account, record or plain wallet, occupies a slot in one arena and is
//! reached through an index-plus-generation [`SlotHandle`]. Closing a record
//! frees its slot and leaves a retired entry in the address table, so the
//! address can never be allocated again.

use std::collections::HashMap;

use solana_program::{pubkey, pubkey::Pubkey, rent::Rent};
use thiserror::Error;

/// Owner of plain wallets. Only these may pay for or receive lamports.
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage already exists at this address")]
    AlreadyAllocated,

    #[error("address was deallocated and is retired")]
    Retired,

    #[error("payer balance is below the reserve")]
    InsufficientFunds,

    #[error("slot handle no longer refers to live storage")]
    StaleHandle,

    #[error("receiver cannot be the account being deallocated")]
    InvalidReceiver,

    #[error("lamports can only move through system-owned accounts")]
    NotSystemOwned,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Index into the arena plus the generation the slot had when handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    index: usize,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub lamports: u64,
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u64,
    occupant: Option<(Pubkey, Account)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Live(SlotHandle),
    Retired,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    slots: Vec<Slot>,
    free: Vec<usize>,
    addresses: HashMap<Pubkey, Entry>,
    rent: Rent,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Rent::default())
    }
}

impl Ledger {
    pub fn new(rent: Rent) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            addresses: HashMap::new(),
            rent,
        }
    }

    pub fn rent(&self) -> &Rent {
        &self.rent
    }

    /// Lamports a record of `size` bytes locks up.
    pub fn reserve_for(&self, size: usize) -> u64 {
        self.rent.minimum_balance(size)
    }

    pub fn lookup(&self, address: &Pubkey) -> Option<SlotHandle> {
        match self.addresses.get(address) {
            Some(Entry::Live(handle)) => Some(*handle),
            _ => None,
        }
    }

    pub fn is_retired(&self, address: &Pubkey) -> bool {
        matches!(self.addresses.get(address), Some(Entry::Retired))
    }

    pub fn account(&self, address: &Pubkey) -> Option<&Account> {
        let handle = self.lookup(address)?;
        self.account_at(handle).ok()
    }

    pub fn account_at(&self, handle: SlotHandle) -> Result<&Account, StoreError> {
        self.occupant(handle).map(|(_, account)| account)
    }

    pub fn address_of(&self, handle: SlotHandle) -> Result<&Pubkey, StoreError> {
        self.occupant(handle).map(|(address, _)| address)
    }

    pub fn data(&self, handle: SlotHandle) -> Result<&[u8], StoreError> {
        self.account_at(handle).map(|account| account.data.as_slice())
    }

    pub fn data_mut(&mut self, handle: SlotHandle) -> Result<&mut [u8], StoreError> {
        self.occupant_mut(handle)
            .map(|(_, account)| account.data.as_mut_slice())
    }

    /// Balance of `address`, zero when nothing lives there.
    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.account(address).map_or(0, |account| account.lamports)
    }

    /// Credit a wallet, creating it as a system account if needed.
    pub fn fund(&mut self, address: &Pubkey, lamports: u64) -> Result<(), StoreError> {
        match self.addresses.get(address).copied() {
            Some(Entry::Retired) => Err(StoreError::Retired),
            Some(Entry::Live(handle)) => {
                let (_, account) = self.occupant_mut(handle)?;
                account.lamports = account
                    .lamports
                    .checked_add(lamports)
                    .ok_or(StoreError::ArithmeticOverflow)?;
                Ok(())
            }
            None => {
                self.insert(
                    *address,
                    Account {
                        lamports,
                        owner: SYSTEM_PROGRAM_ID,
                        data: Vec::new(),
                    },
                );
                Ok(())
            }
        }
    }

    /// Reserve `size` zeroed bytes at `address`, funded by `payer`.
    ///
    /// A bare system account already sitting at `address` is taken over: its
    /// lamports count toward the reserve and `payer` covers the shortfall.
    /// Nothing changes unless every check passes.
    pub fn allocate(
        &mut self,
        address: &Pubkey,
        size: usize,
        owner: &Pubkey,
        payer: &Pubkey,
    ) -> Result<SlotHandle, StoreError> {
        let prefunded = match self.addresses.get(address).copied() {
            Some(Entry::Retired) => return Err(StoreError::Retired),
            Some(Entry::Live(handle)) => {
                let account = self.account_at(handle)?;
                let bare_wallet = account.owner == SYSTEM_PROGRAM_ID && account.data.is_empty();
                // A wallet cannot pay for its own takeover.
                if !bare_wallet || address == payer {
                    return Err(StoreError::AlreadyAllocated);
                }
                Some((handle, account.lamports))
            }
            None => None,
        };
        let existing = prefunded.map_or(0, |(_, lamports)| lamports);

        let reserve = self.reserve_for(size);
        let shortfall = reserve.saturating_sub(existing);
        let payer_handle = self.lookup(payer).ok_or(StoreError::InsufficientFunds)?;
        let (_, payer_account) = self.occupant_mut(payer_handle)?;
        if payer_account.owner != SYSTEM_PROGRAM_ID {
            return Err(StoreError::NotSystemOwned);
        }
        payer_account.lamports = payer_account
            .lamports
            .checked_sub(shortfall)
            .ok_or(StoreError::InsufficientFunds)?;

        let account = Account {
            lamports: existing.max(reserve),
            owner: *owner,
            data: vec![0u8; size],
        };
        match prefunded {
            Some((handle, _)) => {
                let (_, slot) = self.occupant_mut(handle)?;
                *slot = account;
                Ok(handle)
            }
            None => Ok(self.insert(*address, account)),
        }
    }

    /// Zero the slot, pay its whole balance to `receiver` and retire the
    /// address. Returns the lamports released.
    pub fn deallocate(&mut self, handle: SlotHandle, receiver: &Pubkey) -> Result<u64, StoreError> {
        let (address, account) = self.occupant(handle)?;
        if address == receiver {
            return Err(StoreError::InvalidReceiver);
        }
        let address = *address;
        let released = account.lamports;

        match self.addresses.get(receiver).copied() {
            Some(Entry::Retired) => return Err(StoreError::Retired),
            Some(Entry::Live(receiver_handle)) => {
                if self.account_at(receiver_handle)?.owner != SYSTEM_PROGRAM_ID {
                    return Err(StoreError::NotSystemOwned);
                }
            }
            None => {}
        }
        self.balance(receiver)
            .checked_add(released)
            .ok_or(StoreError::ArithmeticOverflow)?;

        let slot = &mut self.slots[handle.index];
        if let Some((_, mut account)) = slot.occupant.take() {
            account.data.fill(0);
        }
        slot.generation += 1;
        self.free.push(handle.index);
        self.addresses.insert(address, Entry::Retired);

        self.fund(receiver, released)?;
        Ok(released)
    }

    /// Lamports held by live accounts owned by `owner`.
    pub fn reserved_by(&self, owner: &Pubkey) -> u64 {
        self.slots
            .iter()
            .filter_map(|slot| slot.occupant.as_ref())
            .filter(|(_, account)| account.owner == *owner)
            .fold(0u64, |total, (_, account)| total.saturating_add(account.lamports))
    }

    pub fn total_lamports(&self) -> u128 {
        self.slots
            .iter()
            .filter_map(|slot| slot.occupant.as_ref())
            .map(|(_, account)| u128::from(account.lamports))
            .sum()
    }

    fn insert(&mut self, address: Pubkey, account: Account) -> SlotHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.occupant = Some((address, account));
        let handle = SlotHandle {
            index,
            generation: slot.generation,
        };
        self.addresses.insert(address, Entry::Live(handle));
        handle
    }

    fn occupant(&self, handle: SlotHandle) -> Result<&(Pubkey, Account), StoreError> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.occupant.as_ref())
            .ok_or(StoreError::StaleHandle)
    }

    fn occupant_mut(&mut self, handle: SlotHandle) -> Result<&mut (Pubkey, Account), StoreError> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.occupant.as_mut())
            .ok_or(StoreError::StaleHandle)
    }
}
