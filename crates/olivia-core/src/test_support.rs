//! In-memory doubles for the core ports, shared by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use olivia_types::chat::ChatTurn;
use olivia_types::error::{AccountError, RepositoryError};
use olivia_types::identity::{Account, IdentityId, UserProfile};

use crate::chat::history::sort_by_timestamp;
use crate::chat::notify::{ChangeNotifier, snapshot_stream};
use crate::chat::store::{TurnStore, TurnStream};
use crate::identity::hasher::CredentialHasher;
use crate::identity::repository::{AccountRepository, ProfileRepository};
use crate::identity::service::AccountService;

pub type TestAccountService = AccountService<MemoryAccounts, MemoryProfiles, PlainHasher, MemoryTurns>;

pub fn account_service() -> TestAccountService {
    AccountService::new(
        MemoryAccounts::default(),
        MemoryProfiles::default(),
        PlainHasher,
        MemoryTurns::default(),
    )
}

#[derive(Default)]
pub struct MemoryAccounts {
    accounts: Mutex<HashMap<IdentityId, Account>>,
    signed_in: Mutex<Option<IdentityId>>,
}

impl AccountRepository for MemoryAccounts {
    async fn create_account(&self, account: &Account) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(RepositoryError::Conflict(account.email.clone()));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn get_by_id(&self, id: &IdentityId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn update_email(&self, id: &IdentityId, email: &str) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == email && a.id != *id) {
            return Err(RepositoryError::Conflict(email.to_string()));
        }
        let account = accounts.get_mut(id).ok_or(RepositoryError::NotFound)?;
        account.email = email.to_string();
        Ok(())
    }

    async fn update_password_hash(&self, id: &IdentityId, password_hash: &str) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(id).ok_or(RepositoryError::NotFound)?;
        account.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn set_onboarding_complete(&self, id: &IdentityId, complete: bool) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(id).ok_or(RepositoryError::NotFound)?;
        account.onboarding_complete = complete;
        Ok(())
    }

    async fn delete_account(&self, id: &IdentityId) -> Result<(), RepositoryError> {
        self.accounts
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn signed_in(&self) -> Result<Option<IdentityId>, RepositoryError> {
        Ok(*self.signed_in.lock().unwrap())
    }

    async fn set_signed_in(&self, id: Option<&IdentityId>) -> Result<(), RepositoryError> {
        *self.signed_in.lock().unwrap() = id.copied();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryProfiles {
    profiles: Mutex<HashMap<IdentityId, UserProfile>>,
}

impl ProfileRepository for MemoryProfiles {
    async fn get_profile(&self, id: &IdentityId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.profiles.lock().unwrap().get(id).cloned())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.identity_id, profile.clone());
        Ok(())
    }

    async fn delete_profile(&self, id: &IdentityId) -> Result<(), RepositoryError> {
        self.profiles.lock().unwrap().remove(id);
        Ok(())
    }
}

pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AccountError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}

#[derive(Default)]
pub struct MemoryTurns {
    turns: Arc<Mutex<Vec<(IdentityId, ChatTurn)>>>,
    notifier: ChangeNotifier,
    fail_writes: bool,
}

impl MemoryTurns {
    /// A store whose appends all fail with a connection error.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn turns_for(&self, identity: &IdentityId) -> Vec<ChatTurn> {
        turns_of(&self.turns, identity)
    }
}

fn turns_of(turns: &Mutex<Vec<(IdentityId, ChatTurn)>>, identity: &IdentityId) -> Vec<ChatTurn> {
    let mut out: Vec<ChatTurn> = turns
        .lock()
        .unwrap()
        .iter()
        .filter(|(id, _)| id == identity)
        .map(|(_, turn)| turn.clone())
        .collect();
    sort_by_timestamp(&mut out);
    out
}

impl TurnStore for MemoryTurns {
    async fn append(&self, identity: &IdentityId, turn: &ChatTurn) -> Result<bool, RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Connection);
        }
        {
            let mut turns = self.turns.lock().unwrap();
            if turns.iter().any(|(_, t)| t.id == turn.id) {
                return Ok(false);
            }
            turns.push((*identity, turn.clone()));
        }
        self.notifier.notify(identity);
        Ok(true)
    }

    async fn list(&self, identity: &IdentityId) -> Result<Vec<ChatTurn>, RepositoryError> {
        Ok(turns_of(&self.turns, identity))
    }

    fn subscribe(&self, identity: &IdentityId) -> TurnStream {
        let turns = self.turns.clone();
        let identity = *identity;
        snapshot_stream(identity, self.notifier.subscribe(), move || {
            let snapshot = turns_of(&turns, &identity);
            async move { Ok(snapshot) }
        })
    }

    async fn delete_all(&self, identity: &IdentityId) -> Result<u64, RepositoryError> {
        let removed = {
            let mut turns = self.turns.lock().unwrap();
            let before = turns.len();
            turns.retain(|(id, _)| id != identity);
            (before - turns.len()) as u64
        };
        self.notifier.notify(identity);
        Ok(removed)
    }
}
