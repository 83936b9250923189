//! User repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide CRUD over the authoritative user collection.
//! - Assign monotonically increasing ids and stamp timestamps.
//!
//! # Invariants
//! - Ids start at 1, are never decremented and never reused after delete.
//! - Listing order is insertion order; update keeps a record in place.
//! - Each operation runs under one lock, so id assignment and
//!   locate-then-mutate sequences cannot interleave.
//! - Callers only ever receive clones, never references into storage.

use crate::clock::{Clock, SystemClock};
use crate::model::user::{User, UserId, UserInput};
use log::debug;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const FIRST_USER_ID: UserId = 1;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for id-addressed user operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoError {
    NotFound(UserId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "user not found: {id}"),
        }
    }
}

impl Error for RepoError {}

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    /// Returns every stored user in insertion order.
    fn get_all(&self) -> Vec<User>;
    fn get_by_id(&self, id: UserId) -> RepoResult<User>;
    /// Stores a new user under the next id and returns the stored record.
    fn create(&self, input: &UserInput) -> User;
    /// Replaces name/email/age, keeping `id` and `created_at`.
    fn update(&self, id: UserId, input: &UserInput) -> RepoResult<User>;
    fn delete(&self, id: UserId) -> RepoResult<()>;
}

impl<R: UserRepository + ?Sized> UserRepository for &R {
    fn get_all(&self) -> Vec<User> {
        (**self).get_all()
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        (**self).get_by_id(id)
    }

    fn create(&self, input: &UserInput) -> User {
        (**self).create(input)
    }

    fn update(&self, id: UserId, input: &UserInput) -> RepoResult<User> {
        (**self).update(id, input)
    }

    fn delete(&self, id: UserId) -> RepoResult<()> {
        (**self).delete(id)
    }
}

impl<R: UserRepository + ?Sized> UserRepository for std::sync::Arc<R> {
    fn get_all(&self) -> Vec<User> {
        (**self).get_all()
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        (**self).get_by_id(id)
    }

    fn create(&self, input: &UserInput) -> User {
        (**self).create(input)
    }

    fn update(&self, id: UserId, input: &UserInput) -> RepoResult<User> {
        (**self).update(id, input)
    }

    fn delete(&self, id: UserId) -> RepoResult<()> {
        (**self).delete(id)
    }
}

#[derive(Debug)]
struct UserTable {
    users: Vec<User>,
    next_id: UserId,
}

impl UserTable {
    fn position(&self, id: UserId) -> Option<usize> {
        self.users.iter().position(|user| user.id == id)
    }
}

/// Process-local user repository. State is lost when the process exits.
#[derive(Debug)]
pub struct InMemoryUserRepository<C: Clock = SystemClock> {
    table: Mutex<UserTable>,
    clock: C,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryUserRepository<C> {
    /// Creates an empty repository stamping timestamps from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            table: Mutex::new(UserTable {
                users: Vec::new(),
                next_id: FIRST_USER_ID,
            }),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.table.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.lock().users.is_empty()
    }
}

impl<C: Clock> UserRepository for InMemoryUserRepository<C> {
    fn get_all(&self) -> Vec<User> {
        self.table.lock().users.clone()
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        let table = self.table.lock();
        table
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn create(&self, input: &UserInput) -> User {
        let mut table = self.table.lock();
        let now = self.clock.now();
        let user = User {
            id: table.next_id,
            name: input.name.clone(),
            email: input.email.clone(),
            age: input.age,
            created_at: now,
            updated_at: now,
        };
        table.next_id += 1;
        table.users.push(user.clone());

        debug!(
            "event=user_insert module=repo status=ok user_id={} total={}",
            user.id,
            table.users.len()
        );
        user
    }

    fn update(&self, id: UserId, input: &UserInput) -> RepoResult<User> {
        let mut table = self.table.lock();
        let index = table.position(id).ok_or(RepoError::NotFound(id))?;
        let now = self.clock.now();

        let stored = &mut table.users[index];
        stored.name = input.name.clone();
        stored.email = input.email.clone();
        stored.age = input.age;
        stored.updated_at = now;

        debug!("event=user_replace module=repo status=ok user_id={id}");
        Ok(stored.clone())
    }

    fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut table = self.table.lock();
        let index = table.position(id).ok_or(RepoError::NotFound(id))?;
        table.users.remove(index);

        debug!(
            "event=user_remove module=repo status=ok user_id={id} total={}",
            table.users.len()
        );
        Ok(())
    }
}
