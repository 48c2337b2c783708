//! Session state management.
//!
//! This module provides:
//! - `SessionStore`: reads, saves, and clears the persisted session record
//! - `Storage`: the key-value persistence trait the store is built over
//!
//! Sessions expire one hour after login; the navigation guard clears
//! stale records as a side effect of evaluating a transition.

pub mod session;
pub mod storage;

pub use session::{SessionRecord, SessionStore, UserInfo, SESSION_TTL_MS};
pub use storage::{FileStorage, MemoryStorage, Storage};
