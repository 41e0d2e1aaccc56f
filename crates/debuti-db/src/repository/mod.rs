//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PersistentAuth.login(..)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionRepository   save / load / clear the "auth_user" slot          │
//! │       │              (JSON-encodes debuti_core::User)                   │
//! │       ▼                                                                 │
//! │  KvRepository        get / set / delete rows in kv_store               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`kv::KvRepository`] - Generic string slots
//! - [`session::SessionRepository`] - The signed-in user slot

pub mod kv;
pub mod session;
