use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Post,
    Comment,
    Like,
    Follow,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Post => "post",
            EntityKind::Comment => "comment",
            EntityKind::Like => "like",
            EntityKind::Follow => "follow",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum EntityError {
    /// Referenced id or unique key does not exist, or is hidden from the caller
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },
}

impl EntityError {
    pub fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn user(id: i32) -> Self {
        Self::not_found(EntityKind::User, id)
    }

    pub fn username(username: &str) -> Self {
        Self::not_found(EntityKind::User, username)
    }

    pub fn post(id: i32) -> Self {
        Self::not_found(EntityKind::Post, id)
    }

    pub fn comment(id: i32) -> Self {
        Self::not_found(EntityKind::Comment, id)
    }
}
