use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelationError {
    #[error("Relation already exists: {relation}")]
    DuplicateRelation { relation: String },

    #[error("User {user_id} cannot follow themselves")]
    SelfReference { user_id: i32 },

    #[error("Relation not found: {relation}")]
    NotFound { relation: String },
}

impl RelationError {
    pub fn duplicate(relation: impl Into<String>) -> Self {
        Self::DuplicateRelation {
            relation: relation.into(),
        }
    }

    pub fn not_found(relation: impl Into<String>) -> Self {
        Self::NotFound {
            relation: relation.into(),
        }
    }
}
