use std::fmt;

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Post(i32),
    Comment(i32),
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeTarget::Post(id) => write!(f, "post {}", id),
            LikeTarget::Comment(id) => write!(f, "comment {}", id),
        }
    }
}
