// Stores layer - Data access and repository pattern
pub mod comment_store;
pub mod follow_store;
pub mod like_store;
pub mod post_store;
pub mod user_store;

pub use comment_store::CommentStore;
pub use follow_store::FollowStore;
pub use like_store::{LikeMirrors, LikeStore};
pub use post_store::{PostCounter, PostStore};
pub use user_store::{NewUser, UserCounter, UserStore};
