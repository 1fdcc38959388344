use std::fmt;

/// Mutations and privileged reads gated by the access policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdatePostText,
    ActivatePost,
    DeactivatePost,
    DeletePost,
    UpdateCommentText,
    ActivateComment,
    DeactivateComment,
    DeleteComment,
    SetUserActive,
    UpdateProfile,
    /// Unfiltered listings and lookups by internal id
    ReadPrivate,
    /// Creating posts, comments, likes and follows
    Contribute,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::UpdatePostText => "update_post_text",
            Action::ActivatePost => "activate_post",
            Action::DeactivatePost => "deactivate_post",
            Action::DeletePost => "delete_post",
            Action::UpdateCommentText => "update_comment_text",
            Action::ActivateComment => "activate_comment",
            Action::DeactivateComment => "deactivate_comment",
            Action::DeleteComment => "delete_comment",
            Action::SetUserActive => "set_user_active",
            Action::UpdateProfile => "update_profile",
            Action::ReadPrivate => "read_private",
            Action::Contribute => "contribute",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
