use super::domain::{Member, MemberId, MemberPatch};

/// Name of the single collection holding every member document.
pub const USERS_COLLECTION: &str = "users";

/// Document-store client for the `users` collection.
///
/// Each call touches one document and is atomic for it; later writes win.
pub trait MemberStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<Member>, StoreError>;
    fn get_by_id(&self, id: &MemberId) -> Result<Option<Member>, StoreError>;
    fn create_or_replace(&self, member: Member) -> Result<(), StoreError>;
    /// Fails with `NotFound` when the document does not exist.
    fn update_fields(&self, id: &MemberId, patch: &MemberPatch) -> Result<Member, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("member {0} not found")]
    NotFound(MemberId),
    #[error("member store unavailable: {0}")]
    Unavailable(String),
}
