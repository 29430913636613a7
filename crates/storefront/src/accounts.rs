use crate::model::{User, UserId};
use crate::user_actor::UserError;
use async_trait::async_trait;

/// Customer lookup used by invoicing and the admin order overview.
#[async_trait]
pub trait AccountReader: Send + Sync {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserError>;
}
