use crate::error::CoinbaseError;
use crate::model::{ApiObject, CurrentUser, ObjectKind, User};
use crate::rest::endpoints::{V2, path};
use crate::rest::params::UpdateUserRequest;
use crate::rest::CoinbaseClient;

impl CoinbaseClient {
    /// Public profile of any user.
    pub async fn get_user(&self, user_id: &str) -> Result<User, CoinbaseError> {
        self.get_as(&[V2, path::USERS, user_id], None).await
    }

    /// The authenticated user.
    pub async fn get_current_user(&self) -> Result<CurrentUser, CoinbaseError> {
        self.get_as(&[V2, path::USER], None).await
    }

    /// Authentication method and scopes of the current credentials.
    pub async fn get_auth_info(&self) -> Result<ApiObject, CoinbaseError> {
        self.get(&[V2, path::USER, path::AUTH], ObjectKind::Generic, None)
            .await
    }

    pub async fn update_current_user(
        &self,
        request: &UpdateUserRequest,
    ) -> Result<CurrentUser, CoinbaseError> {
        self.put_as(&[V2, path::USER], request, None).await
    }
}
