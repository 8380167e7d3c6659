//! `/user/{id}` endpoints: the extended profile.

use reqwest::Method;
use tracing::instrument;

use santafe_core::CustomerId;

use crate::models::UserProfile;

use super::types::{RecordEnvelope, UpdateUserRequest};
use super::{ApiClient, ApiError, ApiResponse};

fn user_path(id: &CustomerId) -> String {
    format!("/user/{}", urlencoding::encode(id.as_str()))
}

impl ApiClient {
    /// Fetch the extended profile.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self, id), fields(customer_id = %id))]
    pub async fn get_user(&self, id: &CustomerId) -> Result<ApiResponse<UserProfile>, ApiError> {
        let response = self
            .call::<RecordEnvelope<UserProfile>, ()>(Method::GET, &user_path(id), None)
            .await?;
        Ok(response.required())
    }

    /// Replace the extended profile.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self, request), fields(customer_id = %request.id))]
    pub async fn update_user(
        &self,
        request: &UpdateUserRequest,
    ) -> Result<ApiResponse<Option<UserProfile>>, ApiError> {
        self.call::<RecordEnvelope<UserProfile>, _>(Method::PUT, &user_path(&request.id), Some(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_path_encodes_id() {
        assert_eq!(user_path(&CustomerId::new("c1")), "/user/c1");
        assert_eq!(user_path(&CustomerId::new("a/b c")), "/user/a%2Fb%20c");
    }
}
