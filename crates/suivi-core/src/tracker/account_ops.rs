//! User account operations for the Tracker.

use super::Tracker;
use crate::{
    error::Result,
    models::User,
    params::{Id, ListUsers, SignupRequest},
};

impl Tracker {
    /// Requests an account. It stays inactive until activated.
    pub async fn signup(&self, request: &SignupRequest) -> Result<User> {
        let request = request.clone();
        self.with_database(move |db| db.create_user(&request)).await
    }

    pub async fn activate_user(&self, params: &Id) -> Result<User> {
        let id = params.id;
        self.with_database(move |db| db.activate_user(id)).await
    }

    pub async fn get_user(&self, params: &Id) -> Result<Option<User>> {
        let id = params.id;
        self.with_database(move |db| db.get_user(id)).await
    }

    pub async fn list_users(&self, params: &ListUsers) -> Result<Vec<User>> {
        let active_only = params.active_only;
        self.with_database(move |db| db.list_users(active_only))
            .await
    }
}
