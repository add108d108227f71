use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

use super::traits::UserRepository;
use crate::errors::ApiError;
use crate::models::{NewUser, User, UserProfileChanges};
use crate::schema::users;

#[derive(Clone)]
pub struct SqliteUserRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = users::table
            .filter(users::external_id.eq(external_id))
            .first::<User>(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(users::table)
            .values(user)
            .returning(users::all_columns)
            .get_result::<User>(&mut *conn)?;
        Ok(result)
    }

    async fn update_profile(
        &self,
        external_id: &str,
        changes: &UserProfileChanges,
    ) -> Result<User, ApiError> {
        let mut conn = self.db.lock().unwrap();
        match diesel::update(users::table.filter(users::external_id.eq(external_id)))
            .set(changes)
            .returning(users::all_columns)
            .get_result::<User>(&mut *conn)
        {
            Ok(user) => Ok(user),
            Err(diesel::result::Error::QueryBuilderError(_)) => {
                Err(ApiError::BadRequest("No fields to update".to_string()))
            }
            Err(diesel::result::Error::NotFound) => Err(ApiError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn is_admin(&self, external_id: &str) -> Result<bool, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = users::table
            .filter(users::external_id.eq(external_id))
            .select(users::is_admin)
            .first::<bool>(&mut *conn)
            .optional()?;
        Ok(result.unwrap_or(false))
    }
}
