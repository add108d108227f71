use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

use super::traits::ServiceRepository;
use crate::errors::ApiError;
use crate::models::{NewService, Service, ServiceChanges};
use crate::schema::services;

#[derive(Clone)]
pub struct SqliteServiceRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteServiceRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepository {
    async fn list_validated(&self) -> Result<Vec<Service>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = services::table
            .filter(services::is_validated.eq(true))
            .order(services::created_at.desc())
            .load::<Service>(&mut *conn)?;
        Ok(result)
    }

    async fn list_pending(&self) -> Result<Vec<Service>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = services::table
            .filter(services::is_validated.eq(false))
            .order(services::created_at.desc())
            .load::<Service>(&mut *conn)?;
        Ok(result)
    }

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Service>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = services::table
            .filter(services::user_id.eq(user_id))
            .order(services::created_at.desc())
            .load::<Service>(&mut *conn)?;
        Ok(result)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Service>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = services::table
            .find(id)
            .first::<Service>(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn create(&self, service: &NewService) -> Result<Service, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(services::table)
            .values(service)
            .returning(services::all_columns)
            .get_result::<Service>(&mut *conn)?;
        Ok(result)
    }

    async fn update(
        &self,
        id: i32,
        changes: &ServiceChanges,
        now: NaiveDateTime,
    ) -> Result<Service, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::update(services::table.find(id))
            .set((changes, services::updated_at.eq(now)))
            .returning(services::all_columns)
            .get_result::<Service>(&mut *conn)
            .optional()?;
        result.ok_or(ApiError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let mut conn = self.db.lock().unwrap();
        let deleted = diesel::delete(services::table.find(id)).execute(&mut *conn)?;
        if deleted == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn validate(
        &self,
        id: i32,
        admin_id: i32,
        at: NaiveDateTime,
    ) -> Result<Service, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::update(services::table.find(id))
            .set((
                services::is_validated.eq(true),
                services::validated_by.eq(Some(admin_id)),
                services::validated_at.eq(Some(at)),
            ))
            .returning(services::all_columns)
            .get_result::<Service>(&mut *conn)
            .optional()?;
        result.ok_or(ApiError::NotFound)
    }
}
