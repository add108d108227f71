use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

use super::traits::EventRepository;
use crate::errors::ApiError;
use crate::models::{Event, EventChanges, NewEvent, NewLike};
use crate::schema::{events, likes};

#[derive(Clone)]
pub struct SqliteEventRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteEventRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn list_current(&self, today: NaiveDateTime) -> Result<Vec<Event>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = events::table
            .filter(
                events::date
                    .ge(today)
                    .nullable()
                    .or(events::end_date.ge(today)),
            )
            .order(events::date.asc())
            .load::<Event>(&mut *conn)?;
        Ok(result)
    }

    async fn list_all(&self) -> Result<Vec<Event>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = events::table
            .order(events::date.asc())
            .load::<Event>(&mut *conn)?;
        Ok(result)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = events::table
            .find(id)
            .first::<Event>(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn create(&self, event: &NewEvent) -> Result<Event, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(events::table)
            .values(event)
            .returning(events::all_columns)
            .get_result::<Event>(&mut *conn)?;
        Ok(result)
    }

    async fn update(&self, id: i32, changes: &EventChanges) -> Result<Event, ApiError> {
        let mut conn = self.db.lock().unwrap();
        match diesel::update(events::table.find(id))
            .set(changes)
            .returning(events::all_columns)
            .get_result::<Event>(&mut *conn)
        {
            Ok(event) => Ok(event),
            Err(diesel::result::Error::QueryBuilderError(_)) => {
                Err(ApiError::BadRequest("No fields to update".to_string()))
            }
            Err(diesel::result::Error::NotFound) => Err(ApiError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let mut conn = self.db.lock().unwrap();
        // Likes reference the event and go first.
        diesel::delete(likes::table.filter(likes::event_id.eq(id))).execute(&mut *conn)?;
        let deleted = diesel::delete(events::table.find(id)).execute(&mut *conn)?;
        if deleted == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn set_highlighted(&self, id: i32, highlighted: bool) -> Result<Event, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::update(events::table.find(id))
            .set(events::highlighted.eq(highlighted))
            .returning(events::all_columns)
            .get_result::<Event>(&mut *conn)
            .optional()?;
        result.ok_or(ApiError::NotFound)
    }

    async fn toggle_like(&self, user_id: i32, event_id: i32) -> Result<bool, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let existing = likes::table
            .filter(likes::user_id.eq(user_id))
            .filter(likes::event_id.eq(event_id))
            .select(likes::id)
            .first::<i32>(&mut *conn)
            .optional()?;

        match existing {
            Some(like_id) => {
                diesel::delete(likes::table.find(like_id)).execute(&mut *conn)?;
                Ok(false)
            }
            None => {
                diesel::insert_into(likes::table)
                    .values(NewLike { user_id, event_id })
                    .execute(&mut *conn)?;
                Ok(true)
            }
        }
    }
}
