use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

use super::traits::PlaceRepository;
use crate::errors::ApiError;
use crate::models::{NewPlace, Place, PlaceChanges};
use crate::schema::places;

#[derive(Clone)]
pub struct SqlitePlaceRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqlitePlaceRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlaceRepository for SqlitePlaceRepository {
    async fn list_published(&self) -> Result<Vec<Place>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = places::table
            .filter(places::published.eq(true))
            .order(places::date_created.desc())
            .load::<Place>(&mut *conn)?;
        Ok(result)
    }

    async fn list_all(&self) -> Result<Vec<Place>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = places::table
            .order(places::date_created.desc())
            .load::<Place>(&mut *conn)?;
        Ok(result)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Place>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = places::table
            .find(id)
            .first::<Place>(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn create(&self, place: &NewPlace) -> Result<Place, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(places::table)
            .values(place)
            .returning(places::all_columns)
            .get_result::<Place>(&mut *conn)?;
        Ok(result)
    }

    async fn update(&self, id: i32, changes: &PlaceChanges) -> Result<Place, ApiError> {
        let mut conn = self.db.lock().unwrap();
        match diesel::update(places::table.find(id))
            .set(changes)
            .returning(places::all_columns)
            .get_result::<Place>(&mut *conn)
        {
            Ok(place) => Ok(place),
            Err(diesel::result::Error::QueryBuilderError(_)) => {
                Err(ApiError::BadRequest("No fields to update".to_string()))
            }
            Err(diesel::result::Error::NotFound) => Err(ApiError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let mut conn = self.db.lock().unwrap();
        let deleted = diesel::delete(places::table.find(id)).execute(&mut *conn)?;
        if deleted == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}
