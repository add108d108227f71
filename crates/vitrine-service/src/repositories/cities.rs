use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

use super::traits::CityRepository;
use crate::errors::ApiError;
use crate::models::{City, Neighborhood, NewCity, NewNeighborhood};
use crate::schema::{cities, neighborhoods};

#[derive(Clone)]
pub struct SqliteCityRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteCityRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CityRepository for SqliteCityRepository {
    async fn list_cities(&self) -> Result<Vec<City>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = cities::table
            .order(cities::name.asc())
            .load::<City>(&mut *conn)?;
        Ok(result)
    }

    async fn create_city(&self, city: &NewCity) -> Result<City, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(cities::table)
            .values(city)
            .returning(cities::all_columns)
            .get_result::<City>(&mut *conn)?;
        Ok(result)
    }

    async fn rename_city(&self, id: i32, name: &str) -> Result<City, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::update(cities::table.find(id))
            .set(cities::name.eq(name))
            .returning(cities::all_columns)
            .get_result::<City>(&mut *conn)
            .optional()?;
        result.ok_or(ApiError::NotFound)
    }

    async fn delete_city(&self, id: i32) -> Result<(), ApiError> {
        let mut conn = self.db.lock().unwrap();
        diesel::delete(neighborhoods::table.filter(neighborhoods::city_id.eq(id)))
            .execute(&mut *conn)?;
        let deleted = diesel::delete(cities::table.find(id)).execute(&mut *conn)?;
        if deleted == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn list_neighborhoods(
        &self,
        city_id: Option<i32>,
    ) -> Result<Vec<Neighborhood>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let mut query = neighborhoods::table.into_boxed();
        if let Some(city_id) = city_id {
            query = query.filter(neighborhoods::city_id.eq(city_id));
        }
        let result = query
            .order(neighborhoods::name.asc())
            .load::<Neighborhood>(&mut *conn)?;
        Ok(result)
    }

    async fn create_neighborhood(
        &self,
        neighborhood: &NewNeighborhood,
    ) -> Result<Neighborhood, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(neighborhoods::table)
            .values(neighborhood)
            .returning(neighborhoods::all_columns)
            .get_result::<Neighborhood>(&mut *conn)?;
        Ok(result)
    }

    async fn rename_neighborhood(&self, id: i32, name: &str) -> Result<Neighborhood, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::update(neighborhoods::table.find(id))
            .set(neighborhoods::name.eq(name))
            .returning(neighborhoods::all_columns)
            .get_result::<Neighborhood>(&mut *conn)
            .optional()?;
        result.ok_or(ApiError::NotFound)
    }

    async fn delete_neighborhood(&self, id: i32) -> Result<(), ApiError> {
        let mut conn = self.db.lock().unwrap();
        let deleted =
            diesel::delete(neighborhoods::table.find(id)).execute(&mut *conn)?;
        if deleted == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}
