use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{
    ValidationError, check_event_window, require_text, validate_email, validate_link,
    validate_optional_link,
};

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub link: String,
    pub date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub uf: String,
    pub category: String,
    pub source: String,
    pub image: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub highlighted: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = crate::schema::events)]
pub struct NewEvent {
    pub title: String,
    pub link: String,
    pub date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub uf: String,
    pub category: String,
    pub source: String,
    pub image: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl NewEvent {
    /// Trims and validates a submission before it reaches the database.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = require_text("title", &self.title)?;
        self.link = validate_link(&self.link)?;
        self.uf = require_text("uf", &self.uf)?;
        self.category = require_text("category", &self.category)?;
        self.source = require_text("source", &self.source)?;
        self.image = validate_optional_link(self.image)?;
        check_event_window(self.date, self.end_date)?;
        Ok(self)
    }
}

#[derive(Debug, Default, AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::events)]
pub struct EventChanges {
    pub title: Option<String>,
    pub link: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub uf: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub highlighted: Option<bool>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::places)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Place {
    pub id: i32,
    pub place_name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub published: bool,
    pub date_created: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = crate::schema::places)]
pub struct NewPlace {
    pub place_name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl NewPlace {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.place_name = require_text("place_name", &self.place_name)?;
        self.city = require_text("city", &self.city)?;
        self.link = validate_optional_link(self.link)?;
        self.image = validate_optional_link(self.image)?;
        Ok(self)
    }
}

#[derive(Debug, Default, AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::places)]
pub struct PlaceChanges {
    pub place_name: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::services)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Service {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub city: String,
    pub neighborhood: String,
    pub main_service: String,
    pub email: String,
    pub phone: Option<String>,
    pub show_phone: bool,
    pub is_validated: bool,
    pub validated_by: Option<i32>,
    pub validated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = crate::schema::services)]
pub struct NewService {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub city: String,
    pub neighborhood: String,
    pub main_service: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub show_phone: bool,
}

impl NewService {
    /// New services always start unvalidated; the admin surface flips
    /// `is_validated` later.
    pub fn validated_input(mut self) -> Result<Self, ValidationError> {
        self.title = require_text("title", &self.title)?;
        self.description = require_text("description", &self.description)?;
        self.city = require_text("city", &self.city)?;
        self.neighborhood = require_text("neighborhood", &self.neighborhood)?;
        self.main_service = require_text("main_service", &self.main_service)?;
        self.email = validate_email(&self.email)?;
        Ok(self)
    }
}

#[derive(Debug, Default, AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::services)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub main_service: Option<String>,
    pub phone: Option<String>,
    pub show_phone: Option<bool>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::cities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct City {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = crate::schema::cities)]
pub struct NewCity {
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::neighborhoods)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Neighborhood {
    pub id: i32,
    pub city_id: i32,
    pub name: String,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = crate::schema::neighborhoods)]
pub struct NewNeighborhood {
    pub city_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Default, AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::users)]
pub struct UserProfileChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::likes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Like {
    pub id: i32,
    pub user_id: i32,
    pub event_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::likes)]
pub struct NewLike {
    pub user_id: i32,
    pub event_id: i32,
}
