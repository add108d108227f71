use axum::Router;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

pub mod config;
pub mod errors;
pub mod listing;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod saved;
pub mod schema;
pub mod validation;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use repositories::{
    SqliteCityRepository, SqliteEventRepository, SqlitePlaceRepository, SqliteServiceRepository,
    SqliteUserRepository,
};
use saved::{InMemorySavedItems, SavedItemsStore};

/// Everything the route handlers need from the application: one
/// repository per entity kind plus the viewer's saved-items overlay.
/// Generic so tests can substitute fakes per repository.
pub trait AppState: Clone + Send + Sync + 'static {
    type Events: repositories::EventRepository;
    type Places: repositories::PlaceRepository;
    type Services: repositories::ServiceRepository;
    type Cities: repositories::CityRepository;
    type Users: repositories::UserRepository;
    type Saved: SavedItemsStore + Clone;

    fn event_repo(&self) -> Self::Events;
    fn place_repo(&self) -> Self::Places;
    fn service_repo(&self) -> Self::Services;
    fn city_repo(&self) -> Self::Cities;
    fn user_repo(&self) -> Self::Users;
    fn saved_items(&self) -> Self::Saved;
}

#[derive(Clone)]
pub struct DefaultAppState {
    db: Arc<Mutex<SqliteConnection>>,
    saved: InMemorySavedItems,
}

impl DefaultAppState {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self {
            db,
            saved: InMemorySavedItems::new(),
        }
    }
}

impl AppState for DefaultAppState {
    type Events = SqliteEventRepository;
    type Places = SqlitePlaceRepository;
    type Services = SqliteServiceRepository;
    type Cities = SqliteCityRepository;
    type Users = SqliteUserRepository;
    type Saved = InMemorySavedItems;

    fn event_repo(&self) -> Self::Events {
        SqliteEventRepository::new(self.db.clone())
    }

    fn place_repo(&self) -> Self::Places {
        SqlitePlaceRepository::new(self.db.clone())
    }

    fn service_repo(&self) -> Self::Services {
        SqliteServiceRepository::new(self.db.clone())
    }

    fn city_repo(&self) -> Self::Cities {
        SqliteCityRepository::new(self.db.clone())
    }

    fn user_repo(&self) -> Self::Users {
        SqliteUserRepository::new(self.db.clone())
    }

    fn saved_items(&self) -> Self::Saved {
        self.saved.clone()
    }
}

pub fn create_app(state: DefaultAppState) -> Router {
    routes::create_router().with_state(state)
}
