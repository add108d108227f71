use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::ApiError;
use crate::models::{
    City, Event, EventChanges, Neighborhood, NewCity, NewEvent, NewNeighborhood, NewPlace,
    NewService, NewUser, Place, PlaceChanges, Service, ServiceChanges, User, UserProfileChanges,
};

/// Events. `list_current` applies the public visibility gate (upcoming
/// or still-ongoing) server-side; `list_all` is the admin/creator
/// surface and returns everything.
#[async_trait]
pub trait EventRepository: Clone + Send + Sync + 'static {
    async fn list_current(&self, today: NaiveDateTime) -> Result<Vec<Event>, ApiError>;
    async fn list_all(&self) -> Result<Vec<Event>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, ApiError>;
    async fn create(&self, event: &NewEvent) -> Result<Event, ApiError>;
    async fn update(&self, id: i32, changes: &EventChanges) -> Result<Event, ApiError>;
    async fn delete(&self, id: i32) -> Result<(), ApiError>;
    async fn set_highlighted(&self, id: i32, highlighted: bool) -> Result<Event, ApiError>;
    /// Likes toggle: returns the new liked state for this user.
    async fn toggle_like(&self, user_id: i32, event_id: i32) -> Result<bool, ApiError>;
}

/// Places. The public listing only sees published records; creators and
/// admins go through `list_all`.
#[async_trait]
pub trait PlaceRepository: Clone + Send + Sync + 'static {
    async fn list_published(&self) -> Result<Vec<Place>, ApiError>;
    async fn list_all(&self) -> Result<Vec<Place>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Place>, ApiError>;
    async fn create(&self, place: &NewPlace) -> Result<Place, ApiError>;
    async fn update(&self, id: i32, changes: &PlaceChanges) -> Result<Place, ApiError>;
    async fn delete(&self, id: i32) -> Result<(), ApiError>;
}

/// Service providers. Public listing sees validated entries only;
/// `list_by_owner` is the owner-scoped surface and bypasses the gate.
#[async_trait]
pub trait ServiceRepository: Clone + Send + Sync + 'static {
    async fn list_validated(&self) -> Result<Vec<Service>, ApiError>;
    async fn list_pending(&self) -> Result<Vec<Service>, ApiError>;
    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Service>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Service>, ApiError>;
    async fn create(&self, service: &NewService) -> Result<Service, ApiError>;
    async fn update(
        &self,
        id: i32,
        changes: &ServiceChanges,
        now: NaiveDateTime,
    ) -> Result<Service, ApiError>;
    async fn delete(&self, id: i32) -> Result<(), ApiError>;
    async fn validate(
        &self,
        id: i32,
        admin_id: i32,
        at: NaiveDateTime,
    ) -> Result<Service, ApiError>;
}

/// The location vocabulary the filter UI offers.
#[async_trait]
pub trait CityRepository: Clone + Send + Sync + 'static {
    async fn list_cities(&self) -> Result<Vec<City>, ApiError>;
    async fn create_city(&self, city: &NewCity) -> Result<City, ApiError>;
    async fn rename_city(&self, id: i32, name: &str) -> Result<City, ApiError>;
    /// Removes the city's neighborhoods first.
    async fn delete_city(&self, id: i32) -> Result<(), ApiError>;
    async fn list_neighborhoods(&self, city_id: Option<i32>)
    -> Result<Vec<Neighborhood>, ApiError>;
    async fn create_neighborhood(
        &self,
        neighborhood: &NewNeighborhood,
    ) -> Result<Neighborhood, ApiError>;
    async fn rename_neighborhood(&self, id: i32, name: &str) -> Result<Neighborhood, ApiError>;
    async fn delete_neighborhood(&self, id: i32) -> Result<(), ApiError>;
}

/// Profiles keyed by the external identity provider's id.
#[async_trait]
pub trait UserRepository: Clone + Send + Sync + 'static {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    async fn update_profile(
        &self,
        external_id: &str,
        changes: &UserProfileChanges,
    ) -> Result<User, ApiError>;
    async fn is_admin(&self, external_id: &str) -> Result<bool, ApiError>;
}
