pub mod cities;
pub mod events;
pub mod places;
pub mod services;
pub mod traits;
pub mod users;

pub use cities::SqliteCityRepository;
pub use events::SqliteEventRepository;
pub use places::SqlitePlaceRepository;
pub use services::SqliteServiceRepository;
pub use traits::{
    CityRepository, EventRepository, PlaceRepository, ServiceRepository, UserRepository,
};
pub use users::SqliteUserRepository;
