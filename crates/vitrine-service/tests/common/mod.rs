use chrono::{Duration, NaiveDateTime, Utc};
use diesel::{Connection, sqlite::SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use vitrine_service::models::{NewEvent, NewPlace, NewService, NewUser};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    connection
        .run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    connection
}

/// An event starting `days_from_now` days from the current instant.
/// Negative offsets produce past events, which the public listing gate
/// must hide.
pub fn event_with_offset(title: &str, category: &str, days_from_now: i64) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        link: format!(
            "https://example.com/eventos/{}",
            title.to_lowercase().replace(' ', "-")
        ),
        date: days_offset(days_from_now),
        end_date: None,
        uf: "RJ".to_string(),
        category: category.to_string(),
        source: "Prefeitura".to_string(),
        image: None,
        location: None,
        description: None,
    }
}

pub fn place_in(name: &str, city: &str, published: bool) -> NewPlace {
    NewPlace {
        place_name: name.to_string(),
        short_description: None,
        description: None,
        city: city.to_string(),
        neighborhood: None,
        address: None,
        category: Some("Praia".to_string()),
        image: None,
        link: None,
        published,
    }
}

pub fn service_by(user_id: i32, title: &str, main_service: &str) -> NewService {
    NewService {
        user_id,
        title: title.to_string(),
        description: "Atendimento em toda a regi\u{e3}o".to_string(),
        city: "Maric\u{e1}".to_string(),
        neighborhood: "Centro".to_string(),
        main_service: main_service.to_string(),
        email: "contato@example.com".to_string(),
        phone: None,
        show_phone: false,
    }
}

pub fn user_with_external_id(external_id: &str) -> NewUser {
    NewUser {
        external_id: external_id.to_string(),
        email: format!("{external_id}@example.com"),
        name: None,
        city: None,
        bio: None,
    }
}

pub fn days_offset(days: i64) -> NaiveDateTime {
    (Utc::now() + Duration::days(days)).naive_utc()
}

pub mod test_utils {
    use super::*;
    use diesel::prelude::*;
    use vitrine_service::models::{Event, Place, Service, User};
    use vitrine_service::schema::{events, places, services, users};

    pub fn insert_event(conn: &mut SqliteConnection, event: &NewEvent) -> Event {
        diesel::insert_into(events::table)
            .values(event)
            .returning(events::all_columns)
            .get_result(conn)
            .expect("Failed to insert event")
    }

    pub fn insert_place(conn: &mut SqliteConnection, place: &NewPlace) -> Place {
        diesel::insert_into(places::table)
            .values(place)
            .returning(places::all_columns)
            .get_result(conn)
            .expect("Failed to insert place")
    }

    pub fn insert_service(conn: &mut SqliteConnection, service: &NewService) -> Service {
        diesel::insert_into(services::table)
            .values(service)
            .returning(services::all_columns)
            .get_result(conn)
            .expect("Failed to insert service")
    }

    pub fn insert_user(conn: &mut SqliteConnection, user: &NewUser, is_admin: bool) -> User {
        let inserted: User = diesel::insert_into(users::table)
            .values(user)
            .returning(users::all_columns)
            .get_result(conn)
            .expect("Failed to insert user");

        if !is_admin {
            return inserted;
        }

        diesel::update(users::table.find(inserted.id))
            .set(users::is_admin.eq(true))
            .returning(users::all_columns)
            .get_result(conn)
            .expect("Failed to promote user to admin")
    }

    pub fn count_events(conn: &mut SqliteConnection) -> i64 {
        events::table
            .count()
            .get_result(conn)
            .expect("Failed to count events")
    }

    pub fn set_event_highlighted(conn: &mut SqliteConnection, id: i32, highlighted: bool) {
        diesel::update(events::table.find(id))
            .set(events::highlighted.eq(highlighted))
            .execute(conn)
            .expect("Failed to set highlighted flag");
    }

    pub fn set_place_date_created(conn: &mut SqliteConnection, id: i32, at: NaiveDateTime) {
        diesel::update(places::table.find(id))
            .set(places::date_created.eq(at))
            .execute(conn)
            .expect("Failed to set place creation date");
    }
}

pub mod server_utils {
    use super::*;
    use axum_test::TestServer;
    use std::sync::{Arc, Mutex};
    use vitrine_service::{DefaultAppState, routes};

    pub fn create_test_server() -> (TestServer, Arc<Mutex<SqliteConnection>>) {
        let connection = establish_test_connection();
        let db = Arc::new(Mutex::new(connection));

        let state = DefaultAppState::new(db.clone());
        let app = routes::create_router().with_state(state);

        let server = TestServer::new(app).unwrap();
        (server, db)
    }
}
