use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    connection
        .run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    connection
}

pub mod test_utils {
    use super::*;
    use crate::models::{Event, NewEvent, NewPlace, NewService, NewUser, Place, Service, User};
    use crate::schema::{events, places, services, users};
    use chrono::NaiveDateTime;

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
