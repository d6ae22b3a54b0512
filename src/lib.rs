#[macro_use]
extern crate rocket;

pub mod db;
pub mod posts;
pub mod routes;

pub type DbPool = std::sync::Mutex<rusqlite::Connection>;

/// Extension trait for DbPool to recover from mutex poison
pub trait DbPoolExt {
    fn conn(&self) -> std::sync::MutexGuard<'_, rusqlite::Connection>;
}

impl DbPoolExt for DbPool {
    fn conn(&self) -> std::sync::MutexGuard<'_, rusqlite::Connection> {
        self.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn create_rocket(conn: rusqlite::Connection) -> rocket::Rocket<rocket::Build> {
    let cors = rocket_cors::CorsOptions::default()
        .allowed_origins(rocket_cors::AllowedOrigins::all())
        .to_cors()
        .expect("CORS config");

    rocket::build()
        .manage(std::sync::Mutex::new(conn))
        .attach(cors)
        .mount("/", routes![
            routes::health,
            routes::list_posts,
            routes::create_post,
            routes::update_post,
            routes::delete_post,
        ])
        .register("/", catchers![routes::not_found, routes::unprocessable, routes::internal_error])
}
