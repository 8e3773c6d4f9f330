#[macro_use]
extern crate diesel;

mod availability;
mod booking;
mod connection;
mod database;
mod email;
mod message;
mod models;
mod notification;
mod profile;
mod protocol;
mod review;
mod schema;
mod utils;

use actix_web::{middleware, web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, PgConnection};
use std::time::Duration;

type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let conn_url = std::env::var("DATABASE_URL").expect("DATABASE_URL not found");
    let manager = ConnectionManager::<PgConnection>::new(conn_url);
    let pool = r2d2::Pool::builder()
        .connection_timeout(Duration::from_secs(5))
        .build(manager)
        .expect("Failed to create pool");

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("listening on {}", bind);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .data(pool.clone())
            .service(
                web::scope("/profile")
                    .configure(profile::config),
            )
            .service(
                web::scope("/availability")
                    .configure(availability::config),
            )
            .service(
                web::scope("/booking")
                    .configure(booking::config),
            )
            .service(
                web::scope("/review")
                    .configure(review::config),
            )
            .service(
                web::scope("/connection")
                    .configure(connection::config),
            )
            .service(
                web::scope("/message")
                    .configure(message::config),
            )
            .service(
                web::scope("/notification")
                    .configure(notification::config),
            )
    })
    .bind(&bind)?
    .run()
    .await
}
