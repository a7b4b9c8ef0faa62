use std::net::TcpListener;

use actix_governor::Governor;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use common::Pool;

use crate::rate_limiting::build_rate_limiting_conf;
use crate::routes;

pub struct AppState {
    pub db: Pool,
}

pub async fn startup(database: Pool, listener: TcpListener) -> std::io::Result<()> {
    let application_state = AppState { db: database };

    let governor_conf = build_rate_limiting_conf();
    let state = Data::new(application_state);

    HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(state.clone())
            .service(routes::health)
            .service(
                web::scope("/api")
                    .wrap(Governor::new(&governor_conf))
                    .configure(routes::configure)
                    .default_service(web::route().to(routes::route_not_found)),
            )
            .service(actix_files::Files::new("/", "./static/").index_file("index.html"))
    })
    .listen(listener)?
    .run()
    .await
}
