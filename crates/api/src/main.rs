use std::env;
use std::net::TcpListener;

use api::startup;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Init dotenv
    dotenvy::dotenv().ok();

    let subscriber = common::observability::get_subscriber("info");
    common::observability::init_subscriber(subscriber);

    let database = common::init_database_connection().await;

    let listener = TcpListener::bind(
        env::var("NEWSROOM_LISTEN_ON").unwrap_or_else(|_| String::from("0.0.0.0:8080")),
    )?;

    startup::startup(database, listener).await
}
