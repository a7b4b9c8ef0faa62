use std::net::TcpListener;

use sqlx::SqlitePool;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request should succeed")
            .json()
            .await
            .expect("response should be JSON")
    }
}

/// Boot the real HTTP server on an OS-assigned port against the given pool.
pub async fn spawn_app(pool: SqlitePool) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("could not bind an ephemeral port");
    let port = listener.local_addr().expect("listener has an address").port();

    // The actix server future is not `Send`, so it cannot be `tokio::spawn`ed
    // onto the test's runtime. Run it on a dedicated thread with its own
    // current-thread runtime instead.
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("could not build server runtime");
        runtime
            .block_on(api::startup::startup(pool, listener))
            .expect("server should run");
    });

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        client: reqwest::Client::new(),
    }
}
