use relay_service::config::{GeminiSettings, RelayConfig, ServerConfig, WikipediaSettings};
use relay_service::services::providers::{LookupProvider, TextProvider};
use relay_service::startup::{AppState, Application};
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application on a random port with the given providers
    /// substituted for the real clients.
    pub async fn spawn(
        text_provider: Arc<dyn TextProvider>,
        lookup_provider: Arc<dyn LookupProvider>,
    ) -> Self {
        let config = RelayConfig {
            server: ServerConfig { port: 0 },
            gemini: GeminiSettings {
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
            },
            wikipedia: WikipediaSettings {
                // Unreachable on purpose; tests never hit the real API.
                api_url: "http://127.0.0.1:9/w/api.php".to_string(),
            },
        };

        let state = AppState {
            config,
            text_provider,
            lookup_provider,
        };

        let app = Application::with_state(state)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint.
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            client,
        }
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send request")
    }
}
