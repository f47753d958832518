/// Session context
///
/// Carries the authenticated backend connection and hands out gateways.
/// Screens receive what they need from here explicitly; there is no
/// ambient global client or auth flag anywhere in the app.
use std::sync::Arc;

use crate::backend::client::{BackendApi, HttpBackend};
use crate::backend::images::ImageGateway;
use crate::backend::tasks::TaskGateway;
use crate::config::Config;

pub struct Session {
    backend: Option<Arc<dyn BackendApi>>,
}

impl Session {
    /// Load credentials and connect. Without credentials the session is
    /// unauthenticated and no gateway is available.
    pub fn establish() -> Self {
        match Config::load() {
            Some(config) => {
                println!("🔐 Session established against {}", config.base_url);
                Self {
                    backend: Some(Arc::new(HttpBackend::new(&config))),
                }
            }
            None => {
                println!(
                    "🔐 No backend credentials found (checked env and {})",
                    Config::file_path().display()
                );
                Self { backend: None }
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.backend.is_some()
    }

    pub fn images(&self) -> Option<ImageGateway> {
        self.backend.clone().map(ImageGateway::new)
    }

    pub fn tasks(&self) -> Option<TaskGateway> {
        self.backend.clone().map(TaskGateway::new)
    }
}
