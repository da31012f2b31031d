use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::Session;
use crate::infrastructure::AppConfig;

/// Shared handler state. The session mutex serialises actions, so a process
/// action and a question never run at the same time.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(session: Session, config: AppConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config: Arc::new(config),
        }
    }
}
