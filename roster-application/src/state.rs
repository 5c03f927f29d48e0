use std::sync::Arc;

use roster_domain::{NicknameResolver, RosterRepository, RuntimeConfig, WatermarkRepository};

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub roster_repo: Arc<dyn RosterRepository>,
    pub watermark_repo: Arc<dyn WatermarkRepository>,
    pub resolver: Arc<dyn NicknameResolver>,
    pub metrics: Arc<Metrics>,
}
