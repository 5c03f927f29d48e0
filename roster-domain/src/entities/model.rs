// Runtime configuration carried through the application state

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_path: String,
    pub roster_path: String,
    pub watermark_path: String,
    pub steam_api_url: String,
    pub steam_api_key: Option<String>,
    pub scan_interval_seconds: u64,
    pub request_timeout_seconds: u64,
}
