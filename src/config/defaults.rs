pub fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_notice_lifetime_ms() -> u64 {
    5000
}
