use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("NEWLIFE_API_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.api.endpoint = endpoint;
        }

        if let Ok(timeout_str) = std::env::var("NEWLIFE_API_TIMEOUT_MS")
            && let Ok(timeout) = timeout_str.parse::<u64>()
            && timeout > 0
        {
            self.api.timeout = timeout;
        }

        if let Ok(max_str) = std::env::var("NEWLIFE_MAX_WARNINGS")
            && let Ok(max) = max_str.parse::<u32>()
            && max > 0
        {
            self.max_warnings = max;
        }

        if let Ok(dir) = std::env::var("NEWLIFE_DATA_DIR")
            && !dir.is_empty()
        {
            self.data_dir = Some(dir);
        }
    }
}
