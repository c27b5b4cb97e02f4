use newlife::Config;
use newlife::moderation::WarningStore;

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

/// Actors with a persisted warning, or `None` when the file cannot be read.
pub fn persisted_warned_actors(config: &Config) -> Option<usize> {
    let store = WarningStore::new(config.warnings_path());
    match store.load() {
        Ok(warnings) => Some(warnings.values().filter(|count| **count > 0).count()),
        Err(error) => {
            tracing::warn!(
                path = %store.path().display(),
                error = %format!("{error:#}"),
                "could not read persisted warning counts"
            );
            None
        }
    }
}

pub fn render_status(config: &Config, warned_actors: Option<usize>) -> String {
    let mut lines = vec![
        format!("◆ {}", t!("status.title")),
        String::new(),
        format!("{}        {}", t!("status.version"), env!("CARGO_PKG_VERSION")),
        format!("{}         {}", t!("status.config"), config.config_path.display()),
        format!("{}       {}", t!("status.data_dir"), config.data_dir().display()),
        String::new(),
        format!("  {}        {}", t!("status.oracle"), config.api.endpoint),
        format!("  {}       {}ms", t!("status.timeout"), config.api.timeout),
        format!(
            "  {}      {}ms",
            t!("status.check_interval"),
            config.check_interval
        ),
        format!(
            "  {}         {} entries, {}s ttl",
            t!("status.cache"),
            config.cache.max_size,
            config.cache.expire_after_write
        ),
        format!(
            "  {}      {}, max {}",
            t!("status.warnings"),
            on_off(config.enable_warnings),
            config.max_warnings
        ),
        format!("  {}       {}", t!("status.effects"), on_off(config.enable_effects)),
    ];

    if config.enable_logging {
        lines.push(format!(
            "  {} {}",
            t!("status.logging"),
            config.violation_log_path().display()
        ));
    } else {
        lines.push(format!("  {} {}", t!("status.logging"), on_off(false)));
    }

    lines.push(format!(
        "  {}        {}",
        t!("status.admins"),
        if config.admins.is_empty() {
            "(none)".to_string()
        } else {
            config.admins.join(", ")
        }
    ));

    if let Some(actors) = warned_actors {
        lines.push(format!("  {} {actors}", t!("status.persisted")));
    }

    lines.join("\n")
}
