use serde::{Deserialize, Serialize};

/// Texts sent to actors and broadcast by the host.
///
/// Placeholders: `%prefix%` everywhere, `%current%`/`%max%` in the warning
/// and join notice, `%player%` in the removal broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessagesConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_warning")]
    pub warning: String,
    #[serde(default = "default_removal")]
    pub removal: String,
    #[serde(default = "default_learn")]
    pub learn: String,
    #[serde(default = "default_join_notice")]
    pub join_notice: String,
}

fn default_prefix() -> String {
    "[NewLife]".into()
}

fn default_warning() -> String {
    "%prefix% Please keep the chat friendly. Warning %current%/%max%.".into()
}

fn default_removal() -> String {
    "%prefix% %player% was removed for inappropriate language.".into()
}

fn default_learn() -> String {
    "%prefix% Maybe in a new life, they will learn to be kind.".into()
}

fn default_join_notice() -> String {
    "%prefix% You have %current%/%max% warnings for inappropriate behavior.".into()
}

impl MessagesConfig {
    pub fn render_warning(&self, current: u32, max: u32) -> String {
        self.with_prefix(&self.warning)
            .replace("%current%", &current.to_string())
            .replace("%max%", &max.to_string())
    }

    pub fn render_join_notice(&self, current: u32, max: u32) -> String {
        self.with_prefix(&self.join_notice)
            .replace("%current%", &current.to_string())
            .replace("%max%", &max.to_string())
    }

    pub fn render_removal(&self, player: &str) -> String {
        self.with_prefix(&self.removal).replace("%player%", player)
    }

    pub fn render_learn(&self) -> String {
        self.with_prefix(&self.learn)
    }

    fn with_prefix(&self, template: &str) -> String {
        template.replace("%prefix%", &self.prefix)
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            warning: default_warning(),
            removal: default_removal(),
            learn: default_learn(),
            join_notice: default_join_notice(),
        }
    }
}
