use crate::keys::KeyType;
use crate::morph::MorphKeyType;
use crate::performer::PerformerMode;
use anyhow::{Result, anyhow};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub database_url: Option<String>,
    pub use_perform_by: bool,
    pub performer_mode: PerformerMode,
    pub user_key_type: KeyType,
    pub users_table: String,
    pub users_key: String,
    pub fake_mail_domain: String,
    pub morph_key_type: MorphKeyType,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            use_perform_by: true,
            performer_mode: PerformerMode::Users,
            user_key_type: KeyType::Int,
            users_table: "users".to_string(),
            users_key: "id".to_string(),
            fake_mail_domain: "localdomain".to_string(),
            morph_key_type: MorphKeyType::Int,
        }
    }
}

/// Non-fatal configuration problems reported by [`AuditConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    EmptyUsersTable,
    EmptyMailDomain,
    StringUserKey,
}

impl ConfigIssue {
    pub fn description(&self) -> String {
        match self {
            Self::EmptyUsersTable => "AUDIT_USERS_TABLE is empty".to_string(),
            Self::EmptyMailDomain => "AUDIT_FAKE_MAIL_DOMAIN is empty".to_string(),
            Self::StringUserKey => {
                "AUDIT_USER_KEY_TYPE=string stores performers as unchecked text keys".to_string()
            }
        }
    }
}

impl AuditConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env early so process env reads pick it up.
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").ok();
        let use_perform_by = env_bool("AUDIT_USE_PERFORM_BY", defaults.use_perform_by);
        let performer_mode = env::var("AUDIT_PERFORMER_MODE")
            .map(|raw| PerformerMode::from_config(&raw))
            .unwrap_or(defaults.performer_mode);

        let user_key_type = match env::var("AUDIT_USER_KEY_TYPE") {
            Ok(raw) => raw
                .parse::<KeyType>()
                .map_err(|err| anyhow!("AUDIT_USER_KEY_TYPE: {}", err))?,
            Err(_) => defaults.user_key_type,
        };
        let morph_key_type = match env::var("AUDIT_MORPH_KEY_TYPE") {
            Ok(raw) => raw
                .parse::<MorphKeyType>()
                .map_err(|err| anyhow!("AUDIT_MORPH_KEY_TYPE: {}", err))?,
            Err(_) => defaults.morph_key_type,
        };

        let users_table = env::var("AUDIT_USERS_TABLE").unwrap_or(defaults.users_table);
        let users_key = env::var("AUDIT_USERS_KEY").unwrap_or(defaults.users_key);
        let fake_mail_domain = env::var("AUDIT_FAKE_MAIL_DOMAIN")
            .or_else(|_| env::var("FAKE_MAIL_DOMAIN"))
            .unwrap_or(defaults.fake_mail_domain);

        let config = Self {
            database_url,
            use_perform_by,
            performer_mode,
            user_key_type,
            users_table,
            users_key,
            fake_mail_domain,
            morph_key_type,
        };
        for issue in config.validate() {
            tracing::warn!(issue = %issue.description(), "audit configuration issue");
        }
        Ok(config)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.users_table.trim().is_empty() {
            issues.push(ConfigIssue::EmptyUsersTable);
        }
        if self.fake_mail_domain.trim().is_empty() {
            issues.push(ConfigIssue::EmptyMailDomain);
        }
        if self.user_key_type == KeyType::String {
            issues.push(ConfigIssue::StringUserKey);
        }
        issues
    }

    pub fn with_performer_mode(mut self, mode: PerformerMode) -> Self {
        self.performer_mode = mode;
        self
    }

    pub fn with_user_key_type(mut self, key_type: KeyType) -> Self {
        self.user_key_type = key_type;
        self
    }

    pub fn with_morph_key_type(mut self, key_type: MorphKeyType) -> Self {
        self.morph_key_type = key_type;
        self
    }

    pub fn with_perform_by(mut self, enabled: bool) -> Self {
        self.use_perform_by = enabled;
        self
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert!(config.use_perform_by);
        assert_eq!(config.performer_mode, PerformerMode::Users);
        assert_eq!(config.user_key_type, KeyType::Int);
        assert_eq!(config.users_table, "users");
        assert_eq!(config.fake_mail_domain, "localdomain");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_issues() {
        let mut config = AuditConfig::default().with_user_key_type(KeyType::String);
        config.users_table = " ".to_string();
        config.fake_mail_domain = String::new();
        assert_eq!(
            config.validate(),
            vec![
                ConfigIssue::EmptyUsersTable,
                ConfigIssue::EmptyMailDomain,
                ConfigIssue::StringUserKey
            ]
        );
    }

    #[test]
    fn test_builders() {
        let config = AuditConfig::default()
            .with_performer_mode(PerformerMode::Plain)
            .with_user_key_type(KeyType::Uuid)
            .with_morph_key_type(MorphKeyType::Any)
            .with_perform_by(false);
        assert_eq!(config.performer_mode, PerformerMode::Plain);
        assert_eq!(config.user_key_type, KeyType::Uuid);
        assert_eq!(config.morph_key_type, MorphKeyType::Any);
        assert!(!config.use_perform_by);
    }
}
