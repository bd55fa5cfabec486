use secrecy::ExposeSecret;
use threadpilot_core::config::AppConfig;

use super::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let session_token = match &config.server.session_token {
        Some(token) => redact_token(token.expose_secret()),
        None => "(unset)".to_string(),
    };

    let lines = vec![
        "effective config (precedence: overrides > env > file > default):".to_string(),
        format!("  server.base_url      = {}", config.server.base_url),
        format!("  server.session_token = {session_token}"),
        format!("  server.timeout_secs  = {}", config.server.timeout_secs),
        format!("  plugin.id            = {}", config.plugin.id),
        format!("  plugin.bot_username  = {}", config.plugin.bot_username),
        format!("  logging.level        = {}", config.logging.level),
        format!("  logging.format       = {:?}", config.logging.format),
    ];

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn redact_token(token: &str) -> String {
    if token.is_empty() {
        return "(unset)".to_string();
    }
    if token.chars().count() <= 4 {
        return "****".to_string();
    }
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}****")
}

#[cfg(test)]
mod tests {
    use threadpilot_core::config::AppConfig;

    use super::{redact_token, run};

    #[test]
    fn redacts_session_token() {
        assert_eq!(redact_token(""), "(unset)");
        assert_eq!(redact_token("abc"), "****");
        assert_eq!(redact_token("abcdef123456"), "abcd****");
    }

    #[test]
    fn redacts_tokens_with_multibyte_characters() {
        assert_eq!(redact_token("abcé-rest-of-token"), "abcé****");
        assert_eq!(redact_token("日本語トークン"), "日本語ト****");
        assert_eq!(redact_token("日本"), "****");
    }

    #[test]
    fn never_prints_the_raw_token() {
        let mut config = AppConfig::default();
        config.server.session_token = Some("super-secret-token".to_string().into());

        let result = run(&config);
        assert_eq!(result.exit_code, 0);
        assert!(!result.output.contains("super-secret-token"));
        assert!(result.output.contains("supe****"));
    }

    #[test]
    fn survives_multibyte_tokens() {
        let mut config = AppConfig::default();
        config.server.session_token = Some("abcé-rest-of-token".to_string().into());

        let result = run(&config);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("abcé****"));
        assert!(!result.output.contains("rest-of-token"));
    }
}
