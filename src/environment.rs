use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Reads and parses an environment variable, falling back to `default`.
///
/// An unparseable value is logged and ignored rather than treated as fatal.
pub fn get_env_var_or<T>(var: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring invalid value '{}' for {}: {}", raw, var, e);
                default
            }
        },
        _ => default,
    }
}

/// Reads a boolean flag; accepts true/false, 1/0, yes/no and on/off.
pub fn get_env_flag(var: &str, default: bool) -> bool {
    match env::var(var) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            "" => default,
            other => {
                warn!("Ignoring invalid flag '{}' for {}", other, var);
                default
            }
        },
        Err(_) => default,
    }
}

/// Reads an optional, non-empty environment variable.
pub fn get_env_var_opt(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared
    // across test threads.

    #[test]
    fn test_get_env_var_or() {
        env::set_var("NEWSDEDUP_TEST_THRESHOLD", "0.75");
        assert_eq!(get_env_var_or("NEWSDEDUP_TEST_THRESHOLD", 0.3), 0.75);

        env::set_var("NEWSDEDUP_TEST_BAD_THRESHOLD", "high");
        assert_eq!(get_env_var_or("NEWSDEDUP_TEST_BAD_THRESHOLD", 0.3), 0.3);

        assert_eq!(get_env_var_or("NEWSDEDUP_TEST_UNSET", 7u64), 7);
    }

    #[test]
    fn test_get_env_flag() {
        env::set_var("NEWSDEDUP_TEST_FLAG_OFF", "false");
        env::set_var("NEWSDEDUP_TEST_FLAG_ON", " YES ");
        env::set_var("NEWSDEDUP_TEST_FLAG_BAD", "maybe");

        assert!(!get_env_flag("NEWSDEDUP_TEST_FLAG_OFF", true));
        assert!(get_env_flag("NEWSDEDUP_TEST_FLAG_ON", false));
        assert!(get_env_flag("NEWSDEDUP_TEST_FLAG_BAD", true));
        assert!(get_env_flag("NEWSDEDUP_TEST_FLAG_UNSET", true));
    }

    #[test]
    fn test_get_env_var_opt() {
        env::set_var("NEWSDEDUP_TEST_BLANK", "  ");
        assert_eq!(get_env_var_opt("NEWSDEDUP_TEST_BLANK"), None);
        assert_eq!(get_env_var_opt("NEWSDEDUP_TEST_OPT_UNSET"), None);
    }
}
