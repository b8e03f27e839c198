use std::collections::HashSet;

use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, reviewer) in config.reviewers.iter().enumerate() {
        let name = reviewer.trim();
        if name.is_empty() {
            errors.push(format!("reviewers[{}]: name cannot be empty", i));
        } else if !seen.insert(name) {
            errors.push(format!("reviewers[{}]: duplicate reviewer '{}'", i, name));
        }
    }

    if let Some(ref path) = config.store_path {
        if path.as_os_str().is_empty() {
            errors.push("store_path: cannot be empty".to_string());
        } else if path.is_dir() {
            errors.push(format!("store_path: '{}' is a directory", path.display()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config {
            reviewers: vec!["alice".to_string(), "bob".to_string()],
            store_path: Some(PathBuf::from("determinations.json")),
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_reviewer_name() {
        let config = Config {
            reviewers: vec!["  ".to_string()],
            store_path: None,
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("reviewers[0]"));
    }

    #[test]
    fn test_store_path_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            reviewers: vec![],
            store_path: Some(dir.path().to_path_buf()),
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("is a directory"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            reviewers: vec!["alice".to_string(), "".to_string(), "alice".to_string()],
            store_path: Some(PathBuf::new()),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
