use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediAI";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/MediAI/ on all platforms; the current directory when no home is known
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the resources directory (rules.json, doctors.json overrides)
pub fn resources_dir() -> PathBuf {
    app_data_dir().join("resources")
}

/// Log filter used when RUST_LOG is unset
pub fn default_log_filter() -> &'static str {
    "mediai_lib=info"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resources_dir_under_app_data() {
        let resources = resources_dir();
        let app = app_data_dir();
        assert!(resources.starts_with(&app));
        assert!(resources.ends_with("resources"));
        assert!(app.ends_with(APP_NAME));
    }

    #[test]
    fn override_files_resolve_inside_resources_dir() {
        let rules = resources_dir().join(crate::intelligence::catalog::RULES_FILE);
        let doctors = resources_dir().join(crate::intelligence::reference::DOCTORS_FILE);
        assert!(rules.ends_with("resources/rules.json"));
        assert!(doctors.ends_with("resources/doctors.json"));
    }

    #[test]
    fn default_filter_targets_this_crate() {
        assert!(default_log_filter().starts_with("mediai_lib"));
    }

    #[test]
    fn default_filter_is_a_valid_directive() {
        assert!(tracing_subscriber::EnvFilter::try_new(default_log_filter()).is_ok());
    }
}
