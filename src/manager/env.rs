//! Environment variable handling for configuration
//!
//! Maps schema dot-paths to environment variable names and looks them up in
//! an environment snapshot.
//!
//! Naming: segments are uppercased and joined with `__`; a prefix, when
//! present, is uppercased and joined with a single `_`.
//!
//! | prefix  | path            | variable               |
//! |---------|-----------------|------------------------|
//! | `MYAPP` | `debug`         | `MYAPP_DEBUG`          |
//! | `MYAPP` | `database.host` | `MYAPP_DATABASE__HOST` |
//! | none    | `database.host` | `DATABASE__HOST`       |

use std::collections::HashMap;

/// Separator between nesting levels in a variable name
pub const NESTING_SEPARATOR: &str = "__";

/// Handles environment variable naming and lookups
#[derive(Debug, Clone, Default)]
pub struct EnvironmentHandler {
    prefix: Option<String>,
}

impl EnvironmentHandler {
    /// `prefix` is uppercased; trailing underscores and an empty prefix are
    /// ignored
    pub fn new(prefix: Option<&str>) -> Self {
        let prefix = prefix
            .map(|p| p.trim_end_matches('_').to_uppercase())
            .filter(|p| !p.is_empty());
        Self { prefix }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Environment variable name for a dot-path
    ///
    /// # Example
    ///
    /// ```
    /// use layerconf::EnvironmentHandler;
    ///
    /// let env = EnvironmentHandler::new(Some("myapp"));
    /// assert_eq!(env.var_name("database.host"), "MYAPP_DATABASE__HOST");
    ///
    /// let bare = EnvironmentHandler::new(None);
    /// assert_eq!(bare.var_name("database.host"), "DATABASE__HOST");
    /// ```
    pub fn var_name(&self, path: &str) -> String {
        let key = path
            .split('.')
            .map(str::to_uppercase)
            .collect::<Vec<_>>()
            .join(NESTING_SEPARATOR);
        match &self.prefix {
            Some(prefix) => format!("{prefix}_{key}"),
            None => key,
        }
    }

    /// Raw override for `path`, if the snapshot has one
    ///
    /// Returns the variable name alongside the value for logging.
    pub fn get_override<'a>(
        &self,
        env: &'a HashMap<String, String>,
        path: &str,
    ) -> Option<(String, &'a str)> {
        let name = self.var_name(path);
        let value = env.get(&name)?;
        Some((name, value.as_str()))
    }
}
