//! Process-wide configuration.
//!
//! Settings are read at call time: builders take a snapshot of the global
//! configuration for every statement unless they carry an explicit override.
//!
//! ```toml
//! map_camel_case_to_underscore = true
//! ignore_cache_exception = true
//! ```

use crate::error::OrmResult;
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::{PoisonError, RwLock};

/// Global switches shared by the builders and the cache wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfiguration {
    /// Render `userLevel` as the column `user_level`.
    pub map_camel_case_to_underscore: bool,
    /// Decorate cache backends so failures are logged instead of propagated.
    pub ignore_cache_exception: bool,
}

static GLOBAL: RwLock<GlobalConfiguration> = RwLock::new(GlobalConfiguration {
    map_camel_case_to_underscore: false,
    ignore_cache_exception: false,
});

impl GlobalConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_camel_case_to_underscore(mut self, enabled: bool) -> Self {
        self.map_camel_case_to_underscore = enabled;
        self
    }

    pub fn ignore_cache_exception(mut self, enabled: bool) -> Self {
        self.ignore_cache_exception = enabled;
        self
    }

    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> OrmResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Snapshot of the current process-wide configuration.
    pub fn global() -> Self {
        GLOBAL
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the process-wide configuration.
    pub fn set_global(config: GlobalConfiguration) {
        *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Modify the process-wide configuration in place.
    pub fn update_global(f: impl FnOnce(&mut GlobalConfiguration)) {
        let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Column name for a logical field name under this configuration.
    pub fn column_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.map_camel_case_to_underscore {
            // Dotted names keep their qualifier untouched.
            match name.rsplit_once('.') {
                Some((qualifier, column)) => {
                    Cow::Owned(format!("{qualifier}.{}", column.to_snake_case()))
                }
                None => Cow::Owned(name.to_snake_case()),
            }
        } else {
            Cow::Borrowed(name)
        }
    }
}
