//! Plugin version parsing
//!
//! The plugin version is injected at build time through the
//! `TUNNEL_BOOT_PLUGIN_VERSION` environment variable and must have the form
//! `<major>.<minor>.<build>`.

use serde::Serialize;

const NUM_COMPONENTS: usize = 3;

/// Version string compiled into the binary
pub const PLUGIN_VERSION: &str = match option_env!("TUNNEL_BOOT_PLUGIN_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// A parsed `<major>.<minor>.<build>` version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PluginVersion {
    pub major: i64,
    pub minor: i64,
    pub build: i64,
}

impl PluginVersion {
    pub fn new(major: i64, minor: i64, build: i64) -> Self {
        Self { major, minor, build }
    }
}

impl std::fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Parse a plugin version string
///
/// If the string is invalid, `fail` is called once with a message describing
/// the problem and a zero version is returned. Outside of tests `fail` will
/// usually exit the process.
pub fn parse_plugin_version<F>(version: &str, fail: F) -> PluginVersion
where
    F: FnOnce(&str),
{
    let components: Vec<&str> = version.split('.').collect();
    if components.len() != NUM_COMPONENTS {
        fail(&format!(
            "pluginVersion {:?} has invalid format. Expected {} dot-separated integer components.",
            version, NUM_COMPONENTS
        ));
        return PluginVersion::default();
    }

    let parsed: Result<Vec<i64>, _> = components.iter().map(|c| c.parse::<i64>()).collect();
    match parsed.as_deref() {
        Ok([major, minor, build]) => PluginVersion::new(*major, *minor, *build),
        _ => {
            fail(&format!(
                "pluginVersion {:?} has invalid format. Expected integer components.",
                version
            ));
            PluginVersion::default()
        }
    }
}
