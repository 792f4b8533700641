//! Plugin metadata reported to the host CLI

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::version::PluginVersion;

pub const PLUGIN_NAME: &str = "tunnel-boot";

/// Oldest cf CLI the plugin works with
pub const MIN_CLI_VERSION: PluginVersion = PluginVersion {
    major: 6,
    minor: 7,
    build: 0,
};

#[derive(Debug, Clone, Serialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: PluginVersion,
    pub min_cli_version: PluginVersion,
    pub commands: Vec<CommandInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub name: String,
    pub alias: String,
    pub help_text: String,
    pub usage: String,
    pub options: BTreeMap<String, String>,
}

impl CommandInfo {
    fn new(name: &str, alias: &str, help_text: &str, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.to_string(),
            help_text: help_text.to_string(),
            usage: usage.to_string(),
            options: BTreeMap::new(),
        }
    }

    fn option(mut self, flag: &str, description: &str) -> Self {
        self.options.insert(flag.to_string(), description.to_string());
        self
    }
}

impl PluginMetadata {
    pub fn new(version: PluginVersion) -> Self {
        let commands = vec![
            CommandInfo::new(
                "push-tunnel-app",
                "pta",
                "Push an application to act as an ssh tunnel host",
                "cf push-tunnel-app CF_APPLICATION_NAME SPRING_APPLICATION_NAME",
            )
            .option("--services/-s <servicesList>", "comma separated list of services to bind to")
            .option("--app-path <jar>", "tunnel application to push instead of the configured one"),
            CommandInfo::new(
                "get-local-env",
                "gle",
                "Retrieve environment vars to specify for local app launching",
                "cf get-local-env APPLICATION_NAME",
            )
            .option("--create-eclipse-launch-config", "Produce a .launch file suitable for eclipse")
            .option(
                "--project <ideProjectName>",
                "for eclipse config creation, this is the eclipse project name",
            )
            .option(
                "--application-main <fqAppClassName>",
                "for eclipse config creation, the application main class",
            )
            .option(
                "--port <nnnn>",
                "for eclipse config creation, the local port number being tunneled to",
            )
            .option(
                "--target-dir <folder>",
                "for eclipse config creation, target directory in which to create .launch file",
            ),
            CommandInfo::new(
                "start-tunnel",
                "stun",
                "Create the ssh tunnel to connect a local port to the CF application",
                "cf start-tunnel CF_APPLICATION_NAME LOCAL_PORT",
            ),
        ];

        Self {
            name: PLUGIN_NAME.to_string(),
            version,
            min_cli_version: MIN_CLI_VERSION,
            commands,
        }
    }

    pub fn command(&self, name: &str) -> Option<&CommandInfo> {
        self.commands
            .iter()
            .find(|c| c.name == name || c.alias == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_lists_commands() {
        let meta = PluginMetadata::new(PluginVersion::new(1, 0, 0));
        let names: Vec<&str> = meta.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["push-tunnel-app", "get-local-env", "start-tunnel"]);
        assert_eq!(meta.min_cli_version.to_string(), "6.7.0");
    }

    #[test]
    fn test_lookup_by_alias() {
        let meta = PluginMetadata::new(PluginVersion::default());
        assert_eq!(meta.command("stun").unwrap().name, "start-tunnel");
        assert_eq!(meta.command("get-local-env").unwrap().alias, "gle");
        assert!(meta.command("nope").is_none());
    }

    #[test]
    fn test_serializes_to_json() {
        let meta = PluginMetadata::new(PluginVersion::new(1, 2, 3));
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["name"], "tunnel-boot");
        assert_eq!(json["version"]["minor"], 2);
        assert_eq!(json["commands"][0]["alias"], "pta");
    }
}
