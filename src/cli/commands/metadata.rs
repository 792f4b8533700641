//! `tunnel-boot metadata` command - Describe the plugin

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::core::metadata::PluginMetadata;
use crate::core::version::PluginVersion;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetadataFormat {
    /// Human readable table
    #[default]
    Table,
    /// JSON (for programming)
    Json,
}

#[derive(clap::Args, Debug)]
pub struct MetadataArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "table")]
    pub format: MetadataFormat,
}

pub fn run(args: MetadataArgs, version: PluginVersion) -> Result<()> {
    let metadata = PluginMetadata::new(version);
    match args.format {
        MetadataFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&metadata).into_diagnostic()?);
        }
        MetadataFormat::Table => print!("{}", render_table(&metadata)),
    }
    Ok(())
}

fn render_table(metadata: &PluginMetadata) -> String {
    let mut out = format!(
        "{} {} (requires cf CLI {} or later)\n\n",
        metadata.name, metadata.version, metadata.min_cli_version
    );

    let mut table = Builder::default();
    table.push_record(["Command", "Alias", "Description", "Usage"]);
    for command in &metadata.commands {
        table.push_record([
            command.name.clone(),
            command.alias.clone(),
            command.help_text.clone(),
            command.usage.clone(),
        ]);
    }
    out.push_str(&table.build().with(Style::rounded()).to_string());
    out.push('\n');

    for command in metadata.commands.iter().filter(|c| !c.options.is_empty()) {
        out.push_str(&format!("\n{} options:\n", command.name));
        for (flag, description) in &command.options {
            out.push_str(&format!("  {:<40} {}\n", flag, description));
        }
    }
    out
}
