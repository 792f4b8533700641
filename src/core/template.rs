//! Rendering of the deployment manifest and IDE launch configurations

use rust_embed::Embed;
use std::collections::{BTreeMap, HashMap};
use tera::{Tera, Value};
use thiserror::Error;

use crate::core::env_vars::EnvVars;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const MANIFEST_TEMPLATE: &str = "manifest.yml.tera";
const LAUNCH_TEMPLATE: &str = "eclipse.launch.tera";

/// Values for the tunnel application's manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestContext {
    pub app_name: String,
    pub spring_app_name: String,
    pub app_path: String,
    pub services: Vec<String>,
}

impl ManifestContext {
    pub fn new(
        app_name: impl Into<String>,
        spring_app_name: impl Into<String>,
        app_path: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            spring_app_name: spring_app_name.into(),
            app_path: app_path.into(),
            services: Vec::new(),
        }
    }

    /// Bind the services named in a comma separated list
    pub fn with_services(mut self, services: &str) -> Self {
        self.services = parse_services(services);
        self
    }
}

/// Split a comma separated service list, ignoring empty entries
pub fn parse_services(services: &str) -> Vec<String> {
    services
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Values for an Eclipse (Spring Tool Suite) boot launch configuration
#[derive(Debug, Clone, Default)]
pub struct LaunchConfigContext {
    pub project_name: String,
    pub main_class: String,
    pub port: String,
    pub env_vars: EnvVars,
}

impl LaunchConfigContext {
    /// Boot properties set on the launch; the `:N` suffix orders them in the
    /// launch dialog
    pub fn extra_props(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        props.insert(
            "spring.boot.prop.eureka.client.register-with-eureka:0".to_string(),
            "false".to_string(),
        );
        props.insert("spring.boot.prop.server.port:1".to_string(), self.port.clone());
        props.insert(
            "spring.boot.prop.spring.profiles.active:2".to_string(),
            "cloud".to_string(),
        );
        props
    }

    /// File name used when the launch configuration is written to disk
    pub fn file_name(&self) -> String {
        format!("{} (local).launch", self.project_name)
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.register_filter("quote", quote_filter);

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let template_str = std::str::from_utf8(&content.data)
                    .map_err(|e| TemplateError::RenderError(format!("{}: {}", filename, e)))?;
                tera.add_raw_template(filename, template_str)
                    .map_err(|e| TemplateError::RenderError(e.to_string()))?;
            }
        }

        Ok(Self { tera })
    }

    /// Render the deployment manifest for the tunnel application
    pub fn render_manifest(&self, ctx: &ManifestContext) -> Result<String, TemplateError> {
        let mut context = tera::Context::new();
        context.insert("app_name", &ctx.app_name);
        context.insert("spring_app_name", &ctx.spring_app_name);
        context.insert("app_path", &ctx.app_path);
        context.insert("services", &ctx.services);
        self.render(MANIFEST_TEMPLATE, &context)
    }

    /// Render an Eclipse launch configuration carrying the given variables
    pub fn render_launch_config(&self, ctx: &LaunchConfigContext) -> Result<String, TemplateError> {
        let mut context = tera::Context::new();
        context.insert("project_name", &ctx.project_name);
        context.insert("main_class", &ctx.main_class);
        context.insert("env_vars", &ctx.env_vars);
        context.insert("extra_props", &ctx.extra_props());
        self.render(LAUNCH_TEMPLATE, &context)
    }

    fn render(&self, name: &str, context: &tera::Context) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| TemplateError::RenderError(format!("{:?}", e)))
    }
}

/// Escape double quotes for use inside an XML attribute
pub fn quote(value: &str) -> String {
    value.replace('"', "&quot;")
}

fn quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(quote(s))),
        other => Ok(Value::String(quote(&other.to_string()))),
    }
}
