//! CLI Tooling
//!
//! Command-line interface over the namespace API. Every namespace command is
//! routed through the connection registry and recorded by the audit sink.

use crate::api::{NamespaceApi, WriteMode};
use crate::audit::{AuditAction, AuditEvent, AuditRecorder};
use crate::config::KvdirConfig;
use crate::error::NamespaceError;
use crate::logging::LoggingConfig;
use crate::registry::{ClusterDescriptor, ConnectionRegistry, UserDescriptor};
use crate::store::Member;
use crate::tree::materialize::MaterializeReport;
use crate::tree::node::Node;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::info;

/// kvdir - directory semantics over a flat key-value store
#[derive(Parser)]
#[command(name = "kvdir")]
#[command(about = "Browse and edit a flat key-value store as a directory tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Cluster to operate on (default: configured default cluster)
    #[arg(long)]
    pub cluster: Option<String>,

    /// Acting user (default: $USER)
    #[arg(long)]
    pub user: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold the logging flags into the loaded logging configuration.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }

    /// Acting user: `--user`, then `$USER`, then empty.
    pub fn resolve_user(&self) -> String {
        self.user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_default()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the direct children of a directory
    #[command(alias = "ls")]
    List {
        #[arg(default_value = "/")]
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Read a single entry
    Get {
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write a leaf value, creating missing parent directories
    Put {
        path: String,
        value: String,
        /// Fail if the path already exists
        #[arg(long)]
        create: bool,
    },
    /// Create a directory and its missing parents
    Mkdir { path: String },
    /// Delete an entry
    Rm {
        path: String,
        /// Also delete every descendant
        #[arg(long, short = 'r')]
        recursive: bool,
        /// Skip the confirmation prompt for recursive deletes
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Print a subtree as a nested document
    Tree {
        #[arg(default_value = "/")]
        path: String,
        /// Document format (json, toml, yaml)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// List cluster members
    Members {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List clusters visible to the acting user
    Clusters {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List configured users and their roles
    Users {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List audited action types
    Actions,
}

impl Commands {
    /// Audit action and path for the command; `None` for unaudited commands.
    fn audit_target(&self) -> Option<(AuditAction, Option<&str>)> {
        match self {
            Commands::List { path, .. } => Some((AuditAction::List, Some(path.as_str()))),
            Commands::Get { path, .. } => Some((AuditAction::Read, Some(path.as_str()))),
            Commands::Put { path, .. } | Commands::Mkdir { path } => {
                Some((AuditAction::Save, Some(path.as_str())))
            }
            Commands::Rm { path, .. } => Some((AuditAction::Delete, Some(path.as_str()))),
            Commands::Tree { path, .. } => Some((AuditAction::Format, Some(path.as_str()))),
            Commands::Members { .. } => Some((AuditAction::Members, None)),
            Commands::Clusters { .. } => Some((AuditAction::Clusters, None)),
            Commands::Users { .. } | Commands::Actions => None,
        }
    }
}

/// CLI context: registry, acting identity and audit handle
pub struct CliContext {
    registry: ConnectionRegistry,
    cluster: Option<String>,
    user: String,
    role: String,
    audit: AuditRecorder,
}

impl CliContext {
    pub fn new(
        config: &KvdirConfig,
        cluster: Option<String>,
        user: String,
        audit: AuditRecorder,
    ) -> Result<Self, NamespaceError> {
        let registry = ConnectionRegistry::from_config(config)?;
        Ok(Self::with_registry(registry, cluster, user, audit))
    }

    pub fn with_registry(
        registry: ConnectionRegistry,
        cluster: Option<String>,
        user: String,
        audit: AuditRecorder,
    ) -> Self {
        let role = registry.role_of(&user).to_string();
        Self {
            registry,
            cluster,
            user,
            role,
            audit,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    fn cluster_name(&self) -> &str {
        self.cluster
            .as_deref()
            .unwrap_or_else(|| self.registry.default_cluster())
    }

    fn api(&self) -> Result<NamespaceApi, NamespaceError> {
        self.registry.open(Some(self.cluster_name()), &self.role)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, NamespaceError> {
        let result = self.execute_inner(command);
        if let Some((action, path)) = command.audit_target() {
            let mut event = AuditEvent::new(&self.user, &self.role, action)
                .with_cluster(self.cluster_name())
                .with_success(result.is_ok());
            if let Some(path) = path {
                event = event.with_path(path);
            }
            self.audit.record(event);
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, NamespaceError> {
        match command {
            Commands::List { path, format } => {
                let nodes = self.api()?.list(path)?;
                format_nodes(&nodes, format)
            }
            Commands::Get { path, format } => {
                let node = self.api()?.read(path)?;
                format_node(&node, format)
            }
            Commands::Put {
                path,
                value,
                create,
            } => {
                let mode = if *create {
                    WriteMode::Create
                } else {
                    WriteMode::Overwrite
                };
                let report = self.api()?.write(path, value, mode)?;
                info!(path = %path, user = %self.user, "Saved value");
                Ok(format_saved(path, &report))
            }
            Commands::Mkdir { path } => {
                let report = self.api()?.create_dir(path)?;
                Ok(format_saved(path, &report))
            }
            Commands::Rm {
                path,
                recursive,
                yes,
            } => self.handle_rm(path, *recursive, *yes),
            Commands::Tree { path, format } => self.api()?.format_path(path, format),
            Commands::Members { format } => {
                let members = self.api()?.list_members()?;
                format_members(&members, format)
            }
            Commands::Clusters { format } => {
                let clusters = self.registry.visible_clusters(&self.role);
                format_clusters(&clusters, self.registry.default_cluster(), format)
            }
            Commands::Users { format } => format_users(&self.registry.users(), format),
            Commands::Actions => Ok(AuditAction::all()
                .iter()
                .map(|a| a.label())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn handle_rm(&self, path: &str, recursive: bool, yes: bool) -> Result<String, NamespaceError> {
        let api = self.api()?;
        if recursive && !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete '{}' and everything below it?", path))
                .interact()
                .map_err(|e| {
                    NamespaceError::ConfigError(format!("Failed to get user input: {}", e))
                })?;
            if !confirmed {
                return Ok("Deletion cancelled".to_string());
            }
        }
        let removed = api.delete(path, recursive)?;
        info!(path = %path, removed, user = %self.user, "Deleted");
        Ok(format!("Deleted {} ({} key(s) removed)", path, removed))
    }
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, NamespaceError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| NamespaceError::encoding("json", e))
}

fn check_output_format(format: &str) -> Result<(), NamespaceError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(NamespaceError::UnsupportedFormat(other.to_string())),
    }
}

fn format_nodes(nodes: &[Node], format: &str) -> Result<String, NamespaceError> {
    check_output_format(format)?;
    if format == "json" {
        return to_json(nodes);
    }
    if nodes.is_empty() {
        return Ok("(empty)".to_string());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Type", "Value"]);
    for node in nodes {
        let (kind, value) = if node.is_dir() {
            ("dir", "")
        } else {
            ("leaf", node.value())
        };
        table.add_row(vec![node.name(), kind, value]);
    }
    Ok(table.to_string())
}

fn format_node(node: &Node, format: &str) -> Result<String, NamespaceError> {
    check_output_format(format)?;
    if format == "json" {
        return to_json(node);
    }
    if node.is_dir() {
        Ok(format!("{}/ (directory)", node.full_path().trim_end_matches('/')))
    } else {
        Ok(node.value().to_string())
    }
}

fn format_saved(path: &str, report: &MaterializeReport) -> String {
    let mut out = format!("Saved {}", path);
    if !report.created.is_empty() {
        let created: Vec<&str> = report.created.iter().map(|p| p.as_str()).collect();
        out.push_str(&format!("\nCreated directories: {}", created.join(", ")));
    }
    out
}

fn format_members(members: &[Member], format: &str) -> Result<String, NamespaceError> {
    check_output_format(format)?;
    if format == "json" {
        return to_json(members);
    }
    let mut out = format!("{}\n", format_section_heading("Members"));
    if members.is_empty() {
        out.push_str("  No members reported\n");
        return Ok(out);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Leader", "Peer URLs", "Client URLs"]);
    for member in members {
        table.add_row(vec![
            member.id.to_string(),
            member.name.clone(),
            if member.is_leader { "yes" } else { "" }.to_string(),
            member.peer_urls.join(", "),
            member.client_urls.join(", "),
        ]);
    }
    out.push_str(&table.to_string());
    Ok(out)
}

fn format_clusters(
    clusters: &[ClusterDescriptor],
    default_cluster: &str,
    format: &str,
) -> Result<String, NamespaceError> {
    check_output_format(format)?;
    if format == "json" {
        return to_json(clusters);
    }
    let mut out = format!("{}\n", format_section_heading("Clusters"));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Title", "Roles", "Default"]);
    for cluster in clusters {
        let roles = if cluster.roles.is_empty() {
            "*".to_string()
        } else {
            cluster.roles.join(", ")
        };
        table.add_row(vec![
            cluster.name.clone(),
            cluster.title.clone().unwrap_or_default(),
            roles,
            if cluster.name == default_cluster { "*" } else { "" }.to_string(),
        ]);
    }
    out.push_str(&table.to_string());
    Ok(out)
}

fn format_users(users: &[UserDescriptor], format: &str) -> Result<String, NamespaceError> {
    check_output_format(format)?;
    if format == "json" {
        return to_json(users);
    }
    let mut out = format!("{}\n", format_section_heading("Users"));
    if users.is_empty() {
        out.push_str("  No users configured\n");
        return Ok(out);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["User", "Role"]);
    for user in users {
        table.add_row(vec![user.name.as_str(), user.role.as_str()]);
    }
    out.push_str(&table.to_string());
    Ok(out)
}
