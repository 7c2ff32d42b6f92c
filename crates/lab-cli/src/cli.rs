//! Command-line arguments for `labtrack`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lab_identifier::{DEFAULT_COUNT_PADDING, DEFAULT_PRIMARY_SEGMENT};

#[derive(Parser)]
#[command(
    name = "labtrack",
    version,
    about = "Specimen lab tracking: aliquot identifiers, lab profiles and receiving"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render an aliquot identifier from a prefix template.
    Identifier(IdentifierArgs),

    /// Discover lab profiles under a directory of namespaces.
    Profiles(ProfilesArgs),

    /// Receive an aliquot against a manifest.
    Receive(ReceiveArgs),

    /// Summarise the boxes and specimens of a manifest.
    Describe(DescribeArgs),
}

#[derive(Args)]
pub struct IdentifierArgs {
    /// Prefix template, e.g. `{protocol}{site}{subject}`.
    #[arg(long = "template")]
    pub template: String,

    /// Template field as NAME=VALUE. Repeatable.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Required length of the rendered prefix.
    #[arg(long = "prefix-length")]
    pub prefix_length: Option<usize>,

    /// Two digit numeric code of the aliquot type.
    #[arg(long = "numeric-code")]
    pub numeric_code: String,

    /// Segment of the parent aliquot (derived aliquots only).
    #[arg(long = "parent-segment", requires = "count")]
    pub parent_segment: Option<String>,

    #[arg(long = "count")]
    pub count: Option<u32>,

    #[arg(long = "count-padding", default_value_t = DEFAULT_COUNT_PADDING)]
    pub count_padding: usize,

    #[arg(long = "length", default_value_t = 18)]
    pub identifier_length: usize,

    #[arg(long = "primary-segment", default_value = DEFAULT_PRIMARY_SEGMENT)]
    pub primary_segment: String,
}

#[derive(Args)]
pub struct ProfilesArgs {
    /// Directory holding one subdirectory per namespace.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Only discover these namespaces. Repeatable.
    #[arg(long = "namespace")]
    pub namespaces: Vec<String>,

    /// Known requisition record type as app_label.model_name. Repeatable.
    #[arg(long = "record-type")]
    pub record_types: Vec<String>,
}

#[derive(Args)]
pub struct ReceiveArgs {
    /// JSON store of manifests, boxes and aliquots.
    #[arg(long = "store", value_name = "JSON")]
    pub store: PathBuf,

    #[arg(long = "manifest")]
    pub manifest: String,

    /// Box identifier of the manifest item.
    #[arg(long = "item")]
    pub item: String,

    #[arg(long = "aliquot")]
    pub aliquot: String,
}

#[derive(Args)]
pub struct DescribeArgs {
    #[arg(long = "store", value_name = "JSON")]
    pub store: PathBuf,

    #[arg(long = "manifest")]
    pub manifest: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_field(value: &str) -> Result<(String, String), String> {
    let (name, field) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{value}'"))?;
    if name.is_empty() {
        return Err(format!("missing field name in '{value}'"));
    }
    Ok((name.to_string(), field.to_string()))
}
