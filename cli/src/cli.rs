//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "beacon", version, about = "Beacon site back end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file to use instead of ~/.beacon/config.toml.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Project interest bleed for a loan.
    Calc(CalcArgs),

    /// Render a file of Notion block objects to HTML.
    Render(RenderArgs),

    /// List published blog posts.
    Posts(OutputArgs),

    /// Fetch and render one blog post.
    Post(PostArgs),

    /// Validate a lead and relay it to its webhook.
    Submit(SubmitArgs),
}

#[derive(Args)]
pub struct OutputArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CalcArgs {
    /// Loan amount in dollars.
    #[arg(long)]
    pub principal: Option<f64>,

    /// Annual interest rate in percent.
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in years.
    #[arg(long)]
    pub term: Option<f64>,

    /// New loans taken per decade.
    #[arg(long)]
    pub cycles: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON file holding an array of blocks or a Notion list response. `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write HTML here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct PostArgs {
    pub slug: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Contact,
    Consultation,
    Newsletter,
    Calculator,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Which form the lead came from.
    #[arg(long, value_enum)]
    pub source: SourceArg,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub message: Option<String>,

    /// Extra form field as KEY=VALUE. Repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.trim().is_empty() {
        return Err("field key must not be empty".to_string());
    }
    Ok((key.trim().to_string(), value.to_string()))
}
