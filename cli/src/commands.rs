use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use beacon_calc::calculate;
use beacon_cms::{CmsClient, PostLookup, PostSummary};
use beacon_config::SiteConfig;
use beacon_content::normalize_values;
use beacon_leads::{Delivery, LeadRelay, LeadSource, LeadSubmission};
use beacon_types::{CalculationResult, FinancingInput, format_currency};
use serde_json::Value;
use tracing::info;

use crate::cli::{CalcArgs, OutputArgs, PostArgs, RenderArgs, SourceArg, SubmitArgs};

pub fn calc(config: &SiteConfig, args: &CalcArgs) -> Result<()> {
    let bounds = config.slider_bounds();
    let input = bounds.clamp(
        args.principal.unwrap_or(bounds.principal.default),
        args.rate.unwrap_or(bounds.rate.default),
        args.term.unwrap_or(bounds.term.default),
        args.cycles.unwrap_or(bounds.cycles.default),
    );
    let result = calculate(&input);

    if args.output.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", calc_report(&input, &result));
    }
    Ok(())
}

pub fn render(args: &RenderArgs) -> Result<()> {
    let raw = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read blocks from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?
    };

    let value: Value = serde_json::from_str(&raw).context("input is not valid JSON")?;
    let blocks = block_values(value)?;
    let document = normalize_values(&blocks);
    info!(blocks = blocks.len(), bytes = document.as_str().len(), "Rendered document");

    match &args.out {
        Some(path) => write_output(path, document.as_str()),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}

pub async fn posts(config: &SiteConfig, args: &OutputArgs) -> Result<()> {
    let client = cms_client(config)?;
    let posts = client.list_posts().await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else if posts.is_empty() {
        println!("No published posts.");
    } else {
        print!("{}", posts_table(&posts));
    }
    Ok(())
}

pub async fn post(config: &SiteConfig, args: &PostArgs) -> Result<()> {
    let client = cms_client(config)?;
    let PostLookup::Found(post) = client.get_post(&args.slug).await else {
        bail!("no published post with slug `{}`", args.slug);
    };

    if args.output.json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        println!("{}", post.summary.title);
        if let Some(date) = post.summary.date {
            println!("{date} · {} min read", post.reading_minutes);
        } else {
            println!("{} min read", post.reading_minutes);
        }
        println!();
        println!("{}", post.body);
    }
    Ok(())
}

pub async fn submit(config: &SiteConfig, args: SubmitArgs) -> Result<()> {
    let mut submission = LeadSubmission::new(lead_source(args.source), args.email);
    submission.name = args.name;
    submission.phone = args.phone;
    submission.message = args.message;
    submission.fields.extend(args.fields);

    let relay = LeadRelay::new(&config.webhook_settings());
    match relay.submit(submission).await {
        Ok(outcome) => {
            println!("{}", outcome.user_message);
            match outcome.delivery {
                Delivery::Delivered { status } => eprintln!("delivered (HTTP {status})"),
                Delivery::Failed { reason } => eprintln!("not delivered: {reason}"),
                Delivery::NotConfigured => eprintln!("not delivered: no webhook configured"),
            }
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                eprintln!("- {error}");
            }
            bail!("submission rejected")
        }
    }
}

fn cms_client(config: &SiteConfig) -> Result<CmsClient> {
    let Some(settings) = config.cms_settings() else {
        bail!("CMS is not configured: set [cms] token and database_id");
    };
    CmsClient::new(&settings).context("failed to create CMS client")
}

fn lead_source(arg: SourceArg) -> LeadSource {
    match arg {
        SourceArg::Contact => LeadSource::Contact,
        SourceArg::Consultation => LeadSource::Consultation,
        SourceArg::Newsletter => LeadSource::Newsletter,
        SourceArg::Calculator => LeadSource::Calculator,
    }
}

/// Accept a bare array of blocks or a Notion list response.
fn block_values(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(blocks) => Ok(blocks),
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(blocks)) => Ok(blocks),
            _ => bail!("expected an array of blocks or an object with a `results` array"),
        },
        _ => bail!("expected an array of blocks or an object with a `results` array"),
    }
}

fn write_output(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

fn calc_report(input: &FinancingInput, result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Loan {} at {:.2}% over {} years, {} new loans per decade",
        format_currency(input.principal()),
        input.annual_rate_percent(),
        input.term_years(),
        input.cycles_per_decade()
    );
    let _ = writeln!(out, "Monthly payment:   {}", format_currency(result.monthly_payment));
    let _ = writeln!(out, "Interest per loan: {}", format_currency(result.interest_per_cycle));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>5}  {:>15}  {:>16}  {:>15}",
        "Years", "Interest paid", "Opportunity cost", "Total bleed"
    );
    for row in &result.projections {
        let _ = writeln!(
            out,
            "{:>5}  {:>15}  {:>16}  {:>15}",
            row.year,
            format_currency(row.interest_paid),
            format_currency(row.opportunity_cost),
            format_currency(row.total_bleed)
        );
    }
    out
}

fn posts_table(posts: &[PostSummary]) -> String {
    let mut out = String::new();
    for post in posts {
        let date = post
            .date
            .map_or_else(|| "----------".to_string(), |date| date.to_string());
        let _ = writeln!(out, "{date}  {:<32}  {}", post.slug, post.title);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{block_values, calc_report, calculate, posts_table};
    use beacon_cms::PostSummary;
    use beacon_types::FinancingInput;
    use serde_json::json;

    #[test]
    fn block_values_accepts_both_shapes() {
        let bare = block_values(json!([{ "type": "divider" }])).unwrap();
        assert_eq!(bare.len(), 1);
        let listed = block_values(json!({ "object": "list", "results": [{}, {}] })).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(block_values(json!({ "object": "block" })).is_err());
        assert!(block_values(json!("text")).is_err());
    }

    #[test]
    fn calc_report_lists_every_horizon() {
        let input = FinancingInput::new(80_000.0, 7.9, 5, 2).unwrap();
        let report = calc_report(&input, &calculate(&input));
        assert!(report.contains("Monthly payment:   $1,618.29"));
        for year in ["    5", "   10", "   20", "   30"] {
            assert!(report.lines().any(|line| line.starts_with(year)), "{year}");
        }
    }

    #[test]
    fn posts_table_marks_missing_dates() {
        let posts = vec![PostSummary {
            id: "p1".to_string(),
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: String::new(),
            date: None,
            tags: Vec::new(),
            cover_url: None,
        }];
        assert!(posts_table(&posts).starts_with("----------  hello"));
    }
}
