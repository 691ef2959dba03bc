//! YT Controller CLI

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use ytcontroller::models::{builtin_presets, current_mode, find_preset, SettingsModel};
use ytcontroller::redirect::RedirectDecision;
use ytcontroller::report::describe_message;
use ytcontroller::{classify, prepare_injection, Prepared, Session, ShortsRedirectPolicy};

#[derive(Parser)]
#[command(name = "ytcontroller")]
#[command(about = "Generate and preview page-aware YouTube filter patches", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the page type of a URL
    Classify {
        url: String,
    },

    /// Generate the injectable patch for a URL
    Generate {
        /// Page URL the patch is for
        #[arg(short, long)]
        url: String,

        /// Settings file (JSON, comments allowed)
        #[arg(short, long, conflicts_with = "preset")]
        settings: Option<PathBuf>,

        /// Built-in preset id instead of a settings file
        #[arg(short, long)]
        preset: Option<String>,

        /// Generate for a signed-in user
        #[arg(short, long)]
        authenticated: bool,

        /// Print only the stylesheet
        #[arg(long)]
        css_only: bool,

        /// Write a markdown report next to the output
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Show where a Shorts URL is redirected when Shorts are hidden
    Redirect {
        url: String,
    },

    /// Drive a simulated view through a sequence of URLs
    Simulate {
        /// First URL loads the view; the rest are in-page navigations
        #[arg(required = true)]
        urls: Vec<String>,

        #[arg(short, long, conflicts_with = "preset")]
        settings: Option<PathBuf>,

        #[arg(short, long)]
        preset: Option<String>,

        #[arg(short, long)]
        authenticated: bool,

        /// Print the raw JSON messages
        #[arg(long)]
        json: bool,
    },

    /// Validate a settings file
    Validate {
        #[arg(short, long)]
        settings: PathBuf,
    },

    /// List the built-in presets
    Presets,

    /// Guided, menu-driven mode
    Interactive,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        None | Some(Commands::Interactive) => ytcontroller::cli::run_interactive_mode(),
        Some(Commands::Classify { url }) => {
            println!("{}", classify(&url));
            Ok(())
        }
        Some(Commands::Generate { url, settings, preset, authenticated, css_only, report }) => {
            run_generate(&url, settings, preset, authenticated, css_only, report)
        }
        Some(Commands::Redirect { url }) => {
            run_redirect(&url);
            Ok(())
        }
        Some(Commands::Simulate { urls, settings, preset, authenticated, json }) => {
            run_simulate(&urls, settings, preset, authenticated, json)
        }
        Some(Commands::Validate { settings }) => run_validate(&settings),
        Some(Commands::Presets) => {
            run_presets();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", "❌ Failed!".red().bold());
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn load_settings(path: Option<PathBuf>, preset: Option<String>) -> anyhow::Result<SettingsModel> {
    match (path, preset) {
        (Some(path), _) => ytcontroller::parser::parse_settings_from_file(&path),
        (None, Some(id)) => {
            let presets = builtin_presets();
            let preset = find_preset(&presets, &id)
                .ok_or_else(|| anyhow::anyhow!("Unknown preset `{}`", id))?;
            Ok(preset.apply_to(&SettingsModel::default()))
        }
        (None, None) => Ok(SettingsModel::default()),
    }
}

fn run_generate(
    url: &str,
    settings: Option<PathBuf>,
    preset: Option<String>,
    authenticated: bool,
    css_only: bool,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    let settings = load_settings(settings, preset)?;

    match prepare_injection(&settings, url, authenticated)? {
        Prepared::Redirect { from, to } => {
            eprintln!("{}", "↪️  Shorts are hidden; this page redirects".yellow().bold());
            eprintln!("  {} -> {}", from, to);
            println!("{}", to);
        }
        Prepared::Patch(patch) => {
            if css_only {
                println!("{}", patch.rule_text);
            } else {
                println!("{}", patch.script);
            }

            if let Some(report_path) = report {
                let validation = ytcontroller::validator::validate_settings(&settings);
                let content = ytcontroller::report::generate_report(&settings, &patch, &validation)?;
                std::fs::write(&report_path, content)?;
                eprintln!("  - Report: {}", report_path.display());
            }
        }
    }
    Ok(())
}

fn run_redirect(url: &str) {
    match ShortsRedirectPolicy::new(true).evaluate(url) {
        RedirectDecision::Redirect { to, .. } => println!("{}", to),
        RedirectDecision::Unresolvable { .. } => {
            println!("{}", "Shorts URL without a video id; only CSS hiding applies".yellow());
        }
        RedirectDecision::NotApplicable => {
            println!("{}", "Not a Shorts URL".dimmed());
        }
    }
}

fn run_simulate(
    urls: &[String],
    settings: Option<PathBuf>,
    preset: Option<String>,
    authenticated: bool,
    json: bool,
) -> anyhow::Result<()> {
    let settings = ytcontroller::checked_settings(&load_settings(settings, preset)?)?;
    let Some((first, rest)) = urls.split_first() else {
        return Ok(());
    };

    println!("{}", "YT Controller Session".bold().blue());
    println!("{}", "=".repeat(50).blue());

    let mut session = Session::open(settings, authenticated, first);
    session.settle();
    print_step(&mut session, first, json)?;

    for url in rest {
        session.activate_link(url);
        session.settle();
        print_step(&mut session, url, json)?;
    }

    session.close();
    println!();
    println!("{}", "✅ Session closed, all artifacts removed".green());
    Ok(())
}

fn print_step(session: &mut Session, url: &str, json: bool) -> anyhow::Result<()> {
    println!();
    println!("{} {}", "▶".cyan(), url.bold());
    for message in session.take_messages() {
        if json {
            println!("  {}", message.to_json()?);
        } else if message.is_error() {
            println!("  {}", describe_message(&message).red());
        } else {
            println!("  {}", describe_message(&message).green());
        }
    }
    println!("  {} {}", "now at".dimmed(), session.url());
    Ok(())
}

fn run_validate(path: &Path) -> anyhow::Result<()> {
    let settings = ytcontroller::parser::parse_settings_from_file(path)?;
    let report = ytcontroller::validator::validate_settings(&settings);

    println!("{}", "📊 Settings Validation".bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!("Mode: {}", current_mode(&settings));
    println!();

    if report.errors.is_empty() {
        println!("{}", "✅ No errors found!".green());
    } else {
        for error in &report.errors {
            println!("{} {}", "🛑 ERROR".red(), error);
        }
    }
    for warning in &report.warnings {
        println!("{} {}", "ℹ️  WARNING".yellow(), warning);
    }

    if !report.is_valid() {
        anyhow::bail!("{} validation error(s)", report.errors.len());
    }
    Ok(())
}

fn run_presets() {
    for preset in builtin_presets() {
        println!("{} {}", preset.id.bold(), format!("({})", preset.name).cyan());
        println!("  {}", preset.description.dimmed());
    }
}
