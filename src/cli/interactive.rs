//! Interactive CLI mode for YT Controller

use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::PathBuf;

use crate::models::{builtin_presets, current_mode, SettingsModel};
use crate::report::describe_message;
use crate::{classify, prepare_injection, Prepared, Session};

/// Run the interactive CLI mode
pub fn run_interactive_mode() -> Result<()> {
    print_banner();
    let mut settings = SettingsModel::default();

    loop {
        println!();
        println!("Current mode: {}", current_mode(&settings).cyan());
        let options = vec![
            "🧩 Generate patch for a URL",
            "🔎 Classify a URL",
            "🎛️  Choose a preset",
            "✏️  Edit toggles",
            "📂 Load settings file",
            "▶️  Simulate a browsing session",
            "❌ Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => handle_generate(&settings)?,
            1 => handle_classify()?,
            2 => handle_preset(&mut settings)?,
            3 => handle_toggles(&mut settings)?,
            4 => handle_load(&mut settings)?,
            5 => handle_simulate(&settings)?,
            6 => {
                println!("\n{}", "Thanks for using YT Controller! 👋".green().bold());
                break;
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "╔═══════════════════════════════════════════════════════╗".blue());
    println!("{}", "║                                                       ║".blue());
    println!("{}", "║     📺 YT Controller                                  ║".blue().bold());
    println!("{}", "║                                                       ║".blue());
    println!("{}", "║     Build and preview distraction filters for the     ║".blue());
    println!("{}", "║     YouTube mobile site                               ║".blue());
    println!("{}", "║                                                       ║".blue());
    println!("{}", "╚═══════════════════════════════════════════════════════╝".blue());
}

fn prompt_url(prompt: &str) -> Result<String> {
    let url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text("https://m.youtube.com/")
        .interact_text()?;
    Ok(url)
}

fn handle_generate(settings: &SettingsModel) -> Result<()> {
    println!("\n{}", "=== Generate Patch ===".blue().bold());
    let url = prompt_url("🌐 Page URL")?;
    let authenticated = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("🔐 Signed in?")
        .default(false)
        .interact()?;
    let css_only = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("🎨 Show only the stylesheet?")
        .default(true)
        .interact()?;

    match prepare_injection(settings, &url, authenticated) {
        Ok(Prepared::Redirect { to, .. }) => {
            println!("{}", format!("↪️  Shorts redirect to {}", to).yellow().bold());
        }
        Ok(Prepared::Patch(patch)) => {
            println!("{}", format!("✅ Patch for {} page", patch.page_type).green().bold());
            println!();
            if css_only {
                println!("{}", patch.rule_text);
            } else {
                println!("{}", patch.script);
            }
        }
        Err(e) => {
            println!("{}", format!("❌ Error: {}", e).red().bold());
        }
    }
    Ok(())
}

fn handle_classify() -> Result<()> {
    let url = prompt_url("🌐 URL to classify")?;
    println!("{} {}", "Page type:".bold(), classify(&url).to_string().cyan());
    Ok(())
}

fn handle_preset(settings: &mut SettingsModel) -> Result<()> {
    let presets = builtin_presets();
    let options: Vec<String> = presets
        .iter()
        .map(|p| format!("{} - {}", p.name, p.description.dimmed()))
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("🎛️  Select a preset")
        .items(&options)
        .default(0)
        .interact()?;

    *settings = presets[selection].apply_to(settings);
    println!("{}", format!("✅ Applied {}", presets[selection].name).green());
    Ok(())
}

fn handle_toggles(settings: &mut SettingsModel) -> Result<()> {
    let theme = ColorfulTheme::default();
    let toggle = |prompt: &str, current: bool| -> Result<bool> {
        Ok(Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(current)
            .interact()?)
    };

    settings.show_recommendations = toggle("Show recommendations?", settings.show_recommendations)?;
    settings.show_sidebar = toggle("Show sidebar?", settings.show_sidebar)?;
    settings.show_comments = toggle("Show comments?", settings.show_comments)?;
    settings.show_related_videos = toggle("Show related videos?", settings.show_related_videos)?;
    settings.show_shorts = toggle("Show Shorts?", settings.show_shorts)?;
    Ok(())
}

fn handle_load(settings: &mut SettingsModel) -> Result<()> {
    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("📂 Settings file")
        .with_initial_text("./settings.json")
        .interact_text()?;
    let path = PathBuf::from(path);

    if !path.exists() {
        println!("{}", "❌ Error: File does not exist!".red().bold());
        return Ok(());
    }

    match crate::parser::parse_settings_from_file(&path) {
        Ok(loaded) => {
            let report = crate::validator::validate_settings(&loaded);
            for error in &report.errors {
                println!("  {} {}", "⛔".red(), error);
            }
            for warning in &report.warnings {
                println!("  {} {}", "ℹ️ ".yellow(), warning);
            }
            *settings = loaded;
            println!("{}", "✅ Settings loaded".green());
        }
        Err(e) => println!("{}", format!("❌ Error: {:#}", e).red().bold()),
    }
    Ok(())
}

fn handle_simulate(settings: &SettingsModel) -> Result<()> {
    println!("\n{}", "=== Simulate Session ===".blue().bold());
    let start = prompt_url("🌐 Start URL")?;
    let mut session = Session::open(settings.clone(), false, &start);
    session.settle();
    print_messages(&mut session);

    loop {
        let next: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("➡️  Navigate to (empty to stop)")
            .allow_empty(true)
            .interact_text()?;
        if next.trim().is_empty() {
            break;
        }
        session.activate_link(next.trim());
        session.settle();
        print_messages(&mut session);
    }

    session.close();
    Ok(())
}

fn print_messages(session: &mut Session) {
    for message in session.take_messages() {
        let line = describe_message(&message);
        if message.is_error() {
            println!("  {}", line.red());
        } else {
            println!("  {}", line.green());
        }
    }
}
