//! Command-line driver for the emotion & sign-language assistant.
//!
//! Stands in for the page UI: each image is analysed in one session, then the
//! current result, its spoken caption and the recent history are printed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use isl_assistant_lib::{
    analysis::commands,
    demo::DemoScenario,
    models::{AnalysisPair, HistoryEntry},
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "isl-assistant")]
#[command(about = "Simulated emotion and sign-language gesture detection")]
struct Args {
    /// Images to analyse (jpg, jpeg or png)
    images: Vec<PathBuf>,

    /// Run one random analysis that ignores the image entirely
    #[arg(short, long)]
    random: bool,

    /// Show a fixed demo scenario (happy-hello, surprised-thank-you, neutral-yes, angry-no)
    #[arg(short, long)]
    demo: Option<DemoScenario>,

    /// Number of history rows to print
    #[arg(long)]
    history: Option<usize>,

    /// Print the simulated speech for the final result
    #[arg(short, long)]
    speak: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let state = match isl_assistant_lib::run() {
        Ok(state) => state,
        Err(err) => {
            log::error!("Startup failed: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let session_id = match commands::open_session(&state) {
        Ok(id) => id,
        Err(err) => {
            eprintln!("❌ {err}");
            return ExitCode::FAILURE;
        }
    };

    if args.images.is_empty() && !args.random && args.demo.is_none() {
        println!("Nothing to analyse. Pass image paths, --random or --demo <key>.");
        println!("Demo scenarios:");
        for scenario in commands::list_demo_scenarios() {
            println!("  {:<22} {}", scenario.key(), scenario.title());
        }
        return ExitCode::SUCCESS;
    }

    for path in &args.images {
        analyse_file(&state, &session_id, path);
    }

    if args.random {
        match commands::analyze_random(&state, session_id.clone()) {
            Ok(report) => {
                println!("\n🎲 Random analysis");
                print_pair(&report.pair);
                println!("🔊 {}", report.caption);
            }
            Err(err) => println!("⚠️  {err}"),
        }
    }

    if let Some(scenario) = args.demo {
        match commands::run_demo(&state, session_id.clone(), scenario) {
            Ok(report) => {
                println!("\n🎯 Demo: {}", report.title);
                println!("   {}", report.banner);
                println!("   Scenario: {}", report.description);
                print_pair(&report.pair);
            }
            Err(err) => println!("⚠️  {err}"),
        }
    }

    if args.speak {
        match commands::simulate_speech(&state, session_id.clone()) {
            Ok(preview) => println!("\n✅ {}", preview.announcement),
            Err(err) => println!("⚠️  {err}"),
        }
    }

    match commands::get_recent_history(&state, session_id.clone(), args.history) {
        Ok(entries) => print_history(&entries),
        Err(err) => println!("⚠️  {err}"),
    }

    let _ = commands::close_session(&state, session_id);
    ExitCode::SUCCESS
}

fn analyse_file(state: &AppState, session_id: &str, path: &Path) {
    println!("\n📷 {}", path.display());

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("⚠️  Could not read file: {err}");
            return;
        }
    };
    let declared = path.extension().and_then(|ext| ext.to_str()).map(str::to_string);

    match commands::analyze_upload(state, session_id.to_string(), bytes, declared) {
        Ok(report) => {
            print_pair(&report.pair);
            println!("🔊 {}", report.caption);
        }
        Err(err) => println!("⚠️  Error processing image: {err}"),
    }
}

fn print_pair(pair: &AnalysisPair) {
    println!(
        "   Emotion: {} ({})",
        pair.emotion.display_label(),
        pair.emotion.confidence_percent()
    );
    println!(
        "   Gesture: {} ({})",
        pair.gesture.display_label(),
        pair.gesture.confidence_percent()
    );
}

fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        return;
    }

    println!("\n🕘 Recent analyses");
    for entry in entries {
        println!(
            "   {}  {} {:.0}% | {} {:.0}%",
            entry.timestamp.format("%H:%M:%S"),
            entry.emotion_label,
            entry.emotion_confidence * 100.0,
            entry.gesture_label,
            entry.gesture_confidence * 100.0
        );
    }
}
