//! Command-line front end for the crewflow pipelines.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crewflow::prelude::*;
use crewflow::report::{
    display_lines, save_report, save_visit_summary, UrgencyLevel, SYMPTOM_DISCLAIMER,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const BANNER_RULE: &str = "==================================================";
const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

#[derive(Parser, Debug)]
#[command(name = "crewflow", version, about = "Run contract-analysis and symptom-checker pipelines")]
struct Cli {
    /// Emit pipeline events to the log at debug level
    #[arg(long, global = true)]
    events: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Organize a symptom description for a doctor visit
    Symptoms {
        /// Symptom description; omit to start an interactive session
        #[arg(conflicts_with = "main_symptom")]
        text: Option<String>,

        #[command(flatten)]
        form: FormArgs,

        /// Write the visit summary to this directory when one is produced
        #[arg(long)]
        save_summary: Option<PathBuf>,
    },

    /// Analyse an extracted contract text for risks
    Contract {
        /// File holding the contract's plain text
        #[arg(long)]
        text_file: PathBuf,

        /// Original document name shown in the report
        #[arg(long)]
        filename: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write a plain-text report into this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
}

/// Guided-form answers, used instead of a free-text description.
#[derive(Args, Debug)]
struct FormArgs {
    /// Main symptom; switches to the guided form
    #[arg(long)]
    main_symptom: Option<String>,

    /// How long it has lasted (under-1-day, 1-3-days, 4-7-days, 1-2-weeks, over-2-weeks)
    #[arg(long, requires = "main_symptom")]
    duration: Option<SymptomDuration>,

    /// Severity from 1 to 10
    #[arg(long, requires = "main_symptom", value_parser = clap::value_parser!(u8).range(1..=10))]
    severity: Option<u8>,

    /// Affected body areas, comma-separated (head, neck, chest, back, abdomen, arms, legs, other)
    #[arg(long = "area", requires = "main_symptom", value_delimiter = ',')]
    areas: Vec<BodyArea>,

    /// What makes it worse
    #[arg(long, requires = "main_symptom")]
    triggers: Option<String>,

    /// When it occurs (morning, afternoon, evening, night, all-day)
    #[arg(long, requires = "main_symptom")]
    timing: Option<SymptomTiming>,

    /// Other symptoms
    #[arg(long, requires = "main_symptom")]
    other_symptoms: Option<String>,
}

impl FormArgs {
    fn into_form(self) -> Option<SymptomForm> {
        let mut form = SymptomForm::new(self.main_symptom?);
        if let Some(duration) = self.duration {
            form = form.with_duration(duration);
        }
        if let Some(severity) = self.severity {
            form = form.with_severity(severity);
        }
        for area in self.areas {
            form = form.with_area(area);
        }
        if let Some(triggers) = self.triggers {
            form = form.with_triggers(triggers);
        }
        if let Some(timing) = self.timing {
            form = form.with_timing(timing);
        }
        if let Some(other) = self.other_symptoms {
            form = form.with_associated_symptoms(other);
        }
        Some(form)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = CrewflowConfig::from_env().context("loading model configuration")?;
    let client: Arc<dyn ModelClient> =
        Arc::new(OpenAiChatClient::new(&config.model).context("building model client")?);
    let sink: Arc<dyn EventSink> = if cli.events {
        Arc::new(LoggingEventSink::debug())
    } else {
        Arc::new(NoOpEventSink)
    };

    tracing::info!(model = %config.model.model, "crewflow starting v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Symptoms {
            text,
            form,
            save_summary,
        } => {
            let pipeline = SymptomPipeline::new(client).with_event_sink(sink);
            match (text, form.into_form()) {
                (_, Some(form)) => {
                    let description = form.to_description()?;
                    check_symptoms(&pipeline, &description, save_summary.as_ref()).await
                }
                (Some(text), None) => check_symptoms(&pipeline, &text, save_summary.as_ref()).await,
                (None, None) => interactive(&pipeline, save_summary.as_ref()).await,
            }
        }
        Command::Contract {
            text_file,
            filename,
            json,
            report_dir,
        } => {
            let text = std::fs::read_to_string(&text_file)
                .with_context(|| format!("reading {}", text_file.display()))?;
            let pipeline = DocumentPipeline::new(client, config.document).with_event_sink(sink);
            let analysis = pipeline.run(filename, &text).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis.report)?);
            } else {
                print_report(&analysis.report);
            }

            if let Some(dir) = report_dir {
                let path = save_report(&TextReportRenderer::new(), &analysis.report, &dir)
                    .with_context(|| format!("saving report into {}", dir.display()))?;
                eprintln!("Report written to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_report(report: &AnalysisReport) {
    println!("{BANNER_RULE}");
    println!(
        "CONTRACT ANALYSIS: {}",
        report.filename.as_deref().unwrap_or("unnamed document")
    );
    println!("{BANNER_RULE}");

    println!("\nEXTRACTED CLAUSES:");
    for line in display_lines(&parse_json_safely(&report.extracted_clauses)) {
        println!("{line}");
    }

    let (high, medium, low) = report.severity_counts();
    println!("\nRISK ASSESSMENT ({high} high, {medium} medium, {low} low):");
    println!("{}", report.risk_assessment);

    println!("\nSUGGESTED REVISIONS:");
    println!("{}", report.suggestions);

    println!("\n{}", report.disclaimer);
}

async fn interactive(pipeline: &SymptomPipeline, save_summary: Option<&PathBuf>) -> Result<ExitCode> {
    println!("Welcome to the Symptom Checker & Doctor Prep Bot!");
    println!("This tool helps you organize your symptoms for your doctor visit.");
    println!("\nIMPORTANT: This is NOT a diagnostic tool. Always consult healthcare professionals.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\n{BANNER_RULE}");
        print!("\nDescribe your symptoms (or 'quit' to exit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let input = line?;
        let input = input.trim();

        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            println!("Thank you for using Symptom Checker. Take care!");
            break;
        }
        if input.is_empty() {
            println!("{}", ValidationError::EmptySymptoms);
            continue;
        }

        check_symptoms(pipeline, input, save_summary).await?;

        print!("\nWould you like to analyze more symptoms? (y/n): ");
        io::stdout().flush()?;
        let answer = match lines.next() {
            Some(line) => line?.trim().to_lowercase(),
            None => break,
        };
        if !matches!(answer.as_str(), "y" | "yes") {
            break;
        }
    }

    println!("\nRemember to share your summary with your healthcare provider!");
    Ok(ExitCode::SUCCESS)
}

async fn check_symptoms(
    pipeline: &SymptomPipeline,
    text: &str,
    save_summary: Option<&PathBuf>,
) -> Result<ExitCode> {
    println!("\n{BANNER_RULE}");
    println!("SYMPTOM CHECKER & DOCTOR PREP BOT");
    println!("{BANNER_RULE}");

    let run = pipeline.run(text).await?;
    let findings = match &run.check {
        SymptomCheck::Completed(findings) => findings,
        SymptomCheck::Failed { error } => {
            println!("Error in processing: {error}");
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("\n{BANNER_RULE}");
    println!("RESULTS SUMMARY");
    println!("{BANNER_RULE}");

    println!("\nSTRUCTURED SYMPTOMS:");
    println!("{}", "-".repeat(30));
    for line in display_lines(&findings.symptoms()) {
        println!("{line}");
    }

    let conditions = findings.conditions();
    println!("\nPOTENTIAL AREAS OF CONCERN:");
    println!("{}", "-".repeat(35));
    if UrgencyLevel::from_conditions(&conditions) == UrgencyLevel::High {
        println!("!! Urgency is high: consider seeking care promptly.");
    }
    for line in display_lines(&conditions) {
        println!("{line}");
    }

    println!("\nDOCTOR VISIT SUMMARY:");
    println!("{}", "-".repeat(30));
    let note = findings.note();
    match note.get("readable_format") {
        Some(readable) => println!("{}", readable.as_str().map_or_else(|| readable.to_string(), str::to_string)),
        None => println!("{}", findings.doctor_note),
    }

    println!("\nDISCLAIMER: {SYMPTOM_DISCLAIMER}");

    if let Some(dir) = save_summary {
        let saved = save_visit_summary(findings, dir)
            .with_context(|| format!("saving visit summary into {}", dir.display()))?;
        if let Some(path) = saved {
            println!("Visit summary written to {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
