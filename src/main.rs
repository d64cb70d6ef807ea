//! CallSim trainee console.
//!
//! A thin front-end over the client core: probe the backend, list voices,
//! or run an interactive training call. During a call, typed lines are
//! routed through the recognition pipeline (a host-fed capture engine) and
//! agent replies are spoken through the server-first speech strategy.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

use callsim_client::{
    ApiClient, AudioOutput, Call, CallerInfo, ClientConfig, Lang, NullOutput, PushEngine,
    RecognitionEvent, Recognizer, RodioOutput, Speaker,
};

/// CallSim client - call-center training console
#[derive(Parser, Debug)]
#[command(name = "callsim-client")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Probe the backend's liveness endpoint
    Health,

    /// List the synthesis voices the backend offers
    Voices,

    /// Run an interactive training call (the default)
    Call {
        /// Trainee name attached to the simulated caller profile
        #[arg(long)]
        name: Option<String>,

        /// Synthesis language tag (en, es, fr, de, it, pt, ja, ko, zh-CN)
        #[arg(long)]
        lang: Option<String>,

        /// Skip audio playback of agent replies
        #[arg(long)]
        mute: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => ClientConfig::from_file(&path)?,
        None => ClientConfig::from_env()?,
    };
    let client = ApiClient::new(&config)?;

    match cli.command.unwrap_or(Commands::Call {
        name: None,
        lang: None,
        mute: false,
    }) {
        Commands::Health => {
            let report = client.health_check().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_healthy() {
                std::process::exit(1);
            }
        }
        Commands::Voices => {
            let voices = client.voices().await;
            if voices.is_empty() {
                println!("no voices available");
            } else {
                for voice in voices {
                    println!("{:<10} {} ({})", voice.id, voice.name, voice.lang);
                }
            }
        }
        Commands::Call { name, lang, mute } => {
            let lang = lang
                .map(|l| Lang::from_str_or_default(&l))
                .unwrap_or(config.lang);
            run_call(client, name, lang, mute).await?;
        }
    }

    Ok(())
}

/// Drive one training call from open to hang-up.
async fn run_call(
    client: ApiClient,
    name: Option<String>,
    lang: Lang,
    mute: bool,
) -> anyhow::Result<()> {
    let output: Arc<dyn AudioOutput> = if mute {
        Arc::new(NullOutput::new())
    } else {
        Arc::new(RodioOutput::new())
    };
    let speaker = Speaker::for_client(client.clone(), output);

    let engine = Arc::new(PushEngine::new());
    let (recognizer, mut events) = Recognizer::new(engine.clone());
    recognizer.set_language(lang);

    let mut caller_info = CallerInfo::new();
    if let Some(name) = name {
        caller_info.insert("name".to_string(), serde_json::Value::String(name));
    }

    let mut call = Call::new(client);
    let opened = call.open(caller_info).await?;
    println!("-- call {} connected --", opened.session_id);
    if let Some(greeting) = opened.greeting.as_deref() {
        println!("agent: {greeting}");
        if let Err(e) = speaker.speak(greeting, lang).await {
            warn!("greeting playback failed: {e}");
        }
    }
    println!("(type your lines; /quit hangs up)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        let Some(text) = capture_utterance(&recognizer, &engine, &mut events, line).await else {
            continue;
        };

        match call.send(&text).await {
            Ok(reply) => {
                println!("agent: {}", reply.reply);
                if let Err(e) = speaker.speak(&reply.reply, lang).await {
                    warn!("reply playback failed: {e}");
                }
            }
            Err(e) => eprintln!("send failed: {e}"),
        }
    }

    let summary = call.end().await?;
    println!(
        "-- call {} with {} transcript lines --",
        summary.status,
        summary.transcript.len()
    );
    Ok(())
}

/// Route one typed line through the recognition pipeline, returning the
/// final transcript for that utterance. Falls back to the raw line when
/// capture cannot start.
async fn capture_utterance(
    recognizer: &Recognizer,
    engine: &PushEngine,
    events: &mut mpsc::UnboundedReceiver<RecognitionEvent>,
    line: &str,
) -> Option<String> {
    if !recognizer.start() {
        return Some(line.to_string());
    }
    engine.push_final(line);

    let mut transcript = None;
    while let Some(event) = events.recv().await {
        match event {
            RecognitionEvent::Final(text) => transcript = Some(text),
            RecognitionEvent::Interim(_) => {}
            RecognitionEvent::Error(code) => eprintln!("capture error: {code}"),
            RecognitionEvent::Ended => break,
        }
    }
    transcript
}
