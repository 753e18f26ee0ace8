mod config;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use mockmate_chat::{ChatConfig, ChatSessionStore};
use mockmate_core::{CompletionProvider, Level};
use mockmate_generation::{GenerationService, GroqProvider, MockProvider};
use mockmate_interview::{InMemorySessionStore, InterviewEngine, PreliminaryAnswer};

use config::Config;

#[derive(Parser)]
#[command(name = "mockmate")]
#[command(about = "mockmate — simulated technical interviews with scored assessments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scripted coding assessment end-to-end and print the scorecard
    Demo {
        /// Interview topic
        #[arg(short, long, default_value = "Arrays")]
        topic: String,
        /// Candidate level (junior, mid, senior, expert)
        #[arg(short, long, default_value = "junior")]
        level: String,
    },
    /// Hold a free-form conversational interview on stdin/stdout
    Chat {
        /// Role being interviewed for
        #[arg(short, long, default_value = "Software Engineer")]
        topic: String,
        /// Candidate level (junior, mid, senior, expert)
        #[arg(short, long, default_value = "junior")]
        level: String,
        /// Interviewer tone
        #[arg(long, default_value = "Professional")]
        tone: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    let generation = Arc::new(build_generation(&config));

    match cli.command {
        Commands::Demo { topic, level } => {
            let level = parse_level(&level)?;
            run_demo(generation, &topic, level).await
        }
        Commands::Chat { topic, level, tone } => {
            let level = parse_level(&level)?;
            run_chat(&config, generation, &topic, level, &tone).await
        }
    }
}

fn parse_level(raw: &str) -> Result<Level> {
    raw.parse::<Level>().map_err(anyhow::Error::msg)
}

fn build_generation(config: &Config) -> GenerationService {
    let provider: Arc<dyn CompletionProvider> = match &config.groq_api_key {
        Some(key) => Arc::new(GroqProvider::new(key.clone())),
        None => {
            info!("GROQ_API_KEY not set, running on built-in templates");
            Arc::new(MockProvider::new())
        }
    };
    GenerationService::new(provider).with_model(config.model.clone())
}

const DEMO_SOLUTION: &str = "fn solve(values: &[i64]) -> i64 {\n    values.iter().sum()\n}\n";

async fn run_demo(generation: Arc<GenerationService>, topic: &str, level: Level) -> Result<()> {
    let engine = InterviewEngine::new(Arc::new(InMemorySessionStore::new()), generation);

    let session = engine
        .create_session(Uuid::new_v4(), topic, level)
        .await?;
    let id = session.id;

    let questions = engine.start_preliminary(id).await?;
    println!("Preliminary questions:");
    for (i, question) in questions.iter().enumerate() {
        println!("  {}. {question}", i + 1);
    }

    let answers = questions
        .iter()
        .enumerate()
        .map(|(i, question)| PreliminaryAnswer {
            question: question.clone(),
            answer: format!("Demo answer {}", i + 1),
            timestamp: chrono::Utc::now().timestamp_millis() + i as i64,
        })
        .collect();
    let preliminary = engine.submit_preliminary_answers(id, answers).await?;
    println!(
        "\nPreliminary score: {:.0} ({})",
        preliminary.score, preliminary.feedback
    );

    let coding = engine.start_coding(id).await?;
    println!("\nCoding questions ({}s limit):", coding.time_limit_secs);
    for question in &coding.questions {
        println!(
            "  {}. [{}] {}",
            question.question_number, question.difficulty, question.title
        );
    }

    let first = coding
        .questions
        .first()
        .map(|q| q.question_number)
        .unwrap_or(1);
    let solution = engine
        .submit_code_solution(id, first, DEMO_SOLUTION, Some("rust".to_string()))
        .await?;
    println!("\nSolution score for question {first}: {:.0}", solution.score);

    engine.complete_interview(id).await?;
    let scorecard = engine.scorecard(id).await?;
    println!("\nScorecard:\n{}", serde_json::to_string_pretty(&scorecard)?);
    Ok(())
}

async fn run_chat(
    config: &Config,
    generation: Arc<GenerationService>,
    topic: &str,
    level: Level,
    tone: &str,
) -> Result<()> {
    let chat_config = ChatConfig {
        ttl: chrono::Duration::seconds(config.chat_ttl_secs as i64),
        sliding: config.chat_sliding_expiry,
        ..ChatConfig::default()
    };
    let store = Arc::new(ChatSessionStore::new(generation, chat_config));
    let sweeper = store.spawn_sweeper();

    let session_id = Uuid::new_v4().to_string();
    let greeting = store.open(session_id.clone(), topic, level, tone).await;
    println!("{greeting}");
    println!("(type \"end interview\" to finish)\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = store.send(&session_id, line).await?;
        println!("{reply}");
        if line.eq_ignore_ascii_case("end interview") {
            break;
        }
    }

    let history = store.clear(&session_id).await;
    info!(turns = history.len(), "Interview ended");
    sweeper.abort();
    Ok(())
}
