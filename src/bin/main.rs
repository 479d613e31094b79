use fpa_copilot::{agent::Copilot, config::{init_tracing, AppConfig}, loader::load_dataset};
use tracing::info;

const SAMPLE_QUESTIONS: &[&str] = &[
    "What was June 2025 revenue vs budget in USD?",
    "Show Gross Margin % trend for the last 3 months.",
    "Break down Opex by category for June 2025.",
    "What is our cash runway right now?",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level);

    info!(fixtures_dir = %config.fixtures_dir.display(), "FP&A copilot starting");

    let dataset = load_dataset(&config.fixtures_dir)?;
    let copilot = Copilot::with_default_tools(dataset);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let questions: Vec<String> = if args.is_empty() {
        SAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        vec![args.join(" ")]
    };

    for question in questions {
        println!("\n> {}", question);
        match copilot.ask(&question) {
            Ok(answer) => println!("{}", answer.summary),
            Err(e) => eprintln!("Could not answer: {}", e),
        }
    }

    Ok(())
}
