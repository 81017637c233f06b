use anyhow::{Result, bail};
use jyotish_agents::AstrologerChat;
use jyotish_common::{ConversationTurn, UserIdentity};
use jyotish_config::AppConfig;
use jyotish_kundali::{ChartSummary, KundaliClient};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use crate::birth_args::BirthArgs;

const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "/q"];

/// Fetch the chart, greet, then chat until EOF or an exit command.
///
/// History is held here and sent whole with each turn; the gateway and
/// chat layer keep nothing between calls.
pub async fn run(
    config: &AppConfig,
    birth: &BirthArgs,
    name: Option<String>,
    place: Option<String>,
) -> Result<()> {
    let birth = birth.to_birth_data()?;
    let composite = KundaliClient::new(&config.astrology)?
        .fetch_all_facets(&birth)
        .await;

    if !composite.is_usable() {
        bail!(
            "Unable to fetch valid kundali data. Please check your Astrology API key/user ID and try again."
        );
    }

    let identity = UserIdentity {
        name,
        dob: Some(birth.date_label()),
        tob: Some(birth.time_label()),
        pob: place,
    };
    let chat = AstrologerChat::from_config(&config.gemini);
    info!("chatting with model {}", chat.model());

    println!("{}", ChartSummary::from_composite(&composite));
    println!();

    // Empty history: the model answers the priming pair with its greeting.
    let greeting = chat.chat(&[], Some(&composite), Some(&identity)).await?;
    println!("Jyotish: {greeting}\n");

    let mut history: Vec<ConversationTurn> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&line) {
            break;
        }

        history.push(ConversationTurn::user(line));
        match chat.chat(&history, Some(&composite), Some(&identity)).await {
            Ok(reply) => {
                println!("Jyotish: {reply}\n");
                history.push(ConversationTurn::assistant(reply));
            }
            Err(e) => {
                // Drop the unanswered turn so the next attempt starts clean.
                history.pop();
                error!("Chat error: {}", e);
                println!("Sorry, I could not reach the stars just now: {e}\n");
            }
        }
    }

    println!("Shubham bhavatu. Goodbye!");
    Ok(())
}
