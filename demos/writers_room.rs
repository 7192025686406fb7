use std::io::{self, BufRead, Write};
use std::sync::Arc;

use writersroom::clients::openai::OpenAIClient;
use writersroom::{
    ApprovalTerminationStrategy, ChatAgent, ChatConfig, EndReason, GroupChat,
    PromptSelectionStrategy, SelectionPolicy,
};

// Run from the root folder of the repo as follows:
// WRITERSROOM_ENDPOINT=https://myresource.openai.azure.com \
// WRITERSROOM_API_KEY=your-key \
// WRITERSROOM_DEPLOYMENT=gpt-4o \
// cargo run --example writers_room

const COPYWRITER: &str = "CopyWriter";
const REVIEWER: &str = "Reviewer";

const COPYWRITER_INSTRUCTIONS: &str = "You are a copywriter with ten years of experience \
and a dry wit. Your goal is to refine and decide on a single best copy as an expert in the \
field. Propose exactly one refined tagline per response, with no chit-chat around it.";

const REVIEWER_INSTRUCTIONS: &str = "You are an art director with an eye for effective copy. \
Determine whether the latest proposal is acceptable to print. If it is, say that it is \
approved. If it is not, provide insight on how to refine it, without giving an example.";

// Per-speaker ANSI colors for the transcript.
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn color_for(speaker: &str) -> &'static str {
    match speaker {
        COPYWRITER => CYAN,
        REVIEWER => YELLOW,
        _ => GREEN,
    }
}

#[tokio::main]
async fn main() {
    writersroom::init_logger();

    let config = match ChatConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };
    let client = Arc::new(OpenAIClient::from_config(&config));

    let policy = SelectionPolicy::new(
        vec![COPYWRITER.to_string(), REVIEWER.to_string()],
        COPYWRITER,
    )
    .with_rule("After user input, it is CopyWriter's turn.")
    .with_rule("After CopyWriter replies, it is Reviewer's turn.")
    .with_rule("After Reviewer provides feedback, it is CopyWriter's turn.");

    let selection = Arc::new(PromptSelectionStrategy::new(client.clone(), policy));
    let termination =
        Arc::new(ApprovalTerminationStrategy::new(client.clone()).observing(REVIEWER));

    let stdin = io::stdin();
    loop {
        print!("\n{}You [empty line or 'exit' to quit]:{} ", GREEN, RESET);
        io::stdout().flush().expect("Failed to flush stdout");

        let mut line = String::new();
        stdin
            .lock()
            .read_line(&mut line)
            .expect("Failed to read line");
        let user_input = line.trim();
        if user_input.is_empty() || user_input == "exit" {
            break;
        }

        // A fresh chat per session so histories are never shared.
        let mut chat = GroupChat::new(selection.clone(), termination.clone());
        chat.add_agent(ChatAgent::new(
            COPYWRITER,
            COPYWRITER_INSTRUCTIONS,
            client.clone(),
        ))
        .expect("roster is built once per session");
        chat.add_agent(ChatAgent::new(
            REVIEWER,
            REVIEWER_INSTRUCTIONS,
            client.clone(),
        ))
        .expect("roster is built once per session");

        let mut run = match chat.invoke(user_input) {
            Ok(run) => run,
            Err(err) => {
                eprintln!("could not start session: {}", err);
                continue;
            }
        };

        loop {
            match run.next_turn().await {
                Ok(Some(turn)) => {
                    let speaker = turn.speaker();
                    println!(
                        "\n{}{}:{} {}",
                        color_for(speaker),
                        speaker,
                        RESET,
                        turn.text
                    );
                }
                Ok(None) => break,
                Err(err) => {
                    eprintln!("\nsession aborted: {}", err);
                    break;
                }
            }
        }

        match run.end_reason() {
            Some(EndReason::Approved) => {
                println!("\n{}[approved after {} turns]{}", DIM, run.iterations(), RESET)
            }
            Some(EndReason::MaximumIterations) => println!(
                "\n{}[stopped at the iteration ceiling after {} turns]{}",
                DIM,
                run.iterations(),
                RESET
            ),
            None => {}
        }
    }
}
