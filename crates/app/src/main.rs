//! Console driver for the quiz turn processor.
//!
//! Stands in for the voice platform's dispatcher: it owns one session
//! state, feeds one event at a time, and fully awaits each turn before
//! reading the next line, which is the serialization contract the turn
//! processor relies on.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use quiz_core::model::{QuestionCard, QuizId, SessionState};
use quiz_core::QuizCatalog;
use services::{
    EventRouter, QuizSource, QuizletClient, QuizletConfig, Request, StaticQuizSource,
    TurnProcessor,
};

fn quiz_source() -> Arc<dyn QuizSource> {
    match QuizletConfig::from_env() {
        Some(config) => Arc::new(QuizletClient::new(config)),
        None => {
            warn!("QUIZLET_CLIENT_ID not set; using the built-in demo sets");
            Arc::new(demo_source())
        }
    }
}

/// Two small offline sets so the demo works without provider credentials.
fn demo_source() -> StaticQuizSource {
    StaticQuizSource::new()
        .with_set(
            QuizId::new(224426529),
            vec![
                QuestionCard::new("kingdom", "the highest taxonomic rank"),
                QuestionCard::new("phylum", "the rank below kingdom"),
                QuestionCard::new("class", "the rank below phylum"),
            ],
        )
        .with_set(
            QuizId::new(224427531),
            vec![
                QuestionCard::new("triangle", "a polygon with three sides"),
                QuestionCard::new("hexagon", "a polygon with six sides"),
            ],
        )
}

fn parse_request(line: &str) -> Option<Request> {
    let line = line.trim();
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "category" => Some(Request::intent_with_slot("categorySelect", "category", rest)),
        "quiz" => Some(Request::intent_with_slot("quizSelect", "quiz", rest)),
        "answer" => Some(Request::intent_with_slot("answerQuestion", "answer", rest)),
        "repeat" => Some(Request::intent("repeatQuestion")),
        "skip" => Some(Request::intent("skipQuestion")),
        "end" => Some(Request::intent("endQuiz")),
        "stop" | "quit" | "exit" => Some(Request::intent("AMAZON.StopIntent")),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let processor = TurnProcessor::new(QuizCatalog::study_defaults(), quiz_source());
    let router = EventRouter::new(processor);

    let mut state = SessionState::empty();

    // The launch turn speaks the welcome prompt.
    match router.handle(state.clone(), Request::Launch).await {
        Ok(Some(outcome)) => {
            println!("{}", outcome.directive.speech_text);
            state = outcome.state;
        }
        Ok(None) => {}
        Err(err) => eprintln!("error: {err}"),
    }
    println!("(commands: category <name>, quiz <name>, answer <text>, repeat, skip, end, quit)");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let Some(request) = parse_request(&line) else {
            println!("(unrecognized command)");
            continue;
        };

        match router.handle(state.clone(), request).await {
            Ok(Some(outcome)) => {
                println!("{}", outcome.directive.speech_text);
                if outcome.directive.should_end_session {
                    break;
                }
                state = outcome.state;
            }
            Ok(None) => break,
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}
