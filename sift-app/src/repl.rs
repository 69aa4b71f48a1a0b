//! Terminal front-end: renders verdicts and drives the follow-up chat.

use anyhow::Result;
use sift_analysis::{AnalysisResult, ContentKind, TurnOutcome, Workbench};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Analyze one submission, print the verdict, exit.
pub async fn run_once(workbench: &mut Workbench, content: &str, kind: ContentKind) -> Result<()> {
    let result = workbench.submit(content, kind).await?;
    render_result(&result);
    Ok(())
}

/// Interactive loop: `/check <content>` analyzes, plain input chats about
/// the current verdict (or analyzes when no verdict exists yet).
pub async fn run_interactive(workbench: &mut Workbench) -> Result<()> {
    println!("sift — submit text or a URL to analyze it for misinformation signals.");
    println!("Commands: /check <content>  /quit");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }

        if let Some(content) = input.strip_prefix("/check ") {
            submit(workbench, content.trim()).await;
        } else if workbench.has_session() {
            chat(workbench, input).await;
        } else {
            submit(workbench, input).await;
        }
    }

    Ok(())
}

/// URLs get the source-credibility template, everything else the
/// text-misinformation template.
fn detect_kind(input: &str) -> ContentKind {
    match url::Url::parse(input) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => ContentKind::Url,
        _ => ContentKind::Text,
    }
}

async fn submit(workbench: &mut Workbench, content: &str) {
    let kind = detect_kind(content);
    println!("analyzing {kind}...");
    match workbench.submit(content, kind).await {
        Ok(result) => {
            render_result(&result);
            println!("Ask follow-up questions, or /check something else.");
        }
        Err(e) => {
            // cause is already in the log; the banner is all the user needs
            println!("{e}");
        }
    }
}

async fn chat(workbench: &mut Workbench, question: &str) {
    let outcome = workbench
        .ask(question, |chunk| {
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        })
        .await;
    match outcome {
        Ok(TurnOutcome::Completed) => println!(),
        Ok(TurnOutcome::Degraded) => {
            if let Some(entry) = workbench.transcript().last() {
                println!("{}", entry.text);
            }
        }
        Err(e) => println!("{e}"),
    }
}

fn render_result(result: &AnalysisResult) {
    println!();
    println!("Risk Level: {}", result.risk_level);
    println!("Summary: {}", result.summary);
    if !result.details.is_empty() {
        println!("Detailed Analysis:");
        for detail in &result.details {
            println!("  - {detail}");
        }
    }
    if !result.sources.is_empty() {
        println!("Sources:");
        for source in &result.sources {
            println!("  {} ({})", source.title, source.uri);
        }
    }
    println!();
}
