// src/cli/chat.rs — Follow-up chat REPL over a seeded diagnosis

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::core::CloudAnalyzer;

/// Run the interactive chat on stdin until EOF or `quit`.
///
/// `/questions` lists sample questions; `/N` asks sample question N.
pub async fn run_chat(analyzer: &mut CloudAnalyzer, show_cost: bool) -> anyhow::Result<()> {
    eprintln!("Ask your network question (`/questions` for ideas, `quit` to leave).\n");
    let turns = chat_loop(analyzer, BufReader::new(tokio::io::stdin()), show_cost).await?;
    eprintln!(
        "\nSession: {} follow-up(s), transcript {} turns",
        turns,
        analyzer.session().transcript().len()
    );
    Ok(())
}

/// Answer questions read line by line from `input`. Returns the number of
/// answered follow-ups; a failed question is reported and the loop goes on.
async fn chat_loop<R>(analyzer: &mut CloudAnalyzer, input: R, show_cost: bool) -> anyhow::Result<u32>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut turns = 0u32;

    loop {
        print!("> ");
        std::io::stdout().flush().ok();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let trimmed = line.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let question = if trimmed.starts_with('/') {
            match resolve_slash(trimmed, analyzer.sample_questions()) {
                SlashOutcome::Ask(q) => q.to_string(),
                SlashOutcome::Handled => continue,
            }
        } else {
            trimmed.to_string()
        };

        match analyzer.chat(&question).await {
            Ok(answer) => {
                println!("{answer}\n");
                turns += 1;
                if show_cost {
                    eprintln!("{}", super::run::format_cost(analyzer.last_cost()));
                }
            }
            Err(e) => {
                eprintln!("[error] {e}");
            }
        }
    }

    Ok(turns)
}

enum SlashOutcome<'a> {
    Ask(&'a str),
    Handled,
}

fn resolve_slash<'a>(input: &str, questions: &'a [&'a str]) -> SlashOutcome<'a> {
    let cmd = &input[1..];
    if cmd == "questions" || cmd == "help" {
        print_questions(questions);
        return SlashOutcome::Handled;
    }
    match cmd.parse::<usize>() {
        Ok(n) if n >= 1 && n <= questions.len() => SlashOutcome::Ask(questions[n - 1]),
        _ => {
            eprintln!("Unknown command: {input}");
            SlashOutcome::Handled
        }
    }
}

pub fn print_questions(questions: &[&str]) {
    for (i, q) in questions.iter().enumerate() {
        println!("  /{}  {}", i + 1, q);
    }
}
