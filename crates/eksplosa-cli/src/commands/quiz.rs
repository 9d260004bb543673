use std::io::BufRead;
use std::time::Duration;

use clap::{Args, Subcommand};
use eksplosa_core::{
    quiz_link, Config, Database, Event, MemoryStore, ProgressStore, QuizEngine, QuizParams,
    QuizSnapshot, QuizState,
};

use crate::source::Source;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args)]
pub struct Target {
    /// Language id
    #[arg(long)]
    language: Option<String>,
    /// Province id
    #[arg(long)]
    province: Option<String>,
    /// Level id to start at (must be unlocked)
    #[arg(long)]
    level: Option<String>,
    /// Quiz page link or query string, e.g. "?language=3&province=1"
    #[arg(long)]
    link: Option<String>,
}

impl Target {
    fn params(&self) -> QuizParams {
        let mut params = match self.link.as_deref() {
            Some(link) => QuizParams::from_query(link.split_once('?').map_or(link, |(_, q)| q)),
            None => QuizParams::default(),
        };
        if let Some(ref id) = self.language {
            params.language_id = Some(id.clone());
        }
        if let Some(ref id) = self.province {
            params.province_id = Some(id.clone());
        }
        if let Some(ref id) = self.level {
            params.level_id = Some(id.clone());
        }
        params
    }
}

#[derive(Subcommand)]
pub enum QuizAction {
    /// Play a quiz; words are read from stdin
    Play {
        #[command(flatten)]
        target: Target,
        /// Keep progress in memory only
        #[arg(long)]
        dry_run: bool,
        /// Skip the feedback pause after each answer
        #[arg(long)]
        no_wait: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Show the levels of a language and which are unlocked
    Levels {
        #[command(flatten)]
        target: Target,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the quiz page link for a language
    Link {
        #[command(flatten)]
        target: Target,
    },
}

pub async fn run(action: QuizAction, source: &Source) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        QuizAction::Play {
            target,
            dry_run,
            no_wait,
            json,
        } => {
            let engine = build_engine(source, &config, dry_run)?;
            play(engine, &target.params(), no_wait, json).await
        }
        QuizAction::Levels { target, json } => {
            let mut engine = build_engine(source, &config, false)?;
            engine.initialize(&target.params()).await?;
            let snapshot = engine.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot.levels)?);
                return Ok(());
            }
            for badge in &snapshot.levels {
                let status = if badge.completed {
                    "completed"
                } else if badge.accessible {
                    "open"
                } else {
                    "locked"
                };
                let marker = if badge.active { '*' } else { ' ' };
                println!("{marker} {:>2}  {:<10} {:<9} {}", badge.level_number, badge.id, status, badge.topic);
            }
            Ok(())
        }
        QuizAction::Link { target } => {
            let params = target.params();
            let (language, province) = params.require()?;
            println!("{}", quiz_link(language, province));
            Ok(())
        }
    }
}

/// Progress lives in the real database unless this is a dry run.
fn build_engine(
    source: &Source,
    config: &Config,
    dry_run: bool,
) -> Result<QuizEngine, Box<dyn std::error::Error>> {
    let gateway = source.gateway(config)?;
    let store: Box<dyn ProgressStore> = if dry_run {
        Box::new(MemoryStore::new())
    } else {
        Box::new(Database::open()?)
    };
    Ok(QuizEngine::from_config(gateway, store, &config.quiz))
}

async fn play(
    mut engine: QuizEngine,
    params: &QuizParams,
    no_wait: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = engine.initialize(params).await?;
    report(&events, json)?;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    while engine.state() != QuizState::SessionComplete {
        if !json {
            render(&engine.snapshot());
        }
        let Some(line) = lines.next() else { break };
        let line = line?;
        let (command, arg) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));

        let result = match command {
            "" => continue,
            "quit" | "q" => break,
            "undo" => {
                let word = if arg.is_empty() {
                    engine.selected_words().last().cloned().unwrap_or_default()
                } else {
                    arg.trim().to_string()
                };
                engine.reset_word(&word)
            }
            "level" => engine.select_level(arg.trim()).await,
            "restart" => engine.restart_level(),
            token => {
                let word = resolve_word(token, &engine.remaining_options());
                engine.select_word(&word)
            }
        };
        match result {
            Ok(events) => report(&events, json)?,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        }

        while engine.state() == QuizState::Evaluating {
            let next = if no_wait {
                engine.acknowledge().await
            } else {
                tokio::time::sleep(TICK_INTERVAL).await;
                engine.tick().await
            };
            match next {
                Ok(events) => report(&events, json)?,
                Err(e) => {
                    eprintln!("error: {e}");
                    break;
                }
            }
        }
    }

    if !json {
        println!("score: {}", engine.score());
    }
    Ok(())
}

/// A number picks from the remaining options (1-based); anything else is the word itself.
fn resolve_word(token: &str, options: &[String]) -> String {
    match token.parse::<usize>() {
        Ok(n) if n >= 1 && n <= options.len() => options[n - 1].clone(),
        _ => token.to_string(),
    }
}

fn render(snapshot: &QuizSnapshot) {
    match snapshot.state {
        QuizState::LevelComplete => {
            println!("level complete; type `level <id>` to continue");
            return;
        }
        QuizState::Evaluating => {
            println!("answer pending; type any word to retry");
            return;
        }
        QuizState::Presenting => {}
        _ => return,
    }
    println!();
    if let Some(ref heading) = snapshot.heading {
        println!("{heading}");
    }
    if let Some(ref prompt) = snapshot.prompt {
        println!("  {prompt}");
    }
    let mut slots: Vec<&str> = snapshot.selected.iter().map(String::as_str).collect();
    slots.resize(snapshot.answer_len.max(slots.len()), "___");
    println!("  {}", slots.join(" "));
    let options: Vec<String> = snapshot
        .options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("[{}] {o}", i + 1))
        .collect();
    println!("  {}", options.join("  "));
}

fn report(events: &[Event], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
            continue;
        }
        match event {
            Event::LevelStarted { level_number, .. } => println!("== Level {level_number} =="),
            Event::Outcome { kind, .. } => {
                let copy = kind.copy();
                println!("{}", copy.title);
                println!("  {}", copy.description);
            }
            Event::QuizFinished { score, .. } => println!("quiz finished with score {score}"),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_pick_remaining_options() {
        let options = vec!["lagi".to_string(), "Aku".to_string()];
        assert_eq!(resolve_word("2", &options), "Aku");
        assert_eq!(resolve_word("3", &options), "3");
        assert_eq!(resolve_word("lagi", &options), "lagi");
    }

    #[test]
    fn link_and_flags_merge_into_params() {
        let target = Target {
            language: None,
            province: Some("9".into()),
            level: None,
            link: Some("/pages/quizPage.html?language=3&province=1".into()),
        };
        let params = target.params();
        assert_eq!(params.language_id.as_deref(), Some("3"));
        assert_eq!(params.province_id.as_deref(), Some("9"));
    }
}
