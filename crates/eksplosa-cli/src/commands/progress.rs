use clap::Subcommand;
use eksplosa_core::quiz::progress::{last_level_key, COMPLETED_LEVELS_KEY};
use eksplosa_core::Database;
use serde_json::json;

const LAST_LEVEL_PREFIX: &str = "lastLevel_";

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show completed levels and the last level per language
    Show {
        /// Only show the last level of this language
        #[arg(long)]
        language: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget all saved progress
    Reset,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        ProgressAction::Show { language, json } => {
            let completed: Vec<String> = match db.kv_get(COMPLETED_LEVELS_KEY)? {
                Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    tracing::warn!("ignoring corrupt {COMPLETED_LEVELS_KEY} value: {e}");
                    Vec::new()
                }),
                None => Vec::new(),
            };
            let last_levels: Vec<(String, String)> = match language {
                Some(ref id) => db
                    .kv_get(&last_level_key(id))?
                    .map(|level| vec![(id.clone(), level)])
                    .unwrap_or_default(),
                None => db
                    .kv_list_prefix(LAST_LEVEL_PREFIX)?
                    .into_iter()
                    .map(|(key, level)| (key[LAST_LEVEL_PREFIX.len()..].to_string(), level))
                    .collect(),
            };

            if json {
                let last: serde_json::Map<String, serde_json::Value> = last_levels
                    .into_iter()
                    .map(|(lang, level)| (lang, serde_json::Value::String(level)))
                    .collect();
                let out = json!({ "completed": completed, "last_level": last });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            if completed.is_empty() {
                println!("no completed levels");
            } else {
                println!("completed levels: {}", completed.join(", "));
            }
            for (lang, level) in last_levels {
                println!("language {lang}: last completed level {level}");
            }
        }
        ProgressAction::Reset => {
            let removed = db.kv_delete_prefix(LAST_LEVEL_PREFIX)?;
            let had_completed = db.kv_delete(COMPLETED_LEVELS_KEY)?;
            tracing::info!(removed, had_completed, "progress reset");
            println!("progress reset");
        }
    }
    Ok(())
}
