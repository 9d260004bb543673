use clap::Subcommand;
use eksplosa_core::catalog::PROVINCE_GRID_BREAKPOINT_PX;
use eksplosa_core::{quiz_link, Catalog, Config, ViewportClass};
use serde_json::json;

use crate::source::Source;

#[derive(Subcommand)]
pub enum ProvincesAction {
    /// List provinces as the landing grid shows them
    List {
        /// Show every province instead of the first page
        #[arg(long)]
        all: bool,
        /// Viewport width used to pick the page size
        #[arg(long, default_value = "1280")]
        viewport: f64,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a province with its languages and fun facts
    Show {
        /// Province id or slug
        id: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: ProvincesAction, source: &Source) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let gateway = source.gateway(&config)?;
    let catalog = Catalog::new(gateway.as_ref());

    match action {
        ProvincesAction::List { all, viewport, json } => {
            let class = ViewportClass::for_width(viewport, PROVINCE_GRID_BREAKPOINT_PX);
            let page = catalog.provinces_page(all, class).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
                return Ok(());
            }
            for p in &page.provinces {
                println!("{:>4}  Provinsi {}", p.id, p.name);
            }
            if page.has_more && !page.showing_all {
                println!("({} of {} shown, use --all to see every province)", page.provinces.len(), page.total);
            }
        }
        ProvincesAction::Show { id, json } => {
            let detail = catalog.province_detail(&id).await?;
            if json {
                let languages: Vec<_> = detail
                    .languages
                    .iter()
                    .map(|l| {
                        json!({
                            "id": l.id,
                            "name": l.name,
                            "quiz_link": quiz_link(&l.id, &detail.province.id),
                        })
                    })
                    .collect();
                let out = json!({
                    "province": detail.province,
                    "languages": languages,
                    "fun_facts": detail.fun_facts,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("{}", detail.language_heading());
            for l in &detail.languages {
                println!("  {:>4}  {}  {}", l.id, l.name, quiz_link(&l.id, &detail.province.id));
            }
            if !detail.fun_facts.is_empty() {
                println!();
                println!("{}", detail.fun_fact_heading());
                for fact in &detail.fun_facts {
                    let title = fact.title.as_deref().unwrap_or("-");
                    println!("  * {title}");
                    if let Some(ref desc) = fact.description {
                        println!("    {desc}");
                    }
                }
            }
        }
    }
    Ok(())
}
