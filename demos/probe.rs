// Manual probe against the live site, for checking selectors after markup changes
//
//   probe details <manga-id>
//   probe chapters <manga-id>
//   probe pages <manga-id> <chapter-id>
//   probe search <term> [page]
//   probe home
//
// Set XOXOCOMICS_CONFIG to a TOML file to point at another base url or search layout.

use serde::Serialize;
use std::env;
use std::process::ExitCode;
use xoxocomics_source::models::{PageMetadata, SearchRequest};
use xoxocomics_source::{Config, Source, XoXoComics};

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize result: {}", e),
    }
}

fn usage() -> ExitCode {
    eprintln!("usage: probe <details|chapters|pages|search|home> [args...]");
    ExitCode::from(2)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = env::var("XOXOCOMICS_CONFIG")
        .map(Config::load)
        .unwrap_or_default();
    let source = match XoXoComics::with_config(config) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        ["details", id] => source.get_manga_details(id).await.map(|m| print_json(&m)),
        ["chapters", id] => source.get_chapters(id).await.map(|c| print_json(&c)),
        ["pages", id, chapter] => source
            .get_chapter_details(id, chapter)
            .await
            .map(|d| print_json(&d)),
        ["search", term, rest @ ..] => {
            let page = rest
                .first()
                .and_then(|p| p.parse().ok())
                .map(|page| PageMetadata { page });
            source
                .get_search_results(&SearchRequest::title(term), page)
                .await
                .map(|r| print_json(&r))
        }
        ["home"] => {
            let mut sections = Vec::new();
            source.get_home_page_sections(&mut |s| sections.push(s)).await;
            print_json(&sections);
            Ok(())
        }
        _ => return usage(),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
