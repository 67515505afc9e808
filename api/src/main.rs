// ./api/src/main.rs
use std::env;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use application::{ApplicationError, DocumentService, parse_search_request, render_documents};
use domain::{Author, Document, SearchRequest};
use infrastructure::InMemoryDocumentRepository;

const SEARCH_REQUEST_VAR: &str = "SEARCH_REQUEST";

// Demo entry point: seeds a store, looks one document up and runs a search.
fn main() {
    // --- Logger Initialization ---
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    info!("Logger initialized successfully.");

    let request = match load_search_request() {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to load search request: {}", e);
            std::process::exit(1);
        }
    };

    let mut service = DocumentService::new(Box::new(InMemoryDocumentRepository::new()));
    info!("Document store initialized.");

    if let Err(e) = run(&mut service, &request) {
        error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn load_search_request() -> Result<SearchRequest, ApplicationError> {
    match env::var(SEARCH_REQUEST_VAR) {
        Ok(json) => {
            info!("Using search request from environment variable {}.", SEARCH_REQUEST_VAR);
            parse_search_request(&json)
        }
        Err(_) => {
            info!(
                "{} environment variable not set. Using the built-in search request.",
                SEARCH_REQUEST_VAR
            );
            Ok(SearchRequest::builder()
                .title_prefixes(["Document"])
                .author_ids(["auth1"])
                .build())
        }
    }
}

fn run(service: &mut DocumentService, request: &SearchRequest) -> Result<(), ApplicationError> {
    let author1 = Author::new("auth1", "John Doe");
    let author2 = Author::new("auth2", "Jane Smith");

    let doc1 = service.save(
        Document::builder()
            .title("Document One")
            .content("This is the first document.")
            .author(author1)
            .build(),
    );
    let doc2 = service.save(
        Document::builder()
            .title("Document Two")
            .content("This is the second document.")
            .author(author2)
            .build(),
    );
    info!(total_documents = service.count(), "Sample documents saved.");

    println!("Saved Document 1: {}", render_documents(std::slice::from_ref(&doc1))?);
    println!("Saved Document 2: {}", render_documents(std::slice::from_ref(&doc2))?);

    let found: Vec<Document> = doc1
        .id
        .as_ref()
        .and_then(|id| service.find_by_id(id.as_str()))
        .into_iter()
        .collect();
    println!("Found Document by ID: {}", render_documents(&found)?);

    let results = service.search(request);
    info!(hits = results.len(), "Search completed.");
    println!("Search results: {}", render_documents(&results)?);

    Ok(())
}
