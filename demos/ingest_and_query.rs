//! End-to-end demo against real OpenAI and Pinecone credentials.
//!
//! ```text
//! OPENAI_API_KEY=...  PINECONE_API_KEY=...  PINECONE_HOST=https://my-index-....pinecone.io \
//!     cargo run --example ingest_and_query -- ./document.pdf "What is this document about?"
//! ```

use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use url::Url;

use ragline::config::PipelineConfig;
use ragline::embeddings::OpenAiEmbeddings;
use ragline::pipeline::IngestionPipeline;
use ragline::retrieval::{RetrievalService, context_text};
use ragline::stores::PineconeIndex;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let pdf_path = args.next().ok_or("usage: ingest_and_query <pdf> [question]")?;
    let question = args
        .next()
        .unwrap_or_else(|| "What is this document about?".to_string());

    let openai_key = env::var("OPENAI_API_KEY")?;
    let pinecone_key = env::var("PINECONE_API_KEY")?;
    let pinecone_host = Url::parse(&env::var("PINECONE_HOST")?)?;

    let config = PipelineConfig::default();
    let embedder: Arc<OpenAiEmbeddings> = Arc::new(OpenAiEmbeddings::new(
        openai_key,
        config.embedding_model.clone(),
    ));
    let index = Arc::new(PineconeIndex::new(pinecone_host, pinecone_key));

    let document_name = std::path::Path::new(&pdf_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document")
        .to_string();
    let bytes = tokio::fs::read(&pdf_path).await?;

    let pipeline = IngestionPipeline::new(embedder.clone(), index.clone(), config.clone());
    let report = pipeline
        .ingest(&bytes, &document_name, serde_json::Map::new())
        .await?;
    println!(
        "Ingested '{document_name}': {} pages, {} chunks, {} batches",
        report.pages, report.chunks, report.batches
    );

    let retrieval = RetrievalService::new(embedder, index, config);
    let matches = retrieval.retrieve(&question, None, &document_name).await?;

    println!("\nTop matches for: {question}");
    for m in &matches {
        println!("  [{:.3}] {} (page {})", m.score, m.id, m.metadata.page_number);
    }
    println!("\nGrounding context:\n{}", context_text(&matches));

    Ok(())
}
