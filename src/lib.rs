//! # statstream - Streaming Analysis & Tabular Export
//!
//! The core plumbing of a statistical-analysis dashboard that delegates its
//! narratives to a remote LLM inference gateway:
//!
//! - **Stream Decoder**: consumes the gateway's chunked, SSE-like response
//!   and re-assembles it into incrementally growing text, tolerating
//!   arbitrary chunk boundaries (including splits inside a logical line or a
//!   multi-byte character).
//! - **Export Pipeline**: turns an array-of-objects dataset plus a title
//!   into spreadsheet (`.xlsx`), PDF, or word-processor (`.docx`) bytes, and
//!   serves them over HTTP with download headers.
//!
//! The two subsystems are independent; neither depends on the other.
//!
//! ## Streaming example
//! ```no_run
//! use statstream::client::{AnalysisClient, GatewayClient};
//! use statstream::model::{AnalysisRequest, Provider};
//! use statstream::options::GatewayOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::new(
//!         GatewayOptions::new("https://gateway.example.com").with_token("anon-key"),
//!     )?;
//!
//!     let request = AnalysisRequest::new(
//!         "Run a one-way ANOVA on the attached data and explain the result.",
//!         "grok-3-fast",
//!         Provider::XAi,
//!     );
//!
//!     let mut render = |text: &str| println!("\x1b[2J{text}");
//!     let narrative = client.analyze_stream(&request, &mut render).await?;
//!     println!("final: {narrative}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod export;
pub mod http;
pub mod model;
pub mod options;
pub mod server;
pub mod session;
pub mod sse;

// Re-exports for convenience
pub use client::{AnalysisClient, ClientError, GatewayClient};
pub use export::{ExportFormat, ExportRecord, ExportRequest, ExportTable};
pub use model::{AnalysisRequest, AnalysisResponse, Provider};
pub use session::{consume_stream, StreamFrame, StreamSession, NO_CONTENT_FALLBACK};
