//! paperlens - a research-paper assistant.
//!
//! This library wires a handful of external collaborators into one
//! pipeline for exploring an academic paper: the arXiv search API, an
//! embedding provider with a similarity-searchable store, a hosted
//! voice-agent service, and a PDF/keyword/video toolchain.
//!
//! # Architecture
//!
//! - **models**: core data structures (PaperRecord, IndexEntry, Direction)
//! - **arxiv**: paper lookup and temporal neighbor search over the Atom API
//! - **embedding**: text embedding providers (OpenAI API, local fastembed)
//! - **store**: named similarity-searchable collections (memory, SQLite)
//! - **index**: the context object tying embeddings to collections
//! - **voice**: guarded single-session control of the hosted voice agent
//! - **summarize**: generative-language summarization for PDF text
//! - **pdf / keywords / video**: section-bounded keyword extraction and
//!   per-keyword video lookup
//! - **server**: the HTTP surface (voice session control, process_pdf)
//!
//! # Workflow
//!
//! ## Seed exploration
//!
//! 1. Resolve a title to one normalized [`models::PaperRecord`]
//! 2. Gather neighbor sets published before and after the seed
//! 3. Embed and upsert both sets into their collections
//! 4. Probe each collection with the seed's title+summary for the top-k
//!    most similar papers
//!
//! ## Keyword/video mapping
//!
//! 1. Extract the PDF's text and its Methods/Introduction/Conclusion
//!    sections
//! 2. Rank candidate-phrase terms by tf-idf
//! 3. Look up one video per keyword, in keyword order

pub mod arxiv;
pub mod embedding;
pub mod index;
pub mod keywords;
pub mod models;
pub mod pdf;
pub mod server;
pub mod store;
pub mod summarize;
pub mod video;
pub mod voice;

pub use arxiv::ArxivClient;
pub use embedding::EmbeddingProvider;
pub use index::{PaperIndex, AFTER_COLLECTION, BEFORE_COLLECTION};
pub use models::{Direction, IndexEntry, PaperRecord};
pub use store::VectorStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Neighbor papers requested per temporal direction.
pub const DEFAULT_NEIGHBOR_LIMIT: usize = 50;

/// Similar papers reported per collection.
pub const DEFAULT_TOP_K: usize = 3;

/// Keywords extracted per PDF.
pub const DEFAULT_NUM_KEYWORDS: usize = 10;
