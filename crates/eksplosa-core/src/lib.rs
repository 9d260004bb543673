//! # Eksplosa Core Library
//!
//! Core logic for Eksplosa, a regional-language learning site. Everything
//! the site does is also available through the standalone `eksplosa` CLI,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Quiz Engine**: A state machine that gates levels on completed
//!   predecessors, checks word-order answers, and persists progress. After an
//!   answer the caller invokes `tick()` (or `acknowledge()`) to move on
//! - **Carousel**: Pointer-drag gesture engine with overscroll resistance and
//!   threshold snapping
//! - **Gateway**: Content API client (Strapi style) and a static in-memory
//!   source behind one trait
//! - **Storage**: SQLite key-value progress store and TOML configuration
//!
//! ## Key Components
//!
//! - [`QuizEngine`]: Level progression state machine
//! - [`Carousel`]: Drag and snap state for a slide strip
//! - [`DataGateway`]: Trait for content sources
//! - [`Database`]: Progress persistence
//! - [`Config`]: Application configuration management

pub mod carousel;
pub mod catalog;
pub mod error;
pub mod events;
pub mod gateway;
pub mod model;
pub mod quiz;
pub mod storage;

pub use carousel::{Carousel, CarouselConfig, CarouselState, Transform, ViewportClass};
pub use catalog::{quiz_link, Catalog, ProvinceDetail, ProvincePage};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use gateway::{ApiClient, DataGateway, StaticGateway};
pub use model::{FunFact, Language, Level, Province, Question};
pub use quiz::{
    MemoryStore, OutcomeKind, ProgressRecord, ProgressStore, QuizEngine, QuizParams, QuizSnapshot,
    QuizState,
};
pub use storage::{Config, Database};
