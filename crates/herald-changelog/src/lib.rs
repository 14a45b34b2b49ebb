//! Herald Changelog - commit history to rendered changelog
//!
//! This crate parses raw log text into commits, classifies them by
//! conventional commit rules, orders them with a deterministic multi-key
//! comparator and renders them through a staged template writer.

pub mod classifier;
pub mod comparer;
pub mod context;
pub mod generator;
pub mod parser;
pub mod template;
pub mod types;
pub mod writer;

pub use classifier::{
    Classification, ClassifiedCommit, ClassifiedLog, CommitClassifier, VersionImpact,
    BREAKING_BUCKET,
};
pub use comparer::{Projectable, RecordComparer, RecordProjection};
pub use context::{ChangelogContext, Clock, FixedClock, Section, SystemClock};
pub use generator::{ChangelogGenerator, GenerateOptions};
pub use parser::{CommitParser, ParserConfig};
pub use template::DEFAULT_TEMPLATE;
pub use types::{Commit, Footer, GitLog, UNTYPED};
pub use writer::{
    Applied, CanCompile, ChangeLogTemplate, ChangeLogWriter, Compiled, RenderedChangeLog,
    WriterSession,
};
