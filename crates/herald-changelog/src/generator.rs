//! Changelog generation
//!
//! Runs the whole pipeline: read the log, parse, classify, order, build the
//! template context and drive the writer.

use std::path::{Path, PathBuf};

use herald_core::config::ChangelogConfig;
use herald_core::error::Result;
use herald_git::{LogRange, LogSource};
use tracing::{debug, info, instrument};

use crate::classifier::{ClassifiedLog, CommitClassifier};
use crate::comparer::RecordComparer;
use crate::context::{ChangelogContext, Clock};
use crate::parser::{CommitParser, ParserConfig};
use crate::template::DEFAULT_TEMPLATE;
use crate::types::GitLog;
use crate::writer::ChangeLogWriter;

/// Options for one rendering run
pub struct GenerateOptions<'c> {
    /// Changelog file; its current content is available as `previous`
    pub output: PathBuf,
    /// Template file overriding the configured one
    pub template: Option<PathBuf>,
    /// Version being released
    pub version: Option<String>,
    /// Whether to write the result to `output`
    pub save: bool,
    /// Source of the build timestamp
    pub clock: &'c dyn Clock,
}

/// Changelog generator
pub struct ChangelogGenerator {
    parser: CommitParser,
    classifier: CommitClassifier,
    comparer: RecordComparer,
    config: ChangelogConfig,
}

impl ChangelogGenerator {
    /// Create a generator from configuration
    pub fn new(config: ChangelogConfig) -> Self {
        Self {
            parser: CommitParser::with_config(ParserConfig::from_changelog(&config)),
            classifier: CommitClassifier::new(),
            comparer: RecordComparer::new(config.sort_by.iter().cloned()),
            config,
        }
    }

    /// Use a custom comparer
    pub fn with_comparer(mut self, comparer: RecordComparer) -> Self {
        self.comparer = comparer;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &ChangelogConfig {
        &self.config
    }

    /// Read and parse the log for `range`
    #[instrument(skip(self, source, range), fields(range = %range))]
    pub fn read(&self, source: &dyn LogSource, range: &LogRange) -> Result<GitLog> {
        let text = source.read_log(range)?;
        let log = self
            .parser
            .parse(&text)?
            .with_range(range.from.clone(), range.to.clone());
        info!(commits = log.len(), "log read");
        Ok(log)
    }

    /// Classify a log and put it in rendering order
    pub fn classify<'a>(&self, log: &'a GitLog) -> ClassifiedLog<'a> {
        let mut classified = self.classifier.classify_log(log);
        self.comparer.sort(classified.commits_mut());
        debug!(columns = ?self.comparer.columns(), "commits ordered");
        classified
    }

    /// Render a log, and save it when `options.save` is set
    #[instrument(skip(self, log, options), fields(commits = log.len(), output = %options.output.display()))]
    pub fn generate(&self, log: &GitLog, options: &GenerateOptions<'_>) -> Result<String> {
        let classified = self.classify(log);
        let mut context = ChangelogContext::with_clock(&classified, &self.config, options.clock);
        if let Some(version) = &options.version {
            context = context.with_version(version);
        }

        let writer = ChangeLogWriter::new().initialize(&options.output, None)?;
        let compiled = match self.template_path(options) {
            Some(path) => writer.load(path)?,
            None => writer.template(DEFAULT_TEMPLATE)?,
        };
        let applied = compiled.apply(&context)?;

        let text = if options.save {
            applied.save()?.into_text()
        } else {
            applied.changelog().to_string()
        };
        Ok(text)
    }

    fn template_path<'o>(&'o self, options: &'o GenerateOptions<'_>) -> Option<&'o Path> {
        options
            .template
            .as_deref()
            .or(self.config.template.as_deref())
    }
}
