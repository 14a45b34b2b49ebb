//! Staged changelog writer
//!
//! Each stage is its own type and only offers the operations legal at that
//! point, so an out-of-order call does not compile:
//!
//! ```text
//! ChangeLogWriter --initialize--> CanCompile --load/template--> Compiled
//!     --apply--> Applied --save--> RenderedChangeLog
//! ```
//!
//! Callers that receive the steps one at a time (for example from a build
//! task) use [`WriterSession`], which enforces the same order at runtime.

mod session;

pub use session::WriterSession;

use std::fmt;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info, instrument};

use herald_core::error::ChangelogError;

use crate::context::ChangelogContext;
use crate::types::GitLog;

/// Result type for writer operations
pub type Result<T> = std::result::Result<T, ChangelogError>;

const TEMPLATE_NAME: &str = "changelog";

/// A compiled changelog template
///
/// Rendering runs in strict mode, so a template that references a value the
/// context does not have fails instead of printing nothing. Output is not
/// HTML-escaped.
#[derive(Clone)]
pub struct ChangeLogTemplate {
    registry: Handlebars<'static>,
}

impl ChangeLogTemplate {
    /// Compile template source
    pub fn compile(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Err(ChangelogError::InvalidInput(
                "template text must not be empty".to_string(),
            ));
        }

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| ChangelogError::Template(e.to_string()))?;

        debug!(source_len = source.len(), "template compiled");
        Ok(Self { registry })
    }

    /// Render against any serializable data
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        self.registry
            .render(TEMPLATE_NAME, data)
            .map_err(|e| ChangelogError::Render(e.to_string()))
    }
}

impl fmt::Debug for ChangeLogTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeLogTemplate").finish_non_exhaustive()
    }
}

/// A writer that has not been initialized
#[derive(Debug, Default)]
pub struct ChangeLogWriter;

impl ChangeLogWriter {
    /// Create a writer
    pub fn new() -> Self {
        Self
    }

    /// Bind the writer to its output path
    ///
    /// With `Some(content)` the content is written to `path` (creating parent
    /// directories) and becomes the previous changelog. With `None` the
    /// existing file at `path` is read instead; a missing file counts as empty.
    #[instrument(skip(self, path, content), fields(path = %path.as_ref().display(), seeded = content.is_some()))]
    pub fn initialize(self, path: impl AsRef<Path>, content: Option<&str>) -> Result<CanCompile> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ChangelogError::InvalidInput(
                "changelog path must not be empty".to_string(),
            ));
        }

        let previous = match content {
            Some(content) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| ChangelogError::io(parent, e))?;
                }
                std::fs::write(path, content).map_err(|e| ChangelogError::io(path, e))?;
                content.to_string()
            }
            None if path.exists() => {
                std::fs::read_to_string(path).map_err(|e| ChangelogError::io(path, e))?
            }
            None => String::new(),
        };

        debug!(previous_len = previous.len(), "writer initialized");
        Ok(CanCompile {
            path: path.to_path_buf(),
            previous,
        })
    }
}

/// An initialized writer waiting for its template
#[derive(Debug)]
pub struct CanCompile {
    path: PathBuf,
    previous: String,
}

impl CanCompile {
    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Changelog content present before this run
    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Read template source from a file and compile it
    #[instrument(skip(self, path), fields(template = %path.as_ref().display()))]
    pub fn load(self, path: impl AsRef<Path>) -> Result<Compiled> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ChangelogError::InvalidInput(
                "template path must not be empty".to_string(),
            ));
        }

        let source = std::fs::read_to_string(path).map_err(|e| ChangelogError::io(path, e))?;
        self.template(&source)
    }

    /// Compile template source text
    pub fn template(self, text: &str) -> Result<Compiled> {
        let template = ChangeLogTemplate::compile(text)?;
        Ok(self.with_template(template))
    }

    /// Use an already compiled template
    pub fn with_template(self, template: ChangeLogTemplate) -> Compiled {
        Compiled {
            path: self.path,
            previous: self.previous,
            template,
        }
    }
}

/// A writer holding a compiled template
#[derive(Debug)]
pub struct Compiled {
    path: PathBuf,
    previous: String,
    template: ChangeLogTemplate,
}

#[derive(Serialize)]
struct RenderData<'c, 'a> {
    previous: &'c str,
    #[serde(flatten)]
    context: &'c ChangelogContext<'a>,
}

impl Compiled {
    /// The compiled template, for reuse in another run
    pub fn template(&self) -> &ChangeLogTemplate {
        &self.template
    }

    /// Render the template against a prepared context
    #[instrument(skip(self, context), fields(commits = context.commits.len()))]
    pub fn apply<'a>(self, context: &ChangelogContext<'a>) -> Result<Applied<'a>> {
        let data = RenderData {
            previous: &self.previous,
            context,
        };
        let text = self.template.render(&data)?;

        debug!(output_len = text.len(), "changelog rendered");
        Ok(Applied {
            path: self.path,
            rendered: RenderedChangeLog {
                text,
                log: context.log(),
            },
        })
    }
}

/// A writer holding rendered text
#[derive(Debug)]
pub struct Applied<'a> {
    path: PathBuf,
    rendered: RenderedChangeLog<'a>,
}

impl<'a> Applied<'a> {
    /// The rendered changelog text
    pub fn changelog(&self) -> &str {
        &self.rendered.text
    }

    /// The rendered changelog and its source log
    pub fn rendered(&self) -> &RenderedChangeLog<'a> {
        &self.rendered
    }

    /// Path given at initialization
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the changelog to the initialization path, replacing its content
    pub fn save(self) -> Result<RenderedChangeLog<'a>> {
        let path = self.path;
        write_changelog(&path, &self.rendered.text)?;
        Ok(self.rendered)
    }

    /// Write the changelog to another path, replacing its content
    pub fn save_to(self, path: impl AsRef<Path>) -> Result<RenderedChangeLog<'a>> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ChangelogError::InvalidInput(
                "output path must not be empty".to_string(),
            ));
        }
        write_changelog(path, &self.rendered.text)?;
        Ok(self.rendered)
    }
}

fn write_changelog(path: &Path, text: &str) -> Result<()> {
    info!(path = %path.display(), bytes = text.len(), "writing changelog");
    std::fs::write(path, text).map_err(|e| ChangelogError::io(path, e))
}

/// Rendered changelog text and the log it was produced from
#[derive(Debug, Clone)]
pub struct RenderedChangeLog<'a> {
    text: String,
    log: &'a GitLog,
}

impl<'a> RenderedChangeLog<'a> {
    /// The text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The source log
    pub fn log(&self) -> &'a GitLog {
        self.log
    }

    /// Take the text
    pub fn into_text(self) -> String {
        self.text
    }
}
