//! Runtime-checked writer
//!
//! [`WriterSession`] drives the writer stages through `&mut self` calls and
//! rejects any call the current stage does not allow with
//! [`ChangelogError::InvalidState`]. A rejected call leaves the session as it
//! was; a call that fails for any other reason discards the session.

use std::path::{Path, PathBuf};

use tracing::warn;

use herald_core::error::ChangelogError;

use super::{Applied, CanCompile, ChangeLogWriter, Compiled, Result};
use crate::context::ChangelogContext;

#[derive(Debug)]
enum Stage<'a> {
    Uninitialized,
    CanCompile(CanCompile),
    Compiled(Compiled),
    Applied(Applied<'a>),
    Saved(PathBuf),
    Discarded,
}

impl Stage<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::CanCompile(_) => "initialized",
            Self::Compiled(_) => "compiled",
            Self::Applied(_) => "applied",
            Self::Saved(_) => "saved",
            Self::Discarded => "discarded",
        }
    }
}

/// A changelog writer whose stage is tracked at runtime
#[derive(Debug)]
pub struct WriterSession<'a> {
    stage: Stage<'a>,
}

impl Default for WriterSession<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> WriterSession<'a> {
    /// Create an uninitialized session
    pub fn new() -> Self {
        Self {
            stage: Stage::Uninitialized,
        }
    }

    /// Name of the current stage
    pub fn state(&self) -> &'static str {
        self.stage.name()
    }

    /// See [`ChangeLogWriter::initialize`]
    pub fn initialize(&mut self, path: impl AsRef<Path>, content: Option<&str>) -> Result<()> {
        match self.take() {
            Stage::Uninitialized => {
                self.stage = Stage::CanCompile(ChangeLogWriter::new().initialize(path, content)?);
                Ok(())
            }
            other => Err(self.reject("initialize", other)),
        }
    }

    /// See [`CanCompile::load`]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        match self.take() {
            Stage::CanCompile(writer) => {
                self.stage = Stage::Compiled(writer.load(path)?);
                Ok(())
            }
            other => Err(self.reject("load a template into", other)),
        }
    }

    /// See [`CanCompile::template`]
    pub fn template(&mut self, text: &str) -> Result<()> {
        match self.take() {
            Stage::CanCompile(writer) => {
                self.stage = Stage::Compiled(writer.template(text)?);
                Ok(())
            }
            other => Err(self.reject("compile a template into", other)),
        }
    }

    /// See [`Compiled::apply`]
    pub fn apply(&mut self, context: &ChangelogContext<'a>) -> Result<()> {
        match self.take() {
            Stage::Compiled(writer) => {
                self.stage = Stage::Applied(writer.apply(context)?);
                Ok(())
            }
            other => Err(self.reject("apply", other)),
        }
    }

    /// The rendered changelog; only available once applied
    pub fn changelog(&self) -> Result<&str> {
        match &self.stage {
            Stage::Applied(applied) => Ok(applied.changelog()),
            other => Err(ChangelogError::InvalidState {
                operation: "read the changelog of",
                state: other.name(),
            }),
        }
    }

    /// See [`Applied::save`]
    pub fn save(&mut self) -> Result<()> {
        match self.take() {
            Stage::Applied(applied) => {
                let path = applied.path().to_path_buf();
                applied.save()?;
                self.stage = Stage::Saved(path);
                Ok(())
            }
            other => Err(self.reject("save", other)),
        }
    }

    /// See [`Applied::save_to`]
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        match self.take() {
            Stage::Applied(applied) => {
                applied.save_to(path.as_ref())?;
                self.stage = Stage::Saved(path.as_ref().to_path_buf());
                Ok(())
            }
            other => Err(self.reject("save", other)),
        }
    }

    /// Path the changelog was saved to
    pub fn saved_path(&self) -> Option<&Path> {
        match &self.stage {
            Stage::Saved(path) => Some(path),
            _ => None,
        }
    }

    fn take(&mut self) -> Stage<'a> {
        std::mem::replace(&mut self.stage, Stage::Discarded)
    }

    fn reject(&mut self, operation: &'static str, stage: Stage<'a>) -> ChangelogError {
        let state = stage.name();
        self.stage = stage;
        warn!(operation, state, "writer call out of order");
        ChangelogError::InvalidState { operation, state }
    }
}
