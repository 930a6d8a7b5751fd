//! State of one import, from file upload to the final summary.

use super::{ImportRow, ValidationOptions, ValidationReport, build_request, validate_rows};
use crate::error::{ImportError, Result};
use crate::models::{BulkImportRequest, CategoryIndex, ImportOutcome};

/// Step an [`ImportSession`] is at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Waiting for a file.
    #[default]
    Upload,
    /// File parsed and validated; waiting for the operator.
    Validate,
    /// Submission in flight.
    Import,
    /// Submission finished (successfully or not).
    Complete,
}

impl Stage {
    /// Lower-case stage name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Validate => "validate",
            Self::Import => "import",
            Self::Complete => "complete",
        }
    }
}

/// Rows, validation results and outcome of one import.
///
/// Nothing carries over between sessions; [`ImportSession::reset`] returns
/// to a freshly created state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSession {
    /// Current step.
    stage: Stage,
    /// Rows of the loaded file.
    rows: Vec<ImportRow>,
    /// Validation results for `rows`.
    report: ValidationReport,
    /// Summary once the import completed.
    outcome: Option<ImportOutcome>,
}

impl ImportSession {
    /// Creates an empty session at the upload step.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step.
    #[inline]
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Rows of the loaded file.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[ImportRow] {
        &self.rows
    }

    /// Validation results of the loaded file.
    #[inline]
    #[must_use]
    pub const fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Final summary, available at the complete step.
    #[inline]
    #[must_use]
    pub const fn outcome(&self) -> Option<&ImportOutcome> {
        self.outcome.as_ref()
    }

    /// Loads parsed rows and validates them, moving to the validate step.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidStage`] unless the session is at the
    /// upload step.
    #[inline]
    pub fn load(
        &mut self,
        rows: Vec<ImportRow>,
        categories: &CategoryIndex,
        options: ValidationOptions,
    ) -> Result<&ValidationReport> {
        self.expect_stage(Stage::Upload, "load a file")?;
        self.report = validate_rows(&rows, categories, options);
        self.rows = rows;
        self.stage = Stage::Validate;
        Ok(&self.report)
    }

    /// Discards the loaded file and returns to the upload step.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidStage`] unless the session is at the
    /// validate step.
    #[inline]
    pub fn back_to_upload(&mut self) -> Result<()> {
        self.expect_stage(Stage::Validate, "go back to upload")?;
        self.reset();
        Ok(())
    }

    /// Moves to the import step and returns the request to submit.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidStage`] unless the session is at the
    /// validate step, and [`ImportError::ValidationFailed`] if any row has
    /// validation errors.
    #[inline]
    pub fn begin_import(&mut self) -> Result<BulkImportRequest> {
        self.expect_stage(Stage::Validate, "start the import")?;
        if !self.report.is_clean() {
            return Err(ImportError::ValidationFailed {
                errors: self.report.errors().len(),
            });
        }
        self.stage = Stage::Import;
        Ok(build_request(&self.rows, &self.report))
    }

    /// Records the backend's answer and moves to the complete step.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidStage`] unless the session is at the
    /// import step.
    #[inline]
    pub fn complete(&mut self, outcome: ImportOutcome) -> Result<&ImportOutcome> {
        self.expect_stage(Stage::Import, "complete the import")?;
        self.stage = Stage::Complete;
        Ok(self.outcome.insert(outcome))
    }

    /// Records a failed submission: every row of the file counts as
    /// failed.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidStage`] unless the session is at the
    /// import step.
    #[inline]
    pub fn fail(&mut self, failure: String) -> Result<&ImportOutcome> {
        let outcome = ImportOutcome::all_failed(self.rows.len(), failure);
        self.complete(outcome)
    }

    /// Clears all rows, errors and results and returns to the upload step.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fails with [`ImportError::InvalidStage`] unless at `expected`.
    fn expect_stage(&self, expected: Stage, action: &'static str) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ImportError::InvalidStage {
                action,
                stage: self.stage.as_str(),
            })
        }
    }
}
