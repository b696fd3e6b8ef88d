use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use mgm_ingest::{FormAction, FormLayout, FormSubmission, from_form_pairs, from_upload};
use mgm_model::{IndexedTable, Report, Table, ValidationIssue};
use mgm_report::{ExportError, export_csv, export_file_name};
use mgm_transform::{
    drop_blank_rows, duplicate_last_row_on_append, normalize_table, with_display_index,
};
use mgm_validate::validate_table;

use crate::context::RequestContext;

/// A validated table ready to be downloaded and archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveArtifact {
    pub file_name: String,
    pub csv: String,
}

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The table for further editing; `None` after a fatal problem.
    pub table: Option<IndexedTable>,
    pub report: Report,
    /// Set only by a save with no fatal issues.
    pub artifact: Option<SaveArtifact>,
}

impl Outcome {
    fn fatal(report: Report) -> Self {
        Self {
            table: None,
            report,
            artifact: None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.report.has_fatal()
    }
}

fn authorize(ctx: &RequestContext<'_>, user_name: &str, report: &mut Report) -> bool {
    if ctx.authorizer.is_authorized(user_name) {
        return true;
    }
    warn!("user not on allow-list");
    report.push_issue(ValidationIssue::Unauthorized {
        user: user_name.to_string(),
    });
    false
}

/// Normalize then validate in place, recording into `report`.
fn check_table(ctx: &RequestContext<'_>, table: &mut Table, report: &mut Report) {
    let start = Instant::now();
    for correction in normalize_table(table) {
        report.push_correction(correction);
    }
    report.extend_issues(validate_table(table, ctx.registry));
    debug!(
        rows = table.len(),
        corrections = report.corrections.len(),
        issues = report.issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "table checked"
    );
}

/// Render the export of a table for `user_name`.
pub fn build_artifact(
    ctx: &RequestContext<'_>,
    user_name: &str,
    table: &Table,
) -> Result<SaveArtifact, ExportError> {
    Ok(SaveArtifact {
        file_name: export_file_name(user_name, ctx.now),
        csv: export_csv(table)?,
    })
}

/// Import an uploaded `.csv` or `.xlsx` file for editing.
pub fn process_upload(
    ctx: &RequestContext<'_>,
    user_name: &str,
    file_name: &str,
    bytes: &[u8],
) -> Outcome {
    let span = info_span!("request", kind = "upload", bytes = bytes.len());
    let _guard = span.enter();

    let mut report = Report::new();
    if !authorize(ctx, user_name, &mut report) {
        return Outcome::fatal(report);
    }

    let mut table = match from_upload(file_name, bytes, ctx.registry) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "upload rejected");
            report.extend_issues(e.into_issues());
            return Outcome::fatal(report);
        }
    };
    check_table(ctx, &mut table, &mut report);
    info!(
        rows = table.len(),
        warnings = report.warning_count(),
        "upload imported"
    );
    Outcome {
        table: Some(with_display_index(table)),
        report,
        artifact: None,
    }
}

/// Handle one grid submission according to its action.
pub fn process_form(ctx: &RequestContext<'_>, submission: &FormSubmission) -> Outcome {
    let action = submission.action();
    let span = info_span!("request", kind = "form", action = ?action, pairs = submission.pairs.len());
    let _guard = span.enter();

    let mut report = Report::new();
    if !authorize(ctx, &submission.user_name, &mut report) {
        return Outcome::fatal(report);
    }

    let layout = FormLayout::for_schema(ctx.registry);
    let mut table = match from_form_pairs(&submission.pairs, &layout) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "form rejected");
            report.extend_issues(e.into_issues());
            return Outcome::fatal(report);
        }
    };

    if action == FormAction::Save {
        let dropped = drop_blank_rows(&mut table);
        debug!(dropped, "blank rows dropped before save");
    }
    check_table(ctx, &mut table, &mut report);

    let mut artifact = None;
    match action {
        FormAction::Change => {}
        FormAction::NewLine => {
            let appended = duplicate_last_row_on_append(&mut table, ctx.registry.primary_field());
            debug!(appended, "new line requested");
        }
        FormAction::Save if report.has_fatal() => {}
        FormAction::Save => match build_artifact(ctx, &submission.user_name, &table) {
            Ok(built) => {
                info!(file = %built.file_name, rows = table.len(), "table saved");
                artifact = Some(built);
            }
            Err(e) => {
                error!(error = %e, "export failed");
                report.push_warning(format!("Export failed: {e}"));
            }
        },
    }

    Outcome {
        table: Some(with_display_index(table)),
        report,
        artifact,
    }
}
