use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, trace};

use mgm_core::{Outcome, RequestContext, SaveArtifact, build_artifact, process_form, process_upload};
use mgm_ingest::FormSubmission;
use mgm_model::{Report, SchemaRegistry};
use mgm_report::{ArchiveStatus, ScpTransfer, archive_export, write_export};
use mgm_standards::user_digest;

use crate::config::Settings;
use crate::logging::redact_value;

/// What a command did, for the summary printer.
#[derive(Debug)]
pub struct CommandResult {
    pub outcome: Outcome,
    /// Where the export was written, for `save` and `submit`.
    pub export_path: Option<PathBuf>,
    pub archive: Option<ArchiveStatus>,
}

impl CommandResult {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            export_path: None,
            archive: None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.outcome.is_fatal()
    }
}

pub fn run_fields(settings: &Settings) -> Result<SchemaRegistry> {
    settings.load_registry()
}

pub fn run_digest(settings: &Settings, user_name: &str) -> String {
    user_digest(&settings.user_salt, user_name)
}

fn read_input(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((file_name, bytes))
}

/// Import a file and return it validated for editing.
pub fn run_import(settings: &Settings, file: &Path, user_name: &str) -> Result<CommandResult> {
    let registry = settings.load_registry()?;
    let authorizer = settings.authorizer()?;
    let ctx = RequestContext::new(&registry, authorizer.as_ref());
    let (file_name, bytes) = read_input(file)?;
    let outcome = process_upload(&ctx, user_name, &file_name, &bytes);
    Ok(CommandResult::new(outcome))
}

/// Import a file and, when nothing is fatal, export and archive it.
pub fn run_save(
    settings: &Settings,
    file: &Path,
    user_name: &str,
    output_dir: &Path,
) -> Result<CommandResult> {
    let registry = settings.load_registry()?;
    let authorizer = settings.authorizer()?;
    let ctx = RequestContext::new(&registry, authorizer.as_ref());
    let (file_name, bytes) = read_input(file)?;

    let mut outcome = process_upload(&ctx, user_name, &file_name, &bytes);
    if outcome.is_fatal() {
        return Ok(CommandResult::new(outcome));
    }
    if let Some(table) = &outcome.table {
        let artifact = build_artifact(&ctx, user_name, table.table()).context("render export")?;
        outcome.artifact = Some(artifact);
    }
    deliver(settings, outcome, output_dir)
}

/// Handle a grid submission stored as JSON.
pub fn run_submit(settings: &Settings, form_json: &Path, output_dir: &Path) -> Result<CommandResult> {
    let registry = settings.load_registry()?;
    let authorizer = settings.authorizer()?;
    let ctx = RequestContext::new(&registry, authorizer.as_ref());

    let contents =
        fs::read_to_string(form_json).with_context(|| format!("read {}", form_json.display()))?;
    let submission: FormSubmission = serde_json::from_str(&contents)
        .with_context(|| format!("parse form submission {}", form_json.display()))?;
    trace!(
        user = redact_value(&submission.user_name),
        pairs = submission.pairs.len(),
        "form loaded"
    );

    let outcome = process_form(&ctx, &submission);
    deliver(settings, outcome, output_dir)
}

/// Write the artifact, if any, to `output_dir` and archive a copy.
fn deliver(settings: &Settings, mut outcome: Outcome, output_dir: &Path) -> Result<CommandResult> {
    let Some(artifact) = outcome.artifact.clone() else {
        return Ok(CommandResult::new(outcome));
    };
    let span = info_span!("deliver", file = %artifact.file_name);
    let _guard = span.enter();
    let start = Instant::now();

    let export_path = write_export(output_dir, &artifact.file_name, &artifact.csv)
        .with_context(|| format!("write export to {}", output_dir.display()))?;
    let archive = archive(settings, &artifact, &mut outcome.report);
    info!(
        path = %export_path.display(),
        archive = ?archive,
        duration_ms = start.elapsed().as_millis(),
        "export delivered"
    );
    Ok(CommandResult {
        outcome,
        export_path: Some(export_path),
        archive: Some(archive),
    })
}

fn archive(settings: &Settings, artifact: &SaveArtifact, report: &mut Report) -> ArchiveStatus {
    // archive_export skips unconfigured transfers before the transfer is used
    let scp = ScpTransfer::from_settings(&settings.transfer)
        .unwrap_or_else(|| ScpTransfer::new(String::new(), PathBuf::new()));
    debug!(staging = %settings.upload_dir.display(), "archiving export");
    archive_export(
        &artifact.csv,
        &artifact.file_name,
        &settings.upload_dir,
        &settings.transfer,
        &scp,
        report,
    )
}
