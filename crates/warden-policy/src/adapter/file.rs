//! Policy file adapter (Casbin CSV dialect).
//!
//! # Format
//! One rule per line, comma separated, fields trimmed:
//! - `p, <subject>, <domain>, <object>, <action>[, <effect>]`
//! - `g, <subject>, <role>, <domain>`
//!
//! A permission rule without an effect column is an `allow`. Blank lines and
//! lines starting with `#` are skipped. A field may be wrapped in double
//! quotes to carry commas; `""` inside quotes is a literal quote.
//!
//! # Saving
//! The file is rewritten wholesale: permission rules first, then grouping
//! rules, each in snapshot order, quoted only where needed. A field with
//! edge whitespace or a line break is refused. The new contents go to a
//! sibling temp file, unique per save, which is fsynced and renamed over the
//! target, so a concurrent reader sees either the old file or the new one.
//! Comments are not preserved.
use super::PolicyAdapter;
use crate::errors::{StoreError, StoreResult};
use crate::model::{Effect, GroupingRule, PermissionRule};
use crate::rule_store::PolicySnapshot;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

const PERMISSION_TAG: &str = "p";
const GROUPING_TAG: &str = "g";

static SAVE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FileAdapter {
    path: PathBuf,
}

impl FileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp path, unique per call within the process.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "policy".to_string());
        let seq = SAVE_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp_name = format!(".{name}.{}.{seq}.tmp", std::process::id());
        match self.path.parent() {
            Some(parent) => parent.join(temp_name),
            None => PathBuf::from(temp_name),
        }
    }
}

#[async_trait]
impl PolicyAdapter for FileAdapter {
    async fn load(&self) -> StoreResult<PolicySnapshot> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| StoreError::io(&self.path, err))?;
        parse_policy(&text)
    }

    async fn save(&self, snapshot: &PolicySnapshot) -> StoreResult<()> {
        let text = render_policy(snapshot)?;
        let temp = self.temp_path();
        let write = async {
            let mut file = tokio::fs::File::create(&temp).await?;
            file.write_all(text.as_bytes()).await?;
            file.sync_all().await?;
            tokio::fs::rename(&temp, &self.path).await
        };
        if let Err(err) = write.await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StoreError::io(&self.path, err));
        }
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

/// Parse policy file contents into a snapshot.
///
/// # Errors
/// - [`StoreError::Parse`] naming the first offending line (1-based).
pub fn parse_policy(text: &str) -> StoreResult<PolicySnapshot> {
    let mut permissions = Vec::new();
    let mut groupings = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields = read_fields(trimmed, line_no)?;
        match fields[0].as_str() {
            PERMISSION_TAG => permissions.push(parse_permission(&fields[1..], line_no)?),
            GROUPING_TAG => groupings.push(parse_grouping(&fields[1..], line_no)?),
            other => {
                return Err(StoreError::parse(
                    line_no,
                    format!("unknown rule type: {other}"),
                ));
            }
        }
    }

    Ok(PolicySnapshot::new(permissions, groupings))
}

/// Render a snapshot in policy file form.
///
/// # Errors
/// - [`StoreError::Parse`] when a field would not survive a reload: leading
///   or trailing whitespace, or a line break. `line` is the line that would
///   have been written.
pub fn render_policy(snapshot: &PolicySnapshot) -> StoreResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());
    let rows = snapshot
        .all_permission_rules()
        .iter()
        .map(|rule| (PERMISSION_TAG, rule.to_fields()))
        .chain(
            snapshot
                .all_grouping_rules()
                .iter()
                .map(|rule| (GROUPING_TAG, rule.to_fields())),
        );
    for (index, (tag, fields)) in rows.enumerate() {
        let line_no = index + 1;
        if let Some(field) = fields.iter().find(|field| !is_line_safe(field)) {
            return Err(StoreError::parse(
                line_no,
                format!("field cannot be stored on one line: {field:?}"),
            ));
        }
        writer
            .write_record(std::iter::once(tag).chain(fields.iter().map(String::as_str)))
            .map_err(|err| StoreError::parse(line_no, err.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| StoreError::parse(0, err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| StoreError::parse(0, err.to_string()))
}

fn is_line_safe(field: &str) -> bool {
    field.trim() == field && !field.contains(['\n', '\r'])
}

/// One record from one non-blank line. Never empty.
fn read_fields(line: &str, line_no: usize) -> StoreResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Ok(record.iter().map(str::to_string).collect()),
        Ok(false) => Err(StoreError::parse(line_no, "empty record")),
        Err(err) => Err(StoreError::parse(line_no, err.to_string())),
    }
}

fn parse_permission(fields: &[String], line_no: usize) -> StoreResult<PermissionRule> {
    let effect = match fields.len() {
        4 => Effect::Allow,
        5 => fields[4]
            .parse()
            .map_err(|message: String| StoreError::parse(line_no, message))?,
        n => {
            return Err(StoreError::parse(
                line_no,
                format!("permission rule needs 4 or 5 fields, found {n}"),
            ));
        }
    };
    Ok(PermissionRule::new(
        fields[0].clone(),
        fields[1].clone(),
        fields[2].clone(),
        fields[3].clone(),
        effect,
    ))
}

fn parse_grouping(fields: &[String], line_no: usize) -> StoreResult<GroupingRule> {
    if fields.len() != 3 {
        return Err(StoreError::parse(
            line_no,
            format!("grouping rule needs 3 fields, found {}", fields.len()),
        ));
    }
    Ok(GroupingRule::new(
        fields[0].clone(),
        fields[1].clone(),
        fields[2].clone(),
    ))
}
