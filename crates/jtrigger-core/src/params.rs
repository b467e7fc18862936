use std::collections::{BTreeMap, HashMap};

use crate::PluginConfig;

// ─── Placeholder tokens ───────────────────────────────────────────────────

pub const GIT_MATERIAL_REPO: &str = "GIT_MATERIAL_REPO";
pub const GIT_MATERIAL_CHECKOUT_PATH: &str = "GIT_MATERIAL_CHECKOUT_PATH";
pub const GIT_MATERIAL_BRANCH: &str = "GIT_MATERIAL_BRANCH";
pub const GIT_MATERIAL_COMMIT_HASH: &str = "GIT_MATERIAL_COMMIT_HASH";

const REPO_DELIMITER: char = '|';
const FIELD_DELIMITER: char = ',';

// ─── GitMaterial ──────────────────────────────────────────────────────────

/// Source-control coordinates of the repository that triggered the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitMaterial {
    pub repo: String,
    pub checkout_path: String,
    pub branch: String,
    pub commit_hash: String,
}

impl GitMaterial {
    /// Parse the first repository of a `|`-separated descriptor list.
    ///
    /// Only the first repository is used even when several are present.
    /// Returns `None` unless that entry has exactly four `,`-separated fields.
    pub fn parse_first(raw: &str) -> Option<Self> {
        let first = raw.split(REPO_DELIMITER).next().unwrap_or_default();
        let fields: Vec<&str> = first.split(FIELD_DELIMITER).collect();
        let [repo, checkout_path, branch, commit_hash] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            repo: (*repo).to_string(),
            checkout_path: (*checkout_path).to_string(),
            branch: (*branch).to_string(),
            commit_hash: (*commit_hash).to_string(),
        })
    }

    /// Placeholder token → field value.
    pub fn placeholders(&self) -> HashMap<&'static str, &str> {
        HashMap::from([
            (GIT_MATERIAL_REPO, self.repo.as_str()),
            (GIT_MATERIAL_CHECKOUT_PATH, self.checkout_path.as_str()),
            (GIT_MATERIAL_BRANCH, self.branch.as_str()),
            (GIT_MATERIAL_COMMIT_HASH, self.commit_hash.as_str()),
        ])
    }
}

// ─── Resolution ───────────────────────────────────────────────────────────

/// Decode the user's trigger parameters.
///
/// Absent or malformed JSON degrades to an empty map.
pub fn parse_trigger_params(raw: &str) -> BTreeMap<String, String> {
    if raw.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str::<BTreeMap<String, String>>(raw) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed trigger parameters");
            BTreeMap::new()
        }
    }
}

/// Produce the final parameter map submitted with the trigger request.
///
/// Surrounding spaces are stripped from keys and values (other whitespace is
/// kept); a value that exactly matches one of the four
/// `GIT_MATERIAL_*` tokens is replaced by the corresponding field of the
/// first git material entry.
pub fn resolve_params(raw_params: &str, raw_git_material: &str) -> BTreeMap<String, String> {
    let material = GitMaterial::parse_first(raw_git_material);
    if material.is_none() && !raw_git_material.is_empty() {
        tracing::warn!("git material descriptor does not have four fields; skipping substitution");
    }
    let placeholders = material
        .as_ref()
        .map(GitMaterial::placeholders)
        .unwrap_or_default();

    parse_trigger_params(raw_params)
        .into_iter()
        .map(|(k, v)| {
            let key = k.trim_matches(' ').to_string();
            let value = v.trim_matches(' ');
            let resolved = placeholders.get(value).copied().unwrap_or(value);
            (key, resolved.to_string())
        })
        .collect()
}

// ─── TriggerRequest ───────────────────────────────────────────────────────

/// What gets submitted to the job server. Built once, immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    pub job_name: String,
    pub params: BTreeMap<String, String>,
}

impl TriggerRequest {
    pub fn from_config(config: &PluginConfig) -> Self {
        Self {
            job_name: config.job_name.trim().to_string(),
            params: resolve_params(&config.trigger_params, &config.git_material),
        }
    }
}
