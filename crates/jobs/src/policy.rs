// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::Path;

use coop_shifts_domain::ShiftPolicy;
use tracing::info;

use crate::error::JobError;

/// Parses and validates a policy document.
///
/// # Errors
///
/// Returns an error if the document is not valid JSON or a duration is not
/// positive.
pub fn parse_policy(path: &Path, contents: &str) -> Result<ShiftPolicy, JobError> {
    let policy: ShiftPolicy =
        serde_json::from_str(contents).map_err(|source| JobError::PolicyJson {
            path: path.to_path_buf(),
            source,
        })?;
    policy.validate().map_err(JobError::InvalidPolicy)?;
    Ok(policy)
}

/// Loads the policy from `path`, or the defaults when no file is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_policy(path: Option<&Path>) -> Result<ShiftPolicy, JobError> {
    let Some(path) = path else {
        info!("No policy file given, using default shift policy");
        return Ok(ShiftPolicy::default());
    };
    let contents: String = std::fs::read_to_string(path).map_err(|source| JobError::PolicyIo {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded shift policy from {}", path.display());
    parse_policy(path, &contents)
}
