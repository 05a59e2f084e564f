// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use coop_shifts_api::ApiError;
use coop_shifts_domain::DomainError;
use coop_shifts_persistence::PersistenceError;
use thiserror::Error;

/// Failures that abort a job run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("cannot read policy file {path}: {source}")]
    PolicyIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse policy file {path}: {source}")]
    PolicyJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid policy: {0}")]
    InvalidPolicy(#[source] DomainError),
    #[error("date arithmetic failed: {0}")]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
