// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the data-access layer and the model constructors.
#[derive(Debug, Error)]
pub enum MeiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("table '{0}' is not provisioned; run `meibook init` first")]
    MissingSchema(&'static str),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid value '{value}' stored in column {column}")]
    InvalidStoredValue { column: &'static str, value: String },

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

impl MeiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        MeiError::Validation(msg.into())
    }
}

pub type MeiResult<T> = std::result::Result<T, MeiError>;
