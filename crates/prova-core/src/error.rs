// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The input-level failure of the checker.

use thiserror::Error;

/// Raised when the parser cannot build any line records at all. This is the
/// only aborting failure mode; every proof-level problem is collected as a
/// [`crate::Diagnostic`] instead. The message is fully rendered, including
/// the offending source line and caret.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
