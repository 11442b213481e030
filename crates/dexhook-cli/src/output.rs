//! The JSON line printed to standard output when a hook fails.

use std::io::Write;

use serde::Serialize;

use crate::EXIT_FAILED;

/// `{"upload_id": ..., "message": ...}`
#[derive(Debug, Serialize)]
pub struct HookFailure<'a> {
    pub upload_id: Option<&'a str>,
    pub message: String,
}

/// Write the failure line and return [`EXIT_FAILED`].
pub fn report_failure<W: Write>(
    out: &mut W,
    upload_id: Option<&str>,
    message: impl Into<String>,
) -> anyhow::Result<u8> {
    let failure = HookFailure {
        upload_id,
        message: message.into(),
    };
    serde_json::to_writer(&mut *out, &failure)?;
    writeln!(out)?;
    Ok(EXIT_FAILED)
}
