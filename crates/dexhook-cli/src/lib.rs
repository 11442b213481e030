//! # dexhook-cli — Upload Server Hook Binary
//!
//! Provides the `dexhook` command the upload server runs at each hook
//! point. One invocation handles one upload event.
//!
//! ## Subcommands
//!
//! - `dexhook pre-create` — verify metadata before the upload is accepted.
//! - `dexhook post-create` — open the upload's trace and `dex-upload` span.
//! - `dexhook post-finish` — stop the `dex-upload` span.
//!
//! ```bash
//! dexhook pre-create -m '{"meta_destination_id":"ndlp","meta_ext_event":"ri","filename":"x.csv"}'
//! dexhook post-create -i 9f1c... -m '{"meta_destination_id":"ndlp","meta_ext_event":"ri"}'
//! dexhook post-finish -i 9f1c...
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | accepted / done |
//! | 1 | rejected or failed; `{"upload_id", "message"}` on stdout |
//! | 2 | configuration or usage error |

pub mod config;
pub mod output;
pub mod post_create;
pub mod post_finish;
pub mod pre_create;

/// Exit status for an accepted upload or a completed hook.
pub const EXIT_OK: u8 = 0;

/// Exit status for a rejected upload or a failed hook.
pub const EXIT_FAILED: u8 = 1;

/// Exit status for configuration and usage errors.
pub const EXIT_CONFIG: u8 = 2;
