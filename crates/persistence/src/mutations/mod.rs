// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `upserts`: natural-key create-or-update for each imported entity
//! - `import_runs`: import history

pub mod import_runs;
pub mod upserts;

pub use import_runs::record_import_run;
pub use upserts::upsert_record;
