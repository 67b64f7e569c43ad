// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `lookups`: natural-key to row-ID resolution used by upserts
//! - `counts`: per-entity row counts
//! - `import_runs`: import history

pub mod counts;
pub mod import_runs;
pub mod lookups;

pub use counts::count_entities;
pub use import_runs::list_import_runs;
pub use lookups::{contract_parties, find_id, require_id};
