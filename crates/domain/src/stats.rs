// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Row counts shown on the summary cards before execution.
///
/// Derived from sheet row counts, not from validation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub buildings: usize,
    pub lots: usize,
    pub contacts: usize,
    pub contracts: usize,
    pub total: usize,
}

impl ImportStats {
    /// Creates stats from per-sheet counts; `total` is their sum.
    #[must_use]
    pub const fn new(buildings: usize, lots: usize, contacts: usize, contracts: usize) -> Self {
        Self {
            buildings,
            lots,
            contacts,
            contracts,
            total: buildings + lots + contacts + contracts,
        }
    }

    /// Returns `true` when the file holds no data rows at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}
