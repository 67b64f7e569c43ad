// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seido_import::ImportSummary;
use serde::{Deserialize, Serialize};

/// One recorded import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRunData {
    pub run_id: i64,
    pub file_name: String,
    pub mode: String,
    pub success: bool,
    pub rolled_back: bool,
    pub duration_ms: u64,
    pub summary: ImportSummary,
    pub error_count: usize,
    pub fatal_error: Option<String>,
    pub created_at: String,
}

/// A contact linked to a stored contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPartyData {
    pub contact_id: i64,
    /// `tenant` or `guarantor`.
    pub party_role: String,
}

/// Tenant and guarantor role names stored in `contract_contacts`.
pub const TENANT_ROLE: &str = "tenant";
pub const GUARANTOR_ROLE: &str = "guarantor";
