// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Migrations and foreign key enforcement are also exercised by every other
//! test through `Persistence::new_in_memory()`.

use seido_import::ImportMode;
use seido_import_domain::EntityKind;

use super::{run_import, sample_parse_result};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    run_import(&mut db1, &sample_parse_result(), ImportMode::Transactional);

    assert_eq!(db1.count_entities(EntityKind::Building).unwrap(), 1);
    assert_eq!(db2.count_entities(EntityKind::Building).unwrap(), 0);
}
