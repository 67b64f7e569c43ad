// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask <command>` wraps the lint, build and test tooling used in CI,
//! plus a migration check for the embedded `SQLite` schema.
//!
//! ### Migration verification
//!
//! `cargo xtask verify-migrations` applies every migration to a fresh
//! in-memory database, checks the property tables and their foreign keys,
//! reverts everything, and re-applies to confirm the down migrations leave
//! nothing behind.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

/// Tables the migrations must create.
const EXPECTED_TABLES: [&str; 7] = [
    "buildings",
    "companies",
    "contacts",
    "contract_contacts",
    "contracts",
    "import_runs",
    "lots",
];

/// Tables whose rows are matched on an import natural key.
const NATURAL_KEY_TABLES: [&str; 5] = ["buildings", "companies", "contacts", "contracts", "lots"];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
    /// Everything CI runs, in order
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Clippy, rustdoc, rustfmt and typos
    #[command(visible_alias = "l")]
    Lint,

    /// Apply clippy and rustfmt fixes
    #[command(visible_alias = "f")]
    Fix,

    /// License and advisory checks
    #[command(visible_alias = "cd")]
    Deny,

    /// Unused dependency check
    #[command(visible_alias = "m")]
    Machete,

    /// Unit and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// lcov coverage report in target/
    #[command(visible_alias = "cov")]
    Coverage,

    /// Apply, revert and re-apply the `SQLite` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => {
                for step in [
                    Self::Lint,
                    Self::Deny,
                    Self::Machete,
                    Self::Build,
                    Self::Test,
                    Self::VerifyMigrations,
                ] {
                    step.run()?;
                }
                Ok(())
            }
            Self::Build => cargo(&["build", "--all-targets", "--all-features"]),
            Self::Lint => lint(),
            Self::Fix => {
                cargo(&[
                    "clippy",
                    "--all-targets",
                    "--all-features",
                    "--fix",
                    "--allow-dirty",
                    "--allow-staged",
                ])?;
                cargo_nightly(&["fmt", "--all"])
            }
            Self::Deny => cargo(&["deny", "check"]),
            Self::Machete => {
                cmd!("cargo-machete").run_with_trace()?;
                Ok(())
            }
            Self::Test => {
                cargo(&["test", "--all-targets", "--all-features"])?;
                cargo(&["test", "--doc", "--all-features"])
            }
            Self::Coverage => cargo(&[
                "llvm-cov",
                "--lcov",
                "--output-path",
                "target/lcov.info",
                "--all-features",
            ]),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn lint() -> Result<()> {
    cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])?;

    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;
    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            ["doc", "--no-deps", "--all-features", "--package", &package.name],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    cargo_nightly(&["fmt", "--all", "--check"])?;
    cmd!("typos").run_with_trace()?;
    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args)
        // set by the outer cargo invocation
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Apply every migration, check the result, revert, then re-apply.
///
/// The schema after re-applying must equal the first one, and reverting must
/// leave no table behind.
fn verify_migrations() -> Result<()> {
    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    let applied: Schema = Schema::read(&mut conn)?;
    applied.check()?;
    tracing::info!(tables = applied.tables.len(), "Migrations applied");

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let reverted: Schema = Schema::read(&mut conn)?;
    if !reverted.tables.is_empty() {
        return Err(eyre!(
            "Tables left after reverting every migration: {:?}",
            reverted.tables.keys().collect::<Vec<_>>()
        ));
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to re-apply migrations: {e}"))?;
    if Schema::read(&mut conn)? != applied {
        return Err(eyre!("Schema differs after revert and re-apply"));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Table {
    /// Column name to `NOT NULL`.
    columns: BTreeMap<String, bool>,
    /// `(column, target table, target column)`.
    foreign_keys: BTreeSet<(String, String, String)>,
    unique: BTreeSet<Vec<String>>,
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
}

#[derive(QueryableByName)]
struct ForeignKeyRow {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
    #[diesel(sql_type = Text)]
    to: String,
}

#[derive(QueryableByName)]
struct IndexRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Integer)]
    unique: i32,
}

impl Schema {
    /// Reads user tables through `PRAGMA` introspection.
    fn read(conn: &mut SqliteConnection) -> Result<Self> {
        let names: Vec<NameRow> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' \
             ORDER BY name",
        )
        .load(conn)
        .wrap_err("Failed to list tables")?;

        let mut tables: BTreeMap<String, Table> = BTreeMap::new();
        for NameRow { name } in names {
            let mut table: Table = Table::default();

            let columns: Vec<ColumnRow> = diesel::sql_query(format!("PRAGMA table_info({name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read columns of {name}"))?;
            for column in columns {
                table.columns.insert(column.name, column.notnull != 0);
            }

            let foreign_keys: Vec<ForeignKeyRow> =
                diesel::sql_query(format!("PRAGMA foreign_key_list({name})"))
                    .load(conn)
                    .wrap_err_with(|| format!("Failed to read foreign keys of {name}"))?;
            for fk in foreign_keys {
                table.foreign_keys.insert((fk.from, fk.table, fk.to));
            }

            let indexes: Vec<IndexRow> = diesel::sql_query(format!("PRAGMA index_list({name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read indexes of {name}"))?;
            for index in indexes.into_iter().filter(|index| index.unique != 0) {
                let columns: Vec<NameRow> =
                    diesel::sql_query(format!("PRAGMA index_info({})", index.name))
                        .load(conn)
                        .wrap_err_with(|| format!("Failed to read index {}", index.name))?;
                table
                    .unique
                    .insert(columns.into_iter().map(|c| c.name).collect());
            }

            tables.insert(name, table);
        }

        Ok(Self { tables })
    }

    /// Checks expected tables, foreign key targets and natural keys.
    fn check(&self) -> Result<()> {
        let mut errors: Vec<String> = EXPECTED_TABLES
            .iter()
            .filter(|table| !self.tables.contains_key(**table))
            .map(|table| format!("Missing table: {table}"))
            .collect();

        for (name, table) in &self.tables {
            for (from, to_table, to_column) in &table.foreign_keys {
                let target_ok: bool = self
                    .tables
                    .get(to_table)
                    .is_some_and(|target| target.columns.contains_key(to_column));
                if !target_ok {
                    errors.push(format!(
                        "{name}.{from} references missing {to_table}.{to_column}"
                    ));
                }
            }
        }

        let natural_key: Vec<String> = vec!["natural_key".to_string()];
        for name in NATURAL_KEY_TABLES {
            let Some(table) = self.tables.get(name) else {
                continue;
            };
            if !table.unique.contains(&natural_key) {
                errors.push(format!("{name}.natural_key is not unique"));
            }
            if table.columns.get("natural_key") != Some(&true) {
                errors.push(format!("{name}.natural_key must be NOT NULL"));
            }
        }

        if errors.is_empty() {
            return Ok(());
        }
        for error in &errors {
            tracing::error!("{error}");
        }
        Err(eyre!("Schema verification failed with {} error(s)", errors.len()))
    }
}

/// Logs a `duct::Expression` before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
