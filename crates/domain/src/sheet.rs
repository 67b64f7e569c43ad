// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::columns::fold_label;

/// One of the four sheets of an import workbook.
///
/// The variant name is the canonical, language-independent tag used in
/// error reports. Display names in the workbook itself may be localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SheetKind {
    /// Buildings (immeubles).
    Buildings,
    /// Rentable units (lots).
    Lots,
    /// People and companies.
    Contacts,
    /// Leases.
    Contracts,
}

impl SheetKind {
    /// All sheets in workbook order.
    pub const ALL: [Self; 4] = [Self::Buildings, Self::Lots, Self::Contacts, Self::Contracts];

    /// Returns the canonical sheet tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buildings => "Buildings",
            Self::Lots => "Lots",
            Self::Contacts => "Contacts",
            Self::Contracts => "Contracts",
        }
    }

    /// Returns the sheet name written into generated templates.
    #[must_use]
    pub const fn template_name(&self) -> &'static str {
        match self {
            Self::Buildings => "Immeubles",
            Self::Lots => "Lots",
            Self::Contacts => "Contacts",
            Self::Contracts => "Contrats",
        }
    }

    /// Accepted sheet names, already folded (lowercase, no accents).
    const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Buildings => &["buildings", "building", "immeubles", "immeuble", "biens"],
            Self::Lots => &["lots", "lot", "units"],
            Self::Contacts => &["contacts", "contact"],
            Self::Contracts => &["contracts", "contract", "contrats", "contrat", "baux", "bail"],
        }
    }

    /// Resolves a workbook sheet name (or CSV file stem) to a sheet kind.
    ///
    /// Matching ignores case, surrounding whitespace and French accents.
    #[must_use]
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        let folded: String = fold_label(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.aliases().contains(&folded.as_str()))
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of entity persisted by one import phase.
///
/// Declaration order is the execution order: later entities reference
/// earlier ones by natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Companies derived from the Contacts sheet.
    Company,
    /// Contacts.
    Contact,
    /// Buildings.
    Building,
    /// Lots.
    Lot,
    /// Contracts.
    Contract,
}

impl EntityKind {
    /// All entity kinds in import order.
    pub const ORDER: [Self; 5] = [
        Self::Company,
        Self::Contact,
        Self::Building,
        Self::Lot,
        Self::Contract,
    ];

    /// Returns the zero-based position of this kind in the import order.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Company => 0,
            Self::Contact => 1,
            Self::Building => 2,
            Self::Lot => 3,
            Self::Contract => 4,
        }
    }

    /// Returns the sheet rows of this kind come from.
    #[must_use]
    pub const fn sheet(&self) -> SheetKind {
        match self {
            Self::Company | Self::Contact => SheetKind::Contacts,
            Self::Building => SheetKind::Buildings,
            Self::Lot => SheetKind::Lots,
            Self::Contract => SheetKind::Contracts,
        }
    }

    /// Returns the phase name shown to the gestionnaire.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Company => "Import des sociétés",
            Self::Contact => "Import des contacts",
            Self::Building => "Import des immeubles",
            Self::Lot => "Import des lots",
            Self::Contract => "Import des contrats",
        }
    }

    /// Returns the stable machine name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "companies",
            Self::Contact => "contacts",
            Self::Building => "buildings",
            Self::Lot => "lots",
            Self::Contract => "contracts",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
