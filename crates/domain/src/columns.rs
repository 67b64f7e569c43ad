// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column catalog: maps localized spreadsheet headers to canonical field keys.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::sheet::SheetKind;

/// Canonical field keys.
pub mod fields {
    pub const NAME: &str = "name";
    pub const ADDRESS: &str = "address";
    pub const POSTAL_CODE: &str = "postal_code";
    pub const CITY: &str = "city";
    pub const COUNTRY: &str = "country";
    pub const DESCRIPTION: &str = "description";
    pub const REFERENCE: &str = "reference";
    pub const BUILDING_NAME: &str = "building_name";
    pub const INDEPENDENT: &str = "independent";
    pub const CATEGORY: &str = "category";
    pub const FLOOR: &str = "floor";
    pub const DOOR_NUMBER: &str = "door_number";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const ROLE: &str = "role";
    pub const COMPANY_NAME: &str = "company_name";
    pub const VAT_NUMBER: &str = "vat_number";
    pub const SPECIALITY: &str = "speciality";
    pub const NOTES: &str = "notes";
    pub const TITLE: &str = "title";
    pub const LOT_REFERENCE: &str = "lot_reference";
    pub const START_DATE: &str = "start_date";
    pub const DURATION_MONTHS: &str = "duration_months";
    pub const RENT: &str = "rent";
    pub const CHARGES: &str = "charges";
    pub const DEPOSIT: &str = "deposit";
    pub const PAYMENT_FREQUENCY: &str = "payment_frequency";
    pub const TENANT_EMAILS: &str = "tenant_emails";
    pub const GUARANTOR_EMAILS: &str = "guarantor_emails";
}

/// One known column of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// The canonical field key.
    pub key: &'static str,
    /// The localized header written into templates.
    pub label: &'static str,
    /// Whether the template marks this column as required.
    pub required: bool,
    /// Normalized header spellings accepted for this column.
    aliases: &'static [&'static str],
}

impl Column {
    const fn new(
        key: &'static str,
        label: &'static str,
        required: bool,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            required,
            aliases,
        }
    }

    /// Returns the header as written into templates (required columns are starred).
    #[must_use]
    pub fn header_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            String::from(self.label)
        }
    }

    fn matches(&self, normalized: &str) -> bool {
        self.key == normalized || self.aliases.contains(&normalized)
    }
}

const BUILDING_COLUMNS: &[Column] = &[
    Column::new(
        fields::NAME,
        "Nom",
        true,
        &["nom", "nom_immeuble", "nom_de_l_immeuble", "building_name"],
    ),
    Column::new(fields::ADDRESS, "Adresse", true, &["adresse", "rue", "street"]),
    Column::new(
        fields::POSTAL_CODE,
        "Code postal",
        false,
        &["code_postal", "cp", "zip", "zip_code"],
    ),
    Column::new(fields::CITY, "Ville", false, &["ville", "localite"]),
    Column::new(fields::COUNTRY, "Pays", false, &["pays"]),
    Column::new(
        fields::DESCRIPTION,
        "Description",
        false,
        &["notes", "remarques"],
    ),
];

const LOT_COLUMNS: &[Column] = &[
    Column::new(
        fields::REFERENCE,
        "Référence",
        true,
        &["ref", "reference_lot", "lot_reference", "numero_lot"],
    ),
    Column::new(
        fields::BUILDING_NAME,
        "Nom immeuble",
        false,
        &["building", "immeuble", "nom_immeuble", "nom_de_l_immeuble"],
    ),
    Column::new(
        fields::INDEPENDENT,
        "Indépendant",
        false,
        &["independant", "lot_independant"],
    ),
    Column::new(fields::CATEGORY, "Catégorie", false, &["categorie", "type"]),
    Column::new(fields::FLOOR, "Étage", false, &["etage"]),
    Column::new(
        fields::DOOR_NUMBER,
        "Porte",
        false,
        &["porte", "numero_porte", "door"],
    ),
    Column::new(
        fields::DESCRIPTION,
        "Description",
        false,
        &["notes", "remarques"],
    ),
];

const CONTACT_COLUMNS: &[Column] = &[
    Column::new(
        fields::NAME,
        "Nom complet",
        false,
        &["nom_complet", "full_name", "contact"],
    ),
    Column::new(
        fields::FIRST_NAME,
        "Prénom",
        false,
        &["prenom", "firstname"],
    ),
    Column::new(
        fields::LAST_NAME,
        "Nom",
        false,
        &["nom", "lastname", "nom_de_famille"],
    ),
    Column::new(
        fields::EMAIL,
        "Email",
        false,
        &["e_mail", "mail", "courriel", "adresse_email"],
    ),
    Column::new(
        fields::PHONE,
        "Téléphone",
        false,
        &["telephone", "tel", "gsm", "mobile"],
    ),
    Column::new(fields::ROLE, "Rôle", false, &["type", "type_de_contact"]),
    Column::new(
        fields::COMPANY_NAME,
        "Société",
        false,
        &["company", "societe", "entreprise", "nom_societe"],
    ),
    Column::new(
        fields::VAT_NUMBER,
        "Numéro TVA",
        false,
        &["vat", "tva", "numero_tva", "n_tva"],
    ),
    Column::new(
        fields::SPECIALITY,
        "Spécialité",
        false,
        &["specialty", "specialite", "metier"],
    ),
    Column::new(
        fields::NOTES,
        "Notes",
        false,
        &["remarques", "commentaire"],
    ),
];

const CONTRACT_COLUMNS: &[Column] = &[
    Column::new(fields::TITLE, "Titre", false, &["titre", "nom_contrat"]),
    Column::new(
        fields::LOT_REFERENCE,
        "Référence lot",
        true,
        &["reference_lot", "lot", "ref_lot"],
    ),
    Column::new(
        fields::BUILDING_NAME,
        "Nom immeuble",
        false,
        &["building", "immeuble", "nom_immeuble", "nom_de_l_immeuble"],
    ),
    Column::new(
        fields::START_DATE,
        "Date de début",
        true,
        &["date_debut", "date_de_debut", "debut"],
    ),
    Column::new(
        fields::DURATION_MONTHS,
        "Durée (mois)",
        true,
        &["duree", "duree_mois", "duration"],
    ),
    Column::new(
        fields::RENT,
        "Loyer",
        true,
        &["loyer", "loyer_mensuel", "montant_loyer"],
    ),
    Column::new(
        fields::CHARGES,
        "Charges",
        false,
        &["provision_charges", "charges_mensuelles"],
    ),
    Column::new(
        fields::DEPOSIT,
        "Garantie",
        false,
        &["garantie", "caution", "depot_de_garantie"],
    ),
    Column::new(
        fields::PAYMENT_FREQUENCY,
        "Fréquence de paiement",
        false,
        &["frequence", "frequence_de_paiement"],
    ),
    Column::new(
        fields::TENANT_EMAILS,
        "Emails locataires",
        false,
        &["locataires", "emails_locataires", "tenants"],
    ),
    Column::new(
        fields::GUARANTOR_EMAILS,
        "Emails garants",
        false,
        &["garants", "emails_garants", "guarantors"],
    ),
];

/// Returns the known columns of a sheet in template order.
#[must_use]
pub const fn columns(sheet: SheetKind) -> &'static [Column] {
    match sheet {
        SheetKind::Buildings => BUILDING_COLUMNS,
        SheetKind::Lots => LOT_COLUMNS,
        SheetKind::Contacts => CONTACT_COLUMNS,
        SheetKind::Contracts => CONTRACT_COLUMNS,
    }
}

/// Maps a raw header cell to the canonical field key of `sheet`, if known.
#[must_use]
pub fn map_header(sheet: SheetKind, header: &str) -> Option<&'static str> {
    let normalized: String = normalize_header(header);
    if normalized.is_empty() {
        return None;
    }
    columns(sheet)
        .iter()
        .find(|column| column.matches(&normalized))
        .map(|column| column.key)
}

/// Lowercases, trims and strips diacritics.
///
/// Input is decomposed (NFKD) first, so precomposed `é` and `e` followed by a
/// combining acute fold to the same `e`. Letters with no decomposition are
/// mapped by hand.
#[must_use]
pub fn fold_label(value: &str) -> String {
    let mut folded: String = String::with_capacity(value.len());
    for c in value.trim().nfkd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'ø' | 'Ø' => folded.push('o'),
            'œ' | 'Œ' => folded.push_str("oe"),
            'æ' | 'Æ' => folded.push_str("ae"),
            'ß' => folded.push_str("ss"),
            'đ' | 'Đ' => folded.push('d'),
            'ł' | 'Ł' => folded.push('l'),
            _ => folded.extend(c.to_lowercase()),
        }
    }
    folded
}

/// Normalizes a header for case-, accent- and punctuation-tolerant matching.
///
/// `"Date de début *"` becomes `"date_de_debut"`, `"Durée (mois)"` becomes
/// `"duree_mois"`.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    let mut normalized: String = String::with_capacity(header.len());
    for c in fold_label(header).chars() {
        if c.is_alphanumeric() {
            normalized.push(c);
        } else if !normalized.ends_with('_') {
            normalized.push('_');
        }
    }
    normalized.trim_matches('_').to_string()
}
