//! The fixed 17-field record returned by `POST /extract`, and the rule for merging
//! untyped model output into it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every key of [`ExtractionResult`], in serialization order.
pub const FIELD_NAMES: [&str; 17] = [
    "Nom",
    "Prénom",
    "Nom de jeune fille",
    "Numéro d'employé",
    "Titre",
    "Date de naissance",
    "Lieu de naissance",
    "Nationalité",
    "Sexe",
    "Situation familiale",
    "Nombre d'enfants",
    "Numéro de sécurité sociale",
    "Adresse postale",
    "Code postal",
    "Adresse e-mail",
    "Numéro de téléphone",
    "Adresse",
];

pub const CHILDREN_COUNT_FIELD: &str = "Nombre d'enfants";

/// Personal information extracted from one CV.
///
/// `Default` is the "nothing found" record: every string field null, no children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(rename = "Nom")]
    pub last_name: Option<String>,
    #[serde(rename = "Prénom")]
    pub first_name: Option<String>,
    #[serde(rename = "Nom de jeune fille")]
    pub maiden_name: Option<String>,
    #[serde(rename = "Numéro d'employé")]
    pub employee_number: Option<String>,
    #[serde(rename = "Titre")]
    pub title: Option<String>,
    #[serde(rename = "Date de naissance")]
    pub birth_date: Option<String>,
    #[serde(rename = "Lieu de naissance")]
    pub birth_place: Option<String>,
    #[serde(rename = "Nationalité")]
    pub nationality: Option<String>,
    #[serde(rename = "Sexe")]
    pub sex: Option<String>,
    #[serde(rename = "Situation familiale")]
    pub marital_status: Option<String>,
    #[serde(rename = "Nombre d'enfants")]
    pub children_count: u32,
    #[serde(rename = "Numéro de sécurité sociale")]
    pub social_security_number: Option<String>,
    #[serde(rename = "Adresse postale")]
    pub postal_address: Option<String>,
    #[serde(rename = "Code postal")]
    pub postal_code: Option<String>,
    #[serde(rename = "Adresse e-mail")]
    pub email: Option<String>,
    #[serde(rename = "Numéro de téléphone")]
    pub phone_number: Option<String>,
    #[serde(rename = "Adresse")]
    pub address: Option<String>,
}

/// Counters reported after a merge, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub applied: usize,
    pub empty: usize,
    pub unknown: usize,
    pub rejected: usize,
}

enum FieldUpdate {
    Applied,
    Rejected,
    Unknown,
}

impl ExtractionResult {
    /// Applies model-provided values field by field.
    ///
    /// Unknown keys are ignored. Null, `""` and `[]` leave the field untouched, as
    /// do values that do not fit the field's type.
    pub fn merge(&mut self, data: &Map<String, Value>) -> MergeStats {
        let mut stats = MergeStats::default();

        for (key, value) in data {
            if is_empty_value(value) {
                if FIELD_NAMES.contains(&key.as_str()) {
                    stats.empty += 1;
                } else {
                    stats.unknown += 1;
                }
                continue;
            }

            match self.set(key, value) {
                FieldUpdate::Applied => stats.applied += 1,
                FieldUpdate::Rejected => stats.rejected += 1,
                FieldUpdate::Unknown => stats.unknown += 1,
            }
        }

        stats
    }

    fn set(&mut self, key: &str, value: &Value) -> FieldUpdate {
        if key == CHILDREN_COUNT_FIELD {
            return match as_count(value) {
                Some(count) => {
                    self.children_count = count;
                    FieldUpdate::Applied
                }
                None => FieldUpdate::Rejected,
            };
        }

        let Some(slot) = self.text_field_mut(key) else {
            return FieldUpdate::Unknown;
        };

        match as_text(value) {
            Some(text) => {
                *slot = Some(text);
                FieldUpdate::Applied
            }
            None => FieldUpdate::Rejected,
        }
    }

    fn text_field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "Nom" => &mut self.last_name,
            "Prénom" => &mut self.first_name,
            "Nom de jeune fille" => &mut self.maiden_name,
            "Numéro d'employé" => &mut self.employee_number,
            "Titre" => &mut self.title,
            "Date de naissance" => &mut self.birth_date,
            "Lieu de naissance" => &mut self.birth_place,
            "Nationalité" => &mut self.nationality,
            "Sexe" => &mut self.sex,
            "Situation familiale" => &mut self.marital_status,
            "Numéro de sécurité sociale" => &mut self.social_security_number,
            "Adresse postale" => &mut self.postal_address,
            "Code postal" => &mut self.postal_code,
            "Adresse e-mail" => &mut self.email,
            "Numéro de téléphone" => &mut self.phone_number,
            "Adresse" => &mut self.address,
            _ => return None,
        };
        Some(slot)
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Scalars become text; objects and lists do not.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Non-negative whole numbers, given as a number or as digits in a string.
fn as_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                return u32::try_from(i).ok();
            }
            let f = n.as_f64()?;
            if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
                Some(f as u32)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
