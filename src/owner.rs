//! Finds the owner of a commercial premises in the legal-entity premises
//! file and decides how it is looked up in the business registry. The
//! registry call itself happens elsewhere.

use crate::error::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Words dropped from a denomination before a name search.
const NOISE_WORDS: [&str; 4] = ["SA", "SOCIETE", "CIVILE", "IMMOBILIERE"];

/// Streets must score strictly above this similarity, in percent.
const STREET_MATCH_CUTOFF: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Siren(String);

impl Siren {
    pub fn parse(raw: &str) -> Result<Self> {
        let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() != 9 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ScoreError::InvalidSiren(raw.to_string()));
        }
        Ok(Self(digits))
    }
}

impl fmt::Display for Siren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner line of the legal-entity premises file. The French export headers
/// are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OwnerRecord {
    #[serde(alias = "Adresse")]
    pub street: String,
    #[serde(alias = "N° voirie (Adresse du local)")]
    pub number: String,
    #[serde(alias = "Dénomination (Propriétaire(s) du local)")]
    pub denomination: String,
    #[serde(default, alias = "N° SIREN (Propriétaire(s) du local)")]
    pub siren: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreetMatch {
    pub street: String,
    /// Similarity to the requested street, 0 to 100.
    pub score: f64,
}

/// Result of searching the premises file for one address.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSearch {
    /// Matching streets, best first. The first one is searched.
    pub candidates: Vec<StreetMatch>,
    /// Owners at the address, one per SIREN.
    pub owners: Vec<OwnerRecord>,
    pub lookup: OwnerLookup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "query", rename_all = "snake_case")]
pub enum OwnerLookup {
    NotFound,
    BySiren(Siren),
    SearchByName(String),
}

impl fmt::Display for OwnerLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerLookup::NotFound => f.write_str("no owner recorded at this address"),
            OwnerLookup::BySiren(siren) => write!(f, "registry lookup by siren {siren}"),
            OwnerLookup::SearchByName(name) => write!(f, "registry search by name \"{name}\""),
        }
    }
}

/// Upper-cases and folds French accents so street names compare reliably.
pub fn normalize_street(street: &str) -> String {
    let folded: String = street
        .trim()
        .to_uppercase()
        .replace(" - ", " ")
        .chars()
        .map(|c| match c {
            'À' | 'Â' => 'A',
            'Ç' => 'C',
            'É' | 'Ê' | 'È' | 'Ë' => 'E',
            '\'' | '’' | '-' => ' ',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Distinct streets of the dataset similar enough to `query`, best first.
pub fn match_streets<'a>(
    query: &str,
    streets: impl IntoIterator<Item = &'a str>,
) -> Vec<StreetMatch> {
    let target = normalize_street(query);
    let mut seen = HashSet::new();
    let mut matches: Vec<StreetMatch> = streets
        .into_iter()
        .filter(|street| seen.insert(*street))
        .filter_map(|street| {
            let score = similarity(&target, &normalize_street(street));
            (score > STREET_MATCH_CUTOFF).then(|| StreetMatch {
                street: street.to_string(),
                score,
            })
        })
        .collect();
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

/// First record of each SIREN, in dataset order.
fn distinct_owners(records: &[OwnerRecord]) -> Vec<OwnerRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.siren.clone()))
        .cloned()
        .collect()
}

/// Looks up the owner at `number` on the street best matching `street`.
///
/// With several owners at the address, `owner` selects one by denomination;
/// without it the first owner listed is used.
pub fn search(
    records: &[OwnerRecord],
    street: &str,
    number: &str,
    owner: Option<&str>,
) -> OwnerSearch {
    let candidates = match_streets(street, records.iter().map(|record| record.street.as_str()));
    let at_address: Vec<OwnerRecord> = match candidates.first() {
        Some(best) => records
            .iter()
            .filter(|record| record.street == best.street && record.number.trim() == number.trim())
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    let owners = distinct_owners(&at_address);
    debug!(
        candidates = candidates.len(),
        rows = at_address.len(),
        owners = owners.len(),
        "searched premises file"
    );

    let selected: Vec<OwnerRecord> =
        match owner.or_else(|| owners.first().map(|record| record.denomination.as_str())) {
            Some(name) => at_address
                .iter()
                .filter(|record| record.denomination.trim().eq_ignore_ascii_case(name.trim()))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

    OwnerSearch {
        lookup: resolve(&selected),
        candidates,
        owners,
    }
}

pub fn clean_company_name(name: &str) -> String {
    name.split_whitespace()
        .filter(|word| !NOISE_WORDS.contains(&word.to_uppercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Anonymised or missing SIRENs fall back to a name search on the first owner.
pub fn resolve(records: &[OwnerRecord]) -> OwnerLookup {
    let Some(first) = records.first() else {
        return OwnerLookup::NotFound;
    };

    let sirens: Option<Vec<Siren>> = records
        .iter()
        .map(|record| record.siren.as_deref().and_then(|raw| Siren::parse(raw).ok()))
        .collect();

    match sirens.and_then(|sirens| sirens.into_iter().next()) {
        Some(siren) => OwnerLookup::BySiren(siren),
        None => OwnerLookup::SearchByName(clean_company_name(&first.denomination)),
    }
}
