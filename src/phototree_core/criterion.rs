use crate::phototree_core::error::{PhototreeError, Result};
use crate::phototree_core::record::Record;
use std::fmt;

/// A grouping dimension applied at one level of the folder tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Year,
    Month,
    Day,
    Country,
    City,
}

/// The value a criterion extracts from a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriterionValue {
    Number(i32),
    Place(String),
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Year,
        Criterion::Month,
        Criterion::Day,
        Criterion::Country,
        Criterion::City,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'Y' => Some(Criterion::Year),
            'm' => Some(Criterion::Month),
            'd' => Some(Criterion::Day),
            'C' => Some(Criterion::Country),
            'c' => Some(Criterion::City),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Criterion::Year => 'Y',
            Criterion::Month => 'm',
            Criterion::Day => 'd',
            Criterion::Country => 'C',
            Criterion::City => 'c',
        }
    }

    pub fn extract(&self, record: &Record) -> CriterionValue {
        match self {
            Criterion::Year => CriterionValue::Number(record.timestamp.year()),
            Criterion::Month => CriterionValue::Number(u8::from(record.timestamp.month()).into()),
            Criterion::Day => CriterionValue::Number(record.timestamp.day().into()),
            Criterion::Country => CriterionValue::Place(record.country.clone()),
            Criterion::City => CriterionValue::Place(record.city.clone()),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Criterion::Year => "year",
            Criterion::Month => "month",
            Criterion::Day => "day",
            Criterion::Country => "country",
            Criterion::City => "city",
        };
        write!(f, "{}", name)
    }
}

impl CriterionValue {
    /// Directory name for this value. Separators are replaced so a value
    /// always renders to exactly one path component.
    pub fn render(&self) -> String {
        match self {
            CriterionValue::Number(n) => n.to_string(),
            CriterionValue::Place(name) if name.chars().all(|c| c == '.') => name.replace('.', "_"),
            CriterionValue::Place(name) => name
                .chars()
                .map(|c| if c == '/' || c == '\\' { '_' } else { c })
                .collect(),
        }
    }
}

/// Parse criterion codes from the command line.
///
/// A single token is read as packed codes (`"YmC"`); several tokens must each
/// be one code (`["Y", "m", "C"]`). Unknown and repeated codes are rejected
/// together so the user sees every bad token at once.
pub fn parse_criteria<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Criterion>> {
    let codes: Vec<String> = match tokens {
        [single] => single.as_ref().chars().map(String::from).collect(),
        many => many.iter().map(|t| t.as_ref().to_string()).collect(),
    };

    let mut criteria = Vec::with_capacity(codes.len());
    let mut invalid = Vec::new();

    for code in codes {
        let mut chars = code.chars();
        let parsed = match (chars.next(), chars.next()) {
            (Some(c), None) => Criterion::from_code(c),
            _ => None,
        };
        match parsed {
            Some(criterion) if !criteria.contains(&criterion) => criteria.push(criterion),
            _ => invalid.push(code),
        }
    }

    if !invalid.is_empty() {
        log::error!(
            "Criteria {:?} not recognised. Accepted codes are Y, m, d, C and c",
            invalid
        );
        return Err(PhototreeError::InvalidCriterion(invalid));
    }

    Ok(criteria)
}
