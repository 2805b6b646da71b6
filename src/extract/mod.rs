pub mod company_name;
pub mod contact_form;
pub mod dom;
pub mod email;
pub mod industry;
pub mod keywords;

use serde::{Deserialize, Serialize};

/// Detection method that produced a candidate. One namespace across all
/// four extractors so candidate lists serialize uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    // Email
    MailtoLink,
    JsonldSchema,
    SchemaMicrodata,
    RegexPlain,
    FormPlaceholder,
    FormValue,
    ObfuscatedPattern,
    JsAssembly,
    // Company name
    HeaderImageAlt,
    Metadata,
    HeaderFooter,
    CompanyProfilePage,
    TextNer,
    DomainFallback,
    // Contact form
    LinkKeyword,
    UrlPattern,
    // Industry
    DomainHint,
    Jsonld,
    Text,
}

/// A provisional extracted value with provenance and confidence.
/// `value` is never empty once it reaches a candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub value: String,
    pub source: Source,
    pub confidence: f64,
}

impl Candidate {
    pub fn new(value: impl Into<String>, source: Source, confidence: f64) -> Self {
        Self {
            value: value.into(),
            source,
            confidence,
        }
    }
}

/// Per-field outcome: the winner (if any candidate cleared the field's
/// acceptance threshold) plus every surviving candidate for audit, sorted
/// by descending confidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub selected: Option<Candidate>,
    pub candidates: Vec<Candidate>,
}

impl ExtractionResult {
    /// Sorts candidates by descending confidence and selects the top one
    /// when `accept` approves it. The sort is stable, so candidates pushed
    /// in detector-priority order keep that order on exact score ties.
    pub fn select(mut candidates: Vec<Candidate>, accept: impl Fn(&Candidate) -> bool) -> Self {
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let selected = candidates.first().filter(|c| accept(c)).cloned();
        Self {
            selected,
            candidates,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
