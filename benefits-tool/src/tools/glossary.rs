//! `lookup_benefit_term`: static glossary of benefits vocabulary.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Deserialize;

/// Arguments of `lookup_benefit_term`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LookupArgs {
    /// The benefits term or acronym to define, e.g. HSA or PPO.
    pub term: String,
}

const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("HSA", "Health Savings Account lets you save pre-tax money for medical expenses."),
    ("PPO", "Preferred Provider Organization is a type of health insurance plan."),
    (
        "HMO",
        "Health Maintenance Organization is a plan that requires you to use in-network providers and a primary care physician.",
    ),
    ("FSA", "Flexible Spending Account lets you set aside pre-tax money for eligible expenses; unused funds may be forfeited at year end."),
    ("Deductible", "The amount you pay for covered services before your insurance plan starts to pay."),
    ("Copay", "A fixed amount you pay for a covered service, such as a doctor visit."),
    ("Coinsurance", "Your share of the cost of a covered service, as a percentage, after you meet your deductible."),
    ("Premium", "The amount you pay each month to keep your health insurance active."),
    ("Out-of-pocket maximum", "The most you will pay for covered services in a plan year before insurance pays 100%."),
    ("COBRA", "A federal law that lets you keep your employer's health coverage for a limited time after leaving your job."),
];

/// Term → definition table.
///
/// Lookups try the exact term first, then a case-insensitive match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glossary {
    entries: BTreeMap<String, String>,
}

impl Default for Glossary {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRIES.iter().map(|(term, definition)| (*term, *definition)))
    }
}

impl Glossary {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        let term = term.trim();
        self.entries
            .get(term)
            .or_else(|| {
                self.entries.iter().find(|(key, _)| key.eq_ignore_ascii_case(term)).map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// Definition of `term`, or the fixed not-found sentence.
    pub fn define(&self, term: &str) -> String {
        match self.get(term) {
            Some(definition) => definition.to_string(),
            None => format!("Definition for '{term}' not found."),
        }
    }
}

/// Look `term` up in the default glossary.
pub fn lookup_benefit_term(term: &str) -> String {
    Glossary::default().define(term)
}
