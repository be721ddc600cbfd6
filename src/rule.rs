//! Response rule engine
//!
//! A rule pairs a condition over the normalized user input (and any trip
//! details already known) with a response template. Rules live in an ordered
//! chain: the first rule whose condition holds wins, so the position of a rule
//! is part of its behavior.

use crate::error::{RuleError, RuleResult};
use crate::extract::TripDetails;
use crate::normalize::{contains_all, contains_any};
use crate::types::RuleId;
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Condition that triggers a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Case-insensitive substring
    Literal(String),
    /// Every keyword must occur
    AllOf(Vec<String>),
    /// At least one keyword must occur
    AnyOf(Vec<String>),
    /// Case-insensitive regex; capture groups are available to the template
    Regex(String),
    /// Known trip destination contains this keyword
    Destination(String),
    /// Every inner condition must hold
    And(Vec<RuleCondition>),
}

impl RuleCondition {
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into().to_lowercase())
    }

    pub fn all_of<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self::AllOf(words.into_iter().map(|w| w.into().to_lowercase()).collect())
    }

    pub fn any_of<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self::AnyOf(words.into_iter().map(|w| w.into().to_lowercase()).collect())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex(pattern.into())
    }

    pub fn destination(keyword: impl Into<String>) -> Self {
        Self::Destination(keyword.into().to_lowercase())
    }

    /// Conjunction of `self` and `other`
    pub fn and(self, other: RuleCondition) -> Self {
        match self {
            Self::And(mut inner) => {
                inner.push(other);
                Self::And(inner)
            }
            first => Self::And(vec![first, other]),
        }
    }
}

/// Response text with `{placeholder}` slots.
///
/// Recognized slots: `{itinerary_name}`, `{destination}`, `{travelers}`,
/// `{duration}`, `{preferences}` and `{1}`..`{9}` for regex captures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseTemplate(String);

impl ResponseTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fill the template from trip details and regex captures.
    pub fn render(&self, details: Option<&TripDetails>, captures: &[String]) -> String {
        let mut out = self
            .0
            .replace(
                "{itinerary_name}",
                slot(details.and_then(|d| d.itinerary_name.as_ref()), "your itinerary"),
            )
            .replace(
                "{destination}",
                slot(details.and_then(|d| d.destination.as_ref()), "your destination"),
            )
            .replace(
                "{travelers}",
                slot(
                    details.and_then(|d| d.number_of_travelers.as_ref()),
                    "to be confirmed",
                ),
            )
            .replace(
                "{duration}",
                slot(details.and_then(|d| d.duration.as_ref()), "to be confirmed"),
            )
            .replace(
                "{preferences}",
                slot(details.and_then(|d| d.client_preferences.as_ref()), "their interests"),
            );

        for (i, capture) in captures.iter().enumerate().take(9) {
            out = out.replace(&format!("{{{}}}", i + 1), capture);
        }

        out
    }
}

fn slot<'a>(value: Option<&'a String>, fallback: &'a str) -> &'a str {
    value
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback)
}

/// A condition/template pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRule {
    pub id: RuleId,
    pub name: String,
    pub condition: RuleCondition,
    pub template: ResponseTemplate,
    pub created_at: DateTime<Utc>,
}

impl ResponseRule {
    pub fn new(
        name: impl Into<String>,
        condition: RuleCondition,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: RuleId::new(),
            name: name.into(),
            condition,
            template: ResponseTemplate::new(template),
            created_at: Utc::now(),
        }
    }
}

/// Which rule fired and where it sits in its chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub rule_id: RuleId,
    pub rule_name: String,
    pub position: usize,
    pub captures: Vec<String>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: ResponseRule,
    /// Compiled regexes in depth-first order of the condition tree
    regexes: Vec<Regex>,
}

/// Ordered list of rules evaluated front to back
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<CompiledRule>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the end of the chain
    pub fn push(&mut self, rule: ResponseRule) -> RuleResult<RuleId> {
        let compiled = compile(rule)?;
        let id = compiled.rule.id;
        debug!(
            rule_id = %id,
            rule_name = %compiled.rule.name,
            position = self.rules.len(),
            "Adding rule to chain"
        );
        self.rules.push(compiled);
        Ok(id)
    }

    /// Insert a rule at `position`, shifting later rules back
    pub fn insert(&mut self, position: usize, rule: ResponseRule) -> RuleResult<RuleId> {
        let compiled = compile(rule)?;
        let id = compiled.rule.id;
        let position = position.min(self.rules.len());
        self.rules.insert(position, compiled);
        Ok(id)
    }

    /// Remove a rule; returns it if present
    pub fn remove(&mut self, id: &RuleId) -> Option<ResponseRule> {
        let index = self.rules.iter().position(|c| &c.rule.id == id)?;
        Some(self.rules.remove(index).rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &ResponseRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|c| c.rule.name == name)
    }

    /// First rule whose condition holds for the normalized input.
    pub fn first_match(
        &self,
        normalized: &str,
        details: Option<&TripDetails>,
    ) -> Option<(&ResponseRule, RuleMatch)> {
        for (position, compiled) in self.rules.iter().enumerate() {
            let mut captures = Vec::new();
            let mut regexes = compiled.regexes.iter();
            let hit = evaluate(
                &compiled.rule.condition,
                normalized,
                details,
                &mut regexes,
                &mut captures,
            );
            trace!(rule_name = %compiled.rule.name, position, hit, "Rule evaluated");

            if hit {
                info!(
                    rule_id = %compiled.rule.id,
                    rule_name = %compiled.rule.name,
                    position,
                    "Rule selected"
                );
                return Some((
                    &compiled.rule,
                    RuleMatch {
                        rule_id: compiled.rule.id,
                        rule_name: compiled.rule.name.clone(),
                        position,
                        captures,
                    },
                ));
            }
        }
        None
    }
}

fn compile(rule: ResponseRule) -> RuleResult<CompiledRule> {
    if rule.template.as_str().trim().is_empty() {
        return Err(RuleError::EmptyTemplate(rule.name));
    }
    let mut regexes = Vec::new();
    compile_condition(&rule.name, &rule.condition, &mut regexes)?;
    Ok(CompiledRule { rule, regexes })
}

fn compile_condition(
    name: &str,
    condition: &RuleCondition,
    regexes: &mut Vec<Regex>,
) -> RuleResult<()> {
    match condition {
        RuleCondition::Literal(s) | RuleCondition::Destination(s) if s.trim().is_empty() => {
            Err(RuleError::EmptyKeywords(name.to_string()))
        }
        RuleCondition::AllOf(words) | RuleCondition::AnyOf(words)
            if words.is_empty() || words.iter().any(|w| w.trim().is_empty()) =>
        {
            Err(RuleError::EmptyKeywords(name.to_string()))
        }
        RuleCondition::Regex(pattern) => {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| RuleError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            regexes.push(re);
            Ok(())
        }
        RuleCondition::And(inner) => {
            if inner.is_empty() {
                return Err(RuleError::EmptyKeywords(name.to_string()));
            }
            inner
                .iter()
                .try_for_each(|c| compile_condition(name, c, regexes))
        }
        _ => Ok(()),
    }
}

// Regexes are consumed in the same depth-first order compile_condition pushed
// them, so every Regex node must advance the iterator even when a sibling
// already failed.
fn evaluate<'a>(
    condition: &RuleCondition,
    normalized: &str,
    details: Option<&TripDetails>,
    regexes: &mut impl Iterator<Item = &'a Regex>,
    captures: &mut Vec<String>,
) -> bool {
    match condition {
        RuleCondition::Literal(s) => normalized.contains(s.as_str()),
        RuleCondition::AllOf(words) => contains_all(normalized, words),
        RuleCondition::AnyOf(words) => contains_any(normalized, words),
        RuleCondition::Regex(_) => match regexes.next() {
            Some(re) => match re.captures(normalized) {
                Some(caps) => {
                    captures.extend(
                        caps.iter()
                            .skip(1)
                            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default()),
                    );
                    true
                }
                None => false,
            },
            None => false,
        },
        RuleCondition::Destination(keyword) => details
            .and_then(|d| d.destination.as_deref())
            .map(|d| d.to_lowercase().contains(keyword.as_str()))
            .unwrap_or(false),
        RuleCondition::And(inner) => {
            let mut all = true;
            for c in inner {
                all &= evaluate(c, normalized, details, regexes, captures);
            }
            all
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn chain(rules: Vec<ResponseRule>) -> RuleChain {
        let mut chain = RuleChain::new();
        for rule in rules {
            chain.push(rule).unwrap();
        }
        chain
    }

    #[test]
    fn test_literal_matching() {
        let chain = chain(vec![ResponseRule::new(
            "pricing",
            RuleCondition::literal("Pricing"),
            "Pricing info",
        )]);

        let (rule, m) = chain
            .first_match(&normalize("What is your PRICING?"), None)
            .unwrap();
        assert_eq!(rule.name, "pricing");
        assert_eq!(m.position, 0);
        assert!(chain.first_match("tell me a joke", None).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let chain = chain(vec![
            ResponseRule::new(
                "add_snorkeling",
                RuleCondition::all_of(["add", "snorkeling"]),
                "Snorkeling added",
            ),
            ResponseRule::new(
                "add_hotel",
                RuleCondition::all_of(["add", "hotel"]),
                "Hotel added",
            ),
        ]);

        let input = normalize("Add snorkeling near the hotel");
        let (rule, _) = chain.first_match(&input, None).unwrap();
        assert_eq!(rule.name, "add_snorkeling");
    }

    #[test]
    fn test_regex_captures_feed_template() {
        let chain = chain(vec![ResponseRule::new(
            "counter",
            RuleCondition::regex(r"counter(?: offer)? (?:at|of) \$?(\d+)"),
            "We can counter at ${1} per night.",
        )]);

        let (rule, m) = chain
            .first_match(&normalize("I will Counter at $120"), None)
            .unwrap();
        assert_eq!(m.captures, vec!["120".to_string()]);
        assert_eq!(
            rule.template.render(None, &m.captures),
            "We can counter at $120 per night."
        );
    }

    #[test]
    fn test_destination_condition() {
        let chain = chain(vec![ResponseRule::new(
            "phuket_tips",
            RuleCondition::literal("recommend").and(RuleCondition::destination("phuket")),
            "Try Phi Phi Island.",
        )]);

        let details = TripDetails {
            destination: Some("Phuket, Thailand".to_string()),
            ..Default::default()
        };
        assert!(chain.first_match("recommend something", Some(&details)).is_some());
        assert!(chain.first_match("recommend something", None).is_none());
    }

    #[test]
    fn test_and_with_multiple_regexes_keeps_alignment() {
        let chain = chain(vec![ResponseRule::new(
            "two_regexes",
            RuleCondition::regex(r"(\d+) rooms").and(RuleCondition::regex(r"(\d+) nights")),
            "{1} rooms for {2} nights",
        )]);

        let (rule, m) = chain.first_match("3 rooms for 4 nights", None).unwrap();
        assert_eq!(rule.template.render(None, &m.captures), "3 rooms for 4 nights");
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let mut chain = RuleChain::new();
        assert!(matches!(
            chain.push(ResponseRule::new("empty", RuleCondition::literal("x"), "  ")),
            Err(RuleError::EmptyTemplate(_))
        ));
        assert!(matches!(
            chain.push(ResponseRule::new("bad", RuleCondition::regex("("), "text")),
            Err(RuleError::InvalidPattern { .. })
        ));
        assert!(matches!(
            chain.push(ResponseRule::new(
                "none",
                RuleCondition::any_of(Vec::<String>::new()),
                "text"
            )),
            Err(RuleError::EmptyKeywords(_))
        ));
        assert!(chain.is_empty());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut chain = chain(vec![ResponseRule::new(
            "generic_add",
            RuleCondition::literal("add"),
            "Added.",
        )]);
        let id = chain
            .insert(
                0,
                ResponseRule::new("add_spa", RuleCondition::all_of(["add", "spa"]), "Spa added."),
            )
            .unwrap();

        let (rule, _) = chain.first_match("add a spa day", None).unwrap();
        assert_eq!(rule.name, "add_spa");

        assert!(chain.remove(&id).is_some());
        let (rule, _) = chain.first_match("add a spa day", None).unwrap();
        assert_eq!(rule.name, "generic_add");
    }

    #[test]
    fn test_template_defaults() {
        let template =
            ResponseTemplate::new("{itinerary_name} in {destination}, travelers: {travelers}");
        assert_eq!(
            template.render(None, &[]),
            "your itinerary in your destination, travelers: to be confirmed"
        );
    }
}
