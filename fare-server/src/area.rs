//! Area alias resolution.
//!
//! Each configured area contributes one rule: its aliases, normalized and
//! escaped, joined into a single whole-word alternation. Rules are tried in
//! configuration order and the first match wins.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::text::normalize;

/// Areas and their aliases as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreaAliases {
    /// Canonical name returned on a match
    pub name: String,
    /// Free-text spellings that refer to this area
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl AreaAliases {
    pub fn new(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Built-in areas around Patras.
pub fn default_areas() -> Vec<AreaAliases> {
    vec![
        AreaAliases::new(
            "Πάτρα",
            &["πατρα", "πάτρα", "patra", "patras", "κεντρο πατρας", "πλατεια γεωργιου"],
        ),
        AreaAliases::new(
            "Ρίο",
            &[
                "ριο",
                "ριον",
                "αντιριο",
                "γεφυρα ριου",
                "γεφυρα αντιρριου",
                "πανεπιστημιο πατρων",
                "νοσοκομειο ριου",
                "πανεπιστημιακο νοσοκομειο",
                "uprio",
                "university hospital rio",
            ],
        ),
        AreaAliases::new(
            "Βραχνέικα",
            &[
                "βραχναιικα",
                "βραχνεϊκα",
                "βραχνεϊκων",
                "βραχνεικα",
                "βραχναϊκα",
                "vraxnaika",
                "braxnaika",
                "vrahneika",
                "brahneika",
                "τζουκαλαιικα",
                "τσουκαλαιικα",
                "tsouka",
                "tsoukal",
            ],
        ),
        AreaAliases::new(
            "Παραλία Πατρών",
            &["παραλια", "παραλια πατρας", "παραλια πατρων", "paralia patras", "paralia patron"],
        ),
        AreaAliases::new(
            "Μεσσάτιδα",
            &["μεσατιδα", "μεσσατιδα", "οβρυα", "οβρια", "ovria", "δεμενικα", "demenika"],
        ),
        AreaAliases::new(
            "Κέντρο Πάτρας",
            &["κεντρο", "πλατεια γεωργιου", "αγυια", "αγια σοφια"],
        ),
    ]
}

/// Error building alias rules.
#[derive(Debug, thiserror::Error)]
#[error("aliases of area {area:?} do not form a valid pattern: {source}")]
pub struct AliasPatternError {
    area: String,
    #[source]
    source: regex::Error,
}

/// One canonical area and the pattern matching any of its aliases.
#[derive(Debug, Clone)]
pub struct AreaAliasRule {
    canonical_name: String,
    alias_pattern: Regex,
}

impl AreaAliasRule {
    /// Build a rule. Returns `Ok(None)` if the area has no usable aliases.
    fn build(area: &AreaAliases) -> Result<Option<Self>, AliasPatternError> {
        let mut aliases: Vec<String> = area
            .aliases
            .iter()
            .map(|a| normalize(a).into_string())
            .filter(|a| !a.is_empty())
            .collect();
        if aliases.is_empty() {
            return Ok(None);
        }
        // Longest first
        aliases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
        aliases.dedup();

        let alternation = aliases
            .iter()
            .map(|a| regex::escape(a))
            .collect::<Vec<_>>()
            .join("|");
        let alias_pattern =
            Regex::new(&format!(r"\b(?:{alternation})\b")).map_err(|source| {
                AliasPatternError {
                    area: area.name.clone(),
                    source,
                }
            })?;

        Ok(Some(Self {
            canonical_name: area.name.clone(),
            alias_pattern,
        }))
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Whether any alias occurs as whole words in already-normalized text.
    pub fn matches(&self, normalized: &str) -> bool {
        self.alias_pattern.is_match(normalized)
    }
}

/// "στο/στη/στην/στον/στα <chunk>"
static LOCATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bστ(?:ον|ην|ο|η|α)\s+(.+)$").expect("locative pattern is valid")
});

/// Resolves free-text area mentions to canonical area names.
///
/// # Examples
///
/// ```
/// use fare_server::area::{AreaResolver, default_areas};
///
/// let resolver = AreaResolver::new(&default_areas()).unwrap();
/// assert_eq!(resolver.resolve_area("πάω στο Ρίο"), Some("Ρίο"));
/// assert_eq!(resolver.resolve_area("Θεσσαλονίκη"), None);
/// ```
#[derive(Debug, Clone)]
pub struct AreaResolver {
    rules: Vec<AreaAliasRule>,
}

impl AreaResolver {
    /// Build the rule set, keeping the given order.
    ///
    /// Aliases shared by more than one area are logged: the earlier area
    /// always wins for them.
    pub fn new(areas: &[AreaAliases]) -> Result<Self, AliasPatternError> {
        warn_on_shared_aliases(areas);

        let mut rules = Vec::with_capacity(areas.len());
        for area in areas {
            if let Some(rule) = AreaAliasRule::build(area)? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[AreaAliasRule] {
        &self.rules
    }

    /// Resolve an area mention.
    ///
    /// `None` means the caller should ask which area was meant; there is no
    /// silent default.
    pub fn resolve_area(&self, text: &str) -> Option<&str> {
        let text = normalize(text);
        if text.is_empty() {
            return None;
        }

        if let Some(name) = self.first_match(&text) {
            return Some(name);
        }

        let chunk = LOCATIVE_RE.captures(&text)?.get(1)?.as_str().trim();
        self.first_match(chunk)
    }

    fn first_match(&self, normalized: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(normalized))
            .map(AreaAliasRule::canonical_name)
    }
}

fn warn_on_shared_aliases(areas: &[AreaAliases]) {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for area in areas {
        for alias in &area.aliases {
            let key = normalize(alias).into_string();
            match owners.get(&key) {
                Some(owner) if *owner != area.name => {
                    tracing::warn!(
                        alias = %key,
                        first = %owner,
                        shadowed = %area.name,
                        "alias shared by two areas; the first one wins"
                    );
                }
                Some(_) => {}
                None => {
                    owners.insert(key, &area.name);
                }
            }
        }
    }
}
