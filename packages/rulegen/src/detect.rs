//! Project technology detection and rule relevance ranking.
//!
//! Detection is keyword matching against the project's dependency manifest;
//! ranking scores each catalog rule by how much its text overlaps with the
//! detected technologies.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::catalog::{Catalog, Rule, RuleContent};

/// Keyword table mapping a technology to the dependency and content keywords
/// that indicate it.
pub const TECH_KEYWORDS: &[(&str, &[&str])] = &[
    // Core technologies
    ("javascript", &["javascript", "js", "node.js", "nodejs", "ecmascript"]),
    ("typescript", &["typescript", "ts", ".tsx", "type safety", "type checking"]),
    ("node", &["node.js", "nodejs", "express", "fastify", "npm", "package.json"]),
    // Frontend frameworks
    ("next.js", &["next.js", "nextjs", "next router", "next/router", "app router"]),
    ("react", &["react", "jsx", "react component", "usestate", "useeffect"]),
    ("vue", &["vue", "vue.js", "vuejs", "vue component", "composition api"]),
    ("angular", &["angular", "ng", "angular component", "novo elements"]),
    ("svelte", &["svelte", "sveltekit"]),
    ("astro", &["astro"]),
    ("qwik", &["qwik"]),
    ("solid", &["solid.js", "solidjs"]),
    // CSS & styling
    ("tailwind", &["tailwind", "tailwindcss", "tailwind css"]),
    ("css", &["css", "scss", "sass", "less", "postcss"]),
    // Testing & tools
    ("jest", &["jest", "testing library"]),
    ("mocha", &["mocha", "chai", "test suite"]),
    ("eslint", &["eslint", "linting", "code style"]),
    ("prettier", &["prettier", "code formatting"]),
    // Backend & other
    ("python", &["python", "django", "flask"]),
    ("java", &["java", "spring", "springboot"]),
    ("go", &["golang", "go lang", "go fiber", "servemux"]),
    ("elixir", &["elixir", "phoenix"]),
    ("deno", &["deno"]),
];

/// Detect the technologies a project uses from its `package.json`
/// dependencies and devDependencies.
#[tracing::instrument]
pub fn project_technologies(project_root: &Path) -> BTreeSet<String> {
    let mut techs = BTreeSet::new();

    let manifest = project_root.join("package.json");
    let content = match std::fs::read_to_string(&manifest) {
        Ok(content) => content,
        Err(_) => {
            tracing::debug!(?manifest, "no dependency manifest found");
            return techs;
        }
    };
    let parsed = match serde_json::from_str::<Value>(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(?manifest, error = %e, "malformed package.json, skipping detection");
            return techs;
        }
    };

    let mut deps = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(Value::Object(map)) = parsed.get(section) {
            deps.extend(map.keys().map(|k| k.to_lowercase()));
        }
    }

    for (tech, keywords) in TECH_KEYWORDS {
        let hit = keywords
            .iter()
            .any(|kw| deps.iter().any(|dep| dep.contains(&kw.to_lowercase())));
        if hit {
            techs.insert((*tech).to_string());
        }
    }

    tracing::debug!(?techs, "detected project technologies");
    techs
}

/// Technologies a rule mentions, plus its relevance score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleScore {
    pub technologies: BTreeSet<String>,
    pub score: u32,
}

/// Score a rule's relevance against a set of project technologies.
///
/// A keyword hit in the rule name weighs three times a content hit, and any
/// hit on a technology the project actually uses is doubled.
pub fn score_rule(rule: &Rule, project: &BTreeSet<String>) -> RuleScore {
    let mut analysis = RuleScore::default();
    let name = rule.name.to_lowercase();
    let content = rule
        .content
        .as_ref()
        .map(RuleContent::as_search_text)
        .unwrap_or_default()
        .to_lowercase();

    for (tech, keywords) in TECH_KEYWORDS {
        for (haystack, weight) in [(&name, 3u32), (&content, 1)] {
            let hits = keywords
                .iter()
                .filter(|kw| haystack.contains(&kw.to_lowercase()))
                .count() as u32;
            if hits == 0 {
                continue;
            }
            analysis.technologies.insert((*tech).to_string());
            let mut hit_score = hits * weight;
            if project.contains(*tech) {
                hit_score *= 2;
            }
            analysis.score += hit_score;
        }
    }

    analysis
}

/// A rule ranked against the current project.
#[derive(Debug, Clone)]
pub struct RankedRule {
    pub category: String,
    pub rule: Rule,
    /// All technologies the rule mentions.
    pub technologies: Vec<String>,
    /// Technologies shared between the rule and the project.
    pub project_match: Vec<String>,
    pub score: u32,
}

/// Detected project technologies plus ranked candidate rules.
#[derive(Debug, Clone, Default)]
pub struct ProjectMatches {
    pub technologies: BTreeSet<String>,
    pub rules: Vec<RankedRule>,
}

/// Rank every catalog rule by technology overlap with the project.
///
/// Only rules sharing at least one technology with the project are returned,
/// sorted by the number of shared technologies, then by score. The project
/// set always includes `javascript` and `node`: the manifests this tool
/// understands imply both.
#[tracing::instrument(skip(catalog))]
pub fn relevant_rules(catalog: &Catalog, project_root: &Path) -> ProjectMatches {
    let mut techs = project_technologies(project_root);
    techs.insert("javascript".to_string());
    techs.insert("node".to_string());

    let mut rules = Vec::new();
    for (category, data) in catalog.iter() {
        for rule in &data.rules {
            let scored = score_rule(rule, &techs);
            let project_match: Vec<String> = scored
                .technologies
                .iter()
                .filter(|tech| techs.contains(*tech))
                .cloned()
                .collect();
            if project_match.is_empty() {
                continue;
            }
            rules.push(RankedRule {
                category: category.to_string(),
                rule: rule.clone(),
                technologies: scored.technologies.into_iter().collect(),
                project_match,
                score: scored.score,
            });
        }
    }

    rules.sort_by(|a, b| {
        b.project_match
            .len()
            .cmp(&a.project_match.len())
            .then(b.score.cmp(&a.score))
    });

    ProjectMatches {
        technologies: techs,
        rules,
    }
}
