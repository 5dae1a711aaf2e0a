//! Robots.txt document parser
//!
//! Turns raw policy-document text into a [`RobotsPolicy`]. Parsing never
//! fails: lines that do not form a recognizable directive are skipped, and a
//! wholly unparseable document simply yields a policy with no rules.

use crate::robots::policy::{RobotsPolicy, Rule, RuleGroup, RuleKind};

/// Parses raw robots.txt text into a structured policy
///
/// Parsing rules:
///
/// - Lines are `directive: value` pairs; directive names are matched
///   case-insensitively. Blank lines are ignored, `#` starts a comment
///   (whole-line or trailing).
/// - `User-agent:` starts a rule group; consecutive `User-agent` lines with
///   no intervening rule directive accumulate into the same group (several
///   agents sharing one rule set).
/// - `Allow:` / `Disallow:` append a path pattern to the current group. An
///   empty `Disallow:` value records nothing, leaving the group permissive.
/// - `Crawl-delay:` sets the group's delay in seconds; non-numeric, negative
///   or non-finite values are ignored.
/// - `Sitemap:` URLs are collected for the whole document.
/// - Directives appearing before any `User-agent:` line are discarded.
///
/// # Arguments
///
/// * `raw` - The raw robots.txt file content
pub fn parse_robots(raw: &str) -> RobotsPolicy {
    let mut groups: Vec<RuleGroup> = Vec::new();
    let mut sitemaps: Vec<String> = Vec::new();

    // True while the latest lines were User-agent declarations, so further
    // User-agent lines extend the open group instead of starting a new one.
    let mut accumulating_agents = false;

    for line in raw.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let (directive, value) = match line.split_once(':') {
            Some((d, v)) => (d.trim().to_lowercase(), v.trim()),
            None => continue,
        };

        match directive.as_str() {
            "user-agent" => {
                if value.is_empty() {
                    continue;
                }
                let token = value.to_lowercase();
                if accumulating_agents {
                    if let Some(group) = groups.last_mut() {
                        group.agents.push(token);
                    }
                } else {
                    groups.push(RuleGroup {
                        agents: vec![token],
                        ..RuleGroup::default()
                    });
                    accumulating_agents = true;
                }
            }
            "allow" | "disallow" => {
                accumulating_agents = false;
                // No open group: the directive precedes any User-agent line
                let group = match groups.last_mut() {
                    Some(g) => g,
                    None => continue,
                };
                if value.is_empty() {
                    continue;
                }
                let kind = if directive == "allow" {
                    RuleKind::Allow
                } else {
                    RuleKind::Disallow
                };
                group.rules.push(Rule {
                    kind,
                    pattern: value.to_string(),
                });
            }
            "crawl-delay" => {
                accumulating_agents = false;
                let group = match groups.last_mut() {
                    Some(g) => g,
                    None => continue,
                };
                if let Ok(delay) = value.parse::<f64>() {
                    if delay.is_finite() && delay >= 0.0 {
                        group.crawl_delay = Some(delay);
                    }
                }
            }
            "sitemap" => {
                if !value.is_empty() {
                    sitemaps.push(value.to_string());
                }
            }
            _ => {
                // Unknown directive, skipped
            }
        }
    }

    RobotsPolicy::new(groups, sitemaps)
}
