//! Robots exclusion policy handling
//!
//! This module is the decision core of the gate: parsing robots.txt text
//! into a structured rule set, evaluating path-allow decisions and
//! crawl-delays against it, and caching one resolved policy per host.

mod cache;
mod parser;
mod policy;

pub use cache::PolicyCache;
pub use parser::parse_robots;
pub use policy::{RobotsPolicy, Rule, RuleGroup, RuleKind};
