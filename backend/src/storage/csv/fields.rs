//! Enum field encoding for the CSV files. Matches the lowercase wire
//! encoding of the shared DTOs.

use anyhow::{bail, Result};
use shared::{Category, Direction, Rhythm};

pub fn format_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Incoming => "incoming",
        Direction::Outgoing => "outgoing",
    }
}

pub fn parse_direction(s: &str) -> Result<Direction> {
    match s {
        "incoming" => Ok(Direction::Incoming),
        "outgoing" => Ok(Direction::Outgoing),
        other => bail!("invalid direction '{}'", other),
    }
}

pub fn format_category(category: Category) -> &'static str {
    match category {
        Category::Standard => "standard",
        Category::Fixkosten => "fixkosten",
        Category::Lohn => "lohn",
        Category::Simulation => "simulation",
        Category::Manual => "manual",
    }
}

pub fn parse_category(s: &str) -> Result<Category> {
    match s {
        "standard" => Ok(Category::Standard),
        "fixkosten" => Ok(Category::Fixkosten),
        "lohn" => Ok(Category::Lohn),
        "simulation" => Ok(Category::Simulation),
        "manual" => Ok(Category::Manual),
        other => bail!("invalid category '{}'", other),
    }
}

/// The empty string encodes "no explicit category".
pub fn parse_category_opt(s: &str) -> Result<Option<Category>> {
    if s.is_empty() {
        Ok(None)
    } else {
        parse_category(s).map(Some)
    }
}

pub fn format_category_opt(category: Option<Category>) -> &'static str {
    category.map(format_category).unwrap_or("")
}

pub fn format_rhythm(rhythm: Rhythm) -> &'static str {
    match rhythm {
        Rhythm::Monthly => "monthly",
        Rhythm::Quarterly => "quarterly",
        Rhythm::Semiannual => "semiannual",
        Rhythm::Annual => "annual",
    }
}

pub fn parse_rhythm(s: &str) -> Result<Rhythm> {
    match s {
        "monthly" => Ok(Rhythm::Monthly),
        "quarterly" => Ok(Rhythm::Quarterly),
        "semiannual" => Ok(Rhythm::Semiannual),
        "annual" => Ok(Rhythm::Annual),
        other => bail!("invalid rhythm '{}'", other),
    }
}

pub fn parse_rhythm_opt(s: &str) -> Result<Option<Rhythm>> {
    if s.is_empty() {
        Ok(None)
    } else {
        parse_rhythm(s).map(Some)
    }
}

pub fn format_rhythm_opt(rhythm: Option<Rhythm>) -> &'static str {
    rhythm.map(format_rhythm).unwrap_or("")
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn parse_bool(s: &str) -> bool {
    s == "true"
}

pub fn parse_amount(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|e| anyhow::anyhow!("invalid amount '{}': {}", s, e))
}
