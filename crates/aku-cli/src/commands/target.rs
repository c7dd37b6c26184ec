//! Target address and value mini-language.
//!
//! Values: `any` or `*`, a comparison (`>v`, `>=v`, `<v`, `<=v`), or a list
//! of numbers separated by spaces or commas.
//!
//! Targets: `<regions>:<address>[,<regions>:<address>...]=<values>`, where
//! regions are letters of `u` and `j`, e.g. `u:$32,j:$34=$0D,$0E` or
//! `uj:$18=$0C`.

use std::collections::BTreeMap;

use aku_core::{PredicateKind, Region, SearchParameters, ValuePredicate};
use anyhow::{Context, Result, anyhow, bail};

use super::hex_utils::{parse_address, parse_byte};

/// Parse the acceptable-values part of a search.
pub fn parse_predicate(s: &str) -> Result<ValuePredicate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("any") || s == "*" {
        return Ok(ValuePredicate::Any);
    }

    let comparison = [
        (">=", PredicateKind::GreaterOrEqual),
        ("<=", PredicateKind::LessOrEqual),
        (">", PredicateKind::GreaterThan),
        ("<", PredicateKind::LessThan),
    ]
    .into_iter()
    .find_map(|(op, kind)| s.strip_prefix(op).map(|rest| (kind, rest)));

    let predicate = match comparison {
        Some((kind, rest)) => ValuePredicate::new(kind, &[parse_byte(rest)?])?,
        None => {
            let values = s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|v| !v.is_empty())
                .map(parse_byte)
                .collect::<Result<Vec<u8>>>()?;
            ValuePredicate::new(PredicateKind::Equal, &values)
                .with_context(|| format!("No target values in '{}'", s))?
        }
    };
    Ok(predicate)
}

/// Parse a group of region letters such as `u`, `j` or `uj`.
pub fn parse_regions(key: &str) -> Result<Vec<Region>> {
    let mut regions = Vec::new();
    for c in key.trim().chars() {
        let region: Region = c
            .to_string()
            .parse()
            .map_err(|_| anyhow!("Unknown region '{}'", c))?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }
    if regions.is_empty() {
        bail!("Missing region before ':'");
    }
    Ok(regions)
}

/// Parse one `--target` argument into search parameters.
pub fn parse_target(s: &str) -> Result<SearchParameters> {
    let (addresses, values) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("Target '{}' is missing '=<values>'", s))?;

    let mut targets = BTreeMap::new();
    for part in addresses.split(',').filter(|p| !p.trim().is_empty()) {
        let (key, address) = part
            .split_once(':')
            .ok_or_else(|| anyhow!("Expected <region>:<address>, got '{}'", part))?;
        let address = parse_address(address)?;
        for region in parse_regions(key)? {
            if let Some(existing) = targets.insert(region, address) {
                bail!(
                    "Region {} already has target address ${:X} in '{}'",
                    region,
                    existing,
                    s
                );
            }
        }
    }

    let predicate = parse_predicate(values)?;
    SearchParameters::new(targets, predicate).with_context(|| format!("Invalid target '{}'", s))
}

/// Build search parameters from separate address and value arguments.
pub fn parameters_from_parts(
    us: Option<&str>,
    jp: Option<&str>,
    values: Option<&str>,
) -> Result<SearchParameters> {
    let us = us.map(parse_address).transpose()?;
    let jp = jp.map(parse_address).transpose()?;
    let values = values.ok_or_else(|| anyhow!("No target values given"))?;
    let predicate = parse_predicate(values)?;
    Ok(SearchParameters::from_addresses(us, jp, predicate)?)
}
