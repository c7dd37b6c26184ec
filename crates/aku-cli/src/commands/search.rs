//! Corruption search command.

use std::path::PathBuf;

use aku_core::{CorruptionSearch, JsonReport, ReportFormat, SearchParameters, TextReport};
use anyhow::{Result, bail};
use tracing::info;

use super::target::{parameters_from_parts, parse_target};
use super::{load_image, write_output};
use crate::cli::{OutputFormat, SearchArgs};
use crate::config::Config;

/// Collect the searches from the config file and the command line.
///
/// Everything is parsed before any ROM is read so usage errors surface first.
pub fn collect_parameters(args: &SearchArgs, config: &Config) -> Result<Vec<SearchParameters>> {
    let mut searches = config.search_parameters()?;
    if args.us.is_some() || args.jp.is_some() || args.values.is_some() {
        searches.push(parameters_from_parts(
            args.us.as_deref(),
            args.jp.as_deref(),
            args.values.as_deref(),
        )?);
    }
    for target in &args.targets {
        searches.push(parse_target(target)?);
    }
    if searches.is_empty() {
        bail!("No target corruptions specified! Use --us/--jp with --values, or --target");
    }
    Ok(searches)
}

pub fn collect_roms(args: &SearchArgs, config: &Config) -> Result<Vec<PathBuf>> {
    let roms: Vec<PathBuf> = config.roms.iter().chain(&args.roms).cloned().collect();
    if roms.is_empty() {
        bail!("No ROMs specified! Use --rom or the roms key of the config file");
    }
    Ok(roms)
}

pub fn run(args: &SearchArgs, config: &Config) -> Result<()> {
    let searches = collect_parameters(args, config)?;
    let rom_paths = collect_roms(args, config)?;
    let format = args.format.or(config.format).unwrap_or_default();

    let images = rom_paths
        .iter()
        .map(|path| load_image(path))
        .collect::<Result<Vec<_>>>()?;
    let search = CorruptionSearch::new(&images);
    let regions: Vec<String> = search.regions().map(|r| r.to_string()).collect();

    info!(
        "Running {} corruption searches over {} ROMs",
        searches.len(),
        regions.join(", ")
    );
    let reports: Vec<_> = searches.iter().map(|params| search.run(params)).collect();

    let content = match format {
        OutputFormat::Text => {
            let mut content = String::from("ROMs:\n\n");
            for path in &rom_paths {
                content.push_str(&format!("{}\n", path.display()));
            }
            content.push('\n');
            content.push_str(&TextReport.render_all(&reports));
            content.push_str("Done.\n");
            content
        }
        OutputFormat::Json => {
            let mut content = JsonReport.render_all(&reports);
            content.push('\n');
            content
        }
    };
    write_output(&content, args.out.as_deref())
}
