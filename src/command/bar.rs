use anyhow::Result;
use clap::ArgMatches;

use super::{chart_options_from_matches, output_from_matches, WIDE_FIGSIZE};
use crate::input::parse_bar_table;
use crate::render::{save, BarChart};

pub fn from_matches(matches: &ArgMatches) -> Result<()> {
    let data = matches.get_one::<String>("data").unwrap();

    let table = parse_bar_table(data)?;
    log::debug!(
        "{} groups, {} bars each",
        table.groups.len(),
        table.measurements.len()
    );

    let output = output_from_matches(matches, "bar", WIDE_FIGSIZE)?;
    let options = chart_options_from_matches(matches).build()?;

    save(&BarChart { table, options }, &output)
}
