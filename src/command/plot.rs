use anyhow::Result;
use clap::ArgMatches;

use super::{chart_options_from_matches, output_from_matches, WIDE_FIGSIZE};
use crate::input::parse_series_groups;
use crate::render::{save, LineChart};

pub fn from_matches(matches: &ArgMatches) -> Result<()> {
    let data = matches.get_one::<String>("data").unwrap();

    let series = parse_series_groups(data)?;
    log::debug!("{} series", series.len());

    let output = output_from_matches(matches, "plot", WIDE_FIGSIZE)?;
    let options = chart_options_from_matches(matches).build()?;

    save(&LineChart::single(series, options), &output)
}
