use anyhow::Result;
use clap::ArgMatches;

use super::{chart_options_from_matches, output_from_matches, WIDE_FIGSIZE};
use crate::extract::Unit;
use crate::input::parse_commit_groups;
use crate::render::{save, LineChart};

pub fn from_matches(matches: &ArgMatches) -> Result<()> {
    let data = matches.get_one::<String>("data").unwrap();
    let series = parse_commit_groups(data)?;

    let output = output_from_matches(matches, "commit", WIDE_FIGSIZE)?;
    let options = chart_options_from_matches(matches)
        .x_label("degree")
        .y_label(Unit::NanosToMillis.axis_label())
        .build()?;

    save(&LineChart::single(series, options), &output)
}
