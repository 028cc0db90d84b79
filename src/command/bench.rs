use anyhow::Result;
use camino::Utf8PathBuf;
use clap::ArgMatches;
use itertools::Itertools;

use super::{chart_options_from_matches, output_from_matches, WIDE_FIGSIZE};
use crate::bench::{build_panels, BenchKind};
use crate::record::read_records;
use crate::render::{save, LineChart};

pub fn from_matches(matches: &ArgMatches) -> Result<()> {
    let filename = matches.get_one::<Utf8PathBuf>("filename").unwrap();

    let kinds: Vec<BenchKind> = match matches.get_flag("all") {
        true => BenchKind::ALL.to_vec(),
        false => matches
            .get_many::<BenchKind>("bench")
            .unwrap()
            .copied()
            .unique()
            .collect(),
    };

    let output = output_from_matches(matches, "bench", WIDE_FIGSIZE)?;
    let options = chart_options_from_matches(matches).build()?;

    let records = read_records(filename)?;
    let panels = build_panels(&records, &kinds)?;

    println!(
        "benchplot: plotting {} ({} results, {} panels)",
        kinds.iter().join(", "),
        records.len(),
        panels.len()
    );

    save(&LineChart { panels, options }, &output)
}
