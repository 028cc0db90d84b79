//! One handler per subcommand, turning parsed arguments into a saved figure

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::ArgMatches;

use crate::render::{ChartOptionsBuilder, Output, OutputBuilder, Scale};

pub mod bar;
pub mod bench;
pub mod commit;
pub mod heat_map;
pub mod image;
pub mod plot;

/// Figure size of the chart commands, in inches.
pub const WIDE_FIGSIZE: (f64, f64) = (16.0, 9.0);
/// Figure size of the heat map and image previews, in inches.
pub const SMALL_FIGSIZE: (f64, f64) = (6.4, 4.8);

/// Where the figure of subcommand `name` goes: `--save`, or `<name>.png`,
/// relative to `--save-dir` when given.
pub fn output_from_matches(
    matches: &ArgMatches,
    name: &str,
    default_figsize: (f64, f64),
) -> Result<Output> {
    let path = matches
        .get_one::<Utf8PathBuf>("save")
        .cloned()
        .unwrap_or_else(|| Utf8PathBuf::from(format!("{name}.png")));

    let path = match matches.get_one::<Utf8PathBuf>("save-dir") {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    };

    let figsize = match matches.get_many::<f64>("figsize") {
        Some(values) => match values.copied().collect::<Vec<_>>()[..] {
            [width, height] => (width, height),
            _ => bail!("--figsize expects a width and a height"),
        },
        None => default_figsize,
    };

    let mut output = OutputBuilder::default();
    output.path(path).figsize(figsize);
    if let Some(dpi) = matches.get_one::<u32>("dpi") {
        output.dpi(*dpi);
    }

    Ok(output.build()?)
}

/// Collects the shared chart flags (`--title`, axis labels and scales,
/// `--fullscreen`) of the line and bar commands.
pub fn chart_options_from_matches(matches: &ArgMatches) -> ChartOptionsBuilder {
    let mut options = ChartOptionsBuilder::default();

    if let Some(title) = matches.get_one::<String>("title") {
        options.title(title);
    }
    if let Some(label) = try_get::<String>(matches, "x-label") {
        options.x_label(label);
    }
    if let Some(label) = try_get::<String>(matches, "y-label") {
        options.y_label(label);
    }
    if let Some(scale) = try_get::<Scale>(matches, "x-scale") {
        options.x_scale(scale);
    }
    if let Some(scale) = try_get::<Scale>(matches, "y-scale") {
        options.y_scale(scale);
    }
    if let Some(true) = try_get::<bool>(matches, "fullscreen") {
        options.compact(true);
    }

    options
}

/// Like `ArgMatches::get_one`, for arguments only some subcommands define.
fn try_get<T>(matches: &ArgMatches, id: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}
