//! Known benchmark suites and how their results are laid out as panels

use std::fmt;
use std::str::FromStr;

use crate::error::PlotError;
use crate::extract::{FieldPath, Unit};
use crate::group::{filter_prefix, split_by_curve};
use crate::record::Record;
use crate::series::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BenchKind {
    Linalg,
    Setup,
    Commit,
    Size,
}

const TIME_MEASURES: &[FieldPath<'static>] = &[
    FieldPath::new("mean", "estimate"),
    FieldPath::new("median", "estimate"),
];
const SIZE_MEASURES: &[FieldPath<'static>] = &[FieldPath::scalar("mean")];

impl BenchKind {
    pub const ALL: [BenchKind; 4] = [
        BenchKind::Linalg,
        BenchKind::Setup,
        BenchKind::Commit,
        BenchKind::Size,
    ];

    /// id prefixes, one panel each
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            BenchKind::Linalg => &["transpose", "mul", "inverse"],
            BenchKind::Setup => &[
                "setup/setup (komodo)",
                "setup (arkworks)",
                "setup/serializing with compression",
                "setup/serializing with no compression",
                "setup/deserializing with compression and validation",
                "setup/deserializing with compression and no validation",
                "setup/deserializing with no compression and validation",
                "setup/deserializing with no compression and no validation",
            ],
            BenchKind::Commit => &["commit (komodo)", "commit (arkworks)"],
            BenchKind::Size => &[
                "serialized size with compression and validation",
                "serialized size with compression and no validation",
                "serialized size with no compression and validation",
                "serialized size with no compression and no validation",
            ],
        }
    }

    pub fn measures(&self) -> &'static [FieldPath<'static>] {
        match self {
            BenchKind::Size => SIZE_MEASURES,
            _ => TIME_MEASURES,
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            BenchKind::Size => Unit::BytesToKilobytes,
            _ => Unit::NanosToMillis,
        }
    }
}

impl fmt::Display for BenchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            BenchKind::Linalg => "linalg",
            BenchKind::Setup => "setup",
            BenchKind::Commit => "commit",
            BenchKind::Size => "size",
        };
        f.write_str(name)
    }
}

impl FromStr for BenchKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BenchKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| {
                PlotError::argument("--bench", s, "expected one of linalg, setup, commit, size")
            })
    }
}

/// One sub-plot: every series of one id prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub unit: Unit,
    pub series: Vec<Series>,
}

impl Panel {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }
}

/// Builds one panel per label of every kind, in order. Inside a panel
/// there is one series per measure and curve; the curve is only named when
/// the group spans several.
pub fn build_panels(records: &[Record], kinds: &[BenchKind]) -> Result<Vec<Panel>, PlotError> {
    let mut panels = Vec::new();

    for kind in kinds {
        for label in kind.labels() {
            let group = filter_prefix(records, label);
            let curves = split_by_curve(&group);
            log::debug!("{kind}: `{label}`: {} records, {} curves", group.len(), curves.len());

            let mut series = Vec::new();
            for measure in kind.measures() {
                for (curve, curve_records) in &curves {
                    let name = match curves.len() {
                        1 => measure.outer.to_string(),
                        _ => format!("{} ({curve})", measure.outer),
                    };
                    series.push(Series::from_records(
                        name,
                        curve_records,
                        label,
                        *measure,
                        kind.unit(),
                    )?);
                }
            }

            if series.is_empty() {
                log::info!("no results for `{label}`");
            }

            panels.push(Panel {
                title: label.trim_start_matches("setup/").to_string(),
                unit: kind.unit(),
                series,
            });
        }
    }

    Ok(panels)
}
