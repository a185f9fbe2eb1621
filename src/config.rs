use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

pub(crate) const DEFAULT_PAGE_SIZE: usize = 10;

/// Settings resolved from global command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    /// Date the "current month" is taken from.
    pub(crate) as_of: NaiveDate,
    pub(crate) page_size: usize,
    pub(crate) verbose: bool,
}

impl Config {
    /// Pull `--db <path>`, `--as-of <YYYY-MM-DD>` and `-v` out of `args`,
    /// returning the config and whatever is left for the command.
    pub(crate) fn from_args(args: &[String]) -> Result<(Self, Vec<String>)> {
        let mut db_path = None;
        let mut as_of = None;
        let mut verbose = false;
        let mut rest = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--db needs a path"))?;
                    db_path = Some(PathBuf::from(crate::run::shellexpand(value)));
                }
                "--as-of" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--as-of needs a date (YYYY-MM-DD)"))?;
                    as_of = Some(parse_date(value)?);
                }
                "-v" | "--verbose" => verbose = true,
                _ => rest.push(arg.clone()),
            }
        }

        let db_path = match db_path {
            Some(path) => path,
            None => default_db_path()?,
        };

        Ok((
            Self {
                db_path,
                as_of: as_of.unwrap_or_else(|| chrono::Local::now().date_naive()),
                page_size: DEFAULT_PAGE_SIZE,
                verbose,
            },
            rest,
        ))
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expense-ledger", "ExpenseLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("ledger.db"))
}
