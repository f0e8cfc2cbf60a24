//! Terminal side of the tool: tables, charts, the interactive shell
//! and the errors that abort a run.

pub mod plot;
pub mod shell;
pub mod table;

use chrono::NaiveDate;
use clap::{App, Arg, ArgMatches};
use std::{
    io,
    path::{Path, PathBuf},
};

use crate::lib::{entry::Id, session::Session};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not load '{0}'")]
    Load(String),
    #[error("could not write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no flat type named '{0}'")]
    UnknownFlat(String),
    #[error("invalid date '{0}', expected DD-MM-YYYY")]
    Date(String),
    #[error("could not render bill")]
    Render(#[from] askama::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Command-line interface
pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("upkeep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Splits a society's monthly expenses by carpet area and writes maintenance bills")
        .arg(
            Arg::with_name("FILE")
                .help("Society description file, defaults are used when omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("bill")
                .short("b")
                .long("bill")
                .value_name("FLAT")
                .help("Write the bill of a flat type, by id or name")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("all-bills")
                .short("a")
                .long("all-bills")
                .conflicts_with("bill")
                .help("Write the bill of every flat type"),
        )
        .arg(
            Arg::with_name("out-dir")
                .short("o")
                .long("out-dir")
                .value_name("DIR")
                .env("UPKEEP_OUT_DIR")
                .default_value(".")
                .help("Where bills are written"),
        )
        .arg(
            Arg::with_name("plot")
                .short("p")
                .long("plot")
                .value_name("FILE.svg")
                .takes_value(true)
                .help("Draw the per-unit charges as an SVG bar chart"),
        )
        .arg(
            Arg::with_name("date")
                .short("d")
                .long("date")
                .value_name("DD-MM-YYYY")
                .takes_value(true)
                .help("Date printed on bills, today by default"),
        )
        .arg(
            Arg::with_name("interactive")
                .short("i")
                .long("interactive")
                .help("Edit the society from the command line before leaving"),
        )
}

/// `--out-dir`, then `UPKEEP_OUT_DIR`, then the current directory
pub fn out_dir(matches: &ArgMatches<'_>) -> PathBuf {
    PathBuf::from(matches.value_of("out-dir").unwrap_or("."))
}

/// Flat types whose bills were asked for, in the order given
pub fn wanted(session: &Session, matches: &ArgMatches<'_>) -> Result<Vec<Id>, Error> {
    if matches.is_present("all-bills") {
        return Ok(session.registry.iter().map(|f| f.id).collect());
    }
    matches
        .values_of("bill")
        .into_iter()
        .flatten()
        .map(|key| {
            session
                .lookup(key)
                .ok_or_else(|| Error::UnknownFlat(key.to_string()))
        })
        .collect()
}

/// Render and save the bill of one flat type
///
/// `Ok(None)` when the flat type has no share, nothing is written then.
pub fn write_bill(session: &Session, id: Id, dir: &Path, date: NaiveDate) -> Result<Option<PathBuf>, Error> {
    let bill = match session.bill(id, date)? {
        Some(bill) => bill,
        None => {
            tracing::warn!(flat = %id, "no share allocated, bill skipped");
            return Ok(None);
        }
    };
    bill.save(dir).map(Some).map_err(|source| Error::Write {
        path: dir.join(bill.filename()),
        source,
    })
}

/// `DD-MM-YYYY`, the same format as in bill file names
pub fn parse_date(text: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(text.trim(), "%d-%m-%Y").map_err(|_| Error::Date(text.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::entry::Amount;

    #[test]
    fn dates() {
        assert_eq!(parse_date("07-10-2026").ok(), NaiveDate::from_ymd_opt(2026, 10, 7));
        assert!(matches!(parse_date("2026-10-07"), Err(Error::Date(_))));
        assert!(matches!(parse_date("31-02-2026"), Err(Error::Date(_))));
    }

    fn matches(args: &[&str]) -> ArgMatches<'static> {
        app().get_matches_from(std::iter::once("upkeep").chain(args.iter().copied()))
    }

    #[test]
    fn bill_selection() {
        let session = Session::default();
        macro_rules! selects {
            ( $args:expr => $ids:expr ) => {
                assert_eq!(wanted(&session, &matches($args)).ok(), Some($ids.iter().map(|i| Id(*i)).collect()));
            };
        }
        selects!(&[] => [0u64; 0]);
        selects!(&["-b", "2"] => [2]);
        selects!(&["-b", "3 bhk", "--bill", "#1", "-b", "1 BHK"] => [3, 1, 1]);
        selects!(&["--all-bills"] => [1, 2, 3]);
        selects!(&["society.upk", "-a"] => [1, 2, 3]);
        assert!(matches!(
            wanted(&session, &matches(&["-b", "2", "-b", "Villa"])),
            Err(Error::UnknownFlat(key)) if key == "Villa"
        ));
        assert!(matches!(
            wanted(&session, &matches(&["-b", "#9"])),
            Err(Error::UnknownFlat(_))
        ));
    }

    #[test]
    fn all_bills_excludes_bill() {
        let res = app().get_matches_from_safe(vec!["upkeep", "-a", "-b", "1"]);
        assert!(res.is_err());
    }

    #[test]
    fn output_directory() {
        std::env::remove_var("UPKEEP_OUT_DIR");
        assert_eq!(out_dir(&matches(&[])), PathBuf::from("."));
        std::env::set_var("UPKEEP_OUT_DIR", "/tmp/bills");
        assert_eq!(out_dir(&matches(&[])), PathBuf::from("/tmp/bills"));
        assert_eq!(out_dir(&matches(&["-o", "out"])), PathBuf::from("out"));
        std::env::remove_var("UPKEEP_OUT_DIR");
        assert_eq!(out_dir(&matches(&["--out-dir", "elsewhere"])), PathBuf::from("elsewhere"));
    }

    #[test]
    fn bills_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 7).unwrap();
        let mut session = Session::default();
        assert!(write_bill(&session, Id(1), dir.path(), date).unwrap().is_none());

        let first = session.ledger.iter().next().map(|e| e.id).unwrap();
        session.ledger.set_amount(first, Some(Amount::from_rupees(9000)));
        session.registry.set_count(Id(3), Some(5));
        let path = write_bill(&session, Id(3), dir.path(), date).unwrap().unwrap();
        assert_eq!(path, dir.path().join("Society_3 BHK_Bill_07-10-2026.html"));
        assert!(path.exists());

        let missing = dir.path().join("missing");
        assert!(matches!(
            write_bill(&session, Id(3), &missing, date),
            Err(Error::Write { .. })
        ));
    }
}
