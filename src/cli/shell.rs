//! Line-oriented editing of a session
//!
//! Each line is one command (see `HELP`). Values are coerced leniently,
//! refused edits only print a notice.

use chrono::NaiveDate;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use crate::cli::{
    table::{Overview, Table},
    write_bill,
};
use crate::lib::{
    entry::{coerce_amount, coerce_count, Id},
    ledger::Ledger,
    money::Rupees,
    registry::Registry,
    session::Session,
};
use crate::load::{command::Command, error};

pub const HELP: &str = "\
Commands:
  show                          print expenses, flat types and charges
  expense add <name>            append an expense with a blank amount
  expense set <id> [amount]     change an amount, omit it to blank it
  expense rm <id>               delete an expense
  flat add <name> <area>        append a flat type
  flat name <id> <name>         rename a flat type
  flat count <id> [units]       change the number of units
  flat area <id> [sq.ft]        change the carpet area
  flat rm <id>                  delete a flat type
  society name [name]           name printed on bills
  society flats [count]         informative flat count
  bill <id> | bill all          write bills
  help                          this message
  quit                          leave
Names with spaces go between double quotes, ids may be written 3 or #3.";

pub struct Shell {
    session: Session,
    out_dir: PathBuf,
    date: NaiveDate,
}

impl Shell {
    pub fn new(session: Session, out_dir: PathBuf, date: NaiveDate) -> Self {
        Self {
            session,
            out_dir,
            date,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Process commands until `quit` or the end of `input`
    pub fn run<R, W>(&mut self, input: R, mut out: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        write!(out, "> ")?;
        out.flush()?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
            match crate::load::command::parse(&line) {
                Ok(Command::Quit) => return Ok(()),
                Ok(cmd) => self.apply(cmd, &mut out)?,
                Err(e) => {
                    let mut errs = error::Record::new();
                    errs.make("Invalid command")
                        .nonfatal()
                        .from(e.with_path("<stdin>"))
                        .hint("type 'help' for the list of commands");
                    write!(out, "{}", errs)?;
                }
            }
            write!(out, "> ")?;
            out.flush()?;
        }
        writeln!(out)
    }

    fn apply<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Quit => Ok(()),
            Command::Help => writeln!(out, "{}", HELP),
            Command::Show => self.show(out),
            Command::AddExpense(name) => match self.session.ledger.add(name) {
                Some(id) => writeln!(out, "added expense {}", id),
                None => writeln!(out, "an expense needs a name"),
            },
            Command::SetExpense(id, raw) => {
                if self.session.ledger.set_amount(id, coerce_amount(raw.unwrap_or_default())) {
                    self.totals(out)
                } else {
                    writeln!(out, "no expense {}", id)
                }
            }
            Command::RemoveExpense(id) => {
                if self.session.ledger.get(id).is_none() {
                    writeln!(out, "no expense {}", id)
                } else if self.session.ledger.remove(id) {
                    self.totals(out)
                } else {
                    writeln!(out, "at least {} expenses must remain", Ledger::FLOOR)
                }
            }
            Command::AddFlat(name, raw) => {
                match self.session.registry.add(name, raw.and_then(coerce_count)) {
                    Some(id) => writeln!(out, "added flat type {}", id),
                    None => writeln!(out, "a flat type needs a name and an area"),
                }
            }
            Command::RenameFlat(id, name) => {
                if self.session.registry.set_name(id, name) {
                    Ok(())
                } else {
                    self.flat_refused(id, out)
                }
            }
            Command::SetCount(id, raw) => {
                if self.session.registry.set_count(id, raw.and_then(coerce_count)) {
                    self.totals(out)
                } else {
                    self.flat_refused(id, out)
                }
            }
            Command::SetArea(id, raw) => {
                if self.session.registry.set_area(id, raw.and_then(coerce_count)) {
                    self.totals(out)
                } else {
                    self.flat_refused(id, out)
                }
            }
            Command::RemoveFlat(id) => {
                if self.session.registry.get(id).is_none() {
                    self.flat_refused(id, out)
                } else if self.session.registry.remove(id) {
                    self.totals(out)
                } else {
                    writeln!(out, "at least {} flat type must remain", Registry::FLOOR)
                }
            }
            Command::SocietyName(raw) => {
                self.session.society.name = raw.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
                Ok(())
            }
            Command::SocietyFlats(raw) => {
                self.session.society.flats = raw.and_then(coerce_count);
                Ok(())
            }
            Command::Bill(Some(id)) => self.bill(id, out),
            Command::Bill(None) => {
                let ids = self.session.registry.iter().map(|f| f.id).collect::<Vec<_>>();
                for id in ids {
                    self.bill(id, out)?;
                }
                Ok(())
            }
        }
    }

    fn show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Expenses")?;
        for e in self.session.ledger.iter() {
            match e.amount {
                Some(a) => writeln!(out, "  {:>4} {:<30} {}", e.id, e.name, Rupees(a))?,
                None => writeln!(out, "  {:>4} {:<30} -", e.id, e.name)?,
            }
        }
        writeln!(out, "Flat types")?;
        for f in self.session.registry.iter() {
            let count = f.count.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
            writeln!(out, "  {:>4} {:<30} {} x {} sq.ft", f.id, f.name, count, f.area)?;
        }
        let alloc = self.session.allocate();
        write!(out, "{}", Overview::new(&self.session.society, &alloc))?;
        write!(out, "{}", Table::from(&alloc))
    }

    /// One-line recap after an edit that changes the charges
    fn totals<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let alloc = self.session.allocate();
        writeln!(
            out,
            "expense {}, rate {}/sq.ft, collection {}",
            Rupees(alloc.total()),
            Rupees(alloc.rate_display()),
            Rupees(alloc.collection()),
        )
    }

    fn flat_refused<W: Write>(&self, id: Id, out: &mut W) -> io::Result<()> {
        writeln!(out, "no flat type {}", id)
    }

    fn bill<W: Write>(&self, id: Id, out: &mut W) -> io::Result<()> {
        if self.session.registry.get(id).is_none() {
            return self.flat_refused(id, out);
        }
        match write_bill(&self.session, id, &self.out_dir, self.date) {
            Ok(Some(path)) => writeln!(out, "wrote {}", path.display()),
            Ok(None) => writeln!(out, "no bill for {}: no flat has any area", id),
            Err(e) => writeln!(out, "{}", e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::entry::{Amount, MAX_QUANTITY};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 7).unwrap()
    }

    fn run(shell: &mut Shell, script: &str) -> String {
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn shell() -> Shell {
        Shell::new(Session::default(), PathBuf::from("."), date())
    }

    #[test]
    fn edit_and_allocate() {
        let mut sh = shell();
        let out = run(
            &mut sh,
            "expense set 1 10000\nexpense set 2 2000\nflat count 1 2\nflat count 2 1\n",
        );
        assert!(out.contains("collection ₹ 12,001"), "{}", out);
        let alloc = sh.session().allocate();
        assert_eq!(alloc.get(Id(1)).map(|s| s.charge.0), Some(342_900));
    }

    #[test]
    fn lenient_values() {
        let mut sh = shell();
        run(&mut sh, "expense set 1 12.5kg\nexpense set 2 lots\nflat count 3 4 flats\n");
        let ledger = &sh.session().ledger;
        assert_eq!(ledger.get(Id(1)).and_then(|e| e.amount).map(|a| a.0), Some(1250));
        assert_eq!(ledger.get(Id(2)).and_then(|e| e.amount).map(|a| a.0), Some(0));
        // "4 flats" is two words: rejected, count stays blank
        assert_eq!(sh.session().registry.get(Id(3)).unwrap().count, None);
        run(&mut sh, "flat count 3 4flats\nexpense set 1\n");
        assert_eq!(sh.session().registry.get(Id(3)).unwrap().count, Some(4));
        assert_eq!(sh.session().ledger.get(Id(1)).unwrap().amount, None);
    }

    #[test]
    fn huge_values_are_capped() {
        let mut sh = shell();
        let out = run(
            &mut sh,
            "flat count 1 9223372036854775807\nexpense set 1 99999999999999999999\nexpense set 2 99999999999999999999\nshow\n",
        );
        assert!(out.contains("Staff Salaries"));
        let session = sh.session();
        assert_eq!(session.registry.get(Id(1)).unwrap().count, Some(MAX_QUANTITY));
        assert_eq!(session.ledger.get(Id(2)).unwrap().amount, Some(Amount::MAX));
        let alloc = session.allocate();
        assert_eq!(alloc.total(), Amount::MAX + Amount::MAX);
        assert_eq!(alloc.total_units(), MAX_QUANTITY);
    }

    #[test]
    fn floors_hold() {
        let mut sh = shell();
        let script = (1..=10).map(|i| format!("expense rm {}\n", i)).collect::<String>();
        let out = run(&mut sh, &script);
        assert_eq!(sh.session().ledger.len(), Ledger::FLOOR);
        assert_eq!(out.matches("at least 5 expenses must remain").count(), 5);

        let out = run(&mut sh, "flat rm 1\nflat rm 2\nflat rm 3\nflat rm 9\n");
        assert_eq!(sh.session().registry.len(), 1);
        assert!(out.contains("at least 1 flat type must remain"));
        assert!(out.contains("no flat type #9"));
    }

    #[test]
    fn add_and_rename() {
        let mut sh = shell();
        let out = run(
            &mut sh,
            "expense add \"Club House\"\nflat add \"4 BHK\" 1500\nflat add Studio\nflat name 4 Villa\nsociety name \"Green Meadows\"\nsociety flats 40\n",
        );
        assert!(out.contains("added expense #11"));
        assert!(out.contains("added flat type #4"));
        assert!(out.contains("a flat type needs a name and an area"));
        let session = sh.session();
        assert_eq!(session.registry.get(Id(4)).map(|f| f.name.as_str()), Some("Villa"));
        assert_eq!(session.society.name.as_deref(), Some("Green Meadows"));
        assert_eq!(session.society.flats, Some(40));
    }

    #[test]
    fn stops_at_quit() {
        let mut sh = shell();
        run(&mut sh, "society name Before\nquit\nsociety name After\n");
        assert_eq!(sh.session().society.name.as_deref(), Some("Before"));
    }

    #[test]
    fn invalid_command() {
        let mut sh = shell();
        let out = run(&mut sh, "dance\n");
        assert!(out.contains("Invalid command"));
        assert!(out.contains("1 warning emitted"));
    }

    #[test]
    fn show_lists_everything() {
        let mut sh = shell();
        let out = run(&mut sh, "show\n");
        assert!(out.contains("Staff Salaries"));
        assert!(out.contains("3 BHK"));
        assert!(out.contains("nothing to allocate"));
    }

    #[test]
    fn bills() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = Shell::new(Session::default(), dir.path().to_path_buf(), date());
        let out = run(&mut sh, "bill 1\n");
        assert!(out.contains("no flat has any area"));
        let out = run(&mut sh, "expense set 1 5000\nflat count 2 3\nbill all\nbill 8\n");
        assert_eq!(out.matches("wrote ").count(), 3);
        assert!(out.contains("no flat type #8"));
        assert!(dir.path().join("Society_2 BHK_Bill_07-10-2026.html").exists());
    }
}
