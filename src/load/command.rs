//! One line of interactive input, read with the same grammar as society files

use pest::Parser;

use crate::lib::entry::Id;
use crate::load::parse::{Pair, Rule, UpkeepParser};

/// What a field is set to: the raw text typed, or nothing at all
pub type Raw<'i> = Option<&'i str>;

#[derive(Debug, Clone, PartialEq)]
pub enum Command<'i> {
    Show,
    Help,
    Quit,
    AddExpense(&'i str),
    SetExpense(Id, Raw<'i>),
    RemoveExpense(Id),
    AddFlat(&'i str, Raw<'i>),
    RenameFlat(Id, &'i str),
    SetCount(Id, Raw<'i>),
    SetArea(Id, Raw<'i>),
    RemoveFlat(Id),
    SocietyName(Raw<'i>),
    SocietyFlats(Raw<'i>),
    Bill(Option<Id>),
}

/// Parse a single command
///
/// Values are kept as typed, interpreting them is up to the caller.
pub fn parse(line: &str) -> Result<Command<'_>, pest::error::Error<Rule>> {
    let mut pairs = UpkeepParser::parse(Rule::command, line)?;
    // `command` is silent: the first pair is the command itself
    let cmd = match pairs.next() {
        Some(pair) => pair,
        None => return Ok(Command::Help),
    };
    let rule = cmd.as_rule();
    let mut args = cmd.into_inner();
    let mut next = || args.next();
    Ok(match rule {
        Rule::cmd_show => Command::Show,
        Rule::cmd_help => Command::Help,
        Rule::cmd_quit => Command::Quit,
        Rule::cmd_expense_add => Command::AddExpense(label(next())),
        Rule::cmd_expense_set => {
            let id = id(next());
            Command::SetExpense(id, next().map(|p| p.as_str()))
        }
        Rule::cmd_expense_rm => Command::RemoveExpense(id(next())),
        Rule::cmd_flat_add => {
            let name = label(next());
            Command::AddFlat(name, next().map(|p| p.as_str()))
        }
        Rule::cmd_flat_name => {
            let id = id(next());
            Command::RenameFlat(id, label(next()))
        }
        Rule::cmd_flat_count => {
            let id = id(next());
            Command::SetCount(id, next().map(|p| p.as_str()))
        }
        Rule::cmd_flat_area => {
            let id = id(next());
            Command::SetArea(id, next().map(|p| p.as_str()))
        }
        Rule::cmd_flat_rm => Command::RemoveFlat(id(next())),
        Rule::cmd_society_name => Command::SocietyName(next().map(label_of)),
        Rule::cmd_society_flats => Command::SocietyFlats(next().map(|p| p.as_str())),
        Rule::cmd_bill => match next() {
            Some(p) if p.as_rule() == Rule::id => Command::Bill(Some(id(Some(p)))),
            _ => Command::Bill(None),
        },
        _ => unreachable!(),
    })
}

fn label_of(pair: Pair) -> &str {
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::quoted => &text[1..text.len() - 1],
        _ => text,
    }
}

fn label(pair: Option<Pair>) -> &str {
    pair.map(label_of).unwrap_or_default()
}

// the grammar guarantees `#?digits`
fn id(pair: Option<Pair>) -> Id {
    let digits = pair.map(|p| p.as_str().trim_start_matches('#')).unwrap_or_default();
    Id(digits.parse().unwrap_or(0))
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! reads {
        ( $line:expr => $cmd:expr ) => {
            assert_eq!(parse($line).ok(), Some($cmd));
        };
    }

    macro_rules! rejects {
        ( $line:expr ) => {
            assert!(parse($line).is_err(), "{:?} should not parse", $line);
        };
    }

    #[test]
    fn simple() {
        reads!("show" => Command::Show);
        reads!("  help  " => Command::Help);
        reads!("quit" => Command::Quit);
        reads!("exit" => Command::Quit);
    }

    #[test]
    fn expenses() {
        reads!("expense add Parking" => Command::AddExpense("Parking"));
        reads!("expense add \"Club House\"" => Command::AddExpense("Club House"));
        reads!("expense set 3 1500.5" => Command::SetExpense(Id(3), Some("1500.5")));
        reads!("expense set #3 12abc" => Command::SetExpense(Id(3), Some("12abc")));
        reads!("expense set 3" => Command::SetExpense(Id(3), None));
        reads!("expense rm #11" => Command::RemoveExpense(Id(11)));
        reads!("expense remove 2" => Command::RemoveExpense(Id(2)));
    }

    #[test]
    fn flats() {
        reads!("flat add \"4 BHK\" 1500" => Command::AddFlat("4 BHK", Some("1500")));
        reads!("flat add Studio" => Command::AddFlat("Studio", None));
        reads!("flat name 2 \"2 BHK Large\"" => Command::RenameFlat(Id(2), "2 BHK Large"));
        reads!("flat count 1 12" => Command::SetCount(Id(1), Some("12")));
        reads!("flat count 1" => Command::SetCount(Id(1), None));
        reads!("flat area #2 950" => Command::SetArea(Id(2), Some("950")));
        reads!("flat rm 3" => Command::RemoveFlat(Id(3)));
    }

    #[test]
    fn society_and_bills() {
        reads!("society name \"Green Meadows\"" => Command::SocietyName(Some("Green Meadows")));
        reads!("society name" => Command::SocietyName(None));
        reads!("society flats 48" => Command::SocietyFlats(Some("48")));
        reads!("bill 2" => Command::Bill(Some(Id(2))));
        reads!("bill all" => Command::Bill(None));
    }

    #[test]
    fn malformed() {
        rejects!("");
        rejects!("dance");
        rejects!("expense set x 10");
        rejects!("expense set 3abc 10");
        rejects!("flat rm");
        rejects!("bill everything");
        rejects!("expense set 3 10 20");
    }

    #[test]
    fn keywords_need_blanks() {
        rejects!("expenseadd Parking");
        rejects!("expense addParking");
        rejects!("flatrm 2");
        rejects!("flat rm2");
        rejects!("showall");
        rejects!("billall");
        rejects!("bill allx");
        rejects!("societyname Lone");
        reads!("flat\trm \t 2" => Command::RemoveFlat(Id(2)));
        reads!("expense set 3 " => Command::SetExpense(Id(3), None));
    }
}
