//! Pretty-printing facility for diagnostics on society files and shell input
//!
//! Mostly a wrapper around `pest::error::Error::new_from_span`, which does
//! the hard part of pointing into the source. `Error` adds aggregation of
//! messages and colored output, `Record` collects several of them.
//!
//! # Example
//!
//! ```rust
//! errs.make("Duplicate flat type")
//!     .nonfatal()
//!     .span(&loc, format!("'{}' is already defined", name))
//!     .span(&first, "first defined here")
//!     .hint("rename one of the flat types")
//! ```
//!
//! ```txt
//! --> Warning: Duplicate flat type
//!  |     --> society.upk:12:5
//!  |      |
//!  |   12 |     "2 BHK" count 4 area 900;
//!  |      |     ^----------------------^
//!  |      |
//!  |      = '2 BHK' is already defined
//!  |     --> society.upk:10:5
//!  |      |
//!  |   10 |     "2 BHK" count 12 area 910;
//!  |      |     ^-----------------------^
//!  |      |
//!  |      = first defined here
//!  |      ? hint: rename one of the flat types
//! ```

use std::fmt;

use crate::load::parse::Rule;

/// Location of an error
///
/// Name of the input (a path, or `<stdin>`) and the exact span within it
pub type Loc<'i> = (&'i str, pest::Span<'i>);

/// Report for a single error
///
/// All messages should fit in a single line; use several `text`
/// and `hint` calls rather than embedded newlines.
#[must_use]
#[derive(Debug)]
pub struct Error {
    /// determines the error label (warning/error) and the color (yellow/red)
    fatal: bool,
    /// name of the error
    label: String,
    items: Vec<Item>,
}

/// Kinds of items that can be added to an error report
#[derive(Debug)]
enum Item {
    /// code block
    Block(Box<pest::error::Error<Rule>>),
    /// important message
    Text(String),
    /// recommendations for fixes
    Hint(String),
}

/// A collection of errors
///
/// Typically all diagnostics of one file, but no assumption is made
/// on how they relate to each other.
#[must_use]
#[derive(Debug, Default)]
pub struct Record {
    contents: Vec<Error>,
}

impl Error {
    pub fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: true,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Mark as a warning rather that a fatal error
    pub fn nonfatal(&mut self) -> &mut Self {
        self.fatal = false;
        self
    }

    /// Add a pre-existing error (e.g. to build from a parsing error)
    pub fn from(&mut self, err: pest::error::Error<Rule>) -> &mut Self {
        self.items
            .push(Item::Block(Box::new(err.renamed_rules(rule_rename))));
        self
    }

    /// Add a code block and its associated message
    pub fn span<S>(&mut self, loc: &Loc, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Block(Box::new(
            pest::error::Error::new_from_span(
                pest::error::ErrorVariant::CustomError {
                    message: msg.to_string(),
                },
                loc.1.clone(),
            )
            .with_path(loc.0),
        )));
        self
    }

    /// Add an important note
    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any of the recorded errors are fatal
    pub fn is_fatal(&self) -> bool {
        self.contents.iter().any(|e| e.fatal)
    }

    /// Number of fatal errors
    pub fn count_errors(&self) -> usize {
        self.contents.iter().filter(|e| e.fatal).count()
    }

    /// Number of nonfatal errors
    pub fn count_warnings(&self) -> usize {
        self.contents.len() - self.count_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Labels of every recorded error, in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().map(Error::label)
    }

    /// Add a new error to the pool
    pub fn make<S>(&mut self, msg: S) -> &mut Error
    where
        S: ToString,
    {
        let idx = self.contents.len();
        self.contents.push(Error::new(msg));
        &mut self.contents[idx]
    }
}

const RED: &str = "\x1b[0;91;1m";
const YELLOW: &str = "\x1b[0;93;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, header) = if self.fatal {
            (RED, "--> Error")
        } else {
            (YELLOW, "--> Warning")
        };
        writeln!(f, "{}{}:{} {}{}", color, header, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Block(err) => {
                    let mut align = "   ".to_string();
                    let mut align_found = false;
                    for line in format!("{}", err).split('\n') {
                        write!(
                            f,
                            " {}|{}  {}",
                            color,
                            if align_found { &align } else { "" },
                            BLUE
                        )?;
                        for c in line.chars() {
                            match c {
                                '-' if !align_found => {
                                    align_found = true;
                                    write!(f, "{}-", align)?;
                                }
                                ' ' if !align_found => {
                                    align.pop();
                                    write!(f, " ")?;
                                }
                                '|' => write!(f, "|{}", NONE)?,
                                '=' => write!(f, "={}", NONE)?,
                                '^' => write!(f, "{}^", color)?,
                                // pest displays line endings as a visible symbol
                                '␊' => (),
                                _ => write!(f, "{}", c)?,
                            }
                        }
                        writeln!(f)?;
                    }
                }
                Item::Text(txt) => {
                    writeln!(f, " {}|  {}{}{}", color, WHITE, txt, NONE)?;
                }
                Item::Hint(txt) => {
                    writeln!(f, " {}|      {}? hint: {}{}", color, BLUE, NONE, txt)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contents.is_empty() {
            return Ok(());
        }
        let fatal = self.is_fatal();
        let count = if fatal {
            self.count_errors()
        } else {
            self.count_warnings()
        };
        let color = if fatal { RED } else { YELLOW };
        let trunc = 10;
        // only print errors with the maximum fatality
        for err in self
            .contents
            .iter()
            .filter(|err| err.fatal == fatal)
            .take(trunc)
        {
            writeln!(f, "{}", err)?;
        }
        if count > trunc {
            writeln!(f, "{} And {} more.", color, count - trunc)?;
        }
        let plural = if count > 1 { "s" } else { "" };
        if fatal {
            writeln!(
                f,
                "{}Fatal: {}{} error{} emitted{}",
                color, WHITE, count, plural, NONE
            )
        } else {
            writeln!(
                f,
                "{}Nonfatal: {}{} warning{} emitted{}",
                color, WHITE, count, plural, NONE
            )
        }
    }
}

fn rule_rename(r: &Rule) -> String {
    match r {
        Rule::EOI => "end of input",
        Rule::integer => "a whole number",
        Rule::money_amount => "an amount ('XXX' or 'XXX.XX')",
        Rule::string => "a string of non-'\"' characters",
        Rule::quoted => "a quoted name ('\"foo\"')",
        Rule::society_name => "a 'name' field",
        Rule::society_flats => "a 'flats' field",
        Rule::society => "a 'society' block",
        Rule::expense => "an expense ('\"name\" amount?')",
        Rule::expenses => "an 'expenses' block",
        Rule::flat_count => "a 'count' field",
        Rule::flat_area => "an 'area' field",
        Rule::flat => "a flat type ('\"name\" count? area')",
        Rule::flats => "a 'flats' block",
        Rule::token => "a word",
        Rule::id => "an identifier ('3' or '#3')",
        Rule::bill_all => "'all'",
        Rule::cmd_show
        | Rule::cmd_help
        | Rule::cmd_quit
        | Rule::cmd_expense_add
        | Rule::cmd_expense_set
        | Rule::cmd_expense_rm
        | Rule::cmd_flat_add
        | Rule::cmd_flat_name
        | Rule::cmd_flat_count
        | Rule::cmd_flat_area
        | Rule::cmd_flat_rm
        | Rule::cmd_society_name
        | Rule::cmd_society_flats
        | Rule::cmd_bill => "a command (try 'help')",
        #[allow(unreachable_patterns)]
        _ => return format!("{:?}", r),
    }
    .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fatality() {
        let mut errs = Record::new();
        assert!(!errs.is_fatal());
        errs.make("Odd").nonfatal().text("just a warning");
        assert!(!errs.is_fatal());
        assert_eq!((errs.count_errors(), errs.count_warnings()), (0, 1));
        errs.make("Broken").hint("fix it");
        errs.make("Also odd").nonfatal();
        assert!(errs.is_fatal());
        assert_eq!((errs.count_errors(), errs.count_warnings()), (1, 2));
        assert_eq!(errs.labels().collect::<Vec<_>>(), vec!["Odd", "Broken", "Also odd"]);
    }

    #[test]
    fn only_worst_are_printed() {
        let mut errs = Record::new();
        errs.make("Harmless").nonfatal();
        errs.make("Serious");
        let out = errs.to_string();
        assert!(out.contains("Serious"));
        assert!(!out.contains("Harmless"));
        assert!(out.contains("1 error emitted"));
    }

    #[test]
    fn truncated() {
        let mut errs = Record::new();
        for i in 0..12 {
            errs.make(format!("warning {}", i)).nonfatal();
        }
        let out = errs.to_string();
        assert!(out.contains("And 2 more."));
        assert!(out.contains("12 warnings emitted"));
        assert!(!out.contains("warning 11"));
    }
}
