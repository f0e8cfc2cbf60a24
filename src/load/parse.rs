//! Convert the contents of a society file into a list of AST items
//! (the `society`, `expenses` and `flats` sections)

#![allow(clippy::upper_case_acronyms)]

use pest::Parser;
use pest_derive::*;

/// Wrapper around Pest's `Pair`
pub type Pair<'i> = pest::iterators::Pair<'i, Rule>;
/// Wrapper around Pest's `Pairs`
pub type Pairs<'i> = pest::iterators::Pairs<'i, Rule>;

use crate::lib::entry::{Amount, MAX_QUANTITY};
use crate::load::error::{self, Loc};

/// Convenient exports
pub mod ast {
    pub use super::{Ast, AstItem as Item, ExpenseDecl, FlatDecl, SocietyDecl};
}

/// Pest-generated parser
#[derive(Parser)]
#[grammar = "load/upkeep.pest"]
pub struct UpkeepParser;

/// The sections of a file, in order of appearance
pub type Ast<'i> = Vec<AstItem<'i>>;

/// Each section of the file
#[derive(Debug)]
pub enum AstItem<'i> {
    Society(Loc<'i>, SocietyDecl<'i>),
    Expenses(Loc<'i>, Vec<ExpenseDecl<'i>>),
    Flats(Loc<'i>, Vec<FlatDecl<'i>>),
}

#[derive(Debug, Default)]
pub struct SocietyDecl<'i> {
    pub name: Option<&'i str>,
    pub flats: Option<u64>,
}

#[derive(Debug)]
pub struct ExpenseDecl<'i> {
    pub loc: Loc<'i>,
    pub name: &'i str,
    pub amount: Option<Amount>,
}

#[derive(Debug)]
pub struct FlatDecl<'i> {
    pub loc: Loc<'i>,
    pub name: &'i str,
    pub count: Option<u64>,
    pub area: u64,
}

/// Get the sections of `contents`, read from `path`
///
/// The return value may be non-empty even if some errors (including fatal ones) occured:
/// it holds every item that was read correctly.
///
/// Caller should determine the success of this function not through its return value
/// but by querying `errs` (e.g. by checking `errs.is_fatal()` or `errs.count_errors()`)
pub fn extract<'i>(path: &'i str, errs: &mut error::Record, contents: &'i str) -> Ast<'i> {
    match UpkeepParser::parse(Rule::program, contents) {
        Ok(pairs) => validate(path, errs, pairs),
        Err(e) => {
            errs.make("Parsing failure").from(e.with_path(path));
            Vec::new()
        }
    }
}

// extract the contents of a quoted string
macro_rules! unquote {
    ( $node:expr ) => {{
        let node = $node;
        assert_eq!(node.as_rule(), Rule::quoted);
        let text = node.as_str();
        &text[1..text.len() - 1]
    }};
}

// set-once value
macro_rules! set_or_fail {
    ( $errs:expr, $var:expr, $val:expr, $name:expr, $loc:expr ) => {{
        if $var.is_some() {
            $errs
                .make("Duplicate field definition")
                .span(&$loc, format!("attempt to override {}", $name))
                .text("Each field may only be defined once")
                .hint("remove one of the field definitions");
            return None;
        }
        $var = Some($val);
    }};
}

/// Read a count or an area, reporting those above `MAX_QUANTITY`
fn integer(path: &str, errs: &mut error::Record, pair: Pair) -> Option<u64> {
    match pair.as_str().parse::<u64>() {
        Ok(n) if n <= MAX_QUANTITY => Some(n),
        _ => {
            errs.make("Number out of range")
                .span(&(path, pair.as_span()), "too large")
                .hint(format!("values must not exceed {}", MAX_QUANTITY));
            None
        }
    }
}

/// Read an amount of rupees, reporting those above `Amount::MAX`
fn amount(path: &str, errs: &mut error::Record, pair: Pair) -> Option<Amount> {
    // the grammar only lets digits and at most one dot through
    match pair.as_str().parse::<f64>() {
        Ok(value) if value <= Amount::MAX.as_f64() => Some(Amount::from_f64(value)),
        _ => {
            errs.make("Number out of range")
                .span(&(path, pair.as_span()), "too large")
                .hint(format!("amounts must not exceed {}", Amount::MAX));
            None
        }
    }
}

/// Check all sections
///
/// Sequentially validates each section, records errors, accumulates the
/// correct ones into the return value.
pub fn validate<'i>(path: &'i str, errs: &mut error::Record, pairs: Pairs<'i>) -> Ast<'i> {
    let mut ast = Vec::new();
    for pair in pairs {
        let loc = (path, pair.as_span());
        match pair.as_rule() {
            Rule::society => {
                if let Some(decl) = validate_society(path, errs, pair) {
                    ast.push(AstItem::Society(loc, decl));
                }
            }
            Rule::expenses => {
                let items = pair
                    .into_inner()
                    .filter_map(|p| validate_expense(path, errs, p))
                    .collect();
                ast.push(AstItem::Expenses(loc, items));
            }
            Rule::flats => {
                let items = pair
                    .into_inner()
                    .filter_map(|p| validate_flat(path, errs, p))
                    .collect();
                ast.push(AstItem::Flats(loc, items));
            }
            Rule::EOI => break,
            _ => unreachable!(),
        }
    }
    ast
}

fn validate_society<'i>(
    path: &'i str,
    errs: &mut error::Record,
    pair: Pair<'i>,
) -> Option<SocietyDecl<'i>> {
    let mut name = None;
    let mut flats = None;
    for field in pair.into_inner() {
        let loc = (path, field.as_span());
        match field.as_rule() {
            Rule::society_name => {
                let val = unquote!(field.into_inner().next()?);
                set_or_fail!(errs, name, val, "name", loc);
            }
            Rule::society_flats => {
                let val = integer(path, errs, field.into_inner().next()?)?;
                set_or_fail!(errs, flats, val, "flats", loc);
            }
            _ => unreachable!(),
        }
    }
    Some(SocietyDecl { name, flats })
}

fn validate_expense<'i>(
    path: &'i str,
    errs: &mut error::Record,
    pair: Pair<'i>,
) -> Option<ExpenseDecl<'i>> {
    let loc = (path, pair.as_span());
    let mut inner = pair.into_inner();
    let name = unquote!(inner.next()?);
    let value = match inner.next() {
        Some(p) => Some(amount(path, errs, p)?),
        None => None,
    };
    Some(ExpenseDecl {
        loc,
        name,
        amount: value,
    })
}

fn validate_flat<'i>(path: &'i str, errs: &mut error::Record, pair: Pair<'i>) -> Option<FlatDecl<'i>> {
    let loc = (path, pair.as_span());
    let mut inner = pair.into_inner();
    let name = unquote!(inner.next()?);
    let mut count = None;
    let mut area = None;
    for field in inner {
        let field_loc = (path, field.as_span());
        match field.as_rule() {
            Rule::flat_count => {
                let val = integer(path, errs, field.into_inner().next()?)?;
                set_or_fail!(errs, count, val, "count", field_loc);
            }
            Rule::flat_area => {
                let val = integer(path, errs, field.into_inner().next()?)?;
                set_or_fail!(errs, area, val, "area", field_loc);
            }
            _ => unreachable!(),
        }
    }
    let area = match area {
        Some(area) => area,
        None => {
            errs.make("Missing field definition")
                .span(&loc, "'area' may not be omitted")
                .text("Each flat type needs its carpet area")
                .hint("add definition for the missing field: 'area 650'");
            return None;
        }
    };
    Some(FlatDecl {
        loc,
        name,
        count,
        area,
    })
}
