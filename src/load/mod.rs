pub mod command;
pub mod error;
pub mod parse;

use std::collections::HashMap;

use crate::lib::{
    ledger::Ledger,
    registry::Registry,
    session::{Session, Society},
};
use crate::load::parse::ast;

/// Read a society file into a fresh session
///
/// `None` if the file is unreadable or has fatal errors, all diagnostics
/// end up in `errs`.
pub fn read_session(filename: &str, errs: &mut error::Record) -> Option<Session> {
    let contents = match std::fs::read_to_string(filename) {
        Ok(contents) => contents,
        Err(e) => {
            errs.make("File not found")
                .text(format!("Could not read '{}': {}", filename, e))
                .hint("check the path or start without a file");
            return None;
        }
    };
    let session = load_str(filename, errs, &contents);
    if errs.is_fatal() {
        None
    } else {
        session
    }
}

/// Same as `read_session` on text already in memory
pub fn load_str(path: &str, errs: &mut error::Record, contents: &str) -> Option<Session> {
    let items = parse::extract(path, errs, contents);
    if errs.is_fatal() {
        return None;
    }
    Some(assemble(errs, items))
}

/// Turn sections into a session, defaults fill the missing ones
fn assemble(errs: &mut error::Record, items: ast::Ast) -> Session {
    let mut seen: HashMap<&'static str, error::Loc> = HashMap::new();
    let mut session = Session::default();
    for item in items {
        let (kind, loc) = match &item {
            ast::Item::Society(loc, _) => ("society", loc.clone()),
            ast::Item::Expenses(loc, _) => ("expenses", loc.clone()),
            ast::Item::Flats(loc, _) => ("flats", loc.clone()),
        };
        if let Some(first) = seen.get(kind) {
            errs.make("Duplicate section")
                .span(&loc, format!("'{}' is defined again", kind))
                .span(first, "first defined here")
                .hint("merge both sections into one");
            continue;
        }
        seen.insert(kind, loc.clone());
        match item {
            ast::Item::Society(_, decl) => {
                session.society = Society {
                    name: decl.name.map(String::from),
                    flats: decl.flats,
                };
            }
            ast::Item::Expenses(_, decls) => {
                session.ledger = ledger(errs, decls);
            }
            ast::Item::Flats(_, decls) => {
                if decls.is_empty() {
                    errs.make("No flat types")
                        .nonfatal()
                        .span(&loc, "this section is empty")
                        .text("The default flat types are used instead")
                        .hint("add at least one '\"name\" count N area N;' line");
                } else {
                    session.registry = registry(errs, decls);
                }
            }
        }
    }
    session
}

fn ledger(errs: &mut error::Record, decls: Vec<ast::ExpenseDecl>) -> Ledger {
    let mut ledger = Ledger::empty();
    let mut names: HashMap<String, error::Loc> = HashMap::new();
    for decl in decls {
        let key = decl.name.trim().to_lowercase();
        if let Some(first) = names.get(&key) {
            errs.make("Duplicate expense")
                .nonfatal()
                .span(&decl.loc, format!("'{}' is already listed", decl.name))
                .span(first, "first listed here")
                .text("Both amounts are counted");
        } else {
            names.insert(key, decl.loc.clone());
        }
        if ledger.push(decl.name, decl.amount).is_none() {
            errs.make("Unnamed expense")
                .nonfatal()
                .span(&decl.loc, "this expense is ignored")
                .hint("give the expense a name");
        }
    }
    ledger
}

fn registry(errs: &mut error::Record, decls: Vec<ast::FlatDecl>) -> Registry {
    let mut registry = Registry::empty();
    let mut names: HashMap<String, error::Loc> = HashMap::new();
    for decl in decls {
        let key = decl.name.trim().to_lowercase();
        if let Some(first) = names.get(&key) {
            errs.make("Duplicate flat type")
                .nonfatal()
                .span(&decl.loc, format!("'{}' is already defined", decl.name))
                .span(first, "first defined here")
                .hint("rename one of the flat types");
        } else {
            names.insert(key, decl.loc.clone());
        }
        if decl.area == 0 {
            errs.make("Flat type without area")
                .nonfatal()
                .span(&decl.loc, "area is 0")
                .text("Units of this type will be charged nothing");
        }
        if registry.push(decl.name, decl.count, decl.area).is_none() {
            errs.make("Unnamed flat type")
                .nonfatal()
                .span(&decl.loc, "this flat type is ignored")
                .hint("give the flat type a name");
        }
    }
    if registry.is_empty() {
        Registry::default()
    } else {
        registry
    }
}
