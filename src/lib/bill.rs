//! Standalone HTML maintenance bill for one flat type
//!
//! The document carries its own stylesheet so that it can be opened,
//! mailed or printed without any other file.
//! The page layout lives in `templates/bill.html`.

use askama::Template;
use chrono::NaiveDate;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::lib::{
    entry::{Amount, FlatType},
    ledger::Ledger,
    money::Rupees,
    session::Society,
    summary::Allocation,
};

/// Shown in the document when the society has no name
pub const NAME_PLACEHOLDER: &str = "Society Name";
/// Used in the file name when the society has no name
pub const FILE_PLACEHOLDER: &str = "Society";

/// A rendered bill and the name it should be saved under
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    filename: String,
    contents: String,
}

impl Bill {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Write into `dir` under the suggested file name
    pub fn save(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        fs::write(&path, &self.contents)?;
        tracing::info!(path = %path.display(), "bill written");
        Ok(path)
    }
}

/// One line of the expense breakdown
struct Row<'a> {
    label: &'a str,
    amount: Rupees<Amount>,
}

/// The page itself, in `templates/bill.html`
///
/// Every field is escaped on rendering.
#[derive(Template)]
#[template(path = "bill.html")]
struct BillTemplate<'a> {
    name: &'a str,
    flat_name: &'a str,
    date: String,
    area: u64,
    rate: Rupees<String>,
    rows: Vec<Row<'a>>,
    total: Rupees<Amount>,
    charge: Rupees<Amount>,
}

/// Produce the bill of `flat`
///
/// `Ok(None)` when `flat` received no share from the allocation,
/// e.g. when no area at all is registered.
pub fn render(
    society: &Society,
    flat: &FlatType,
    alloc: &Allocation,
    ledger: &Ledger,
    date: NaiveDate,
) -> askama::Result<Option<Bill>> {
    let share = match alloc.get(flat.id) {
        Some(share) => share,
        None => return Ok(None),
    };
    let page = BillTemplate {
        name: society.display_name(NAME_PLACEHOLDER),
        flat_name: &flat.name,
        date: date.format("%d/%m/%Y").to_string(),
        area: flat.area,
        rate: Rupees(alloc.rate_display()),
        rows: ledger
            .itemized()
            .map(|(label, amount)| Row {
                label,
                amount: Rupees(amount),
            })
            .collect(),
        total: Rupees(alloc.total()),
        charge: Rupees(share.charge),
    };
    Ok(Some(Bill {
        filename: filename(society, flat, date),
        contents: page.render()?,
    }))
}

/// `<Society>_<FlatType>_Bill_<DD-MM-YYYY>.html`
pub fn filename(society: &Society, flat: &FlatType, date: NaiveDate) -> String {
    format!(
        "{}_{}_Bill_{}.html",
        path_safe(society.display_name(FILE_PLACEHOLDER)),
        path_safe(flat.name.trim()),
        date.format("%d-%m-%Y"),
    )
}

fn path_safe(s: &str) -> String {
    s.replace(|c: char| c == '/' || c == '\\', "-")
}
