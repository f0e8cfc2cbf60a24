use std::fmt;

use crate::lib::{
    bill::FILE_PLACEHOLDER,
    entry::Amount,
    money::Rupees,
    session::Society,
    summary::{Allocation, Share},
};

/// Box-drawn table of the charges of every flat type
pub struct Table<'d> {
    title: Option<String>,
    data: &'d Allocation,
}

/// Headline figures printed above the table
pub struct Overview<'d> {
    society: &'d Society,
    data: &'d Allocation,
}

struct BoxFmt {
    width: usize,
    text: String,
}

struct ColFmt {
    width: usize,
    label: BoxFmt,
    boxes: Vec<BoxFmt>,
}

struct GridFmt {
    title: Option<String>,
    labels: ColFmt,
    columns: Vec<ColFmt>,
    /// index of the first line after the separator, if any
    footer: Option<usize>,
}

impl<'d> Table<'d> {
    pub fn from(data: &'d Allocation) -> Self {
        Self { title: None, data }
    }

    pub fn with_title<S>(mut self, title: S) -> Self
    where
        S: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    fn to_formatter(&self) -> GridFmt {
        let cols = ["Area", "Units", "Charge", "Collection"]
            .iter()
            .map(|s| ColFmt::with_label(BoxFmt::from(s.to_string())))
            .collect::<Vec<_>>();
        let mut grid = GridFmt::with_columns(self.title.clone(), cols);
        for (id, share) in self.data.shares() {
            grid.push_line(BoxFmt::from(format!("{} {}", id, share.name)), BoxFmt::share(share));
        }
        grid.footer = Some(grid.labels.len());
        grid.push_line(
            BoxFmt::from(String::from("Total")),
            vec![
                BoxFmt::from(format!("{} sq.ft", self.data.area())),
                BoxFmt::from(self.data.total_units().to_string()),
                BoxFmt::from(String::new()),
                BoxFmt::amount(self.data.collection()),
            ],
        );
        grid
    }
}

impl<'d> Overview<'d> {
    pub fn new(society: &'d Society, data: &'d Allocation) -> Self {
        Self { society, data }
    }
}

impl BoxFmt {
    fn from(text: String) -> Self {
        let width = text.chars().count();
        Self { text, width }
    }

    fn amount(a: Amount) -> Self {
        Self::from(Rupees(a).to_string())
    }

    fn share(s: &Share) -> Vec<Self> {
        vec![
            Self::from(format!("{} sq.ft", s.area)),
            Self::from(s.count.to_string()),
            Self::amount(s.charge),
            Self::amount(s.collection()),
        ]
    }

    fn write(&self, f: &mut fmt::Formatter, width: usize, right: bool) -> fmt::Result {
        let pad = " ".repeat(width.saturating_sub(self.width));
        if right {
            write!(f, " {}{} ", pad, self.text)
        } else {
            write!(f, " {}{} ", self.text, pad)
        }
    }
}

impl ColFmt {
    fn with_label(label: BoxFmt) -> Self {
        Self {
            width: label.width,
            label,
            boxes: Vec::new(),
        }
    }

    fn push(&mut self, b: BoxFmt) {
        self.width = self.width.max(b.width);
        self.boxes.push(b);
    }

    fn write_label(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.label.write(f, self.width, true)
    }

    fn write_item(&self, f: &mut fmt::Formatter, idx: usize, right: bool) -> fmt::Result {
        self.boxes[idx].write(f, self.width, right)
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn hline(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HLINE.repeat(self.width + 2))
    }
}

impl GridFmt {
    fn with_columns(title: Option<String>, columns: Vec<ColFmt>) -> Self {
        Self {
            title,
            labels: ColFmt::with_label(BoxFmt::from(String::new())),
            columns,
            footer: None,
        }
    }

    fn push_line(&mut self, label: BoxFmt, boxes: Vec<BoxFmt>) {
        self.labels.push(label);
        for (i, b) in boxes.into_iter().enumerate() {
            self.columns[i].push(b);
        }
    }

    fn separator(&self, f: &mut fmt::Formatter, left: &str, mid: &str, right: &str) -> fmt::Result {
        write!(f, "{}", left)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", mid)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", right)
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.data.is_empty() {
            if let Some(title) = &self.title {
                writeln!(f, "{}", title)?;
            }
            return writeln!(f, "  (no flat has any area, nothing to allocate)");
        }
        write!(f, "{}", self.to_formatter())
    }
}

impl fmt::Display for GridFmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{}", title)?;
        }
        self.separator(f, ULCORNER, LOJOIN, URCORNER)?;
        // title line
        write!(f, "{}", VLINE)?;
        self.labels.write_label(f)?;
        for c in &self.columns {
            write!(f, "{}", VLINE)?;
            c.write_label(f)?;
        }
        writeln!(f, "{}", VLINE)?;
        self.separator(f, RTJOIN, CROSS, LTJOIN)?;

        // main block
        for idx in 0..self.labels.len() {
            if self.footer == Some(idx) {
                self.separator(f, RTJOIN, CROSS, LTJOIN)?;
            }
            write!(f, "{}", VLINE)?;
            self.labels.write_item(f, idx, false)?;
            for c in &self.columns {
                write!(f, "{}", VLINE)?;
                c.write_item(f, idx, true)?;
            }
            writeln!(f, "{}", VLINE)?;
        }
        self.separator(f, DLCORNER, HIJOIN, DRCORNER)
    }
}

impl fmt::Display for Overview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.society.display_name(FILE_PLACEHOLDER))?;
        if let Some(flats) = self.society.flats {
            writeln!(f, "  Flats in society:       {}", flats)?;
        }
        writeln!(f, "  Total monthly expense:  {}", Rupees(self.data.total()))?;
        writeln!(f, "  Rate per sq.ft:         {}", Rupees(self.data.rate_display()))?;
        writeln!(f, "  Total collection:       {}", Rupees(self.data.collection()))?;
        writeln!(f, "  Units:                  {}", self.data.total_units())?;
        let drift = self.data.drift();
        if !self.data.is_empty() && drift.nonzero() {
            writeln!(f, "  Rounding drift:         {}", Rupees(drift))?;
        }
        Ok(())
    }
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";
