use std::{io, path::Path};

use svg::{
    node::{
        self,
        element::{Line, Rectangle, Text},
    },
    Document,
};

use crate::lib::{money::Rupees, summary::Allocation};

/// Horizontal bar chart of the per-unit charge of each flat type
pub struct Plotter<'d> {
    data: &'d Allocation,
}

impl<'d> Plotter<'d> {
    pub fn from(data: &'d Allocation) -> Self {
        Self { data }
    }

    pub fn save(&self, file: &Path) -> io::Result<()> {
        svg::save(file, &self.render())?;
        tracing::info!(path = %file.display(), "chart written");
        Ok(())
    }

    fn render(&self) -> Document {
        let bars = self
            .data
            .shares()
            .map(|(_, s)| (s.name.as_str(), s.charge))
            .collect::<Vec<_>>();
        let max = bars.iter().map(|(_, c)| c.0).max().unwrap_or(0).max(1) as f64;
        let fwidth = 1000.0;
        let label_width = 220.0;
        let bar_height = 40.0;
        let gap = 15.0;
        let margin = 20.0;
        let fheight = bars.len() as f64 * (bar_height + gap);
        let resize_x = |v: i64| v as f64 / max * (fwidth - label_width - 160.0);

        let document = bars
            .iter()
            .enumerate()
            .fold(Document::new(), |doc, (i, (name, charge))| {
                let y = i as f64 * (bar_height + gap);
                let width = resize_x(charge.0);
                doc.add(
                    Text::new()
                        .set("x", label_width - 10.0)
                        .set("y", y + bar_height * 0.65)
                        .set("text-anchor", "end")
                        .set("font-family", "sans-serif")
                        .add(node::Text::new(*name)),
                )
                .add(
                    Rectangle::new()
                        .set("x", label_width)
                        .set("y", y)
                        .set("width", width)
                        .set("height", bar_height)
                        .set("fill", COLORS[i % COLORS.len()]),
                )
                .add(
                    Text::new()
                        .set("x", label_width + width + 10.0)
                        .set("y", y + bar_height * 0.65)
                        .set("font-family", "sans-serif")
                        .add(node::Text::new(Rupees(*charge).to_string())),
                )
            });
        let yaxis = Line::new()
            .set("x1", label_width)
            .set("x2", label_width)
            .set("y1", 0.0)
            .set("y2", fheight)
            .set("stroke", "black")
            .set("stroke-width", 2.0);
        document.add(yaxis).set(
            "viewBox",
            (-margin, -margin, fwidth + 2.0 * margin, fheight + 2.0 * margin),
        )
    }
}

const COLORS: &[&str] = &[
    "#4F46E5", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#EC4899",
];
