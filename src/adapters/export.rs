use crate::domain::model::DisplayFields;
use crate::domain::ports::ResultSink;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
    Tsv,
    Json,
}

#[derive(Serialize)]
struct DelimitedRow<'a> {
    slug: &'a str,
    name: &'a str,
    category: &'a str,
    distance_km: Option<&'a str>,
    rating: &'a str,
    image: &'a str,
    address: &'a str,
}

impl<'a> From<&'a DisplayFields> for DelimitedRow<'a> {
    fn from(fields: &'a DisplayFields) -> Self {
        Self {
            slug: &fields.slug,
            name: &fields.name,
            category: &fields.category,
            distance_km: fields.distance_km.as_deref(),
            rating: &fields.rating,
            image: fields.image.current(),
            address: &fields.address,
        }
    }
}

/// Writes display rows in one [`ExportFormat`] to any writer.
pub struct WriterSink<W: Write> {
    writer: W,
    format: ExportFormat,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: ExportFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_delimited(&mut self, rows: &[DisplayFields], delimiter: u8) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(&mut self.writer);
        if rows.is_empty() {
            csv_writer.write_record([
                "slug",
                "name",
                "category",
                "distance_km",
                "rating",
                "image",
                "address",
            ])?;
        }
        for row in rows {
            csv_writer.serialize(DelimitedRow::from(row))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    fn write_table(&mut self, rows: &[DisplayFields]) -> Result<()> {
        if rows.is_empty() {
            writeln!(self.writer, "No companies found.")?;
            return Ok(());
        }

        for (index, row) in rows.iter().enumerate() {
            let distance = row
                .distance_km
                .as_ref()
                .map(|d| format!("  📍 {} km", d))
                .unwrap_or_default();
            writeln!(
                self.writer,
                "{:>3}. {} ({})  ⭐ {}{}",
                index + 1,
                row.name,
                row.category,
                row.rating,
                distance
            )?;
            writeln!(self.writer, "     {}", row.address)?;
            if !row.description.is_empty() {
                writeln!(self.writer, "     {}", row.description)?;
            }
            writeln!(self.writer, "     /empresa/{}", row.slug)?;
        }
        Ok(())
    }
}

impl<W: Write> ResultSink for WriterSink<W> {
    fn write_results(&mut self, rows: &[DisplayFields]) -> Result<()> {
        match self.format {
            ExportFormat::Table => self.write_table(rows)?,
            ExportFormat::Csv => self.write_delimited(rows, b',')?,
            ExportFormat::Tsv => self.write_delimited(rows, b'\t')?,
            ExportFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, rows)?;
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Opens a sink on `output`, or stdout when no path is given.
pub fn open_sink(
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<WriterSink<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            tracing::debug!("Writing {:?} output to {}", format, path.display());
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };
    Ok(WriterSink::new(writer, format))
}
