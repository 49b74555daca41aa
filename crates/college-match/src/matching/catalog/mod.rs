//! Reference catalog loader: CSV exports to canonical [`Institution`] rows.

mod mapping;
mod normalizer;
mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::domain::Institution;
use super::indices::{IndexBuilder, IndexedCatalog};

/// Income-bracket ceilings a multi-row-per-institution export is keyed by.
pub const EARNINGS_CEILINGS: [f64; 5] = [30_000.0, 48_000.0, 75_000.0, 110_000.0, 150_000.0];

#[derive(Debug, Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog has no institution id column")]
    MissingIdColumn,
}

/// Deduplicated institutions in source order, plus what the loader observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub institutions: Vec<Institution>,
    /// Indexed fields the source file did not carry at all.
    pub absent_columns: Vec<String>,
    pub duplicates_dropped: usize,
    pub bracket_rows_dropped: usize,
    pub rows_without_id: usize,
}

impl Catalog {
    pub fn new(institutions: Vec<Institution>) -> Self {
        Self {
            institutions,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.institutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }

    /// Normalize and index the whole catalog.
    pub fn into_indexed(self) -> IndexedCatalog {
        IndexBuilder::build(self.institutions)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogImporter {
    earnings_ceiling: Option<f64>,
}

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogImportError> {
        Self::default().import_path(path)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Catalog, CatalogImportError> {
        Self::default().import_reader(reader)
    }

    /// Keep only rows for one income bracket when the export has a row per bracket.
    pub fn with_earnings_ceiling(earnings_ceiling: Option<f64>) -> Self {
        Self { earnings_ceiling }
    }

    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> Result<Catalog, CatalogImportError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening catalog");
        let file = std::fs::File::open(path)?;
        self.import_reader(file)
    }

    pub fn import_reader<R: Read>(&self, reader: R) -> Result<Catalog, CatalogImportError> {
        let rows = ParsedRows::read(reader)?;
        Ok(rows.select(self.earnings_ceiling))
    }

    pub fn import_bracketed_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<BracketedCatalog, CatalogImportError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening catalog");
        let file = std::fs::File::open(path)?;
        self.import_bracketed_reader(file)
    }

    /// Import once, then split out one catalog per income bracket the export carries.
    ///
    /// `catalog` honours the configured ceiling and serves profiles without a family income.
    pub fn import_bracketed_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<BracketedCatalog, CatalogImportError> {
        let rows = ParsedRows::read(reader)?;
        let brackets: Vec<(f64, Catalog)> = EARNINGS_CEILINGS
            .iter()
            .filter(|ceiling| rows.has_bracket(**ceiling))
            .map(|ceiling| (*ceiling, rows.select(Some(*ceiling))))
            .collect();
        if !brackets.is_empty() {
            info!(brackets = brackets.len(), "catalog carries income-bracket rows");
        }
        Ok(BracketedCatalog {
            catalog: rows.select(self.earnings_ceiling),
            brackets,
        })
    }
}

/// A catalog plus per-income-bracket variants of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BracketedCatalog {
    pub catalog: Catalog,
    /// Empty when the export has a single row per institution.
    pub brackets: Vec<(f64, Catalog)>,
}

impl BracketedCatalog {
    pub fn absent_columns(&self) -> &[String] {
        &self.catalog.absent_columns
    }
}

struct ParsedRows {
    institutions: Vec<Institution>,
    absent_columns: Vec<String>,
    rows_without_id: usize,
}

impl ParsedRows {
    fn read<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let parsed = parser::parse_catalog(reader)?;
        if !parsed.fields.contains("id") {
            return Err(CatalogImportError::MissingIdColumn);
        }
        if parsed.rows_without_id > 0 {
            warn!(rows = parsed.rows_without_id, "skipped catalog rows without an id");
        }

        let absent_columns: Vec<String> = mapping::INDEXED_FIELDS
            .iter()
            .filter(|field| !parsed.fields.contains(**field))
            .map(|field| field.to_string())
            .collect();

        Ok(Self {
            institutions: parsed.institutions,
            absent_columns,
            rows_without_id: parsed.rows_without_id,
        })
    }

    fn has_bracket(&self, ceiling: f64) -> bool {
        self.institutions
            .iter()
            .any(|institution| institution.earnings_ceiling == Some(ceiling))
    }

    /// Bracket filter first, then keep the first row per id.
    fn select(&self, earnings_ceiling: Option<f64>) -> Catalog {
        let read = self.institutions.len();
        let bracketed: Vec<&Institution> = self
            .institutions
            .iter()
            .filter(|institution| match earnings_ceiling {
                Some(ceiling) => institution
                    .earnings_ceiling
                    .map_or(true, |value| value == ceiling),
                None => true,
            })
            .collect();
        let bracket_rows_dropped = read - bracketed.len();

        let mut seen = HashSet::new();
        let institutions: Vec<Institution> = bracketed
            .into_iter()
            .filter(|institution| seen.insert(institution.id.clone()))
            .cloned()
            .collect();
        let duplicates_dropped = read - bracket_rows_dropped - institutions.len();

        info!(
            rows = read,
            institutions = institutions.len(),
            duplicates_dropped,
            bracket_rows_dropped,
            earnings_ceiling,
            absent_columns = self.absent_columns.len(),
            "catalog imported"
        );

        Catalog {
            institutions,
            absent_columns: self.absent_columns.clone(),
            duplicates_dropped,
            bracket_rows_dropped,
            rows_without_id: self.rows_without_id,
        }
    }
}
