//! TableFinder orchestrator and public API for table extraction.
//!
//! One page runs through: ruling cleanup, cell reconstruction, region
//! clustering, text assignment and table assembly. Pages share nothing,
//! so [`extract_pages`] fans them out over rayon.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, TableError};

use super::assemble::{Table, assemble_table, assign_text};
use super::clustering::cluster_regions;
use super::grid::find_cells;
use super::rectangle::Rectangle;
use super::ruling::{Ruling, collapse_with, split_rulings};
use super::types::{Cell, TableSettings, TextElement};

/// Geometry supplied for one page (or one sub-area of it).
#[derive(Clone, Debug, Default)]
pub struct PageInput {
    pub rulings: Vec<Ruling>,
    /// Drawn boxes. They are split into rulings, or used as cells
    /// directly when the page has no ruling segments.
    pub rectangles: Vec<Rectangle>,
    pub text: Vec<TextElement>,
    /// Restrict extraction to this area.
    pub area: Option<Rectangle>,
}

/// Counts a caller can use to judge whether a page is grid-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridSummary {
    pub horizontal_rulings: usize,
    pub vertical_rulings: usize,
    pub cell_count: usize,
    pub regions: usize,
}

impl GridSummary {
    pub fn looks_tabular(&self, settings: &TableSettings) -> bool {
        self.regions > 0 && self.cell_count >= settings.min_tabular_cells
    }
}

/// Outcome of running the pipeline on one page.
#[derive(Clone, Debug)]
pub enum Extraction {
    Grid {
        tables: Vec<Table>,
        summary: GridSummary,
    },
    /// No grid could be formed; fall back to another strategy.
    NoGrid { summary: GridSummary },
}

impl Extraction {
    pub fn summary(&self) -> &GridSummary {
        match self {
            Extraction::Grid { summary, .. } | Extraction::NoGrid { summary } => summary,
        }
    }

    pub fn tables(&self) -> &[Table] {
        match self {
            Extraction::Grid { tables, .. } => tables,
            Extraction::NoGrid { .. } => &[],
        }
    }

    pub fn into_tables(self) -> Vec<Table> {
        match self {
            Extraction::Grid { tables, .. } => tables,
            Extraction::NoGrid { .. } => Vec::new(),
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, Extraction::Grid { .. })
    }
}

/// Main table finder.
pub struct TableFinder<'a> {
    settings: &'a TableSettings,
}

impl<'a> TableFinder<'a> {
    pub fn new(settings: &'a TableSettings) -> Self {
        Self { settings }
    }

    /// Cleaned rulings of a page, split into (horizontal, vertical).
    pub fn rulings(&self, page: &PageInput) -> (Vec<Ruling>, Vec<Ruling>) {
        let mut raw: Vec<Ruling> = page.rulings.clone();
        if !page.rulings.is_empty() {
            for rect in &page.rectangles {
                raw.extend(rect.to_constituent_lines());
            }
        }
        if let Some(area) = page.area {
            raw = raw.iter().filter_map(|r| r.clip_to(&area)).collect();
            if self.settings.area_as_rulings && !raw.is_empty() {
                raw.extend(area.to_constituent_lines());
            }
        }

        let (horizontals, verticals) = split_rulings(raw);
        let mut valid = horizontals;
        valid.extend(verticals);
        let merged = collapse_with(
            &valid,
            self.settings.snap_tolerance,
            self.settings.join_tolerance,
        );

        merged
            .into_iter()
            .filter(|r| r.length() >= self.settings.min_ruling_length)
            .partition(|r| r.is_horizontal())
    }

    /// Rectangles used as cells when the page has no ruling segments.
    fn promoted_cells(&self, page: &PageInput) -> Vec<Cell> {
        page.rectangles
            .iter()
            .filter(|r| r.is_finite())
            .filter_map(|r| match page.area {
                Some(area) => r.intersection(&area),
                None => Some(*r),
            })
            .map(Cell::from_bounds)
            .collect()
    }

    pub fn find_tables(&self, page: &PageInput) -> Extraction {
        let (horizontals, verticals) = self.rulings(page);
        let cells = if page.rulings.is_empty() {
            self.promoted_cells(page)
        } else {
            find_cells(&horizontals, &verticals, self.settings)
        };

        let regions: Vec<_> = cluster_regions(&cells)
            .into_iter()
            .filter(|region| region.members.len() >= self.settings.min_table_cells)
            .collect();

        let summary = GridSummary {
            horizontal_rulings: horizontals.len(),
            vertical_rulings: verticals.len(),
            cell_count: cells.len(),
            regions: regions.len(),
        };

        let cells = assign_text(cells, &page.text, self.settings);
        let mut slots: Vec<Option<Cell>> = cells.into_iter().map(Some).collect();
        let tables: Vec<Table> = regions
            .into_iter()
            .map(|region| {
                let members: Vec<Cell> = region
                    .members
                    .iter()
                    .filter_map(|&idx| slots[idx].take())
                    .collect();
                assemble_table(region.bounds, members, self.settings)
            })
            .collect();

        debug!(
            horizontals = summary.horizontal_rulings,
            verticals = summary.vertical_rulings,
            cells = summary.cell_count,
            regions = summary.regions,
            tables = tables.len(),
            "page table extraction"
        );

        if tables.is_empty() {
            Extraction::NoGrid { summary }
        } else {
            Extraction::Grid { tables, summary }
        }
    }
}

/// Extract the tables of one page.
pub fn extract_tables(page: &PageInput, settings: &TableSettings) -> Extraction {
    TableFinder::new(settings).find_tables(page)
}

/// Extract tables from many pages on the global rayon pool.
///
/// Results come back in page order.
pub fn extract_pages(pages: &[PageInput], settings: &TableSettings) -> Vec<Extraction> {
    pages
        .par_iter()
        .map(|page| extract_tables(page, settings))
        .collect()
}

/// Like [`extract_pages`], on a dedicated pool of `threads` workers.
pub fn extract_pages_with_threads(
    pages: &[PageInput],
    settings: &TableSettings,
    threads: usize,
) -> Result<Vec<Extraction>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| TableError::ThreadPool(e.to_string()))?;
    Ok(pool.install(|| extract_pages(pages, settings)))
}
