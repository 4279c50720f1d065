//! Positional scan over the listing table.
//!
//! The page renders each course section as a row of [`ROW_STRIDE`] cells with
//! the CRN in the first cell and the enrollment status in the cell
//! [`STATUS_OFFSET`] positions later. There is no header negotiation: if the
//! site changes its column layout, these two constants are the only place to
//! edit.

use crate::core::fetcher::{element_text, selector, ListingPage};
use crate::domain::model::{Crn, Status};
use crate::utils::error::{FetchFailure, Result, TrackerError};

pub const ROW_STRIDE: usize = 11;
pub const STATUS_OFFSET: usize = 10;

const RESULTS_SELECTOR: &str = "div#results";
const TABLE_SELECTOR: &str = "table";
const BODY_SELECTOR: &str = "tbody";
const CELL_SELECTOR: &str = "td";

/// All `td` cells of the results table body, trimmed, in document order.
pub fn result_cells(page: &ListingPage) -> Result<Vec<String>> {
    let missing = || TrackerError::fetch(page.url(), FetchFailure::MissingResults);

    let results = page.find_first(&selector(RESULTS_SELECTOR)).ok_or_else(missing)?;
    let table = results
        .select(&selector(TABLE_SELECTOR))
        .next()
        .ok_or_else(missing)?;
    let body = table
        .select(&selector(BODY_SELECTOR))
        .next()
        .ok_or_else(missing)?;

    let cells: Vec<String> = body
        .select(&selector(CELL_SELECTOR))
        .map(element_text)
        .collect();

    tracing::debug!("Results table on {} has {} cells", page.url(), cells.len());
    Ok(cells)
}

fn position_of(cells: &[String], crn: Crn) -> Option<usize> {
    let target = crn.to_string();
    cells
        .iter()
        .enumerate()
        .step_by(ROW_STRIDE)
        .find(|(_, cell)| **cell == target)
        .map(|(index, _)| index)
}

pub fn find_status(page: &ListingPage, crn: Crn) -> Result<Status> {
    let cells = result_cells(page)?;

    let index = position_of(&cells, crn).ok_or_else(|| TrackerError::NotFoundError {
        crn: crn.get(),
        listing: page.url().to_string(),
    })?;

    let text = cells
        .get(index + STATUS_OFFSET)
        .ok_or(TrackerError::MalformedRowError {
            crn: crn.get(),
            index,
        })?;

    Status::from_cell(text).ok_or_else(|| TrackerError::UnknownStatusError {
        crn: crn.get(),
        text: text.clone(),
    })
}

pub fn exists(page: &ListingPage, crn: Crn) -> Result<bool> {
    let cells = result_cells(page)?;
    Ok(position_of(&cells, crn).is_some())
}
