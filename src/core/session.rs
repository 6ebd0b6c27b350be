use crate::core::presenter::present_all;
use crate::core::ranking::rank;
use crate::domain::model::{Company, Coordinate, DisplayFields, RankedResult};

/// Holds the state a search view owns and recomputes results from it.
///
/// The fetched snapshot is read-only here. Every change to the search text or
/// origin is picked up by the next call to [`SearchSession::results`], so a
/// position that arrives late is combined with whatever text is current.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    companies: Vec<Company>,
    search_text: String,
    origin: Option<Coordinate>,
}

impl SearchSession {
    pub fn new(companies: Vec<Company>) -> Self {
        Self {
            companies,
            ..Self::default()
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    pub fn replace_companies(&mut self, companies: Vec<Company>) {
        self.companies = companies;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_origin(&mut self, origin: Option<Coordinate>) {
        self.origin = origin;
    }

    pub fn results(&self) -> Vec<RankedResult<'_>> {
        rank(&self.companies, &self.search_text, self.origin)
    }

    pub fn display_rows(&self) -> Vec<DisplayFields> {
        present_all(&self.results())
    }
}
