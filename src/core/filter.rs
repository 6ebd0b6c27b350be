//! Search-text filtering over an in-memory company snapshot.

use crate::domain::model::Company;

/// Normalized search needle. `None` means "match everything".
fn needle(search_text: &str) -> Option<String> {
    let trimmed = search_text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match against name, category or description.
pub fn matches_search(company: &Company, search_text: &str) -> bool {
    match needle(search_text) {
        Some(needle) => matches_needle(company, &needle),
        None => true,
    }
}

fn matches_needle(company: &Company, needle: &str) -> bool {
    [&company.name, &company.category, &company.description]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Keeps the companies matching `search_text`, preserving input order.
pub fn filter_companies<'a, I>(companies: I, search_text: &str) -> Vec<&'a Company>
where
    I: IntoIterator<Item = &'a Company>,
{
    match needle(search_text) {
        Some(needle) => companies
            .into_iter()
            .filter(|company| matches_needle(company, &needle))
            .collect(),
        None => companies.into_iter().collect(),
    }
}
