//! Filter-clause builders, one per endpoint wrapper
//!
//! Pure functions: they only decide which clauses a wrapper sends.

use crate::query::Filter;

/// Works matching any of the DOIs (`doi:d1|d2|...`)
pub fn works_by_dois<T: AsRef<str>>(dois: &[T]) -> Vec<Filter> {
    vec![Filter::any_of("doi", dois)]
}

/// Works by one author (`author.id:<id>`)
pub fn works_by_author(author_id: &str) -> Vec<Filter> {
    vec![Filter::eq("author.id", author_id)]
}

/// Works whose corresponding institution is any of `institution_ids`,
/// published in `year`, of any listed type and open-access status
pub fn works_by_corresponding_institutions<T: AsRef<str>>(
    institution_ids: &[T],
    publication_year: i32,
    publication_types: &[T],
    oa_statuses: &[T],
) -> Vec<Filter> {
    vec![
        Filter::any_of("corresponding_institution_ids", institution_ids),
        Filter::eq("publication_year", publication_year),
        Filter::any_of("type", publication_types),
        Filter::any_of("oa_status", oa_statuses),
    ]
}

/// Works affiliated with the institution `ror_id` in `year`
pub fn works_by_ror(ror_id: &str, publication_year: i32) -> Vec<Filter> {
    vec![
        Filter::eq("institutions.ror", ror_id),
        Filter::eq("publication_year", publication_year),
    ]
}

/// Works cited by `work_id` (its reference list)
pub fn outgoing_references(work_id: &str) -> Vec<Filter> {
    vec![Filter::eq("cited_by", work_id)]
}

/// Works citing `work_id`
pub fn incoming_references(work_id: &str) -> Vec<Filter> {
    vec![Filter::eq("cites", work_id)]
}

/// Institution record for a ROR ID
pub fn institution_by_ror(ror_id: &str) -> Vec<Filter> {
    vec![Filter::eq("ror", ror_id)]
}
