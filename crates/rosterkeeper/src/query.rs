//! Declarative filtering and sorting of employee records.
//!
//! A [`Criteria`] value describes which records are visible and in what
//! order. The local blob store evaluates it client-side with [`apply`];
//! the document store translates the same value into SQL predicates plus
//! an ORDER BY clause. Both paths treat birthdate range bounds as
//! inclusive.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::trace;

use crate::employee::{age_from_birthdate, Employee};

/// Photo-presence predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFilter {
    /// Only records with an uploaded photo.
    HasPhoto,
    /// Only records with the placeholder photo.
    NoPhoto,
}

/// The available sort orders.
///
/// A closed enumeration dispatched through [`compare`]; there is no
/// stringly-typed comparator lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Younger employees first, by ascending computed age.
    AgeAscending,
    /// Older employees first, by descending computed age.
    AgeDescending,
    /// Ascending ordinal compare of `"first last"`.
    Name,
}

/// The current combination of filter predicates and sort key.
///
/// An immutable value: the `with_*` methods return an updated copy, so UI
/// event handlers reduce to "produce a new criteria, re-run the query".
/// `Criteria::default()` selects everything in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Case-insensitive substring of the full name.
    pub name_contains: Option<String>,
    /// Exact sex match.
    pub sex: Option<crate::employee::Sex>,
    /// Earliest birthdate to include (inclusive).
    pub born_after: Option<NaiveDate>,
    /// Latest birthdate to include (inclusive).
    pub born_before: Option<NaiveDate>,
    /// Photo-presence predicate.
    pub photo: Option<PhotoFilter>,
    /// Sort order for the visible set.
    pub sort: Option<SortKey>,
}

impl Criteria {
    /// Set or clear the name-substring filter. Empty input clears it.
    #[must_use]
    pub fn with_name_contains(mut self, needle: Option<String>) -> Self {
        self.name_contains = needle.filter(|n| !n.is_empty());
        self
    }

    /// Set or clear the sex filter.
    #[must_use]
    pub fn with_sex(mut self, sex: Option<crate::employee::Sex>) -> Self {
        self.sex = sex;
        self
    }

    /// Set or clear the birthdate range (either bound may be open).
    #[must_use]
    pub fn with_birthdate_range(
        mut self,
        born_after: Option<NaiveDate>,
        born_before: Option<NaiveDate>,
    ) -> Self {
        self.born_after = born_after;
        self.born_before = born_before;
        self
    }

    /// Set or clear the photo-presence filter.
    #[must_use]
    pub fn with_photo(mut self, photo: Option<PhotoFilter>) -> Self {
        self.photo = photo;
        self
    }

    /// Set or clear the sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: Option<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    /// Whether this criteria filters or sorts at all.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}

/// Three-way comparison of two records under the given sort key.
///
/// Ages are computed against the supplied clock so one sort pass sees a
/// consistent view.
#[must_use]
pub fn compare(key: SortKey, a: &Employee, b: &Employee, now: DateTime<Utc>) -> Ordering {
    match key {
        SortKey::AgeAscending => {
            age_from_birthdate(a.birthdate, now).cmp(&age_from_birthdate(b.birthdate, now))
        }
        SortKey::AgeDescending => {
            age_from_birthdate(b.birthdate, now).cmp(&age_from_birthdate(a.birthdate, now))
        }
        SortKey::Name => a.full_name().cmp(&b.full_name()),
    }
}

/// Evaluate criteria client-side over a full record set.
///
/// Filters apply as a conjunction in fixed order (name, sex, birthdate
/// range, photo), then the sort key reorders stably, preserving the
/// incoming order of equal records.
#[must_use]
pub fn apply(criteria: &Criteria, mut employees: Vec<Employee>) -> Vec<Employee> {
    if let Some(needle) = &criteria.name_contains {
        let needle = needle.to_lowercase();
        employees.retain(|e| e.full_name().to_lowercase().contains(&needle));
    }

    if let Some(sex) = criteria.sex {
        employees.retain(|e| e.sex == sex);
    }

    if let Some(start) = criteria.born_after {
        employees.retain(|e| e.birthdate >= start);
    }
    if let Some(end) = criteria.born_before {
        employees.retain(|e| e.birthdate <= end);
    }

    if let Some(photo) = criteria.photo {
        employees.retain(|e| match photo {
            PhotoFilter::HasPhoto => e.has_photo(),
            PhotoFilter::NoPhoto => !e.has_photo(),
        });
    }

    if let Some(key) = criteria.sort {
        let now = Utc::now();
        employees.sort_by(|a, b| compare(key, a, b, now));
    }

    trace!(visible = employees.len(), "Applied criteria");
    employees
}
