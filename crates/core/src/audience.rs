//! Audience resolution for communications.
//!
//! A communication carries zero or more segments, each optionally naming a
//! province and/or a user type. [`AudienceFilter::from_segments`] collapses
//! them into a single predicate that the user repository renders to SQL.

use crate::types::DbId;

/// One audience segment as stored on a communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentFilter {
    pub province_id: Option<DbId>,
    pub user_type_id: Option<DbId>,
}

impl SegmentFilter {
    pub fn province(id: DbId) -> Self {
        Self {
            province_id: Some(id),
            user_type_id: None,
        }
    }

    pub fn user_type(id: DbId) -> Self {
        Self {
            province_id: None,
            user_type_id: Some(id),
        }
    }
}

/// The recipient predicate a set of segments resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudienceFilter {
    /// No segments: every user of the default customer type.
    DefaultCustomers,
    /// Users living in any of the provinces, whatever their type.
    Provinces(Vec<DbId>),
    /// Users of any of the types, wherever they live.
    UserTypes(Vec<DbId>),
    /// Users matching one of the provinces AND one of the types.
    ProvincesAndUserTypes {
        provinces: Vec<DbId>,
        user_types: Vec<DbId>,
    },
    /// Segments exist but none names a dimension.
    Everyone,
}

impl AudienceFilter {
    /// Build the filter for a communication's segments.
    ///
    /// Province and type ids are de-duplicated and sorted so equal segment
    /// sets always produce equal filters.
    pub fn from_segments(segments: &[SegmentFilter]) -> Self {
        if segments.is_empty() {
            return Self::DefaultCustomers;
        }

        let provinces = distinct(segments.iter().filter_map(|s| s.province_id));
        let user_types = distinct(segments.iter().filter_map(|s| s.user_type_id));

        match (provinces.is_empty(), user_types.is_empty()) {
            (false, false) => Self::ProvincesAndUserTypes {
                provinces,
                user_types,
            },
            (false, true) => Self::Provinces(provinces),
            (true, false) => Self::UserTypes(user_types),
            (true, true) => Self::Everyone,
        }
    }

    /// Build segments from the id lists submitted with a communication form.
    ///
    /// Each selected province and each selected user type becomes its own
    /// single-dimension segment; duplicates are dropped.
    pub fn segments_from_selection(
        province_ids: &[DbId],
        user_type_ids: &[DbId],
    ) -> Vec<SegmentFilter> {
        let provinces = distinct(province_ids.iter().copied());
        let user_types = distinct(user_type_ids.iter().copied());
        provinces
            .into_iter()
            .map(SegmentFilter::province)
            .chain(user_types.into_iter().map(SegmentFilter::user_type))
            .collect()
    }
}

fn distinct(ids: impl Iterator<Item = DbId>) -> Vec<DbId> {
    let mut ids: Vec<DbId> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
