//! Template version lifecycle rules.
//!
//! A card template owns a list of versions. Versions are created as
//! drafts, mutated only while draft, and published exactly once; publish
//! is terminal. Version numbers strictly increase per template and are
//! never reused or reordered. The "latest draft"/"latest published"
//! notions are pure derivations over the version list, never stored
//! pointers, so they cannot drift from the actual max version number.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a template version. `draft -> published`, one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Draft,
    Published,
}

impl VersionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

/// The slice of a version the state machine needs: identity, ordering,
/// and status. Built from the database entity by the repository layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRef {
    pub id: DbId,
    pub version_number: i32,
    pub status: VersionStatus,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Next version number for a template: `max(existing) + 1`, `1` when the
/// template has no versions yet.
pub fn next_version_number(existing: &[i32]) -> i32 {
    existing.iter().copied().max().unwrap_or(0) + 1
}

/// Guard for draft mutation: only draft versions are mutable.
pub fn ensure_draft(status: VersionStatus) -> Result<(), CoreError> {
    match status {
        VersionStatus::Draft => Ok(()),
        VersionStatus::Published => Err(CoreError::InvalidState(
            "Published versions are immutable; clone a new draft to edit".into(),
        )),
    }
}

/// Guard for publish: only drafts can be published, and publish is
/// irreversible. Re-publishing is a state error, not a no-op, so a lost
/// concurrent publish is observable by the caller.
pub fn ensure_publishable(status: VersionStatus) -> Result<(), CoreError> {
    match status {
        VersionStatus::Draft => Ok(()),
        VersionStatus::Published => Err(CoreError::InvalidState(
            "Version is already published".into(),
        )),
    }
}

/// A paper profile attached to a version must belong to the version's
/// card format. Mismatch is a validation error, never silently corrected.
pub fn check_profile_format(
    profile_card_format_id: DbId,
    version_card_format_id: DbId,
) -> Result<(), CoreError> {
    if profile_card_format_id == version_card_format_id {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Paper profile belongs to card format {profile_card_format_id}, \
             version uses card format {version_card_format_id}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Highest-numbered published version, if any.
pub fn latest_published(versions: &[VersionRef]) -> Option<VersionRef> {
    versions
        .iter()
        .filter(|v| v.status == VersionStatus::Published)
        .max_by_key(|v| v.version_number)
        .copied()
}

/// Highest-numbered draft version, if any.
pub fn latest_draft(versions: &[VersionRef]) -> Option<VersionRef> {
    versions
        .iter()
        .filter(|v| v.status == VersionStatus::Draft)
        .max_by_key(|v| v.version_number)
        .copied()
}

/// Which version the editor opens after a list refresh.
///
/// Precedence: (1) explicitly requested id if present, (2) previously
/// active id if still present, (3) most recent draft, (4) highest-numbered
/// version overall, (5) none.
pub fn select_active_version(
    versions: &[VersionRef],
    preferred_id: Option<DbId>,
    previous_id: Option<DbId>,
) -> Option<VersionRef> {
    let find = |wanted: Option<DbId>| {
        wanted.and_then(|id| versions.iter().find(|v| v.id == id).copied())
    };

    find(preferred_id)
        .or_else(|| find(previous_id))
        .or_else(|| latest_draft(versions))
        .or_else(|| versions.iter().max_by_key(|v| v.version_number).copied())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn v(id: DbId, number: i32, status: VersionStatus) -> VersionRef {
        VersionRef {
            id,
            version_number: number,
            status,
        }
    }

    // -- next_version_number --

    #[test]
    fn first_version_is_one() {
        assert_eq!(next_version_number(&[]), 1);
    }

    #[test]
    fn next_version_is_max_plus_one() {
        assert_eq!(next_version_number(&[1, 2, 5]), 6);
    }

    // -- transition guards --

    #[test]
    fn draft_is_mutable() {
        assert!(ensure_draft(VersionStatus::Draft).is_ok());
    }

    #[test]
    fn published_is_immutable() {
        let err = ensure_draft(VersionStatus::Published).unwrap_err();
        assert_matches!(err, CoreError::InvalidState(_));
    }

    #[test]
    fn publish_requires_draft() {
        assert!(ensure_publishable(VersionStatus::Draft).is_ok());
        assert_matches!(
            ensure_publishable(VersionStatus::Published).unwrap_err(),
            CoreError::InvalidState(_)
        );
    }

    #[test]
    fn profile_format_mismatch_is_validation_error() {
        assert!(check_profile_format(3, 3).is_ok());
        assert_matches!(
            check_profile_format(3, 4).unwrap_err(),
            CoreError::Validation(_)
        );
    }

    // -- derivations --

    #[test]
    fn latest_published_picks_highest_number() {
        let versions = [
            v(10, 1, VersionStatus::Published),
            v(11, 2, VersionStatus::Published),
            v(12, 3, VersionStatus::Draft),
        ];
        assert_eq!(latest_published(&versions).map(|x| x.id), Some(11));
        assert_eq!(latest_draft(&versions).map(|x| x.id), Some(12));
    }

    // -- select_active_version --

    #[test]
    fn requested_id_wins() {
        let versions = [
            v(1, 1, VersionStatus::Published),
            v(2, 2, VersionStatus::Draft),
        ];
        let selected = select_active_version(&versions, Some(1), Some(2));
        assert_eq!(selected.map(|x| x.id), Some(1));
    }

    #[test]
    fn unknown_requested_id_falls_back_to_previous() {
        let versions = [
            v(1, 1, VersionStatus::Published),
            v(2, 2, VersionStatus::Draft),
        ];
        let selected = select_active_version(&versions, Some(99), Some(1));
        assert_eq!(selected.map(|x| x.id), Some(1));
    }

    #[test]
    fn falls_back_to_latest_draft() {
        let versions = [
            v(1, 1, VersionStatus::Draft),
            v(2, 2, VersionStatus::Draft),
            v(3, 3, VersionStatus::Published),
        ];
        let selected = select_active_version(&versions, None, None);
        assert_eq!(selected.map(|x| x.id), Some(2));
    }

    #[test]
    fn falls_back_to_highest_version_when_no_draft() {
        let versions = [
            v(1, 1, VersionStatus::Published),
            v(2, 2, VersionStatus::Published),
        ];
        let selected = select_active_version(&versions, None, None);
        assert_eq!(selected.map(|x| x.id), Some(2));
    }

    #[test]
    fn empty_version_list_selects_none() {
        assert_eq!(select_active_version(&[], Some(1), Some(2)), None);
    }
}
