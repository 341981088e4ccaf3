use super::error::RealmsError;
use super::types::{RealmReference, RealmSummary};
use crate::config::RealmSelector;

/// Pick one realm out of the listing.
///
/// `Index(n)` takes `realms[n]` in service order and never falls back to a
/// different entry when the list is too short. Entries without an id are
/// only an error when they are the one selected.
pub fn select_realm(
    realms: &[RealmSummary],
    selector: &RealmSelector,
) -> Result<RealmReference, RealmsError> {
    let found = match selector {
        RealmSelector::Index(index) => {
            realms
                .get(*index)
                .ok_or(RealmsError::IndexOutOfRange {
                    index: *index,
                    available: realms.len(),
                })?
        }
        RealmSelector::Name(name) => realms
            .iter()
            .find(|r| r.name.as_deref() == Some(name.as_str()))
            .ok_or_else(|| RealmsError::NoMatch {
                selector: selector.clone(),
            })?,
        RealmSelector::Id(id) => realms
            .iter()
            .find(|r| r.id.as_deref() == Some(id.as_str()))
            .ok_or_else(|| RealmsError::NoMatch {
                selector: selector.clone(),
            })?,
    };

    let world_id = found.id.clone().ok_or_else(|| {
        RealmsError::MalformedResponse(format!("realm selected by {} has no id", selector))
    })?;

    Ok(RealmReference { world_id })
}
