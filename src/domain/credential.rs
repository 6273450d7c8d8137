//! Bearer capability tokens gating privileged pool operations.

use super::CredentialId;

/// The perpetual administrative capability of a pool.
///
/// Returned once from [`Pool::new`](crate::pool::Pool::new) and required by
/// every privileged call. The pool stores only the [`CredentialId`] and
/// checks identity on each use; custody of the value itself is the
/// substrate's job. There is no public constructor, so a cap for a given id
/// can exist only if the pool handed it out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminCap {
    id: CredentialId,
}

impl AdminCap {
    pub(crate) const fn new(id: CredentialId) -> Self {
        Self { id }
    }

    /// Returns the credential identity.
    #[must_use]
    pub const fn id(&self) -> CredentialId {
        self.id
    }
}

/// The one-shot capability that permits adding assets to a pool.
///
/// Exists only between pool creation and initialization;
/// [`Pool::initialize`](crate::pool::Pool::initialize) consumes it by value,
/// after which the asset set is frozen permanently.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct NewAssetCap {
    id: CredentialId,
}

impl NewAssetCap {
    pub(crate) const fn new(id: CredentialId) -> Self {
        Self { id }
    }

    /// Returns the credential identity.
    #[must_use]
    pub const fn id(&self) -> CredentialId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_cap_exposes_its_id() {
        let id = CredentialId::from_bytes([1u8; 32]);
        let cap = AdminCap::new(id);
        assert_eq!(cap.id(), id);
    }

    #[test]
    fn new_asset_cap_exposes_its_id() {
        let id = CredentialId::from_bytes([2u8; 32]);
        let cap = NewAssetCap::new(id);
        assert_eq!(cap.id(), id);
    }

    #[test]
    fn caps_with_same_id_compare_equal() {
        let id = CredentialId::from_bytes([3u8; 32]);
        assert_eq!(AdminCap::new(id), AdminCap::new(id));
    }
}
