use std::cell::RefCell;

use crate::store::AppStateStore;

thread_local! {
    static APP_STATE_STORE: RefCell<Option<AppStateStore>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppStateError {
    #[error("app state must be used within an installed app state provider")]
    OutsideProvider,
    #[error("app state is already borrowed by an outer handler")]
    AlreadyBorrowed,
}

/// Installs the store for the current thread, returning any previous one.
pub fn install_app_state(store: AppStateStore) -> Option<AppStateStore> {
    APP_STATE_STORE.with(|slot| slot.replace(Some(store)))
}

pub fn uninstall_app_state() -> Option<AppStateStore> {
    APP_STATE_STORE.with(RefCell::take)
}

#[must_use]
pub fn app_state_installed() -> bool {
    APP_STATE_STORE.with(|slot| slot.try_borrow().is_ok_and(|store| store.is_some()))
}

pub fn with_app_state<T>(read: impl FnOnce(&AppStateStore) -> T) -> Result<T, AppStateError> {
    APP_STATE_STORE.with(|slot| {
        let slot = slot
            .try_borrow()
            .map_err(|_| AppStateError::AlreadyBorrowed)?;
        let store = slot.as_ref().ok_or(AppStateError::OutsideProvider)?;
        Ok(read(store))
    })
}

pub fn with_app_state_mut<T>(
    update: impl FnOnce(&mut AppStateStore) -> T,
) -> Result<T, AppStateError> {
    APP_STATE_STORE.with(|slot| {
        let mut slot = slot
            .try_borrow_mut()
            .map_err(|_| AppStateError::AlreadyBorrowed)?;
        let store = slot.as_mut().ok_or(AppStateError::OutsideProvider)?;
        Ok(update(store))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NavigateRequest;
    use crate::store::MemoryRouter;

    #[test]
    fn access_without_provider_fails_fast() {
        uninstall_app_state();
        assert!(!app_state_installed());
        assert_eq!(
            with_app_state(|store| store.is_authenticated()),
            Err(AppStateError::OutsideProvider)
        );
        assert_eq!(
            with_app_state_mut(|store| store.handle_sign_out()),
            Err(AppStateError::OutsideProvider)
        );
    }

    #[test]
    fn installed_store_is_shared_across_calls() {
        let router = MemoryRouter::new();
        assert!(install_app_state(AppStateStore::new(router.clone())).is_none());

        with_app_state_mut(|store| store.handle_navigate(NavigateRequest::to("contact")))
            .expect("provider installed");
        let path = with_app_state(|store| store.current_page().to_path())
            .expect("provider installed");

        assert_eq!(path, "/contact");
        assert_eq!(router.current_path(), "/contact");
        assert!(uninstall_app_state().is_some());
    }

    #[test]
    fn nested_mutable_access_is_reported() {
        install_app_state(AppStateStore::new(MemoryRouter::new()));
        let nested = with_app_state_mut(|_| with_app_state(|store| store.is_authenticated()))
            .expect("outer access");
        assert_eq!(nested, Err(AppStateError::AlreadyBorrowed));
        uninstall_app_state();
    }
}
