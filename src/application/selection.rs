use super::reactive::ReactiveCell;
use crate::domain::account::{Account, AccountId};
use tracing::debug;

/// The account currently picked in the account list.
///
/// Holding the whole `Account` keeps id and name in step: no selection means
/// no id and an empty name.
pub struct SelectionState {
    selected: ReactiveCell<Option<Account>>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            selected: ReactiveCell::new(None),
        }
    }

    /// Applies the rows selected in the account list. The first row wins; no
    /// rows clears the selection.
    pub fn set_selection(&self, rows: &[Account]) {
        let selected = rows.first().cloned();
        debug!(account = ?selected.as_ref().map(|a| &a.id), "Account selection changed");
        self.selected.set(selected);
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.selected.get().map(|account| account.id)
    }

    pub fn account_name(&self) -> String {
        self.selected
            .get()
            .map(|account| account.name)
            .unwrap_or_default()
    }

    /// The reactive cell queries bind to.
    pub(crate) fn cell(&self) -> &ReactiveCell<Option<Account>> {
        &self.selected
    }
}
