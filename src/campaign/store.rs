use tracing::debug;

use super::metrics::Progress;
use super::state::{CampaignState, Currency, clamp_amount};
use crate::storage::{KeyValueStore, load_campaign, save_campaign};

/// Message shown before progress is reset.
pub const RESET_PROMPT: &str = "CONFIRM RESET: All progress will be deleted.";

/// Asks the user a yes/no question before a destructive action.
pub trait ConfirmPrompt {
    /// Returns `true` only if the user explicitly accepts.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Owns the campaign state and mirrors it to storage after every mutation.
pub struct CampaignStore<S: KeyValueStore> {
    state: CampaignState,
    storage: S,
}

impl<S: KeyValueStore> CampaignStore<S> {
    /// Rehydrates from `storage`, falling back to defaults.
    pub fn open(storage: S) -> Self {
        let state = load_campaign(&storage);
        debug!(?state, "campaign loaded");
        Self { state, storage }
    }

    pub fn state(&self) -> &CampaignState {
        &self.state
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.state)
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn record_sale(&mut self) {
        self.state.sales_count = self.state.sales_count.saturating_add(1);
        self.persist();
    }

    /// Removes the last sale; a count of zero stays zero.
    pub fn undo_sale(&mut self) {
        self.state.sales_count = self.state.sales_count.saturating_sub(1);
        self.persist();
    }

    /// Sets the sales count back to zero once the user confirms.
    ///
    /// Target, unit value and currency are kept. Returns whether the reset happened.
    pub fn reset_progress(&mut self, confirm: &mut impl ConfirmPrompt) -> bool {
        if !confirm.confirm(RESET_PROMPT) {
            debug!("reset declined");
            return false;
        }
        self.state.sales_count = 0;
        self.persist();
        true
    }

    pub fn set_target_amount(&mut self, value: f64) {
        self.state.target_amount = clamp_amount(value);
        self.persist();
    }

    pub fn set_unit_value(&mut self, value: f64) {
        self.state.unit_value = clamp_amount(value);
        self.persist();
    }

    /// Stores a known code/symbol as its symbol, or free text verbatim. Blank input is ignored.
    pub fn set_currency_symbol(&mut self, input: &str) {
        if let Some(symbol) = Currency::resolve_symbol(input) {
            self.state.currency_symbol = symbol;
            self.persist();
        }
    }

    fn persist(&mut self) {
        save_campaign(&mut self.storage, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, STORAGE_KEY};

    struct Answer(bool);

    impl ConfirmPrompt for Answer {
        fn confirm(&mut self, prompt: &str) -> bool {
            assert_eq!(prompt, RESET_PROMPT);
            self.0
        }
    }

    fn reopen(store: &CampaignStore<MemoryStore>) -> CampaignState {
        load_campaign(store.storage())
    }

    #[test]
    fn fresh_store_uses_defaults() {
        let store = CampaignStore::open(MemoryStore::new());
        assert_eq!(store.state(), &CampaignState::default());
    }

    #[test]
    fn record_twelve_sales() {
        let mut store = CampaignStore::open(MemoryStore::new());
        for _ in 0..12 {
            store.record_sale();
        }
        let p = store.progress();
        assert_eq!(store.state().sales_count, 12);
        assert_eq!(p.current_amount, 600.0);
        assert!((p.percentage_complete - 60.0).abs() < 1e-9);
        assert_eq!(p.sales_needed, 8);
    }

    #[test]
    fn undo_never_goes_below_zero() {
        let mut store = CampaignStore::open(MemoryStore::new());
        store.undo_sale();
        assert_eq!(store.state().sales_count, 0);

        store.record_sale();
        store.undo_sale();
        store.undo_sale();
        assert_eq!(store.state().sales_count, 0);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let mut store = CampaignStore::open(MemoryStore::new());
        store.record_sale();
        assert_eq!(reopen(&store).sales_count, 1);
        store.set_target_amount(2000.0);
        assert_eq!(reopen(&store).target_amount, 2000.0);
        store.set_unit_value(125.5);
        assert_eq!(reopen(&store).unit_value, 125.5);
        store.set_currency_symbol("gbp");
        assert_eq!(reopen(&store).currency_symbol, "£");
        assert_eq!(&reopen(&store), store.state());
    }

    #[test]
    fn declined_reset_keeps_sales() {
        let mut store = CampaignStore::open(MemoryStore::new());
        for _ in 0..4 {
            store.record_sale();
        }
        assert!(!store.reset_progress(&mut Answer(false)));
        assert_eq!(store.state().sales_count, 4);
        assert_eq!(reopen(&store).sales_count, 4);
    }

    #[test]
    fn confirmed_reset_keeps_configuration() {
        let mut store = CampaignStore::open(MemoryStore::new());
        store.set_target_amount(300.0);
        store.set_unit_value(30.0);
        store.set_currency_symbol("EUR");
        store.record_sale();

        assert!(store.reset_progress(&mut Answer(true)));
        let state = reopen(&store);
        assert_eq!(state.sales_count, 0);
        assert_eq!(state.target_amount, 300.0);
        assert_eq!(state.unit_value, 30.0);
        assert_eq!(state.currency_symbol, "€");
    }

    #[test]
    fn negative_inputs_clamp_to_zero() {
        let mut store = CampaignStore::open(MemoryStore::new());
        store.set_target_amount(-100.0);
        store.set_unit_value(-1.0);
        assert_eq!(store.state().target_amount, 0.0);
        assert_eq!(store.state().unit_value, 0.0);
    }

    #[test]
    fn blank_currency_is_ignored() {
        let mut store = CampaignStore::open(MemoryStore::new());
        store.set_currency_symbol("  ");
        assert_eq!(store.state().currency_symbol, "$");
    }

    #[test]
    fn rehydrates_existing_record() {
        let raw = r#"{"targetAmount":500,"unitValue":0,"salesCount":5,"currencySymbol":"$"}"#;
        let store = CampaignStore::open(MemoryStore::with_entry(STORAGE_KEY, raw));
        assert_eq!(store.state().sales_count, 5);
        assert_eq!(store.progress().sales_needed, 500);
    }

    #[test]
    fn write_failures_do_not_block_the_session() {
        let mut store = CampaignStore::open(MemoryStore::failing());
        store.record_sale();
        store.record_sale();
        assert_eq!(store.state().sales_count, 2);
        assert_eq!(store.storage().get(STORAGE_KEY), None);
    }
}
