//! Interactive dashboard session.
//!
//! [`Dashboard`] owns the campaign store plus the transient UI fields that are
//! never persisted. Advice requests run on spawned tasks and report back over a
//! channel, so sales can still be recorded while a request is outstanding.
//! Results are applied in the order they settle; the last one wins.

use console::Term;
use dialoguer::{Input, Select};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use crate::advice::{Advice, AdvicePhase, AdviceRequest, Advisor};
use crate::campaign::{CURRENCIES, CampaignStore, ConfirmPrompt};
use crate::error::SaleTargetError;
use crate::generation::MessageSender;
use crate::storage::KeyValueStore;
use crate::ui::{Screen, TerminalConfirm};

/// Session-local view state, reset on every start.
#[derive(Debug, Default)]
pub struct UiState {
    pub advice: String,
    pub advice_phase: AdvicePhase,
    pub show_config_panel: bool,
    in_flight: usize,
}

impl UiState {
    pub fn is_loading_advice(&self) -> bool {
        self.in_flight > 0
    }
}

/// Everything the user can do from the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RecordSale,
    UndoSale,
    Reset,
    ToggleConfig,
    SetCurrency(String),
    SetTarget(f64),
    SetUnitValue(f64),
    RequestAdvice,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Dashboard<S: KeyValueStore, G> {
    store: CampaignStore<S>,
    ui: UiState,
    advisor: Advisor<G>,
    runtime: Handle,
    advice_tx: UnboundedSender<Advice>,
    advice_rx: UnboundedReceiver<Advice>,
}

impl<S, G> Dashboard<S, G>
where
    S: KeyValueStore,
    G: MessageSender + Send + Sync + 'static,
{
    pub fn new(store: CampaignStore<S>, advisor: Advisor<G>, runtime: Handle) -> Self {
        let (advice_tx, advice_rx) = unbounded_channel();
        Self {
            store,
            ui: UiState::default(),
            advisor,
            runtime,
            advice_tx,
            advice_rx,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &CampaignStore<S> {
        &self.store
    }

    #[cfg(test)]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn screen(&self) -> String {
        Screen {
            state: self.store.state(),
            progress: self.store.progress(),
            advice: &self.ui.advice,
            is_loading_advice: self.ui.is_loading_advice(),
            show_config_panel: self.ui.show_config_panel,
        }
        .render()
    }

    pub fn dispatch(&mut self, action: Action, confirm: &mut impl ConfirmPrompt) -> Flow {
        debug!(?action, "dispatch");
        // A settled phase has been shown once; the next action acknowledges it.
        if matches!(
            self.ui.advice_phase,
            AdvicePhase::Succeeded | AdvicePhase::FellBack
        ) {
            self.ui.advice_phase = AdvicePhase::Idle;
        }
        match action {
            Action::RecordSale => self.store.record_sale(),
            Action::UndoSale => self.store.undo_sale(),
            Action::Reset => {
                self.store.reset_progress(confirm);
            }
            Action::ToggleConfig => self.ui.show_config_panel = !self.ui.show_config_panel,
            Action::SetCurrency(_) | Action::SetTarget(_) | Action::SetUnitValue(_)
                if !self.ui.show_config_panel =>
            {
                debug!("config panel locked, edit ignored");
            }
            Action::SetCurrency(input) => self.store.set_currency_symbol(&input),
            Action::SetTarget(value) => self.store.set_target_amount(value),
            Action::SetUnitValue(value) => self.store.set_unit_value(value),
            Action::RequestAdvice => self.request_advice(),
            Action::Refresh => {}
            Action::Quit => return Flow::Quit,
        }
        self.drain_advice();
        Flow::Continue
    }

    fn request_advice(&mut self) {
        let req = AdviceRequest::from_state(self.store.state());
        let advisor = self.advisor.clone();
        let tx = self.advice_tx.clone();
        self.ui.in_flight += 1;
        self.ui.advice_phase = AdvicePhase::Requesting;
        self.runtime.spawn(async move {
            let advice = advisor.request(&req).await;
            // The receiver only goes away with the session.
            let _ = tx.send(advice);
        });
    }

    /// Applies every advice result that has settled, without waiting.
    pub fn drain_advice(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(advice) = self.advice_rx.try_recv() {
            self.apply_advice(advice);
            applied += 1;
        }
        applied
    }

    /// Shows the settled text right away; the phase only leaves `Requesting`
    /// once no other request is outstanding.
    fn apply_advice(&mut self, advice: Advice) {
        self.ui.in_flight = self.ui.in_flight.saturating_sub(1);
        self.ui.advice_phase = if self.ui.in_flight > 0 {
            AdvicePhase::Requesting
        } else {
            advice.source.into()
        };
        self.ui.advice = advice.text;
        debug!(phase = ?self.ui.advice_phase, pending = self.ui.in_flight, "advice settled");
    }

    #[cfg(test)]
    async fn settle_next_advice(&mut self) -> bool {
        match self.advice_rx.recv().await {
            Some(advice) => {
                self.apply_advice(advice);
                true
            }
            None => false,
        }
    }

    /// Runs the interactive loop until the user quits. Blocks the calling thread.
    pub fn run(&mut self) -> Result<(), SaleTargetError> {
        let term = Term::stdout();
        let mut confirm = TerminalConfirm;
        loop {
            self.drain_advice();
            term.clear_screen()?;
            term.write_line(&self.screen())?;
            term.write_line("")?;

            let action = self.choose_action()?;
            if self.dispatch(action, &mut confirm) == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn choose_action(&self) -> Result<Action, SaleTargetError> {
        let toggle = if self.ui.show_config_panel {
            "Lock config"
        } else {
            "Setup target"
        };
        let mut entries: Vec<(&str, MenuEntry)> = vec![
            ("+ RECORD SALE", MenuEntry::Sale),
            ("Undo last sale", MenuEntry::Undo),
            ("Reset progress", MenuEntry::Reset),
            (toggle, MenuEntry::Toggle),
        ];
        if self.ui.show_config_panel {
            entries.push(("  Currency", MenuEntry::Currency));
            entries.push(("  Target amount", MenuEntry::Target));
            entries.push(("  Value per sale", MenuEntry::Unit));
        }
        entries.push(("Get advice", MenuEntry::Advice));
        entries.push(("Refresh", MenuEntry::Refresh));
        entries.push(("Quit", MenuEntry::Quit));

        let labels: Vec<&str> = entries.iter().map(|(label, _)| *label).collect();
        let picked = Select::new().items(&labels).default(0).interact()?;
        let state = self.store.state();

        Ok(match entries[picked].1 {
            MenuEntry::Sale => Action::RecordSale,
            MenuEntry::Undo => Action::UndoSale,
            MenuEntry::Reset => Action::Reset,
            MenuEntry::Toggle => Action::ToggleConfig,
            MenuEntry::Currency => Action::SetCurrency(pick_currency(&state.currency_symbol)?),
            MenuEntry::Target => Action::SetTarget(
                Input::<f64>::new()
                    .with_prompt(format!("Target ({})", state.currency_symbol))
                    .default(state.target_amount)
                    .interact_text()?,
            ),
            MenuEntry::Unit => Action::SetUnitValue(
                Input::<f64>::new()
                    .with_prompt(format!("Per sale ({})", state.currency_symbol))
                    .default(state.unit_value)
                    .interact_text()?,
            ),
            MenuEntry::Advice => Action::RequestAdvice,
            MenuEntry::Refresh => Action::Refresh,
            MenuEntry::Quit => Action::Quit,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum MenuEntry {
    Sale,
    Undo,
    Reset,
    Toggle,
    Currency,
    Target,
    Unit,
    Advice,
    Refresh,
    Quit,
}

fn pick_currency(current: &str) -> Result<String, SaleTargetError> {
    let mut labels: Vec<String> = CURRENCIES
        .iter()
        .map(|c| format!("{} ({})", c.symbol, c.code))
        .collect();
    labels.push("Other...".to_string());
    let default = CURRENCIES
        .iter()
        .position(|c| c.symbol == current)
        .unwrap_or(CURRENCIES.len());

    let picked = Select::new()
        .with_prompt("Currency")
        .items(&labels)
        .default(default)
        .interact()?;
    if let Some(currency) = CURRENCIES.get(picked) {
        return Ok(currency.symbol.to_string());
    }
    Ok(Input::<String>::new()
        .with_prompt("Currency label")
        .default(current.to_string())
        .interact_text()?)
}
