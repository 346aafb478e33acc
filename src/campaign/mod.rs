mod metrics;
mod state;
mod store;

pub use metrics::{Progress, sales_needed};
pub use state::{CURRENCIES, CampaignState, Currency};
pub use store::{CampaignStore, ConfirmPrompt};
