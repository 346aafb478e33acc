//! Interface de terminal do SALETARGET: painel, barra de progresso, cartões e spinner.
//!
//! Os componentes de apresentação ([`ProgressIndicator`], [`StatTile`],
//! [`Screen`]) são funções puras das suas entradas e devolvem texto. A crate
//! `console` cuida dos estilos e `indicatif` do spinner exibido enquanto um
//! conselho está sendo gerado.

use console::{Style, measure_text_width};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::campaign::{CampaignState, ConfirmPrompt, Currency, Progress};

/// Agrupa milhares com vírgula: `"1234567"` vira `"1,234,567"`.
fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Formata um valor com separador de milhares e no máximo duas casas decimais.
///
/// Os dígitos vêm da representação decimal do próprio `f64`, então valores
/// acima do alcance de `u64` continuam exatos.
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::new();
    if amount < 0.0 && (whole != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Valor monetário com o símbolo da moeda como prefixo.
pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{symbol}{}", format_amount(amount))
}

/// Leitura numérica do progresso: parte inteira, sem limitar a 100%.
pub fn format_percentage(percentage: f64) -> String {
    if percentage.is_finite() {
        format!("{}%", percentage.floor() as i64)
    } else {
        "0%".to_string()
    }
}

/// Barra horizontal de progresso.
#[derive(Debug, Clone, Copy)]
pub struct ProgressIndicator {
    pub width: usize,
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl ProgressIndicator {
    /// Fração preenchida, em [0, 100].
    pub fn fill_fraction(percentage: f64) -> f64 {
        if percentage.is_nan() {
            return 0.0;
        }
        percentage.clamp(0.0, 100.0)
    }

    pub fn filled_cells(&self, percentage: f64) -> usize {
        let cells = (self.width as f64 * Self::fill_fraction(percentage) / 100.0).round() as usize;
        cells.min(self.width)
    }

    pub fn render(&self, percentage: f64) -> String {
        let filled = self.filled_cells(percentage);
        format!(
            "[{}{}]",
            "█".repeat(filled),
            "░".repeat(self.width - filled)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileVariant {
    #[default]
    Standard,
    /// Cores invertidas, para o número que mais importa.
    Inverted,
}

/// Cartão com rótulo, valor principal e legenda opcional.
#[derive(Debug, Clone)]
pub struct StatTile {
    pub label: String,
    pub value: String,
    pub caption: Option<String>,
    pub variant: TileVariant,
}

impl StatTile {
    pub fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
            caption: None,
            variant: TileVariant::Standard,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn inverted(mut self) -> Self {
        self.variant = TileVariant::Inverted;
        self
    }

    /// Renderiza o cartão como linhas de mesma largura visível.
    pub fn render(&self, min_width: usize) -> Vec<String> {
        let label = self.label.to_uppercase();
        let mut rows: Vec<(String, Style)> = vec![
            (label, Style::new().dim()),
            (self.value.clone(), Style::new().bold()),
        ];
        if let Some(caption) = &self.caption {
            rows.push((caption.clone(), Style::new().italic()));
        }

        let inner = rows
            .iter()
            .map(|(text, _)| measure_text_width(text))
            .max()
            .unwrap_or(0)
            .max(min_width);

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(format!("┌{}┐", "─".repeat(inner + 2)));
        for (text, style) in rows {
            let padded = format!(" {text}{} ", " ".repeat(inner - measure_text_width(&text)));
            let style = match self.variant {
                TileVariant::Standard => style,
                TileVariant::Inverted => style.reverse(),
            };
            lines.push(format!("│{}│", style.apply_to(padded)));
        }
        lines.push(format!("└{}┘", "─".repeat(inner + 2)));
        lines
    }
}

/// Junta blocos de linhas lado a lado, completando larguras e alturas.
fn side_by_side(blocks: &[Vec<String>], gap: usize) -> Vec<String> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = blocks
        .iter()
        .map(|b| b.iter().map(|l| measure_text_width(l)).max().unwrap_or(0))
        .collect();

    (0..height)
        .map(|row| {
            let cells: Vec<String> = blocks
                .iter()
                .zip(&widths)
                .map(|(block, &width)| {
                    let line = block.get(row).map(String::as_str).unwrap_or("");
                    format!("{line}{}", " ".repeat(width - measure_text_width(line)))
                })
                .collect();
            cells.join(&" ".repeat(gap)).trim_end().to_string()
        })
        .collect()
}

/// Tudo o que o painel mostra em um instante.
pub struct Screen<'a> {
    pub state: &'a CampaignState,
    pub progress: Progress,
    pub advice: &'a str,
    pub is_loading_advice: bool,
    pub show_config_panel: bool,
}

impl Screen<'_> {
    pub fn render(&self) -> String {
        let bold = Style::new().bold();
        let dim = Style::new().dim();
        let c = self.state.currency_symbol.as_str();
        let mut out: Vec<String> = Vec::new();

        let toggle_hint = if self.show_config_panel {
            "[config unlocked]"
        } else {
            ""
        };
        out.push(format!(
            "{}  {}",
            bold.apply_to("SALETARGET."),
            dim.apply_to(toggle_hint)
        ));
        out.push("━".repeat(60));

        if self.show_config_panel {
            let code = Currency::find(c).map(|cur| cur.code).unwrap_or("custom");
            out.push(dim.apply_to("SETUP TARGET").to_string());
            out.push(format!("  Currency   {c} ({code})"));
            out.push(format!("  Target     {}", format_money(c, self.state.target_amount)));
            out.push(format!("  Per sale   {}", format_money(c, self.state.unit_value)));
            out.push(String::new());
        }

        let tiles = [
            StatTile::new("Current Revenue", format_money(c, self.progress.current_amount))
                .caption(format!("Target: {}", format_money(c, self.state.target_amount))),
            StatTile::new("Success Count", self.state.sales_count).caption("Verified closed sales"),
            StatTile::new("Remaining Steps", self.progress.sales_needed)
                .caption(format!("Sales of {} each", format_money(c, self.state.unit_value)))
                .inverted(),
        ];
        let blocks: Vec<Vec<String>> = tiles.iter().map(|t| t.render(16)).collect();
        out.extend(side_by_side(&blocks, 1));
        out.push(String::new());

        let reached = if self.progress.target_reached() {
            "TARGET REACHED"
        } else {
            ""
        };
        out.push(format!(
            "{}  {}  {}",
            dim.apply_to("MISSION PROGRESS"),
            bold.apply_to(format_percentage(self.progress.percentage_complete)),
            bold.apply_to(reached)
        ));
        out.push(ProgressIndicator::default().render(self.progress.percentage_complete));
        out.push(String::new());

        let advice_line = if self.is_loading_advice {
            dim.apply_to("… generating advice").to_string()
        } else if self.advice.is_empty() {
            dim.apply_to("No advice yet.").to_string()
        } else {
            format!("“{}”", self.advice)
        };
        out.push(advice_line);
        out.push(String::new());
        out.push(
            dim.apply_to("Continuous Operation • Persistent Storage • Zero Noise")
                .to_string(),
        );

        out.join("\n")
    }
}

/// Confirmação interativa via `dialoguer`; qualquer erro conta como recusa.
pub struct TerminalConfirm;

impl ConfirmPrompt for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "confirmation prompt failed, treating as declined");
                false
            }
        }
    }
}

/// Spinner exibido enquanto um conselho é gerado.
pub struct AdviceSpinner {
    pb: ProgressBar,
    accent: Style,
}

impl AdviceSpinner {
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.white} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Generating advice...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            accent: Style::new().white().bold(),
        }
    }

    /// Para o spinner e imprime o conselho.
    pub fn finish(&self, advice: &str) {
        self.pb.finish_and_clear();
        println!("  {} {advice}", self.accent.apply_to("▶"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    #[test]
    fn amounts_group_thousands_and_trim_decimals() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(600.0), "600");
        assert_eq!(format_amount(1000.0), "1,000");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(0.05), "0.05");
        assert_eq!(format_money("R$", 2500.0), "R$2,500");
    }

    #[test]
    fn amounts_beyond_u64_cents_stay_exact() {
        assert!(1e20 > (u64::MAX / 100) as f64);
        assert_eq!(format_money("$", 1e20), "$100,000,000,000,000,000,000");
        assert_eq!(format_amount(1e20 + 0.5), "100,000,000,000,000,000,000");
        assert_eq!(format_amount(2.5e17), "250,000,000,000,000,000");
    }

    #[test]
    fn negative_amounts_keep_sign_unless_they_round_to_zero() {
        assert_eq!(format_amount(-1234.5), "-1,234.5");
        assert_eq!(format_amount(-0.001), "0");
        assert_eq!(format_amount(f64::NAN), "0");
    }

    #[test]
    fn percentage_readout_floors_without_clamping() {
        assert_eq!(format_percentage(59.99), "59%");
        assert_eq!(format_percentage(250.0), "250%");
        assert_eq!(format_percentage(0.0), "0%");
    }

    #[test]
    fn progress_indicator_clamps() {
        assert_eq!(ProgressIndicator::fill_fraction(-20.0), 0.0);
        assert_eq!(ProgressIndicator::fill_fraction(60.0), 60.0);
        assert_eq!(ProgressIndicator::fill_fraction(350.0), 100.0);
        assert_eq!(ProgressIndicator::fill_fraction(f64::NAN), 0.0);
    }

    #[test]
    fn progress_indicator_renders_width_cells() {
        let bar = ProgressIndicator { width: 10 };
        assert_eq!(bar.render(60.0), "[██████░░░░]");
        assert_eq!(bar.render(500.0), "[██████████]");
        assert_eq!(bar.render(-1.0), "[░░░░░░░░░░]");
    }

    #[test]
    fn tile_lines_share_width() {
        let tile = StatTile::new("Success Count", 12).caption("Verified closed sales");
        let lines = tile.render(10);
        assert_eq!(lines.len(), 5);
        let width = measure_text_width(&lines[0]);
        assert!(lines.iter().all(|l| measure_text_width(l) == width));
        let text = strip_ansi_codes(&lines.join("\n")).to_string();
        assert!(text.contains("SUCCESS COUNT"));
        assert!(text.contains("12"));
        assert!(text.contains("Verified closed sales"));
    }

    #[test]
    fn tile_without_caption_is_shorter() {
        assert_eq!(StatTile::new("Label", "1").render(4).len(), 4);
    }

    #[test]
    fn screen_shows_tiles_progress_and_advice() {
        let state = CampaignState {
            sales_count: 12,
            ..CampaignState::default()
        };
        let screen = Screen {
            state: &state,
            progress: Progress::of(&state),
            advice: "Eight more.",
            is_loading_advice: false,
            show_config_panel: false,
        };
        let text = strip_ansi_codes(&screen.render()).to_string();
        assert!(text.contains("CURRENT REVENUE"));
        assert!(text.contains("$600"));
        assert!(text.contains("Target: $1,000"));
        assert!(text.contains("Sales of $50 each"));
        assert!(text.contains("60%"));
        assert!(text.contains("Eight more."));
        assert!(!text.contains("SETUP TARGET"));
        assert!(!text.contains("TARGET REACHED"));
    }

    #[test]
    fn screen_marks_reached_target() {
        let state = CampaignState {
            sales_count: 20,
            ..CampaignState::default()
        };
        let screen = Screen {
            state: &state,
            progress: Progress::of(&state),
            advice: "",
            is_loading_advice: false,
            show_config_panel: false,
        };
        let text = strip_ansi_codes(&screen.render()).to_string();
        assert!(text.contains("100%"));
        assert!(text.contains("TARGET REACHED"));
        assert!(text.contains("No advice yet."));
    }

    #[test]
    fn screen_shows_config_panel_and_loading() {
        let state = CampaignState {
            currency_symbol: "R$".into(),
            ..CampaignState::default()
        };
        let screen = Screen {
            state: &state,
            progress: Progress::of(&state),
            advice: "old advice",
            is_loading_advice: true,
            show_config_panel: true,
        };
        let text = strip_ansi_codes(&screen.render()).to_string();
        assert!(text.contains("SETUP TARGET"));
        assert!(text.contains("R$ (BRL)"));
        assert!(text.contains("generating advice"));
        assert!(!text.contains("old advice"));
    }
}
