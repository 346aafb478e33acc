//! Interface de linha de comando do SALETARGET baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] e flags globais
//! (--data-dir, --ephemeral, --verbose). Sem subcomando, abre o painel interativo.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SALETARGET — acompanhe sua meta de vendas, uma venda de cada vez.
#[derive(Debug, Parser)]
#[command(name = "saletarget", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Diretório onde o progresso é gravado.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Mantém o progresso só em memória nesta execução.
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Abre o painel interativo (padrão).
    Dashboard,

    /// Mostra o painel uma vez e sai.
    Status,

    /// Registra vendas.
    Sale {
        /// Quantas vendas registrar.
        #[arg(long, short, default_value_t = 1)]
        count: u32,
    },

    /// Desfaz a última venda.
    Undo,

    /// Zera o progresso (pede confirmação).
    Reset,

    /// Altera a configuração da meta.
    Set {
        /// Valor da meta.
        #[arg(long, allow_negative_numbers = true)]
        target: Option<f64>,

        /// Valor de cada venda.
        #[arg(long, allow_negative_numbers = true)]
        unit: Option<f64>,

        /// Moeda: código ISO (BRL), símbolo (R$) ou texto livre.
        #[arg(long)]
        currency: Option<String>,
    },

    /// Pede um conselho motivacional ao modelo.
    Advice,

    /// Lista as moedas disponíveis.
    Currencies,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn no_subcommand_means_dashboard() {
        let cli = Cli::parse_from(["saletarget"]);
        assert!(cli.command.is_none());
        assert!(!cli.ephemeral);
    }

    #[test]
    fn cli_parses_sale_count() {
        let cli = Cli::parse_from(["saletarget", "sale", "--count", "3"]);
        match cli.command {
            Some(Command::Sale { count }) => assert_eq!(count, 3),
            other => panic!("expected Sale command, got {other:?}"),
        }

        let cli = Cli::parse_from(["saletarget", "sale"]);
        assert!(matches!(cli.command, Some(Command::Sale { count: 1 })));
    }

    #[test]
    fn cli_parses_set_with_negative_value() {
        let cli = Cli::parse_from([
            "saletarget",
            "set",
            "--target",
            "-50",
            "--currency",
            "BRL",
        ]);
        match cli.command {
            Some(Command::Set {
                target,
                unit,
                currency,
            }) => {
                assert_eq!(target, Some(-50.0));
                assert!(unit.is_none());
                assert_eq!(currency.as_deref(), Some("BRL"));
            }
            other => panic!("expected Set command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "saletarget",
            "--data-dir",
            "/tmp/st",
            "--ephemeral",
            "--verbose",
            "status",
        ]);
        assert!(cli.verbose);
        assert!(cli.ephemeral);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/st")));
        assert!(matches!(cli.command, Some(Command::Status)));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
