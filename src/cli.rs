//! Interface de linha de comando baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (create, submit,
//! status, watch, versions, core-types, software) e flags globais
//! (--api-key, --base-url, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rescale-jobs: cria, submete e acompanha jobs na plataforma Rescale.
#[derive(Debug, Parser)]
#[command(name = "rescale-jobs", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Chave da API; tem precedência sobre `RESCALE_API_KEY` e `rescale.toml`.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// URL base da API (ex.: região europeia).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Arquivo de configuração alternativo.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cria um job a partir de um arquivo de definição TOML ou JSON.
    Create {
        /// Caminho para o arquivo de definição do job.
        definition: PathBuf,

        /// Submete o job logo após a criação.
        #[arg(long, default_value_t = false)]
        submit: bool,
    },

    /// Submete um job já criado.
    Submit {
        /// Id do job na plataforma.
        id: String,
    },

    /// Mostra o status atual de um job.
    Status {
        /// Id do job na plataforma.
        id: String,
    },

    /// Acompanha um job até chegar a um estado terminal.
    Watch {
        /// Id do job na plataforma.
        id: String,

        /// Intervalo entre consultas, em segundos.
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },

    /// Lista o catálogo de versões de um software (ex.: abaqus).
    Versions {
        /// Código do software na plataforma.
        software: String,
    },

    /// Lista os tipos de core disponíveis.
    CoreTypes {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Lista os softwares disponíveis.
    Software {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_create_subcommand() {
        let cli = Cli::parse_from(["rescale-jobs", "create", "job.toml", "--submit"]);
        match cli.command {
            Command::Create { definition, submit } => {
                assert_eq!(definition, PathBuf::from("job.toml"));
                assert!(submit);
            }
            _ => panic!("expected Create command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "rescale-jobs",
            "--api-key",
            "tok",
            "--base-url",
            "https://eu.rescale.com/api/v2/",
            "--verbose",
            "status",
            "aBcD12",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.api_key.as_deref(), Some("tok"));
        assert_eq!(cli.base_url.as_deref(), Some("https://eu.rescale.com/api/v2/"));
        assert!(matches!(cli.command, Command::Status { ref id } if id == "aBcD12"));
    }

    #[test]
    fn cli_watch_default_interval() {
        let cli = Cli::parse_from(["rescale-jobs", "watch", "aBcD12"]);
        match cli.command {
            Command::Watch { id, interval } => {
                assert_eq!(id, "aBcD12");
                assert_eq!(interval, 30);
            }
            _ => panic!("expected Watch command"),
        }
    }

    #[test]
    fn cli_parses_listing_pages() {
        let cli = Cli::parse_from(["rescale-jobs", "core-types", "--page", "3"]);
        assert!(matches!(cli.command, Command::CoreTypes { page: 3 }));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
