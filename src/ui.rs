//! Interface de terminal: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente um job
//! enquanto o comando `watch` consulta a plataforma.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use rescale_jobs::{JobStatus, JobSummary};

/// Indicador visual de progresso para um job no terminal.
pub struct JobProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para conclusão.
    green: Style,
    // Estilo vermelho para falha ou cancelamento.
    red: Style,
    // Estilo amarelo para estados intermediários.
    yellow: Style,
}

impl JobProgress {
    /// Inicia o spinner com o id do job.
    pub fn start(job_id: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{job_id}: polling"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza a mensagem do spinner para refletir o status atual.
    pub fn update(&self, job_id: &str, status: JobStatus) {
        self.pb
            .set_message(format!("{job_id}: {}", self.yellow.apply_to(status)));
    }

    /// Finaliza o spinner e exibe o status terminal.
    pub fn finish(&self, job_id: &str, status: JobStatus) {
        self.pb.finish_and_clear();
        match status {
            JobStatus::Completed => {
                println!("  {} Job {job_id} completed", self.green.apply_to("✓"));
            }
            other => {
                println!("  {} Job {job_id} ended as {other}", self.red.apply_to("✗"));
            }
        }
    }
}

/// Imprime o resumo do job formatado em JSON.
pub fn print_summary(summary: &JobSummary) {
    let style = match summary.status {
        JobStatus::Completed => Style::new().green(),
        JobStatus::Failed | JobStatus::Cancelled => Style::new().red(),
        _ => Style::new().yellow(),
    };
    println!("{}", style.apply_to(format!("─── Job {} ───", summary.status)));
    println!(
        "{}",
        serde_json::to_string_pretty(summary).unwrap_or_default()
    );
}
