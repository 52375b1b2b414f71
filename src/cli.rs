//! Interface de linha de comando do PONTO baseada em clap.
//!
//! Define a struct [`Cli`] com as flags do motor (--time-slot, --test,
//! --no-wait, --daemon) e os modos informativos somente-leitura
//! (--calc-duration, --schedule, --verify).

use clap::{Parser, ValueEnum};

use crate::schedule::SlotName;

/// PONTO — transições de suporte no Jira em horários exatos.
#[derive(Debug, Parser)]
#[command(name = "ponto", version, about)]
pub struct Cli {
    /// Slot a executar; "auto" resolve pelo relógio atual.
    #[arg(long, value_enum, default_value = "auto")]
    pub time_slot: SlotArg,

    /// Apenas localiza a transição; não executa nada no tracker.
    #[arg(long)]
    pub test: bool,

    /// Não espera o segundo exato; executa imediatamente.
    #[arg(long)]
    pub no_wait: bool,

    /// Mostra o cálculo de duração (4h + 4h = 8h) e sai.
    #[arg(long)]
    pub calc_duration: bool,

    /// Mostra a tabela de slots e sai.
    #[arg(long)]
    pub schedule: bool,

    /// Verifica as credenciais do Jira e sai.
    #[arg(long)]
    pub verify: bool,

    /// Processo longo: dispara cada slot ~1 minuto antes do horário-alvo,
    /// compensando o relógio UTC do host.
    #[arg(long)]
    pub daemon: bool,
}

/// Slot aceito pela CLI, mapeado para [`SlotName`] internamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlotArg {
    /// 08:00 — início do expediente.
    #[value(name = "8AM")]
    EightAm,
    /// 12:00 — pausa de almoço.
    #[value(name = "12PM")]
    TwelvePm,
    /// 13:00 — retorno do almoço.
    #[value(name = "1PM")]
    OnePm,
    /// 17:00 — fim do expediente.
    #[value(name = "5PM")]
    FivePm,
    /// Resolve o slot devido pelo relógio atual.
    #[value(name = "auto")]
    Auto,
}

impl SlotArg {
    /// `None` significa resolução automática pelo relógio.
    pub fn to_slot_name(self) -> Option<SlotName> {
        match self {
            SlotArg::EightAm => Some(SlotName::MorningStart),
            SlotArg::TwelvePm => Some(SlotName::LunchHold),
            SlotArg::OnePm => Some(SlotName::LunchResume),
            SlotArg::FivePm => Some(SlotName::EndOfDay),
            SlotArg::Auto => None,
        }
    }
}
