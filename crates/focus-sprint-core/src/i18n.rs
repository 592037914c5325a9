//! Locale choice and the strings the core and its hosts need.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "es")]
    Es,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::PtBr, Locale::Es];

    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::PtBr => "pt-BR",
            Locale::Es => "es",
        }
    }

    /// Map a system language string (`pt_BR.UTF-8`, `es-MX`, ...) by its
    /// two-letter prefix. Anything unknown is English.
    pub fn detect(lang: &str) -> Self {
        let prefix: String = lang.chars().take(2).collect::<String>().to_ascii_lowercase();
        match prefix.as_str() {
            "pt" => Locale::PtBr,
            "es" => Locale::Es,
            _ => Locale::En,
        }
    }

    /// Detect from `LC_ALL`, then `LANG`.
    pub fn from_env() -> Self {
        ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.is_empty())
            .map(|v| Self::detect(&v))
            .unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|l| l.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLocale(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    AppName,
    FocusTime,
    Break,
    LongBreak,
    Play,
    Pause,
    Delete,
    DeleteAllTasks,
    DeleteCompletedTasks,
    ConfirmDeleteAll,
    ConfirmDeleteCompleted,
    /// Takes `{task}`.
    ConfirmDeleteSingle,
    ModalConfirm,
    ModalCancel,
    /// Takes `{mode}`.
    SessionFinished,
}

impl MessageKey {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Focus => MessageKey::FocusTime,
            Mode::Break => MessageKey::Break,
            Mode::LongBreak => MessageKey::LongBreak,
        }
    }
}

pub fn translate(key: MessageKey, locale: Locale) -> &'static str {
    use MessageKey::*;
    match (locale, key) {
        (_, AppName) => "Focus Sprint",

        (Locale::En, FocusTime) => "Focus Time",
        (Locale::En, Break) => "Break",
        (Locale::En, LongBreak) => "Long break",
        (Locale::En, Play) => "PLAY",
        (Locale::En, Pause) => "PAUSE",
        (Locale::En, Delete) => "Delete",
        (Locale::En, DeleteAllTasks) => "Delete All Tasks",
        (Locale::En, DeleteCompletedTasks) => "Delete Completed Tasks",
        (Locale::En, ConfirmDeleteAll) => {
            "Are you sure you want to delete ALL tasks? This cannot be undone."
        }
        (Locale::En, ConfirmDeleteCompleted) => {
            "Are you sure you want to delete all COMPLETED tasks?"
        }
        (Locale::En, ConfirmDeleteSingle) => {
            "Are you sure you want to delete the task: \"{task}\"?"
        }
        (Locale::En, ModalConfirm) => "Confirm",
        (Locale::En, ModalCancel) => "Cancel",
        (Locale::En, SessionFinished) => "Time for your {mode} session is up!",

        (Locale::PtBr, FocusTime) => "Tempo de Foco",
        (Locale::PtBr, Break) => "Intervalo",
        (Locale::PtBr, LongBreak) => "Intervalo Longo",
        (Locale::PtBr, Play) => "INICIAR",
        (Locale::PtBr, Pause) => "PAUSAR",
        (Locale::PtBr, Delete) => "Excluir",
        (Locale::PtBr, DeleteAllTasks) => "Excluir Todas as Tarefas",
        (Locale::PtBr, DeleteCompletedTasks) => "Excluir Tarefas Concluídas",
        (Locale::PtBr, ConfirmDeleteAll) => {
            "Tem certeza que deseja excluir TODAS as tarefas? Esta ação não pode ser desfeita."
        }
        (Locale::PtBr, ConfirmDeleteCompleted) => {
            "Tem certeza que deseja excluir todas as tarefas CONCLUÍDAS?"
        }
        (Locale::PtBr, ConfirmDeleteSingle) => {
            "Tem certeza que deseja excluir a tarefa: \"{task}\"?"
        }
        (Locale::PtBr, ModalConfirm) => "Confirmar",
        (Locale::PtBr, ModalCancel) => "Cancelar",
        (Locale::PtBr, SessionFinished) => "O tempo da sua sessão de {mode} acabou!",

        (Locale::Es, FocusTime) => "Tiempo de Enfoque",
        (Locale::Es, Break) => "Descanso",
        (Locale::Es, LongBreak) => "Descanso Largo",
        (Locale::Es, Play) => "INICIAR",
        (Locale::Es, Pause) => "PAUSAR",
        (Locale::Es, Delete) => "Eliminar",
        (Locale::Es, DeleteAllTasks) => "Eliminar Todas las Tareas",
        (Locale::Es, DeleteCompletedTasks) => "Eliminar Tareas Completadas",
        (Locale::Es, ConfirmDeleteAll) => {
            "¿Estás seguro de que quieres eliminar TODAS las tareas? Esta acción no se puede deshacer."
        }
        (Locale::Es, ConfirmDeleteCompleted) => {
            "¿Estás seguro de que quieres eliminar todas las tareas COMPLETADAS?"
        }
        (Locale::Es, ConfirmDeleteSingle) => {
            "¿Estás seguro de que quieres eliminar la tarea: \"{task}\"?"
        }
        (Locale::Es, ModalConfirm) => "Confirmar",
        (Locale::Es, ModalCancel) => "Cancelar",
        (Locale::Es, SessionFinished) => "¡Se acabó el tiempo de tu sesión de {mode}!",
    }
}

/// Translate and fill `{name}` placeholders.
pub fn translate_with(key: MessageKey, locale: Locale, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(translate(key, locale).to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}
