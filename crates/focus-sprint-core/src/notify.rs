//! Session-complete alerts.
//!
//! Delivery (a sound, a desktop popup) belongs to the host. The core decides
//! which kinds fire: sound when enabled, popup when enabled and the host has
//! granted permission.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::i18n::{translate, translate_with, Locale, MessageKey};
use crate::settings::Settings;
use crate::timer::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Sound,
    Popup,
}

pub trait Notifier: Send + Sync {
    /// `mode` is the session that just finished.
    fn notify(&self, kind: NotificationKind, mode: Mode, locale: Locale);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// The host has no way to show popups at all.
    Unsupported,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        self == Permission::Granted
    }
}

#[async_trait]
pub trait NotificationPermission: Send + Sync {
    /// Current state without prompting.
    fn status(&self) -> Permission;

    /// Ask the user (or host policy) for permission.
    async fn request(&self) -> Permission;
}

/// Fire the alerts `settings` asks for. Returns the kinds that fired.
pub fn dispatch(
    settings: &Settings,
    permission: Permission,
    notifier: &dyn Notifier,
    mode: Mode,
    locale: Locale,
) -> Vec<NotificationKind> {
    let mut fired = Vec::new();
    if settings.sound_enabled {
        notifier.notify(NotificationKind::Sound, mode, locale);
        fired.push(NotificationKind::Sound);
    }
    if settings.popup_enabled && permission.is_granted() {
        notifier.notify(NotificationKind::Popup, mode, locale);
        fired.push(NotificationKind::Popup);
    }
    debug!(%mode, ?fired, "session alerts dispatched");
    fired
}

/// Title and body of the popup for a finished `mode` session.
pub fn popup_text(mode: Mode, locale: Locale) -> (String, String) {
    let mode_name = translate(MessageKey::for_mode(mode), locale);
    (
        translate(MessageKey::AppName, locale).to_string(),
        translate_with(MessageKey::SessionFinished, locale, &[("mode", mode_name)]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNotifier;

    #[test]
    fn nothing_fires_by_default() {
        let notifier = RecordingNotifier::default();
        let fired = dispatch(
            &Settings::default(),
            Permission::Granted,
            &notifier,
            Mode::Focus,
            Locale::En,
        );
        assert!(fired.is_empty());
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn popup_text_names_the_finished_mode() {
        let (title, body) = popup_text(Mode::LongBreak, Locale::Es);
        assert_eq!(title, "Focus Sprint");
        assert_eq!(body, "¡Se acabó el tiempo de tu sesión de Descanso Largo!");
    }

    #[test]
    fn popup_needs_permission() {
        let settings = Settings {
            sound_enabled: true,
            popup_enabled: true,
            ..Settings::default()
        };
        let notifier = RecordingNotifier::default();
        dispatch(&settings, Permission::Denied, &notifier, Mode::Break, Locale::En);
        assert_eq!(notifier.sent(), vec![(NotificationKind::Sound, Mode::Break)]);

        let notifier = RecordingNotifier::default();
        dispatch(&settings, Permission::Granted, &notifier, Mode::Break, Locale::En);
        assert_eq!(
            notifier.sent(),
            vec![
                (NotificationKind::Sound, Mode::Break),
                (NotificationKind::Popup, Mode::Break)
            ]
        );
    }
}
