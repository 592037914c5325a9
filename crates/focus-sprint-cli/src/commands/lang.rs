use clap::Subcommand;
use focus_sprint_core::{translate, Locale, MessageKey};

use crate::host::Host;

#[derive(Subcommand)]
pub enum LangAction {
    /// Print the current language tag
    Get,
    /// Choose a language (en, pt-BR, es)
    Set {
        locale: Locale,
    },
    /// List supported languages
    List,
}

pub fn run(host: &Host, action: LangAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LangAction::Get => {
            let controller = host.controller()?;
            println!("{}", controller.locale());
        }
        LangAction::Set { locale } => {
            let mut controller = host.controller()?;
            controller.set_locale(locale);
            println!("{locale}");
        }
        LangAction::List => {
            for locale in Locale::ALL {
                println!("{:<6} {}", locale.tag(), translate(MessageKey::FocusTime, locale));
            }
        }
    }
    Ok(())
}
