//! Preference CLI commands

use clap::Subcommand;

use crate::config::{Currency, Language, Preferences};
use crate::error::{QuarterbookError, QuarterbookResult};
use crate::services::PreferenceService;
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show all preferences
    Show,
    /// Set the display currency (USD, EUR, GBP, JPY, INR)
    Currency { code: String },
    /// Set the language (en, fr, nl)
    Language { code: String },
    /// Turn dark mode on or off
    DarkMode { value: String },
    /// Mark the intro as seen or unseen
    IntroSeen { value: String },
}

pub fn handle_prefs_command(storage: &Storage, cmd: PrefsCommands) -> QuarterbookResult<()> {
    let service = PreferenceService::new(storage);

    let prefs = match cmd {
        PrefsCommands::Show => service.get()?,
        PrefsCommands::Currency { code } => {
            let currency = Currency::parse(&code).ok_or_else(|| {
                QuarterbookError::Validation(format!(
                    "Unknown currency '{}'. Use one of: {}",
                    code,
                    join_codes(Currency::all().iter().map(|c| c.code()))
                ))
            })?;
            service.set_currency(currency)?
        }
        PrefsCommands::Language { code } => {
            let language = Language::parse(&code).ok_or_else(|| {
                QuarterbookError::Validation(format!(
                    "Unknown language '{}'. Use one of: {}",
                    code,
                    join_codes(Language::all().iter().map(|l| l.code()))
                ))
            })?;
            service.set_language(language)?
        }
        PrefsCommands::DarkMode { value } => service.set_dark_mode(parse_flag(&value)?)?,
        PrefsCommands::IntroSeen { value } => service.set_intro_seen(parse_flag(&value)?)?,
    };

    print!("{}", format_preferences(&prefs));
    Ok(())
}

pub fn format_preferences(prefs: &Preferences) -> String {
    format!(
        "Currency:   {} ({})\nLanguage:   {} ({})\nDark mode:  {}\nIntro seen: {}\n",
        prefs.currency,
        prefs.currency.symbol(),
        prefs.language.label(),
        prefs.language.code(),
        on_off(prefs.dark_mode),
        prefs.intro_seen
    )
}

fn on_off(b: bool) -> &'static str {
    if b {
        "on"
    } else {
        "off"
    }
}

fn join_codes<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    codes.collect::<Vec<_>>().join(", ")
}

fn parse_flag(s: &str) -> QuarterbookResult<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(QuarterbookError::Validation(format!(
            "Invalid value '{}'. Use true or false",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("ON").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(parse_flag("maybe").unwrap_err().is_validation());
    }

    #[test]
    fn test_format_preferences() {
        let out = format_preferences(&Preferences::default());
        assert!(out.contains("Currency:   USD ($)"));
        assert!(out.contains("Dark mode:  off"));
    }
}
