use crate::github::types::Languages;

/// Reduce a language breakdown to the single entry matching `language`, compared
/// case-insensitively. The upstream spelling of the name is kept.
///
/// Returns `None` when the repository does not use the language at all.
pub fn retain_language(languages: Languages, language: &str) -> Option<Languages> {
    let wanted = language.to_uppercase();
    languages
        .into_iter()
        .find(|(name, _)| name.to_uppercase() == wanted)
        .map(|entry| Languages::from([entry]))
}
