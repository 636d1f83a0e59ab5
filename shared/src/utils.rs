// Text helpers shared by the engine and any renderer.
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercases and strips accents so that "Belém" and "belem" compare equal.
pub fn normalize_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// True when `term` occurs in `name`, ignoring case and accents.
/// An empty term matches everything.
pub fn matches_search(name: &str, term: &str) -> bool {
    let term = normalize_text(term.trim());
    term.is_empty() || normalize_text(name).contains(&term)
}

pub fn filter_by_search<'a, S: AsRef<str>>(names: &'a [S], term: &str) -> Vec<&'a str> {
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| matches_search(name, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Belém"), "belem");
        assert_eq!(normalize_text("SÃO MIGUEL DOS CAMPOS"), "sao miguel dos campos");
        assert_eq!(normalize_text("Maceió"), "maceio");
    }

    #[test]
    fn test_filter_by_search() {
        let names = vec!["Maceió", "Arapiraca", "Belém", "Marechal Deodoro"];
        assert_eq!(filter_by_search(&names, "mace"), vec!["Maceió"]);
        assert_eq!(filter_by_search(&names, "BELEM"), vec!["Belém"]);
        assert_eq!(filter_by_search(&names, "ma"), vec!["Maceió", "Marechal Deodoro"]);
        assert_eq!(filter_by_search(&names, "").len(), 4);
        assert!(filter_by_search(&names, "recife").is_empty());
    }
}
