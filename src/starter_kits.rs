//! Static catalog of the officially published starter kits, and the
//! short-name convention used to refer to them on the command line.
//!
//! Short names drop the language-specific repository prefix; the default
//! kit of each language collapses onto the `"default"` sentinel, which
//! converts back to the default kit's full name.

use anyhow::{bail, Result};

use crate::language::Language;

/// One entry in the static starter kit catalog.
#[derive(Debug, Clone, Copy)]
pub struct StarterKit {
    pub full_name: &'static str,
    pub description: &'static str,
}

/// Short name that stands for the default kit of a language.
pub const DEFAULT_KIT_SHORT_NAME: &str = "default";

const JAVASCRIPT_KITS: &[StarterKit] = &[
    StarterKit {
        full_name: "fastly/compute-starter-kit-javascript-default",
        description: "Default package template for JavaScript based Fastly Compute projects",
    },
    StarterKit {
        full_name: "fastly/compute-starter-kit-javascript-empty",
        description: "Empty package template for JavaScript based Fastly Compute projects",
    },
];

const TYPESCRIPT_KITS: &[StarterKit] = &[StarterKit {
    full_name: "fastly/compute-starter-kit-typescript",
    description: "A simple Fastly starter kit for Typescript",
}];

/// Known kits for `language`. The first entry is that language's default.
pub fn known_starter_kits(language: Language) -> &'static [StarterKit] {
    match language {
        Language::Javascript => JAVASCRIPT_KITS,
        Language::Typescript => TYPESCRIPT_KITS,
    }
}

pub fn default_starter_kit(language: Language) -> &'static StarterKit {
    &known_starter_kits(language)[0]
}

fn kit_prefix(language: Language) -> String {
    format!("fastly/compute-starter-kit-{language}")
}

/// Strip the language-specific repository prefix from a kit's full name.
/// Fails when `full_name` is not a kit of `language`.
pub fn full_name_to_short_name(language: Language, full_name: &str) -> Result<String> {
    let prefix = kit_prefix(language);
    let Some(remainder) = full_name.strip_prefix(prefix.as_str()) else {
        bail!("{full_name} is not the name of a starter kit of language {language}");
    };

    if remainder.is_empty() || full_name == default_starter_kit(language).full_name {
        return Ok(DEFAULT_KIT_SHORT_NAME.to_string());
    }

    Ok(remainder.strip_prefix('-').unwrap_or(remainder).to_string())
}

/// Inverse of [`full_name_to_short_name`]. Short names outside the known
/// catalog are allowed; the kit may exist only on GitHub.
pub fn short_name_to_full_name(language: Language, short_name: &str) -> String {
    if short_name == DEFAULT_KIT_SHORT_NAME {
        default_starter_kit(language).full_name.to_string()
    } else {
        format!("{}-{}", kit_prefix(language), short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kit_is_first_catalog_entry() {
        for language in Language::ALL {
            assert_eq!(
                default_starter_kit(language).full_name,
                known_starter_kits(language)[0].full_name,
            );
        }
    }

    #[test]
    fn test_default_kits_collapse_to_sentinel() {
        // JavaScript's default kit carries a "-default" suffix; TypeScript's
        // is the bare prefix. Both map to the sentinel.
        let js = full_name_to_short_name(
            Language::Javascript,
            "fastly/compute-starter-kit-javascript-default",
        )
        .unwrap();
        assert_eq!(js, DEFAULT_KIT_SHORT_NAME);

        let ts = full_name_to_short_name(
            Language::Typescript,
            "fastly/compute-starter-kit-typescript",
        )
        .unwrap();
        assert_eq!(ts, DEFAULT_KIT_SHORT_NAME);
    }

    #[test]
    fn test_short_name_strips_prefix_and_separator() {
        let short = full_name_to_short_name(
            Language::Javascript,
            "fastly/compute-starter-kit-javascript-queue-log",
        )
        .unwrap();
        assert_eq!(short, "queue-log");
    }

    #[test]
    fn test_sentinel_converts_back_to_default_kit() {
        assert_eq!(
            short_name_to_full_name(Language::Javascript, "default"),
            "fastly/compute-starter-kit-javascript-default",
        );
        assert_eq!(
            short_name_to_full_name(Language::Typescript, "default"),
            "fastly/compute-starter-kit-typescript",
        );
    }

    #[test]
    fn test_unknown_short_names_concatenate() {
        assert_eq!(
            short_name_to_full_name(Language::Javascript, "expressly"),
            "fastly/compute-starter-kit-javascript-expressly",
        );
    }

    #[test]
    fn test_round_trip_over_known_catalog() {
        for language in Language::ALL {
            for kit in known_starter_kits(language) {
                let short = full_name_to_short_name(language, kit.full_name).unwrap();
                assert_eq!(short_name_to_full_name(language, &short), kit.full_name);
            }
        }
    }

    #[test]
    fn test_wrong_language_prefix_is_rejected() {
        let result = full_name_to_short_name(
            Language::Typescript,
            "fastly/compute-starter-kit-javascript-default",
        );
        assert!(result.is_err());
    }
}
