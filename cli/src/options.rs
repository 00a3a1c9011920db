use std::collections::BTreeMap;

use crate::error::Error;

/// A string-valued option recognized by a sub-command.
pub struct StringOption {
    pub name: &'static str,
    pub required: bool,
}

/// A boolean option recognized by a sub-command. Written as `--name` or
/// `--name true|false` on the command line.
pub struct BoolOption {
    pub name: &'static str,
    pub default: bool,
}

/// The closed set of options a sub-command recognizes, plus its expected
/// sub-verb positional when it has one (e.g. the `deploy` literal).
///
/// Applying a schema is the only way to obtain a [`ParsedOptions`]; no raw
/// flag map escapes this module.
pub struct OptionSchema {
    pub command: &'static str,
    pub sub_verb: Option<&'static str>,
    pub strings: &'static [StringOption],
    pub bools: &'static [BoolOption],
}

/// Outcome of applying a schema to an argument list.
#[derive(Debug)]
pub enum ParseOutcome {
    /// A help flag was present (or the sub-verb was omitted entirely); the
    /// caller renders usage and stops without building a request.
    Help,
    Options(ParsedOptions),
}

/// Validated options for one invocation. Only names from the schema appear;
/// booleans are always present, filled from their defaults when unset.
#[derive(Debug)]
pub struct ParsedOptions {
    strings: BTreeMap<&'static str, String>,
    bools: BTreeMap<&'static str, bool>,
}

impl ParsedOptions {
    pub fn required(&self, name: &str) -> Result<String, Error> {
        self.strings
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Validation(format!("Missing required option: --{name}")))
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        self.strings.get(name).cloned()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or_default()
    }
}

#[derive(Debug)]
enum RawValue {
    String(String),
    Bool(bool),
}

impl OptionSchema {
    /// Applies the schema to a flat argument list, collecting violations of a
    /// class before reporting: every unrecognized option name appears in one
    /// error message, not just the first.
    pub fn apply(&self, args: &[String]) -> Result<ParseOutcome, Error> {
        let (positionals, raw_options, help) = self.scan(args);

        if help || (self.sub_verb.is_some() && positionals.is_empty()) {
            return Ok(ParseOutcome::Help);
        }

        self.check_positionals(&positionals)?;

        let mut strings = BTreeMap::new();
        for option in self.strings {
            match raw_options.iter().rev().find(|(name, _)| name.as_str() == option.name) {
                Some((_, RawValue::String(value))) => {
                    if value.trim().is_empty() {
                        return Err(Error::Validation(format!(
                            "Invalid option: --{} cannot be empty",
                            option.name
                        )));
                    }
                    strings.insert(option.name, value.clone());
                }
                _ if option.required => {
                    return Err(Error::Validation(format!(
                        "Missing required option: --{}",
                        option.name
                    )));
                }
                _ => {}
            }
        }

        let mut bools = BTreeMap::new();
        for option in self.bools {
            let value = match raw_options.iter().rev().find(|(name, _)| name.as_str() == option.name) {
                Some((_, RawValue::Bool(value))) => *value,
                _ => option.default,
            };
            bools.insert(option.name, value);
        }

        self.check_unrecognized(&raw_options)?;

        Ok(ParseOutcome::Options(ParsedOptions { strings, bools }))
    }

    /// Walks the raw token list. `--name value` for string options, `--name`
    /// or `--name true|false` for boolean ones, `-h` aliases `--help`; every
    /// other token is a positional argument. The last occurrence of a
    /// duplicated flag wins.
    fn scan(&self, args: &[String]) -> (Vec<String>, Vec<(String, RawValue)>, bool) {
        let mut positionals = Vec::new();
        let mut raw_options: Vec<(String, RawValue)> = Vec::new();
        let mut help = false;

        let mut iter = args.iter().peekable();
        while let Some(token) = iter.next() {
            if token == "--help" || token == "-h" {
                help = true;
                continue;
            }
            let name = match token.strip_prefix("--").or_else(|| token.strip_prefix('-')) {
                Some(name) => name.to_string(),
                None => {
                    positionals.push(token.clone());
                    continue;
                }
            };
            let value = if self.is_bool(&name) {
                match iter.peek() {
                    Some(next) if next.as_str() == "true" || next.as_str() == "false" => {
                        RawValue::Bool(iter.next().map(|v| v.as_str() == "true").unwrap_or(true))
                    }
                    _ => RawValue::Bool(true),
                }
            } else {
                match iter.peek() {
                    Some(next) if !next.starts_with('-') => {
                        RawValue::String(iter.next().cloned().unwrap_or_default())
                    }
                    _ => RawValue::String(String::new()),
                }
            };
            raw_options.push((name, value));
        }

        (positionals, raw_options, help)
    }

    fn is_bool(&self, name: &str) -> bool {
        self.bools.iter().any(|option| option.name == name)
    }

    fn is_recognized(&self, name: &str) -> bool {
        self.strings.iter().any(|option| option.name == name) || self.is_bool(name)
    }

    fn check_positionals(&self, positionals: &[String]) -> Result<(), Error> {
        match self.sub_verb {
            Some(expected) => {
                if positionals[0] != expected {
                    return Err(Error::Validation(format!(
                        "Invalid command: {}. Supported commands are: {expected}",
                        positionals[0]
                    )));
                }
                if positionals.len() > 1 {
                    return Err(Error::Validation(format!(
                        "The {} command does not take any arguments, only options.",
                        self.command
                    )));
                }
            }
            None => {
                if !positionals.is_empty() {
                    return Err(Error::Validation(format!(
                        "The {} command does not take any arguments, only options.",
                        self.command
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rejects every option name outside the schema, enumerating all of them
    /// in a single message.
    fn check_unrecognized(&self, raw_options: &[(String, RawValue)]) -> Result<(), Error> {
        let mut unrecognized: Vec<&str> = Vec::new();
        for (name, _) in raw_options {
            if !self.is_recognized(name) && !unrecognized.contains(&name.as_str()) {
                unrecognized.push(name.as_str());
            }
        }
        if unrecognized.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "Invalid options: {}",
                unrecognized.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: OptionSchema = OptionSchema {
        command: "frob",
        sub_verb: Some("frob"),
        strings: &[
            StringOption { name: "alpha", required: true },
            StringOption { name: "beta", required: false },
        ],
        bools: &[BoolOption { name: "gamma", default: true }],
    };

    const FLAT_SCHEMA: OptionSchema = OptionSchema {
        command: "tweak",
        sub_verb: None,
        strings: &[StringOption { name: "alpha", required: true }],
        bools: &[],
    };

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn options(schema: &OptionSchema, tokens: &[&str]) -> ParsedOptions {
        match schema.apply(&args(tokens)).unwrap() {
            ParseOutcome::Options(options) => options,
            ParseOutcome::Help => panic!("unexpected help outcome"),
        }
    }

    fn error(schema: &OptionSchema, tokens: &[&str]) -> String {
        schema.apply(&args(tokens)).unwrap_err().to_string()
    }

    #[test]
    fn parses_string_and_bool_options() {
        let options = options(&SCHEMA, &["frob", "--alpha", "a", "--beta", "b", "--gamma", "false"]);
        assert_eq!(options.required("alpha").unwrap(), "a");
        assert_eq!(options.optional("beta").as_deref(), Some("b"));
        assert!(!options.flag("gamma"));
    }

    #[test]
    fn bool_defaults_to_true_when_unset() {
        let options = options(&SCHEMA, &["frob", "--alpha", "a"]);
        assert!(options.flag("gamma"));
    }

    #[test]
    fn bare_bool_flag_means_true() {
        let options = options(&SCHEMA, &["frob", "--alpha", "a", "--gamma"]);
        assert!(options.flag("gamma"));
    }

    #[test]
    fn absent_optional_string_stays_unset() {
        let options = options(&SCHEMA, &["frob", "--alpha", "a"]);
        assert_eq!(options.optional("beta"), None);
    }

    #[test]
    fn last_duplicate_wins() {
        let options = options(&SCHEMA, &["frob", "--alpha", "first", "--alpha", "second"]);
        assert_eq!(options.required("alpha").unwrap(), "second");
    }

    #[test]
    fn missing_required_option_is_named() {
        assert_eq!(error(&SCHEMA, &["frob"]), "Missing required option: --alpha");
    }

    #[test]
    fn whitespace_only_value_is_rejected() {
        assert_eq!(
            error(&SCHEMA, &["frob", "--alpha", "   "]),
            "Invalid option: --alpha cannot be empty"
        );
    }

    #[test]
    fn value_missing_at_end_of_args_is_rejected() {
        assert_eq!(
            error(&SCHEMA, &["frob", "--alpha"]),
            "Invalid option: --alpha cannot be empty"
        );
    }

    #[test]
    fn unrecognized_options_are_all_enumerated() {
        assert_eq!(
            error(&SCHEMA, &["frob", "--alpha", "a", "--bogus", "x", "--other", "y"]),
            "Invalid options: bogus, other"
        );
    }

    #[test]
    fn sub_verb_mismatch_is_rejected() {
        assert_eq!(
            error(&SCHEMA, &["worble", "--alpha", "a"]),
            "Invalid command: worble. Supported commands are: frob"
        );
    }

    #[test]
    fn extra_positionals_are_rejected() {
        assert_eq!(
            error(&SCHEMA, &["frob", "stray", "--alpha", "a"]),
            "The frob command does not take any arguments, only options."
        );
    }

    #[test]
    fn empty_args_show_help_when_sub_verb_expected() {
        assert!(matches!(SCHEMA.apply(&[]).unwrap(), ParseOutcome::Help));
    }

    #[test]
    fn help_flag_wins_over_validation() {
        let outcome = SCHEMA.apply(&args(&["frob", "--help"])).unwrap();
        assert!(matches!(outcome, ParseOutcome::Help));
        let outcome = SCHEMA.apply(&args(&["frob", "-h"])).unwrap();
        assert!(matches!(outcome, ParseOutcome::Help));
    }

    #[test]
    fn flat_command_validates_instead_of_showing_help_on_empty_args() {
        assert_eq!(error(&FLAT_SCHEMA, &[]), "Missing required option: --alpha");
    }

    #[test]
    fn flat_command_rejects_positionals() {
        assert_eq!(
            error(&FLAT_SCHEMA, &["stray", "--alpha", "a"]),
            "The tweak command does not take any arguments, only options."
        );
    }
}
