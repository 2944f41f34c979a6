use std::collections::HashMap;

use crate::reader::{F_EXTENDED_WHITESPACE, F_UNICODE_SYMBOLS, W_ALL, W_DIRECTIVE, W_UNKNOWN_ESCAPE};

/// Every flag known to the reader, used for name based lookup
pub static FLAGS: &[&Flag] = &[
    &F_UNICODE_SYMBOLS,
    &F_EXTENDED_WHITESPACE,
    &W_UNKNOWN_ESCAPE,
    &W_DIRECTIVE,
    &W_ALL,
];

/// Global configuration options
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Configuration {
    options: HashMap<Flag, FlagKind>,
}

impl Configuration {
    /// Create the default configuration settings
    pub fn new() -> Self {
        Self {
            options: HashMap::new(),
        }
    }

    /// Get a boolean configuration option
    pub fn bool(&self, value: Flag) -> Option<bool> {
        self.options
            .get(&value)
            .and_then(|kind| match kind {
                FlagKind::Boolean(val) => Some(*val),
                _ => None,
            })
            .or(match value.default {
                StaticFlagKind::Boolean(default) => Some(default),
                _ => None,
            })
    }

    /// Gets a warning level flag value
    pub fn warning_level(&self, value: Flag) -> Option<WarningLevel> {
        self.options
            .get(&value)
            .and_then(|kind| match kind {
                FlagKind::WarningLevel(val) => Some(*val),
                _ => None,
            })
            .or(match value.default {
                StaticFlagKind::WarningLevel(default) => Some(default),
                _ => None,
            })
    }

    /// Has a value been explicitly set for the flag, aliases count as set if
    /// any of their components have been set.
    pub fn is_set(&self, flag: Flag) -> bool {
        match flag.default {
            StaticFlagKind::Alias(flags) => flags.iter().any(|flag| self.is_set(**flag)),
            _ => self.options.contains_key(&flag),
        }
    }

    /// Sets a flag's boolean value.  True and false are mapped to warn
    /// and allow respectively for warning level options.  This is repeated
    /// for all values referenced by an alias flag.
    pub fn set_bool(&mut self, flag: Flag, value: bool) {
        let warn = if value {
            WarningLevel::Warn
        } else {
            WarningLevel::Allow
        };

        self.generic_setter(flag, value, warn);
    }

    /// Sets a flag's warning level value.  If it takes a boolean
    /// true => not-fatal, false => fatal error.  This is repeated for all
    /// values referenced by an alias flag.
    pub fn set_warning_level(&mut self, flag: Flag, value: WarningLevel) {
        let bool = match value {
            WarningLevel::Allow => true,
            WarningLevel::Warn => true,
            WarningLevel::Deny => false,
        };
        self.generic_setter(flag, bool, value)
    }

    /// Sets the value of a flag to either the boolean or warning value passed
    /// depending on the flag's type.  Resolves alias flags to their components.
    /// Alias flags recursively referring to each other are only visited once.
    fn generic_setter(&mut self, flag: Flag, bool: bool, warning: WarningLevel) {
        let mut checked = vec![];
        let mut todo = vec![flag];

        while let Some(flag) = todo.pop() {
            if checked.contains(&flag) {
                continue;
            }

            match flag.default {
                StaticFlagKind::Alias(flags) => {
                    // do not store an alias, set each of its components
                    for flag in flags {
                        todo.push(**flag);
                    }
                }
                StaticFlagKind::Boolean(_) => {
                    self.options.insert(flag, FlagKind::Boolean(bool));
                }
                StaticFlagKind::WarningLevel(_) => {
                    self.options.insert(flag, FlagKind::WarningLevel(warning));
                }
            }

            checked.push(flag);
        }
    }

    /// Get all of the registered flags followed by any other flag that has
    /// been given a value.  Returns in an unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        FLAGS.iter().map(|flag| **flag).chain(
            self.options
                .keys()
                .copied()
                .filter(|flag| !FLAGS.contains(&flag)),
        )
    }

    /// Attempts to lookup a flag based on its name and category, useful
    /// to convert a command line option into something that can be passed to
    /// a setter or getter.
    pub fn lookup(&self, category: ConfigurationCategory, name: &str) -> Option<Flag> {
        self.iter()
            .find(|flag| flag.category == category && flag.name == name)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

/// The type of a configuration option, options with different categories
/// can have the same name, so this is needed to differentiate between them
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum ConfigurationCategory {
    Warning,
    Reader,
}

/// An optional configuration option that can be passed to the language
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Flag {
    category: ConfigurationCategory,
    name: &'static str,
    default: StaticFlagKind,
    help: &'static str,
}

impl Flag {
    /// Create a new configuration option
    pub const fn new(category: ConfigurationCategory, name: &'static str) -> Self {
        Self {
            category,
            name,
            default: StaticFlagKind::Boolean(false),
            help: "",
        }
    }

    /// Set an option to be an alias to other options.  It is not possible to
    /// get the value of an alias, only to set it.
    pub const fn alias(self, flags: &'static [&'static Flag]) -> Self {
        Self {
            default: StaticFlagKind::Alias(flags),
            ..self
        }
    }

    /// Set an option to take a boolean value that has a default value
    pub const fn bool(self, value: bool) -> Self {
        Self {
            default: StaticFlagKind::Boolean(value),
            ..self
        }
    }

    /// Set an option to take a warning level
    pub const fn warning(self, value: WarningLevel) -> Self {
        Self {
            default: StaticFlagKind::WarningLevel(value),
            ..self
        }
    }

    /// Set the help text for a configuration option
    pub const fn help(self, help: &'static str) -> Self {
        Self { help, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> ConfigurationCategory {
        self.category
    }

    pub fn help_text(&self) -> &'static str {
        self.help
    }

    /// The flags an alias refers to, empty for any other kind of flag
    pub fn aliased(&self) -> &'static [&'static Flag] {
        match self.default {
            StaticFlagKind::Alias(flags) => flags,
            _ => &[],
        }
    }
}

/// The type of data that can be received in an option
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
enum StaticFlagKind {
    Alias(&'static [&'static Flag]),
    Boolean(bool),
    WarningLevel(WarningLevel),
}

/// The data stored inside a flag value
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
enum FlagKind {
    Boolean(bool),
    WarningLevel(WarningLevel),
}

/// The severity of an individual warning message
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum WarningLevel {
    Allow,
    Warn,
    Deny,
}
