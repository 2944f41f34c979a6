use crate::{
    config::{Configuration, WarningLevel},
    environment::Environment,
    reader::{ReadError, ReadWarning, Reader, WithLocation, W_ALL},
};

/// Findings of the linter for a single program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LintReport {
    /// Reader warnings, in source order
    pub warnings: Vec<WithLocation<ReadWarning>>,

    /// Atoms used by the program that are not bound in the environment, in
    /// order of first use
    pub free_atoms: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.free_atoms.is_empty()
    }
}

/// Read a program and collect its warnings and free atoms.  Warnings that
/// have not been configured are raised at the warn level.
pub fn lint(
    source: &str,
    config: &Configuration,
    env: &Environment,
) -> Result<LintReport, ReadError> {
    let mut config = config.clone();
    for flag in W_ALL.aliased() {
        if !config.is_set(**flag) {
            config.set_warning_level(**flag, WarningLevel::Warn);
        }
    }

    let mut reader = Reader::new(source, &config);
    let values = reader.read_all()?;

    let mut free_atoms: Vec<String> = vec![];
    for atom in values.iter().flat_map(|value| value.used_atoms()) {
        if !env.contains(atom) && !free_atoms.iter().any(|seen| seen == atom) {
            free_atoms.push(atom.to_string());
        }
    }

    Ok(LintReport {
        warnings: reader.take_warnings(),
        free_atoms,
    })
}
