use anyhow::{Context, Result};

use crate::{config::Configuration, environment::Environment, reader::Reader, value::Value};

/// A single source file unit description
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct SourceFile {
    pub path: Option<String>,
    pub content: String,
}

impl SourceFile {
    /// Name used when reporting errors in the file
    pub fn name(&self) -> &str {
        self.path.as_deref().unwrap_or("unknown_file")
    }
}

/// The expressions read from one source file
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub file: String,
    pub values: Vec<Value>,
}

/// Bind the command line arguments visible to programs
pub fn bind_args(env: &mut Environment, args: impl IntoIterator<Item = String>) {
    let args = args.into_iter().map(Value::String).collect::<Vec<_>>();
    env.set("cmd-args", Value::List(args));
}

/// Read each source file in order, stopping at the first one that is
/// malformed
pub fn run(sources: Vec<SourceFile>, config: &Configuration) -> Result<Vec<Program>> {
    let mut programs = Vec::with_capacity(sources.len());

    for source in sources {
        let file = source.name().to_string();
        tracing::debug!(%file, "reading source");

        let values = Reader::new(&source.content, config)
            .read_all()
            .with_context(|| format!("while reading `{}`", file))?;

        programs.push(Program { file, values });
    }

    Ok(programs)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reads_every_file() {
        let sources = vec![
            SourceFile {
                path: Some(String::from("a.lisp")),
                content: String::from("(a) 1"),
            },
            SourceFile {
                path: None,
                content: String::from("\"b\""),
            },
        ];

        let programs = run(sources, &Configuration::new()).unwrap();

        assert_eq!(
            programs,
            vec![
                Program {
                    file: String::from("a.lisp"),
                    values: vec![Value::List(vec![Value::atom("a")]), Value::Int64(1)],
                },
                Program {
                    file: String::from("unknown_file"),
                    values: vec![Value::string("b")],
                },
            ]
        );
    }

    #[test]
    fn errors_name_the_file() {
        let sources = vec![SourceFile {
            path: Some(String::from("bad.lisp")),
            content: String::from("(a"),
        }];

        let err = run(sources, &Configuration::new()).unwrap_err();

        assert_eq!(err.to_string(), "while reading `bad.lisp`");
        assert_eq!(
            err.root_cause().to_string(),
            "MalformedProgram: unterminated list starting at 1:1"
        );
    }

    #[test]
    fn args_are_strings() {
        let mut env = Environment::new();
        bind_args(&mut env, vec![String::from("lisp"), String::from("x.lisp")]);

        assert_eq!(
            env.get("cmd-args"),
            Some(&Value::List(vec![
                Value::string("lisp"),
                Value::string("x.lisp")
            ]))
        );
    }
}
