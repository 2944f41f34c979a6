use std::{
    fmt::{self, Display},
    fs,
    io::{self, Read},
};

use anyhow::Result;
use clap::{clap_app, crate_description, crate_version, ArgMatches};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use lisp_core::{
    compile::compile,
    config::{Configuration, ConfigurationCategory, WarningLevel},
    environment::Environment,
    lint::lint,
    run::{self, bind_args, SourceFile},
};

mod info;
mod repl;

/// Errors encountered while interpreting the input arguments
#[derive(Debug, Error)]
enum InputError {
    #[error("Encountered errors while reading files:\n{files}")]
    FileError { files: IoErrorVec },

    #[error("Unknown warning `{name}`, see `lisp info flags`")]
    UnknownWarning { name: String },

    #[error("Unknown reader option `{name}`, see `lisp info flags`")]
    UnknownOption { name: String },
}

/// New type wrapper to provide display impl
#[derive(Debug)]
struct IoErrorVec(Vec<io::Error>);

impl Display for IoErrorVec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for err in &self.0 {
            writeln!(f, "{}", err)?;
        }

        Ok(())
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error:\n{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = clap_app!(lisp =>
        (version: crate_version!())
        (about: crate_description!())
        (@arg input: +multiple "Input files to read, - reads stdin.  Starts a prompt if not present.")
        (@arg eval: -e --eval +takes_value conflicts_with[input] "Read the given source code")
        (@arg compile: -c --compile +takes_value conflicts_with[input eval] "Print the given source code in canonical form")
        (@arg lint: -l --lint +takes_value conflicts_with[input eval compile] "Report warnings and free atoms in the given source code")
        (@arg warn: -W +takes_value +multiple number_of_values(1) "Report a warning")
        (@arg allow: -A +takes_value +multiple number_of_values(1) "Silence a warning")
        (@arg deny: -D +takes_value +multiple number_of_values(1) "Make a warning an error")
        (@arg enable: -f +takes_value +multiple number_of_values(1) "Enable a reader option")
        (@arg disable: -F +takes_value +multiple number_of_values(1) "Disable a reader option")
        (@arg verbose: -v +multiple "Log more, repeat for more detail")
        (@subcommand info =>
            (about: "Print documentation about the language")
            (@arg value: +takes_value +multiple "The documentation topic to get"))
    )
    .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    // print documentation if requested
    if let Some(matches) = matches.subcommand_matches("info") {
        match matches.values_of("value") {
            Some(values) => {
                // if multiple inputs are entered assume they are words in a
                // space separated string
                info::info(Some(&values.collect::<Vec<_>>().join(" ")));
            }
            None => info::info(None),
        }
        return Ok(());
    }

    let config = configuration(&matches)?;

    let mut env = Environment::standard();
    bind_args(&mut env, std::env::args());

    if let Some(code) = matches.value_of("compile") {
        print!("{}", compile(code, &config)?);
        return Ok(());
    }

    if let Some(code) = matches.value_of("lint") {
        let report = lint(code, &config, &env)?;
        for warning in &report.warnings {
            println!("warn: {}", warning);
        }
        for atom in &report.free_atoms {
            println!("free: {}", atom);
        }
        return Ok(());
    }

    let mut sources = vec![];

    if let Some(code) = matches.value_of("eval") {
        sources.push(SourceFile {
            path: None,
            content: code.to_string(),
        });
    } else if let Some(file_names) = matches.values_of("input") {
        // any file read errors
        let mut errors = vec![];

        for file in file_names {
            // file name "-" == read from stdin
            let input = if file == "-" {
                get_stdin()
            } else {
                fs::read_to_string(file).map(|content| SourceFile {
                    path: Some(file.to_string()),
                    content,
                })
            };

            match input {
                Ok(input) => sources.push(input),
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            return Err(InputError::FileError {
                files: IoErrorVec(errors),
            }
            .into());
        }
    } else {
        return repl::repl(&config);
    }

    for program in run::run(sources, &config)? {
        for value in program.values {
            println!("{}", value);
        }
    }

    Ok(())
}

/// Build the configuration from the warning and reader option arguments
fn configuration(matches: &ArgMatches) -> Result<Configuration> {
    let mut config = Configuration::new();

    let levels = [
        ("allow", WarningLevel::Allow),
        ("warn", WarningLevel::Warn),
        ("deny", WarningLevel::Deny),
    ];
    for (arg, level) in levels {
        for name in matches.values_of(arg).into_iter().flatten() {
            let flag = config
                .lookup(ConfigurationCategory::Warning, name)
                .ok_or_else(|| InputError::UnknownWarning {
                    name: name.to_string(),
                })?;
            config.set_warning_level(flag, level);
        }
    }

    for (arg, value) in [("enable", true), ("disable", false)] {
        for name in matches.values_of(arg).into_iter().flatten() {
            let flag = config
                .lookup(ConfigurationCategory::Reader, name)
                .ok_or_else(|| InputError::UnknownOption {
                    name: name.to_string(),
                })?;
            config.set_bool(flag, value);
        }
    }

    Ok(config)
}

/// Send logs to stderr, `LISP_LOG` overrides the level picked by -v
fn init_logging(verbosity: u64) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("LISP_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// read source code from stdin
fn get_stdin() -> Result<SourceFile, io::Error> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(SourceFile {
        path: Some("stdin".to_string()),
        content: input,
    })
}
