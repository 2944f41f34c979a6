use lisp_core::config::{Configuration, ConfigurationCategory};

const INFO: &str = include_str!("../../docs/docs.txt");

pub fn info(input: Option<&str>) {
    let info = parse_docs();

    let input = if let Some(input) = input {
        input
    } else {
        print_all_info(&info);
        return;
    };

    if input.eq_ignore_ascii_case("flags") {
        print_flags();
        return;
    }

    if let Ok(idx) = input.parse::<usize>() {
        if idx > info.len() {
            println!(
                "Unable to get numbered documentation entry \"{}\", maximum number is {}",
                input,
                info.len()
            );
        } else if idx == 0 {
            println!("Unable to get documentation entry 0, minimum value is 1");
        } else {
            print_info(&info[idx - 1]);
        }
        return;
    }

    match find_topic(&info, input) {
        Some((idx, sim)) if sim >= 1.0 => print_info(&info[idx]),
        Some((idx, sim)) => {
            println!("Found topic with {}% similarity", (sim * 100.0) as i32);
            print_info(&info[idx]);
        }
        None => println!("Unable to find relevant documentation topic"),
    }
}

/// Find the topic closest to the input, an exact match has similarity 1
fn find_topic(info: &[(String, String)], input: &str) -> Option<(usize, f64)> {
    let input = input.to_lowercase();

    // search for exact string match
    if let Some(idx) = info.iter().position(|(name, _)| name.to_lowercase() == input) {
        return Some((idx, 1.0));
    }

    // try fuzzy string matching, finding the largest similarity
    let (idx, sim) = info
        .iter()
        .enumerate()
        .map(|(idx, (name, _))| {
            let name = name.to_lowercase();

            (idx, strsim::normalized_damerau_levenshtein(&name, &input))
        })
        .fold((0, f64::NAN), |acc, (idx, sim)| {
            if sim > acc.1 || acc.1.is_nan() {
                (idx, sim)
            } else {
                acc
            }
        });

    if sim.is_nan() || sim < 0.25 {
        None
    } else {
        Some((idx, sim))
    }
}

/// Print a single documentation message
fn print_info(info: &(String, String)) {
    println!("Documentation on {}:\n{}", info.0, info.1);
}

/// Print the name of all available documentation topics
fn print_all_info(info: &[(String, String)]) {
    println!("Available documentation topics:");

    for (idx, (name, _)) in info.iter().enumerate() {
        println!("{:>3}. {}", idx + 1, name);
    }
    println!("  -  flags");
}

/// Print every configuration flag with its help text
fn print_flags() {
    let config = Configuration::new();

    for flag in config.iter() {
        let option = match flag.category() {
            ConfigurationCategory::Warning => "-W/-A/-D",
            ConfigurationCategory::Reader => "-f/-F",
        };
        println!("{:<10} {:<20} {}", option, flag.name(), flag.help_text());
    }
}

/// Parse the documentation file
fn parse_docs() -> Vec<(String, String)> {
    let remove_carriage_return = INFO.chars().filter(|&c| c != '\r').collect::<String>();

    let remove_comments = remove_carriage_return
        .lines()
        .filter(|s| !s.starts_with('#'))
        .collect::<Vec<_>>();
    let remove_comments = remove_comments.join("\n");
    let remove_comments = remove_comments.trim();

    remove_comments
        .split("\n\n-")
        .filter_map(|s| {
            s.split_once('\n').map(|(name, content)| {
                (
                    name.trim_start_matches("- ").trim().to_string(),
                    content.to_string(),
                )
            })
        })
        .collect()
}
