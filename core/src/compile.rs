use crate::{
    config::Configuration,
    reader::{ReadError, Reader},
};

/// Read a program and print it back in canonical form, one top level
/// expression per line in debug form
pub fn compile(source: &str, config: &Configuration) -> Result<String, ReadError> {
    let values = Reader::new(source, config).read_all()?;

    let mut output = String::new();
    for value in &values {
        output.push_str(&value.debug().to_string());
        output.push('\n');
    }

    Ok(output)
}
