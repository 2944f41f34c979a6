//! Character classes used to find the end of atoms and the gaps between them

/// Punctuation that can appear inside an atom
const SYMBOL_PUNCTUATION: &str = "!$%&*+-./:<=>?^_~#|";

/// The default symbol predicate, ascii letters, digits and some punctuation
pub fn is_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric() || SYMBOL_PUNCTUATION.contains(c)
}

/// Non-ascii letters and digits, accepted when unicode symbols are enabled
pub fn is_unicode_symbol(c: char) -> bool {
    !c.is_ascii() && c.is_alphanumeric()
}

/// Whitespace as understood by the C locale
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{B}' | '\u{C}' | '\r')
}
