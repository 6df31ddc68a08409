// src/application/ports/util.rs
pub trait SlugGenerator: Send + Sync {
    /// Transliterate to ASCII, lowercase, and join alphanumeric runs with `-`.
    fn slugify(&self, input: &str) -> String;
    /// Random lowercase alphanumeric token of exactly `len` characters.
    fn disambiguator(&self, len: usize) -> String;
}
