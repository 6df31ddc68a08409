// tests/support/mocks/util.rs
use dealership_core::application::ports::util::SlugGenerator;

/// Real slugify with a constant disambiguator, so every listing with the
/// same attributes competes for the same candidate slug.
#[derive(Clone)]
pub struct SequentialSlug {
    token: &'static str,
}

impl SequentialSlug {
    pub const TOKEN: &'static str = "aaaaaa";

    pub fn new() -> Self {
        Self { token: Self::TOKEN }
    }
}

impl Default for SequentialSlug {
    fn default() -> Self {
        Self::new()
    }
}

impl SlugGenerator for SequentialSlug {
    fn slugify(&self, input: &str) -> String {
        slug::slugify(input)
    }

    fn disambiguator(&self, len: usize) -> String {
        self.token.chars().cycle().take(len).collect()
    }
}
