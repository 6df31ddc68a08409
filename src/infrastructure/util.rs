use crate::application::ports::util::SlugGenerator;
use slug::slugify;
use uuid::Uuid;

#[derive(Default, Clone)]
pub struct DefaultSlugGenerator;

impl SlugGenerator for DefaultSlugGenerator {
    fn slugify(&self, input: &str) -> String {
        slugify(input)
    }

    fn disambiguator(&self, len: usize) -> String {
        let mut token = String::with_capacity(len);
        while token.len() < len {
            token.push_str(&Uuid::new_v4().simple().to_string());
        }
        token.truncate(len);
        token
    }
}
