use crate::domain::errors::{DomainError, DomainResult};
use std::fmt;

pub const SLUG_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingId(i64);

impl ListingId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("listing id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<ListingId> for i64 {
    fn from(value: ListingId) -> Self {
        value.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! name_value_object {
    ($name:ident, $label:literal, $max:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into().trim().to_string();
                if value.is_empty() {
                    return Err(DomainError::Validation(
                        concat!($label, " cannot be empty").into(),
                    ));
                }
                if value.chars().count() > $max {
                    return Err(DomainError::Validation(format!(
                        concat!($label, " must be at most {} characters"),
                        $max
                    )));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

name_value_object!(MakeName, "make", 100);
name_value_object!(ModelName, "model", 100);
name_value_object!(VariantName, "variant", 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationYear(i32);

impl RegistrationYear {
    pub const MIN: i32 = 1900;
    pub const MAX: i32 = 2100;

    pub fn new(year: i32) -> DomainResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&year) {
            return Err(DomainError::Validation(format!(
                "registration year must be between {} and {}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(year))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// Asking price in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn new(amount: i64) -> DomainResult<Self> {
        if amount < 0 {
            return Err(DomainError::Validation("price cannot be negative".into()));
        }
        Ok(Self(amount))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mileage(i64);

impl Mileage {
    pub fn new(km: i64) -> DomainResult<Self> {
        if km < 0 {
            return Err(DomainError::Validation("mileage cannot be negative".into()));
        }
        Ok(Self(km))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

/// URL-safe listing identifier: lowercase ASCII alphanumeric runs joined by
/// single hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingSlug(String);

impl ListingSlug {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if !Self::is_well_formed(&value) {
            return Err(DomainError::Validation(format!(
                "invalid slug: {value:?}"
            )));
        }
        Ok(Self(value))
    }

    pub fn is_well_formed(value: &str) -> bool {
        !value.is_empty()
            && value.len() <= SLUG_MAX_LEN
            && value
                .split('-')
                .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ListingSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ListingSlug> for String {
    fn from(value: ListingSlug) -> Self {
        value.0
    }
}
