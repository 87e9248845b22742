//! Result-size limit shared by the ranked list endpoints.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A validated row limit for ranked lists such as recent or top courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limit(i64);

impl Limit {
    /// Maximum rows a ranked list may return.
    pub const MAX: i64 = 50;

    pub fn new(value: i64) -> Result<Self, AppError> {
        if (1..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::InvalidArgument(format!(
                "limit must be between 1 and {}, got {value}",
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// `?limit=` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// Use the requested limit, or `default` when the parameter is absent.
    pub fn resolve(&self, default: Limit) -> Result<Limit, AppError> {
        match self.limit {
            Some(value) => Limit::new(value),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_values_in_range() {
        assert_eq!(Limit::new(1).unwrap().get(), 1);
        assert_eq!(Limit::new(Limit::MAX).unwrap().get(), Limit::MAX);
    }

    #[test]
    fn rejects_out_of_range_instead_of_clamping() {
        assert!(matches!(Limit::new(0), Err(AppError::InvalidArgument(_))));
        assert!(matches!(Limit::new(-3), Err(AppError::InvalidArgument(_))));
        assert!(matches!(
            Limit::new(Limit::MAX + 1),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn query_falls_back_to_default_only_when_absent() {
        let default = Limit::new(5).unwrap();
        assert_eq!(LimitQuery { limit: None }.resolve(default).unwrap(), default);
        assert_eq!(
            LimitQuery { limit: Some(3) }.resolve(default).unwrap().get(),
            3
        );
        assert!(LimitQuery { limit: Some(500) }.resolve(default).is_err());
    }
}
