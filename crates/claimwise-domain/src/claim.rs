//! Claim module - the unit of work for one decisioning call

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while turning raw input into a [`ClaimSubmission`]
///
/// A claim that fails validation never reaches the scorer or the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Applicant identifier is not exactly four ASCII digits
    #[error("Invalid applicant identifier '{0}': expected exactly 4 digits")]
    InvalidApplicantId(String),

    /// Earnings could not be read as a finite number
    #[error("Invalid earnings '{0}': expected a non-negative number")]
    InvalidEarnings(String),

    /// Earnings parsed but were below zero
    #[error("Earnings must be non-negative, got {0}")]
    NegativeEarnings(f64),

    /// Employment duration is not a non-negative whole number of months
    #[error("Invalid employment duration '{0}': expected a non-negative integer")]
    InvalidEmploymentMonths(String),

    /// Pattern severity outside 1..=5
    #[error("Invalid severity {0}: expected an integer between 1 and 5")]
    InvalidSeverity(i64),
}

/// Last four digits of a national ID, used to group an applicant's filings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicantId(String);

impl ApplicantId {
    /// Parse an applicant identifier, trimming surrounding whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use claimwise_domain::ApplicantId;
    ///
    /// assert!(ApplicantId::parse("1234").is_ok());
    /// assert!(ApplicantId::parse("12a4").is_err());
    /// assert!(ApplicantId::parse("12345").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidApplicantId(s.to_string()))
        }
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ApplicantId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApplicantId> for String {
    fn from(id: ApplicantId) -> Self {
        id.0
    }
}

/// A validated claim submission
///
/// Fields are private so the only way to get one is through validation;
/// once built it cannot change.
///
/// `employer` and `separation_reason` are stored trimmed. Every consumer
/// (built-in rules, dynamic rules, history, and the embedding text) sees
/// the trimmed text, so `" Shell Co "` is the same employer as `"Shell Co"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimSubmission {
    ssn_last4: ApplicantId,
    employer: String,
    separation_reason: String,
    earnings: f64,
    employment_months: u32,
}

impl ClaimSubmission {
    /// Build a claim from typed values, enforcing the field invariants
    ///
    /// # Examples
    ///
    /// ```
    /// use claimwise_domain::ClaimSubmission;
    ///
    /// let claim = ClaimSubmission::new("1234", "Acme Corp", "layoff", 5000.0, 12).unwrap();
    /// assert_eq!(claim.employment_months(), 12);
    ///
    /// assert!(ClaimSubmission::new("1234", "Acme Corp", "layoff", -1.0, 12).is_err());
    /// ```
    pub fn new(
        ssn_last4: &str,
        employer: impl Into<String>,
        separation_reason: impl Into<String>,
        earnings: f64,
        employment_months: u32,
    ) -> Result<Self, ValidationError> {
        let ssn_last4 = ApplicantId::parse(ssn_last4)?;

        let employer = employer.into().trim().to_string();
        if employer.is_empty() {
            return Err(ValidationError::MissingField("employer"));
        }

        let separation_reason = separation_reason.into().trim().to_string();
        if separation_reason.is_empty() {
            return Err(ValidationError::MissingField("separation_reason"));
        }

        if !earnings.is_finite() {
            return Err(ValidationError::InvalidEarnings(earnings.to_string()));
        }
        if earnings < 0.0 {
            return Err(ValidationError::NegativeEarnings(earnings));
        }

        Ok(Self {
            ssn_last4,
            employer,
            separation_reason,
            earnings,
            employment_months,
        })
    }

    /// Applicant identifier
    pub fn ssn_last4(&self) -> &ApplicantId {
        &self.ssn_last4
    }

    /// Employer name
    pub fn employer(&self) -> &str {
        &self.employer
    }

    /// Free-text separation reason
    pub fn separation_reason(&self) -> &str {
        &self.separation_reason
    }

    /// Earnings over the last six months
    pub fn earnings(&self) -> f64 {
        self.earnings
    }

    /// Employment duration in whole months
    pub fn employment_months(&self) -> u32 {
        self.employment_months
    }

    /// Text handed to the embedding provider
    ///
    /// Always the same four fields in the same layout, so identical claims
    /// embed identically under a deterministic provider.
    pub fn context_text(&self) -> String {
        format!(
            "Employer: {}\nReason: {}\nEarnings: {}\nEmployment Duration: {} months",
            self.employer, self.separation_reason, self.earnings, self.employment_months
        )
    }
}

/// A numeric field as it arrives on the wire: either a JSON number or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// Already numeric
    Number(f64),
    /// Text that still needs parsing
    Text(String),
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Unvalidated claim input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClaim {
    /// Last four digits of the national ID
    #[serde(default)]
    pub ssn_last4: Option<String>,

    /// Employer name
    #[serde(default)]
    pub employer: Option<String>,

    /// Reason for separation
    #[serde(default)]
    pub separation_reason: Option<String>,

    /// Earnings over the last six months
    #[serde(default)]
    pub earnings: Option<RawNumber>,

    /// Employment duration in months
    #[serde(default)]
    pub employment_months: Option<RawNumber>,
}

impl RawClaim {
    /// Validate into a [`ClaimSubmission`]
    pub fn validate(&self) -> Result<ClaimSubmission, ValidationError> {
        let ssn = self
            .ssn_last4
            .as_deref()
            .ok_or(ValidationError::MissingField("ssn_last4"))?;
        let employer = self
            .employer
            .as_deref()
            .ok_or(ValidationError::MissingField("employer"))?;
        let reason = self
            .separation_reason
            .as_deref()
            .ok_or(ValidationError::MissingField("separation_reason"))?;
        let earnings = parse_earnings(
            self.earnings
                .as_ref()
                .ok_or(ValidationError::MissingField("earnings"))?,
        )?;
        let months = parse_months(
            self.employment_months
                .as_ref()
                .ok_or(ValidationError::MissingField("employment_months"))?,
        )?;

        ClaimSubmission::new(ssn, employer, reason, earnings, months)
    }
}

fn parse_earnings(raw: &RawNumber) -> Result<f64, ValidationError> {
    let value = match raw {
        RawNumber::Number(n) => *n,
        RawNumber::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidEarnings(s.clone()))?,
    };

    if !value.is_finite() {
        return Err(ValidationError::InvalidEarnings(value.to_string()));
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeEarnings(value));
    }
    Ok(value)
}

fn parse_months(raw: &RawNumber) -> Result<u32, ValidationError> {
    match raw {
        RawNumber::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 {
                Ok(*n as u32)
            } else {
                Err(ValidationError::InvalidEmploymentMonths(n.to_string()))
            }
        }
        RawNumber::Text(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidEmploymentMonths(s.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawClaim {
        RawClaim {
            ssn_last4: Some("1234".to_string()),
            employer: Some("Acme Corp".to_string()),
            separation_reason: Some("layoff".to_string()),
            earnings: Some(RawNumber::Number(5000.0)),
            employment_months: Some(RawNumber::Number(12.0)),
        }
    }

    #[test]
    fn test_valid_raw_claim() {
        let claim = raw().validate().unwrap();
        assert_eq!(claim.ssn_last4().as_str(), "1234");
        assert_eq!(claim.employer(), "Acme Corp");
        assert_eq!(claim.earnings(), 5000.0);
        assert_eq!(claim.employment_months(), 12);
    }

    #[test]
    fn test_text_numbers_are_parsed() {
        let mut input = raw();
        input.earnings = Some(RawNumber::from(" 1000.50 "));
        input.employment_months = Some(RawNumber::from("3"));

        let claim = input.validate().unwrap();
        assert_eq!(claim.earnings(), 1000.5);
        assert_eq!(claim.employment_months(), 3);
    }

    #[test]
    fn test_missing_field() {
        let mut input = raw();
        input.employer = None;
        assert_eq!(input.validate(), Err(ValidationError::MissingField("employer")));

        let mut input = raw();
        input.earnings = None;
        assert_eq!(input.validate(), Err(ValidationError::MissingField("earnings")));
    }

    #[test]
    fn test_blank_reason_rejected() {
        let mut input = raw();
        input.separation_reason = Some("   ".to_string());
        assert_eq!(
            input.validate(),
            Err(ValidationError::MissingField("separation_reason"))
        );
    }

    #[test]
    fn test_bad_earnings() {
        let mut input = raw();
        input.earnings = Some(RawNumber::from("lots"));
        assert!(matches!(input.validate(), Err(ValidationError::InvalidEarnings(_))));

        input.earnings = Some(RawNumber::Number(-5.0));
        assert_eq!(input.validate(), Err(ValidationError::NegativeEarnings(-5.0)));

        input.earnings = Some(RawNumber::Number(f64::NAN));
        assert!(matches!(input.validate(), Err(ValidationError::InvalidEarnings(_))));
    }

    #[test]
    fn test_bad_months() {
        let mut input = raw();
        input.employment_months = Some(RawNumber::Number(2.5));
        assert!(matches!(
            input.validate(),
            Err(ValidationError::InvalidEmploymentMonths(_))
        ));

        input.employment_months = Some(RawNumber::from("-3"));
        assert!(matches!(
            input.validate(),
            Err(ValidationError::InvalidEmploymentMonths(_))
        ));

        input.employment_months = Some(RawNumber::Number(-1.0));
        assert!(matches!(
            input.validate(),
            Err(ValidationError::InvalidEmploymentMonths(_))
        ));
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let claim = ClaimSubmission::new("1234", " Shell Co ", "\tquit \n", 5000.0, 12).unwrap();
        assert_eq!(claim.employer(), "Shell Co");
        assert_eq!(claim.separation_reason(), "quit");
        assert_eq!(
            claim.context_text(),
            ClaimSubmission::new("1234", "Shell Co", "quit", 5000.0, 12)
                .unwrap()
                .context_text()
        );
    }

    #[test]
    fn test_applicant_id_format() {
        assert!(ApplicantId::parse(" 0042 ").is_ok());
        assert!(ApplicantId::parse("123").is_err());
        assert!(ApplicantId::parse("abcd").is_err());
        assert!(ApplicantId::parse("").is_err());
    }

    #[test]
    fn test_context_text_is_stable() {
        let a = ClaimSubmission::new("1234", "Acme Corp", "layoff", 5000.0, 12).unwrap();
        let b = ClaimSubmission::new("9876", "Acme Corp", "layoff", 5000.0, 12).unwrap();

        // Applicant id does not take part in the embedding text
        assert_eq!(a.context_text(), b.context_text());
        assert!(a.context_text().contains("Employer: Acme Corp"));
        assert!(a.context_text().contains("Employment Duration: 12 months"));
    }

    #[test]
    fn test_raw_claim_from_json() {
        let json = r#"{
            "ssn_last4": "1234",
            "employer": "Acme Corp",
            "separation_reason": "layoff",
            "earnings": "5000",
            "employment_months": 12
        }"#;
        let input: RawClaim = serde_json::from_str(json).unwrap();
        let claim = input.validate().unwrap();
        assert_eq!(claim.earnings(), 5000.0);
    }
}
