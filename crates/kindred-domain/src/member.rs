//! Member module - a person placed in the family tree by its code

use chrono::NaiveDate;
use std::fmt;

/// Store-assigned identifier of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(i64);

impl MemberId {
    /// Wrap a raw row id
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw row id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Postal address of a member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Street and number
    pub street: Option<String>,

    /// Building, floor, etc.
    pub complement: Option<String>,

    /// Postal code
    pub postal_code: Option<String>,

    /// City
    pub city: Option<String>,

    /// Country
    pub country: Option<String>,
}

impl Address {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.complement.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

/// Member data as supplied by an import row, before it has an id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMember {
    /// Genealogy code, unique per member
    pub code: String,

    /// First name (required)
    pub first_name: String,

    /// Last name
    pub last_name: Option<String>,

    /// Nickname
    pub nick_name: Option<String>,

    /// Birth date
    pub birth_date: Option<NaiveDate>,

    /// Death date
    pub death_date: Option<NaiveDate>,

    /// Landline number
    pub phone_number: Option<String>,

    /// Mobile number
    pub mobile_number: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Personal website
    pub website: Option<String>,

    /// Free-form biography
    pub biography: Option<String>,

    /// Postal address, `None` when every field is empty
    pub address: Option<Address>,

    /// Social network accounts, in the order given
    pub social_networks: Vec<SocialNetwork>,
}

/// Kind of social network account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SocialNetworkType {
    /// Facebook profile
    #[default]
    Facebook,
    /// Instagram account
    Instagram,
    /// LinkedIn profile
    LinkedIn,
    /// Twitter / X account
    Twitter,
    /// Any other network, by name
    Other(String),
}

impl SocialNetworkType {
    /// Name as stored and as written in import files
    pub fn as_str(&self) -> &str {
        match self {
            SocialNetworkType::Facebook => "facebook",
            SocialNetworkType::Instagram => "instagram",
            SocialNetworkType::LinkedIn => "linkedin",
            SocialNetworkType::Twitter => "twitter",
            SocialNetworkType::Other(name) => name.as_str(),
        }
    }

    /// Parse a network name, case-insensitively
    ///
    /// Unknown names are kept as [`SocialNetworkType::Other`], lowercased.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => SocialNetworkType::Facebook,
            "instagram" => SocialNetworkType::Instagram,
            "linkedin" => SocialNetworkType::LinkedIn,
            "twitter" | "x" => SocialNetworkType::Twitter,
            other => SocialNetworkType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SocialNetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One social network account of a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialNetwork {
    /// Network the account belongs to
    pub network_type: SocialNetworkType,

    /// Handle or profile URL
    pub value: String,
}

/// A persisted member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,

    /// Everything else
    pub data: NewMember,
}

impl Member {
    /// Genealogy code
    pub fn code(&self) -> &str {
        &self.data.code
    }

    /// "First Last" or just the first name
    pub fn display_name(&self) -> String {
        match &self.data.last_name {
            Some(last) => format!("{} {}", self.data.first_name, last),
            None => self.data.first_name.clone(),
        }
    }
}

/// Whether an upsert inserted a new row or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpsertOutcome {
    /// A new row was inserted
    Created,

    /// An existing row was updated in place
    Updated,
}

/// Identifier returned by an upsert, with what happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted<I> {
    /// Id of the inserted or updated row
    pub id: I,

    /// Whether the row is new
    pub outcome: UpsertOutcome,
}

impl<I> Upserted<I> {
    /// A freshly inserted row
    pub fn created(id: I) -> Self {
        Self {
            id,
            outcome: UpsertOutcome::Created,
        }
    }

    /// An updated row
    pub fn updated(id: I) -> Self {
        Self {
            id,
            outcome: UpsertOutcome::Updated,
        }
    }

    /// True if the row was inserted
    pub fn is_created(&self) -> bool {
        self.outcome == UpsertOutcome::Created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let mut member = Member {
            id: MemberId::from_value(1),
            data: NewMember {
                code: "0".to_string(),
                first_name: "Jeanne".to_string(),
                ..Default::default()
            },
        };
        assert_eq!(member.display_name(), "Jeanne");

        member.data.last_name = Some("Martin".to_string());
        assert_eq!(member.display_name(), "Jeanne Martin");
    }

    #[test]
    fn test_empty_address() {
        assert!(Address::default().is_empty());

        let address = Address {
            city: Some("Lyon".to_string()),
            ..Default::default()
        };
        assert!(!address.is_empty());
    }

    #[test]
    fn test_social_network_type_names() {
        assert_eq!(SocialNetworkType::parse("Facebook"), SocialNetworkType::Facebook);
        assert_eq!(SocialNetworkType::parse(" LinkedIn "), SocialNetworkType::LinkedIn);
        assert_eq!(SocialNetworkType::parse("x"), SocialNetworkType::Twitter);
        assert_eq!(
            SocialNetworkType::parse("Mastodon"),
            SocialNetworkType::Other("mastodon".to_string())
        );
        assert_eq!(SocialNetworkType::Other("mastodon".to_string()).as_str(), "mastodon");
        assert_eq!(SocialNetworkType::default(), SocialNetworkType::Facebook);
    }

    #[test]
    fn test_upserted_outcome() {
        assert!(Upserted::created(MemberId::from_value(3)).is_created());
        assert!(!Upserted::updated(MemberId::from_value(3)).is_created());
    }
}
