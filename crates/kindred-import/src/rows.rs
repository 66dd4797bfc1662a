//! CSV member rows and their conversion into members

use chrono::NaiveDate;
use kindred_domain::{Address, NewMember, SocialNetwork, SocialNetworkType};
use serde::Deserialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separates accounts in the `socialNetworks` column
const NETWORK_SEPARATOR: char = '|';

/// Separates the network name from the account value (`instagram=louis_m`)
const NETWORK_TYPE_SEPARATOR: char = '=';

/// One CSV data row, as headed in the export format
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct MemberRow {
    pub code: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub nick_name: Option<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub phone_number: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub biography: Option<String>,
    pub street: Option<String>,
    pub complement: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub social_networks: Option<String>,
}

impl MemberRow {
    /// Normalize and validate the row
    ///
    /// Blank optional fields become `None`. The code is only checked for
    /// presence here; its notation is checked when relations are resolved.
    pub fn into_new_member(self) -> Result<NewMember, String> {
        let code = self.code.trim().to_string();
        if code.is_empty() {
            return Err("code is empty".to_string());
        }

        let first_name = self.first_name.trim().to_string();
        if first_name.is_empty() {
            return Err(format!("first name is empty for code {}", code));
        }

        let birth_date = parse_date("birth date", &code, non_blank(self.birth_date))?;
        let death_date = parse_date("death date", &code, non_blank(self.death_date))?;

        let address = Address {
            street: non_blank(self.street),
            complement: non_blank(self.complement),
            postal_code: non_blank(self.postal_code),
            city: non_blank(self.city),
            country: non_blank(self.country),
        };

        Ok(NewMember {
            code,
            first_name,
            last_name: non_blank(self.last_name),
            nick_name: non_blank(self.nick_name),
            birth_date,
            death_date,
            phone_number: non_blank(self.phone_number),
            mobile_number: non_blank(self.mobile_number),
            email: non_blank(self.email),
            website: non_blank(self.website),
            biography: non_blank(self.biography),
            address: if address.is_empty() { None } else { Some(address) },
            social_networks: non_blank(self.social_networks)
                .map(|s| parse_social_networks(&s))
                .unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(field: &str, code: &str, value: Option<String>) -> Result<Option<NaiveDate>, String> {
    value
        .map(|date| {
            NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
                format!(
                    "{} '{}' for code {} is not a YYYY-MM-DD date: {}",
                    field, date, code, e
                )
            })
        })
        .transpose()
}

/// Parse `facebook=louis.martin|instagram=louis_m`
///
/// An entry without a network name (or whose text before `=` is not a plain
/// name, as in a URL with a query string) is a Facebook account.
fn parse_social_networks(s: &str) -> Vec<SocialNetwork> {
    s.split(NETWORK_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (network_type, value) = match entry.split_once(NETWORK_TYPE_SEPARATOR) {
                Some((name, value))
                    if !name.trim().is_empty()
                        && name.trim().chars().all(|c| c.is_ascii_alphanumeric()) =>
                {
                    (SocialNetworkType::parse(name), value.trim())
                }
                _ => (SocialNetworkType::default(), entry),
            };
            if value.is_empty() {
                return None;
            }
            Some(SocialNetwork {
                network_type,
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, first_name: &str) -> MemberRow {
        MemberRow {
            code: code.to_string(),
            first_name: first_name.to_string(),
            ..Default::default()
        }
    }

    fn date_of(birth_date: &str) -> Result<Option<NaiveDate>, String> {
        let mut r = row("0", "Louis");
        r.birth_date = Some(birth_date.to_string());
        r.into_new_member().map(|m| m.birth_date)
    }

    #[test]
    fn test_valid_row() {
        let mut r = row(" 0.1 ", " Marie ");
        r.last_name = Some("".to_string());
        r.birth_date = Some("1950-02-28".to_string());
        r.city = Some("Lyon".to_string());

        let member = r.into_new_member().unwrap();
        assert_eq!(member.code, "0.1");
        assert_eq!(member.first_name, "Marie");
        assert_eq!(member.last_name, None);
        assert_eq!(member.birth_date, NaiveDate::from_ymd_opt(1950, 2, 28));
        assert_eq!(member.address.unwrap().city.as_deref(), Some("Lyon"));
        assert!(member.social_networks.is_empty());
    }

    #[test]
    fn test_blank_address_is_none() {
        let mut r = row("0", "Louis");
        r.street = Some("   ".to_string());
        assert!(r.into_new_member().unwrap().address.is_none());
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(row("", "Louis").into_new_member().is_err());
        assert!(row("0", "  ").into_new_member().is_err());
    }

    #[test]
    fn test_invalid_date() {
        let mut r = row("0", "Louis");
        r.death_date = Some("12/03/1990".to_string());
        let err = r.into_new_member().unwrap_err();
        assert!(err.contains("death date"));
    }

    #[test]
    fn test_blank_date_is_none() {
        assert_eq!(date_of("   "), Ok(None));
    }

    #[test]
    fn test_calendar_rules() {
        assert_eq!(date_of("2000-02-29"), Ok(NaiveDate::from_ymd_opt(2000, 2, 29)));
        assert!(date_of("1900-02-29").is_err());
        assert!(date_of("2023-04-31").is_err());
        assert!(date_of("2023-13-01").is_err());
        assert!(date_of("2023-01-01-01").is_err());
        assert!(date_of("1950-03-12T10:00").is_err());
    }

    #[test]
    fn test_social_networks_column() {
        let mut r = row("0", "Louis");
        r.social_networks =
            Some("facebook=louis.martin | Instagram=louis_m|https://example.org/?u=1||".to_string());

        let networks = r.into_new_member().unwrap().social_networks;
        assert_eq!(
            networks,
            vec![
                SocialNetwork {
                    network_type: SocialNetworkType::Facebook,
                    value: "louis.martin".to_string(),
                },
                SocialNetwork {
                    network_type: SocialNetworkType::Instagram,
                    value: "louis_m".to_string(),
                },
                SocialNetwork {
                    network_type: SocialNetworkType::Facebook,
                    value: "https://example.org/?u=1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_social_network_without_value_is_dropped() {
        assert!(parse_social_networks("twitter=  | ").is_empty());
    }
}
