//! Payload schemas exchanged with the control bus

use super::{CodecError, Edn, EdnDecode, EdnEncode, Keyword};
use crate::auth::Credentials;
use crate::descriptor::ApplicationDescriptor;

const USERNAME: &str = "username";
const PASSWORD: &str = "password";
const TOKEN: &str = "token";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const CLASSPATHS: &str = "classpaths";

/// Body of a successful `/auth` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
}

fn entry(key: &str, value: impl Into<Edn>) -> (Edn, Edn) {
    (Edn::Keyword(Keyword::new(key)), value.into())
}

fn require_map(value: &Edn) -> Result<&Edn, CodecError> {
    match value {
        Edn::Map(_) => Ok(value),
        other => Err(CodecError::NotAMap {
            found: other.kind(),
        }),
    }
}

fn string_field(map: &Edn, field: &str) -> Result<Option<String>, CodecError> {
    match map.get(&Keyword::new(field)) {
        None | Some(Edn::Nil) => Ok(None),
        Some(Edn::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CodecError::InvalidField {
            field: field.to_string(),
            expected: "a string",
            found: other.kind(),
        }),
    }
}

fn required_string(map: &Edn, field: &str) -> Result<String, CodecError> {
    string_field(map, field)?.ok_or_else(|| CodecError::MissingField {
        field: field.to_string(),
    })
}

fn string_seq(map: &Edn, field: &str) -> Result<Vec<String>, CodecError> {
    let invalid = |found| CodecError::InvalidField {
        field: field.to_string(),
        expected: "a vector of strings",
        found,
    };

    match map.get(&Keyword::new(field)) {
        None | Some(Edn::Nil) => Ok(Vec::new()),
        Some(value) => {
            let items = value.as_seq().ok_or_else(|| invalid(value.kind()))?;
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(item.kind()))
                })
                .collect()
        }
    }
}

impl EdnEncode for Credentials {
    fn to_edn(&self) -> Edn {
        Edn::Map(vec![
            entry(USERNAME, self.username.as_str()),
            entry(PASSWORD, self.password.as_str()),
        ])
    }
}

impl EdnDecode for AuthResponse {
    fn from_edn(value: &Edn) -> Result<Self, CodecError> {
        let map = require_map(value)?;
        let token = required_string(map, TOKEN)?;
        if token.is_empty() {
            return Err(CodecError::InvalidField {
                field: TOKEN.to_string(),
                expected: "a non-empty string",
                found: "an empty string",
            });
        }
        Ok(AuthResponse { token })
    }
}

impl EdnEncode for ApplicationDescriptor {
    fn to_edn(&self) -> Edn {
        let mut entries = Vec::with_capacity(3);
        if let Some(name) = self.name() {
            entries.push(entry(NAME, name));
        }
        entries.push(entry(DESCRIPTION, self.description()));
        entries.push(entry(
            CLASSPATHS,
            Edn::Vector(self.classpaths().iter().map(|c| Edn::from(c.as_str())).collect()),
        ));
        Edn::Map(entries)
    }
}

impl EdnDecode for ApplicationDescriptor {
    fn from_edn(value: &Edn) -> Result<Self, CodecError> {
        let map = require_map(value)?;
        Ok(ApplicationDescriptor::new(
            string_field(map, NAME)?,
            string_field(map, DESCRIPTION)?,
            string_seq(map, CLASSPATHS)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};

    #[test]
    fn test_credentials_document() {
        let credentials = Credentials::new("deployer", "s3cr\"t");
        assert_eq!(
            encode(&credentials),
            r#"{:username "deployer" :password "s3cr\"t"}"#
        );
    }

    #[test]
    fn test_descriptor_document() {
        let descriptor = ApplicationDescriptor::new(
            Some("orders".to_string()),
            None,
            vec![
                "file:///srv/orders/classes/".to_string(),
                "file:///srv/orders/lib/a.jar".to_string(),
            ],
        );
        assert_eq!(
            encode(&descriptor),
            r#"{:name "orders" :description nil :classpaths ["file:///srv/orders/classes/" "file:///srv/orders/lib/a.jar"]}"#
        );
    }

    #[test]
    fn test_unnamed_descriptor_omits_name() {
        let descriptor = ApplicationDescriptor::new(None, Some("batch jobs".to_string()), vec![]);
        assert_eq!(
            encode(&descriptor),
            r#"{:description "batch jobs" :classpaths []}"#
        );
    }

    #[test]
    fn test_descriptor_round_trip_keeps_order() {
        let descriptor = ApplicationDescriptor::new(
            Some("orders".to_string()),
            Some("Order service".to_string()),
            vec![
                "file:///z.jar".to_string(),
                "file:///a.jar".to_string(),
                "file:///m/".to_string(),
            ],
        );
        let decoded: ApplicationDescriptor = decode(&encode(&descriptor)).unwrap();
        assert_eq!(decoded, descriptor);

        let unnamed = ApplicationDescriptor::new(None, None, vec!["file:///c/".to_string()]);
        let decoded: ApplicationDescriptor = decode(&encode(&unnamed)).unwrap();
        assert_eq!(decoded, unnamed);
    }

    #[test]
    fn test_auth_response_reads_token_field() {
        let response: AuthResponse =
            decode(r#"{:token "01234567890012345678901234567890123456789012345"}"#).unwrap();
        assert_eq!(response.token, "01234567890012345678901234567890123456789012345");

        // Field position and surrounding keys don't matter
        let response: AuthResponse =
            decode(r#"{:expires 3600, :token "abc", :user/id "deployer"}"#).unwrap();
        assert_eq!(response.token, "abc");
    }

    #[test]
    fn test_auth_response_validation() {
        assert_eq!(
            decode::<AuthResponse>(r#"{:result "ok"}"#),
            Err(CodecError::MissingField {
                field: "token".to_string()
            })
        );
        assert!(matches!(
            decode::<AuthResponse>("{:token 42}"),
            Err(CodecError::InvalidField { .. })
        ));
        assert!(matches!(
            decode::<AuthResponse>(r#"["token"]"#),
            Err(CodecError::NotAMap { found: "vector" })
        ));
        assert!(matches!(
            decode::<AuthResponse>("{:token"),
            Err(CodecError::Syntax(_))
        ));
    }

    #[test]
    fn test_descriptor_rejects_non_string_classpaths() {
        assert!(matches!(
            decode::<ApplicationDescriptor>("{:classpaths [1 2]}"),
            Err(CodecError::InvalidField { .. })
        ));
    }
}
